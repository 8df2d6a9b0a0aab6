//! Runtime settings.

pub mod settings;

pub use settings::*;
