pub mod id;

pub use id::RestaurantId;
