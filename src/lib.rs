//! Pizza restaurants API: restaurants, pizzas and the prices that link them.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod serialize;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError, Entity, StoreError, ValidationError};
pub use models::{NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Price, Relations, Restaurant, RestaurantPizza};
pub use routes::build_router;
pub use state::AppState;
pub use store::Store;
