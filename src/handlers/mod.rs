//! HTTP handlers for restaurants, pizzas and restaurant pizzas.

pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

use crate::response::{message, MessageBody};
use axum::Json;

pub async fn index() -> Json<MessageBody> {
    Json(message("Pizza API running!"))
}
