//! Create a priced menu entry linking a pizza to a restaurant.

use crate::error::AppError;
use crate::models::NewRestaurantPizza;
use crate::serialize::{
    restaurant_pizza_record, PizzaField, PizzaOptions, Record, RestaurantField, RestaurantOptions,
    RestaurantPizzaOptions,
};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// `{id, price, pizza_id, restaurant_id, pizza: {id, name}, restaurant: {id, name}}`
fn created_options() -> RestaurantPizzaOptions {
    RestaurantPizzaOptions::new()
        .include_pizza_with(PizzaOptions::new().exclude(PizzaField::Ingredients))
        .include_restaurant_with(RestaurantOptions::new().exclude(RestaurantField::Address))
}

/// Any unreadable body, missing field, bad price or unknown reference is a 400.
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let new = NewRestaurantPizza::from_body(&body)?;
    let restaurant_pizza = state.store.create_restaurant_pizza(new).await?;
    tracing::info!(
        id = restaurant_pizza.id,
        pizza_id = restaurant_pizza.pizza_id,
        restaurant_id = restaurant_pizza.restaurant_id,
        "created restaurant pizza"
    );
    let relations = state.store.restaurant_pizza_relations(&restaurant_pizza).await?;
    Ok((
        StatusCode::CREATED,
        Json(restaurant_pizza_record(&restaurant_pizza, &relations, &created_options())),
    ))
}
