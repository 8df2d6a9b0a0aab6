//! Restaurant handlers: list, read with menu, delete.

use crate::error::AppError;
use crate::extractors::RestaurantId;
use crate::models::Relations;
use crate::serialize::{
    restaurant_record, PizzaField, PizzaOptions, Record, RestaurantOptions, RestaurantPizzaField,
    RestaurantPizzaOptions,
};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// `{id, name, address, restaurant_pizzas: [{id, price, pizza: {id, name}}]}`
fn detail_options() -> RestaurantOptions {
    RestaurantOptions::new().include_restaurant_pizzas_with(
        RestaurantPizzaOptions::new()
            .include_pizza_with(PizzaOptions::new().exclude(PizzaField::Ingredients))
            .exclude(RestaurantPizzaField::PizzaId)
            .exclude(RestaurantPizzaField::RestaurantId),
    )
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    let restaurants = state.store.list_restaurants().await?;
    let relations = Relations::new();
    let options = RestaurantOptions::new();
    Ok(Json(
        restaurants
            .iter()
            .map(|r| restaurant_record(r, &relations, &options))
            .collect(),
    ))
}

pub async fn read(
    State(state): State<AppState>,
    RestaurantId(id): RestaurantId,
) -> Result<Json<Record>, AppError> {
    let restaurant = state.store.get_restaurant(id).await?;
    let relations = state.store.restaurant_relations(id).await?;
    Ok(Json(restaurant_record(&restaurant, &relations, &detail_options())))
}

pub async fn delete(
    State(state): State<AppState>,
    RestaurantId(id): RestaurantId,
) -> Result<StatusCode, AppError> {
    state.store.delete_restaurant(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
