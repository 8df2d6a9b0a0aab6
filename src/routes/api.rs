//! Restaurant, pizza and restaurant pizza routes.

use crate::handlers::{index, pizza, restaurant, restaurant_pizza};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/restaurants", get(restaurant::list))
        .route("/restaurants/:id", get(restaurant::read).delete(restaurant::delete))
        .route("/pizzas", get(pizza::list))
        .route("/restaurant_pizzas", post(restaurant_pizza::create))
        .with_state(state)
}
