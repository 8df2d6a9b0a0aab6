use crate::error::AppError;
use crate::models::Relations;
use crate::serialize::{pizza_record, PizzaOptions, Record};
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Record>>, AppError> {
    let pizzas = state.store.list_pizzas().await?;
    let relations = Relations::new();
    let options = PizzaOptions::new();
    Ok(Json(pizzas.iter().map(|p| pizza_record(p, &relations, &options)).collect()))
}
