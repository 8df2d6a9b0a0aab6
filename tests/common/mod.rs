#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pizza_api::config::DEFAULT_BODY_LIMIT;
use pizza_api::{build_router, AppState, NewPizza, NewRestaurant, Pizza, Restaurant, Store};
use serde_json::Value;
use tower::ServiceExt;

/// Router over a fresh in-memory database, plus a handle to the same store.
pub async fn test_app() -> (Router, Store) {
    let store = Store::in_memory().await.expect("in-memory store");
    let router = build_router(AppState::new(store.clone()), DEFAULT_BODY_LIMIT);
    (router, store)
}

/// Send a request and decode the body as JSON (`Null` when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn restaurant(store: &Store, name: &str, address: &str) -> Restaurant {
    store
        .create_restaurant(NewRestaurant::new(name, address).unwrap())
        .await
        .unwrap()
}

pub async fn pizza(store: &Store, name: &str, ingredients: &str) -> Pizza {
    store
        .create_pizza(NewPizza::new(name, ingredients).unwrap())
        .await
        .unwrap()
}
