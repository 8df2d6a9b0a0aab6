//! Typed errors and HTTP mapping.

use crate::response::{error_body, validation_errors_body};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use thiserror::Error;

/// Persisted entity kinds, used to label not-found and reference errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Restaurant,
    Pizza,
    RestaurantPizza,
}

impl Entity {
    pub const fn name(self) -> &'static str {
        match self {
            Entity::Restaurant => "Restaurant",
            Entity::Pizza => "Pizza",
            Entity::RestaurantPizza => "RestaurantPizza",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-level validation failure raised by constructors. Carries the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be present")]
    MissingField(&'static str),
    #[error("{0} must be an integer")]
    NotAnInteger(&'static str),
    #[error("price must be between 1 and 30, got {0}")]
    PriceOutOfRange(i64),
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("body must be a JSON object")]
    NotAnObject,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures of the data access layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },
    #[error("referenced {entity} {id} does not exist")]
    MissingReference { entity: Entity, id: i64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// Request-level error. Validation detail is kept for logs only; the body is fixed.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity, .. } => AppError::NotFound(entity),
            missing @ StoreError::MissingReference { .. } => AppError::Validation(missing.to_string()),
            StoreError::Validation(v) => v.into(),
            StoreError::Db(db) => AppError::Db(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(entity) => {
                tracing::debug!(%entity, "not found");
                (StatusCode::NOT_FOUND, Json(error_body(format!("{} not found", entity)))).into_response()
            }
            AppError::Validation(detail) => {
                tracing::debug!(%detail, "rejected request");
                (StatusCode::BAD_REQUEST, Json(validation_errors_body())).into_response()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(error_body("internal server error".to_string())),
                )
                    .into_response()
            }
        }
    }
}
