//! Extract integer entity ids from the request path.

use crate::error::{AppError, Entity};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// `:id` segment of a `/restaurants/:id` route. A segment that is not an integer
/// cannot name a restaurant, so it is rejected as not found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestaurantId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RestaurantId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound(Entity::Restaurant))?;
        raw.parse::<i64>().map(RestaurantId).map_err(|_| {
            tracing::debug!(id = %raw, "non-integer restaurant id");
            AppError::NotFound(Entity::Restaurant)
        })
    }
}
