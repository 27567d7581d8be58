use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::Identity;

/// Extractor that hands the verified `Identity` to a handler.
/// Assumes the authentication stage already inserted it into request extensions.
/// Missing -> 401 (route not wrapped by the authentication stage).
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(CurrentUser)
            .ok_or_else(AppError::unauthenticated)
    }
}
