use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::accessibility::Accessibility;

/// Preferences resolved by `middleware::accessibility::track_preferences`.
///
/// Falls back to the defaults when the middleware is not installed, so
/// handlers can always take this as a parameter.
impl<S> FromRequestParts<S> for Accessibility
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Accessibility>()
            .copied()
            .unwrap_or_default())
    }
}
