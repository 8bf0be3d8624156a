use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::Error;
use crate::models::user::User;
use crate::AppState;

/// An administrator authenticated with HTTP Basic credentials.
///
/// Taking this extractor is what makes a route admin-only.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = state.user_service.authorize(header).await?;
        tracing::debug!(user_id = user.id, path = %parts.uri.path(), "admin request authorized");
        Ok(AdminUser(user))
    }
}
