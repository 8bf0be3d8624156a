use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::auth_dto::{AuthResponse, LoginPayload, RegisterPayload},
    error::Result,
    utils::validation::ValidatedJson,
    AppState,
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse {
        success: true,
        message: None,
        user: user.into(),
    }))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: Some("Registered successfully, Please login".to_string()),
            user: user.into(),
        }),
    ))
}
