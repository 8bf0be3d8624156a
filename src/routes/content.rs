use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::{
    dto::content_dto::{
        ContentResponse, MergeResponse, SdtSubmission, SetActivePayload, SrtSubmission,
        Submission, SuccessResponse, TatSubmission, WatSubmission,
    },
    error::{Error, Result},
    middleware::auth::AdminUser,
    models::prompt::{PromptKind, SdtPersona},
    utils::{sampling::sample, validation::ValidatedJson},
    AppState,
};

fn respond_list(records: Vec<crate::models::prompt::PromptRecord>) -> Json<Vec<ContentResponse>> {
    Json(records.into_iter().map(ContentResponse::from).collect())
}

async fn list_active(state: &AppState, kind: PromptKind) -> Result<Json<Vec<ContentResponse>>> {
    let records = state.content_service.list_active(kind).await?;
    Ok(respond_list(records))
}

/// Active records, shuffled and cut to the sample cap.
async fn list_sampled(state: &AppState, kind: PromptKind) -> Result<Json<Vec<ContentResponse>>> {
    let records = state.content_service.list_active(kind).await?;
    Ok(respond_list(sample(&records, state.config.sample_cap)))
}

async fn list_all(state: &AppState, kind: PromptKind) -> Result<Json<Vec<ContentResponse>>> {
    let records = state.content_service.list_all(kind).await?;
    Ok(respond_list(records))
}

async fn submit(state: &AppState, kind: PromptKind, submission: Submission) -> Result<Response> {
    match submission {
        Submission::One { text, active } => {
            let record = state.content_service.create(kind, &text, active).await?;
            Ok((StatusCode::CREATED, Json(ContentResponse::from(record))).into_response())
        }
        Submission::Many(entries) => {
            if entries.is_empty() {
                return Err(Error::BadRequest("Invalid data format".to_string()));
            }
            let outcome = state.content_service.merge_entries(kind, entries).await?;
            Ok((StatusCode::CREATED, Json(MergeResponse::new(kind, outcome))).into_response())
        }
    }
}

async fn set_active(
    state: &AppState,
    kind: PromptKind,
    id: i64,
    payload: SetActivePayload,
) -> Result<Json<ContentResponse>> {
    let record = state
        .content_service
        .set_active(kind, id, payload.active)
        .await?;
    Ok(Json(ContentResponse::from(record)))
}

async fn delete(state: &AppState, kind: PromptKind, id: i64) -> Result<Json<SuccessResponse>> {
    state.content_service.delete(kind, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[axum::debug_handler]
pub async fn list_tat(State(state): State<AppState>) -> Result<impl IntoResponse> {
    list_active(&state, PromptKind::Tat).await
}

#[axum::debug_handler]
pub async fn list_wat(State(state): State<AppState>) -> Result<impl IntoResponse> {
    list_sampled(&state, PromptKind::Wat).await
}

#[axum::debug_handler]
pub async fn list_srt(State(state): State<AppState>) -> Result<impl IntoResponse> {
    list_sampled(&state, PromptKind::Srt).await
}

#[axum::debug_handler]
pub async fn list_sdt(
    State(state): State<AppState>,
    Path(persona): Path<String>,
) -> Result<impl IntoResponse> {
    let persona: SdtPersona = persona.parse()?;
    list_active(&state, persona.kind()).await
}

#[axum::debug_handler]
pub async fn list_all_tat(State(state): State<AppState>, _admin: AdminUser) -> Result<impl IntoResponse> {
    list_all(&state, PromptKind::Tat).await
}

#[axum::debug_handler]
pub async fn list_all_wat(State(state): State<AppState>, _admin: AdminUser) -> Result<impl IntoResponse> {
    list_all(&state, PromptKind::Wat).await
}

#[axum::debug_handler]
pub async fn list_all_srt(State(state): State<AppState>, _admin: AdminUser) -> Result<impl IntoResponse> {
    list_all(&state, PromptKind::Srt).await
}

#[axum::debug_handler]
pub async fn list_all_sdt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(persona): Path<String>,
) -> Result<impl IntoResponse> {
    let persona: SdtPersona = persona.parse()?;
    list_all(&state, persona.kind()).await
}

#[axum::debug_handler]
pub async fn create_tat(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<TatSubmission>,
) -> Result<Response> {
    submit(&state, PromptKind::Tat, payload.into()).await
}

#[axum::debug_handler]
pub async fn create_wat(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<WatSubmission>,
) -> Result<Response> {
    submit(&state, PromptKind::Wat, payload.into()).await
}

#[axum::debug_handler]
pub async fn create_srt(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<SrtSubmission>,
) -> Result<Response> {
    submit(&state, PromptKind::Srt, payload.into()).await
}

#[axum::debug_handler]
pub async fn create_sdt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(persona): Path<String>,
    ValidatedJson(payload): ValidatedJson<SdtSubmission>,
) -> Result<Response> {
    let persona: SdtPersona = persona.parse()?;
    submit(&state, persona.kind(), payload.into()).await
}

#[axum::debug_handler]
pub async fn update_tat(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SetActivePayload>,
) -> Result<impl IntoResponse> {
    set_active(&state, PromptKind::Tat, id, payload).await
}

#[axum::debug_handler]
pub async fn update_wat(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SetActivePayload>,
) -> Result<impl IntoResponse> {
    set_active(&state, PromptKind::Wat, id, payload).await
}

#[axum::debug_handler]
pub async fn update_srt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<SetActivePayload>,
) -> Result<impl IntoResponse> {
    set_active(&state, PromptKind::Srt, id, payload).await
}

#[axum::debug_handler]
pub async fn update_sdt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((persona, id)): Path<(String, i64)>,
    ValidatedJson(payload): ValidatedJson<SetActivePayload>,
) -> Result<impl IntoResponse> {
    let persona: SdtPersona = persona.parse()?;
    set_active(&state, persona.kind(), id, payload).await
}

#[axum::debug_handler]
pub async fn delete_tat(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    delete(&state, PromptKind::Tat, id).await
}

#[axum::debug_handler]
pub async fn delete_wat(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    delete(&state, PromptKind::Wat, id).await
}

#[axum::debug_handler]
pub async fn delete_srt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    delete(&state, PromptKind::Srt, id).await
}

#[axum::debug_handler]
pub async fn delete_sdt(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((persona, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse> {
    let persona: SdtPersona = persona.parse()?;
    delete(&state, persona.kind(), id).await
}
