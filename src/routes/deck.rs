use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::deck_dto::{DeckQuery, DeckResponse},
    error::Result,
    models::prompt::SdtPersona,
    sequencer::TestKind,
    AppState,
};

/// A freshly sampled deck plus the timing the client should run it with.
#[axum::debug_handler]
pub async fn get_deck(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<DeckQuery>,
) -> Result<impl IntoResponse> {
    let kind: TestKind = kind.parse()?;
    let persona = match query.persona.as_deref() {
        Some(raw) => raw.parse()?,
        None => SdtPersona::Student,
    };

    let (deck, timing) = state.deck_service.build(kind, persona).await?;
    let persona = (kind == TestKind::Sdt).then_some(persona);
    Ok(Json(DeckResponse::new(kind, persona, deck, timing)))
}
