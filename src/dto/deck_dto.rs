use serde::{Deserialize, Serialize};

use crate::models::prompt::SdtPersona;
use crate::sequencer::{format_countdown, Deck, TestKind, TimingProfile};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckQuery {
    pub persona: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckResponse {
    pub kind: TestKind,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<SdtPersona>,
    pub timing: TimingProfile,
    /// Initial countdown, `MM:SS`.
    pub countdown: String,
    pub entries: Deck,
}

impl DeckResponse {
    pub fn new(kind: TestKind, persona: Option<SdtPersona>, deck: Deck, timing: TimingProfile) -> Self {
        Self {
            kind,
            title: kind.title(),
            persona,
            countdown: format_countdown(timing.display_seconds),
            timing,
            entries: deck,
        }
    }
}
