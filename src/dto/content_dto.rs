use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::prompt::{PromptKind, PromptRecord};
use crate::services::content_service::{MergeEntry, MergeOutcome};

fn default_active() -> bool {
    true
}

/// A content write, normalized across the per-kind request shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    One { text: String, active: bool },
    Many(Vec<MergeEntry>),
}

fn validate_all<T: Validate>(items: &[T]) -> Result<(), ValidationErrors> {
    items.iter().try_for_each(Validate::validate)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImageItem {
    #[serde(alias = "imageUrl")]
    pub image_url: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TatSubmission {
    Many(Vec<ImageItem>),
    One(ImageItem),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WordItem {
    pub word: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// `{"words": [...]}`, `[{"word", "active"}, ...]` or a single `{"word", "active"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WatSubmission {
    Words { words: Vec<String> },
    Many(Vec<WordItem>),
    One(WordItem),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScenarioItem {
    pub scenario: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SrtSubmission {
    Scenarios { scenarios: Vec<String> },
    Many(Vec<ScenarioItem>),
    One(ScenarioItem),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionItem {
    pub question: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SdtSubmission {
    Many(Vec<QuestionItem>),
    One(QuestionItem),
}

impl From<TatSubmission> for Submission {
    fn from(value: TatSubmission) -> Self {
        match value {
            TatSubmission::Many(items) => {
                Submission::Many(
                    items
                        .into_iter()
                        .map(|i| MergeEntry { text: i.image_url, active: i.active })
                        .collect(),
                )
            }
            TatSubmission::One(item) => Submission::One {
                text: item.image_url,
                active: item.active,
            },
        }
    }
}

impl From<WatSubmission> for Submission {
    fn from(value: WatSubmission) -> Self {
        match value {
            WatSubmission::Words { words } => {
                Submission::Many(words.into_iter().map(MergeEntry::active).collect())
            }
            WatSubmission::Many(items) => Submission::Many(
                items
                    .into_iter()
                    .map(|i| MergeEntry { text: i.word, active: i.active })
                    .collect(),
            ),
            WatSubmission::One(item) => Submission::One {
                text: item.word,
                active: item.active,
            },
        }
    }
}

impl From<SrtSubmission> for Submission {
    fn from(value: SrtSubmission) -> Self {
        match value {
            SrtSubmission::Scenarios { scenarios } => {
                Submission::Many(scenarios.into_iter().map(MergeEntry::active).collect())
            }
            SrtSubmission::Many(items) => Submission::Many(
                items
                    .into_iter()
                    .map(|i| MergeEntry { text: i.scenario, active: i.active })
                    .collect(),
            ),
            SrtSubmission::One(item) => Submission::One {
                text: item.scenario,
                active: item.active,
            },
        }
    }
}

impl From<SdtSubmission> for Submission {
    fn from(value: SdtSubmission) -> Self {
        match value {
            SdtSubmission::Many(items) => {
                Submission::Many(
                    items
                        .into_iter()
                        .map(|i| MergeEntry { text: i.question, active: i.active })
                        .collect(),
                )
            }
            SdtSubmission::One(item) => Submission::One {
                text: item.question,
                active: item.active,
            },
        }
    }
}

impl Validate for TatSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            TatSubmission::Many(items) => validate_all(items),
            TatSubmission::One(item) => item.validate(),
        }
    }
}

impl Validate for WatSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            WatSubmission::Words { .. } => Ok(()),
            WatSubmission::Many(items) => validate_all(items),
            WatSubmission::One(item) => item.validate(),
        }
    }
}

impl Validate for SrtSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            SrtSubmission::Scenarios { .. } => Ok(()),
            SrtSubmission::Many(items) => validate_all(items),
            SrtSubmission::One(item) => item.validate(),
        }
    }
}

impl Validate for SdtSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            SdtSubmission::Many(items) => validate_all(items),
            SdtSubmission::One(item) => item.validate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetActivePayload {
    pub active: bool,
}

/// Payload field name per kind, as clients read it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentBody {
    Image { image_url: String },
    Word { word: String },
    Scenario { scenario: String },
    Question { question: String },
}

impl ContentBody {
    pub fn new(kind: PromptKind, payload: String) -> Self {
        match kind {
            PromptKind::Tat => ContentBody::Image { image_url: payload },
            PromptKind::Wat => ContentBody::Word { word: payload },
            PromptKind::Srt => ContentBody::Scenario { scenario: payload },
            PromptKind::SdtStudent | PromptKind::SdtProfessional => {
                ContentBody::Question { question: payload }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub id: i64,
    #[serde(flatten)]
    pub body: ContentBody,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_set_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<PromptRecord> for ContentResponse {
    fn from(record: PromptRecord) -> Self {
        Self {
            id: record.id,
            body: ContentBody::new(record.kind, record.payload),
            active: record.active,
            image_set_id: record.image_set_id,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeResponse {
    pub success: bool,
    pub message: String,
    pub added: usize,
    pub skipped: usize,
    pub items: Vec<ContentResponse>,
}

impl MergeResponse {
    pub fn new(kind: PromptKind, outcome: MergeOutcome) -> Self {
        let noun = match kind {
            PromptKind::Tat => "Images",
            PromptKind::Wat => "Words",
            PromptKind::Srt => "Scenarios",
            PromptKind::SdtStudent | PromptKind::SdtProfessional => "Questions",
        };
        Self {
            success: true,
            message: format!("{} added successfully", noun),
            added: outcome.added.len(),
            skipped: outcome.skipped,
            items: outcome.added.into_iter().map(ContentResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
