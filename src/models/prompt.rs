use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PromptKind {
    Tat,
    Wat,
    Srt,
    SdtStudent,
    SdtProfessional,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Tat => "tat",
            PromptKind::Wat => "wat",
            PromptKind::Srt => "srt",
            PromptKind::SdtStudent => "sdt_student",
            PromptKind::SdtProfessional => "sdt_professional",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdtPersona {
    Student,
    Professional,
}

impl SdtPersona {
    pub fn kind(&self) -> PromptKind {
        match self {
            SdtPersona::Student => PromptKind::SdtStudent,
            SdtPersona::Professional => PromptKind::SdtProfessional,
        }
    }
}

impl FromStr for SdtPersona {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(SdtPersona::Student),
            "professional" => Ok(SdtPersona::Professional),
            other => Err(crate::error::Error::NotFound(format!(
                "Unknown SDT persona '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromptRecord {
    pub id: i64,
    pub kind: PromptKind,
    pub payload: String,
    pub active: bool,
    pub image_set_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
