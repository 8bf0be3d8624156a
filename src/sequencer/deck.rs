use serde::{Deserialize, Serialize};

use super::timing::TAT_IMAGE_COUNT;
use crate::models::prompt::PromptRecord;

/// Id reserved for the synthetic blank slide that closes every TAT deck.
pub const BLANK_SLIDE_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub id: i64,
    pub payload: String,
}

impl DeckEntry {
    pub fn new(id: i64, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    pub fn blank_slide() -> Self {
        Self::new(BLANK_SLIDE_ID, "")
    }

    pub fn is_blank_slide(&self) -> bool {
        self.id == BLANK_SLIDE_ID
    }
}

impl From<PromptRecord> for DeckEntry {
    fn from(record: PromptRecord) -> Self {
        Self::new(record.id, record.payload)
    }
}

impl From<&PromptRecord> for DeckEntry {
    fn from(record: &PromptRecord) -> Self {
        Self::new(record.id, record.payload.clone())
    }
}

/// Read-only snapshot of the prompts a session walks through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    entries: Vec<DeckEntry>,
}

impl Deck {
    pub fn new(entries: Vec<DeckEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Up to eleven images in the given order, then exactly one blank slide.
    pub fn tat<I>(images: I) -> Self
    where
        I: IntoIterator<Item = DeckEntry>,
    {
        let mut entries: Vec<DeckEntry> = images
            .into_iter()
            .filter(|entry| !entry.is_blank_slide())
            .take(TAT_IMAGE_COUNT)
            .collect();
        entries.push(DeckEntry::blank_slide());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DeckEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DeckEntry> {
        self.entries
    }
}

impl FromIterator<DeckEntry> for Deck {
    fn from_iter<T: IntoIterator<Item = DeckEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
