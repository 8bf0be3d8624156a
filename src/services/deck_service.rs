use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::prompt::{PromptKind, PromptRecord, SdtPersona};
use crate::sequencer::{Deck, DeckEntry, TestKind, TimingConfig, TimingProfile};
use crate::services::content_service::ContentService;
use crate::utils::sampling::sample;

/// Assembles the deck a test session walks through, snapshotting the store.
#[derive(Clone)]
pub struct DeckService {
    content: ContentService,
    timing: TimingConfig,
    sample_cap: usize,
    image_set_size: usize,
}

impl DeckService {
    pub fn new(
        content: ContentService,
        timing: TimingConfig,
        sample_cap: usize,
        image_set_size: usize,
    ) -> Self {
        Self {
            content,
            timing,
            sample_cap,
            image_set_size,
        }
    }

    pub fn profile(&self, kind: TestKind) -> TimingProfile {
        self.timing.profile(kind)
    }

    pub async fn build(&self, kind: TestKind, persona: SdtPersona) -> Result<(Deck, TimingProfile)> {
        let profile = self.profile(kind);
        let deck = match kind {
            TestKind::Tat => self.tat_deck().await?,
            TestKind::Wat => self.sampled(PromptKind::Wat, profile.item_cap).await?,
            TestKind::Srt => self.sampled(PromptKind::Srt, profile.item_cap).await?,
            TestKind::Sdt => self
                .content
                .list_active(persona.kind())
                .await?
                .into_iter()
                .map(DeckEntry::from)
                .collect(),
        };

        tracing::debug!(kind = %kind, entries = deck.len(), "deck assembled");
        Ok((deck, profile))
    }

    async fn sampled(&self, kind: PromptKind, item_cap: Option<usize>) -> Result<Deck> {
        let records = self.content.list_active(kind).await?;
        let count = item_cap.map_or(self.sample_cap, |cap| cap.min(self.sample_cap));
        Ok(sample(&records, count).into_iter().map(DeckEntry::from).collect())
    }

    /// Images of one random uploaded set in slide order, or a random pick of loose
    /// TAT images when no set has an active image.
    async fn tat_deck(&self) -> Result<Deck> {
        let records = self.content.list_active(PromptKind::Tat).await?;

        let mut sets: BTreeMap<i64, Vec<PromptRecord>> = BTreeMap::new();
        for record in &records {
            if let Some(set_id) = record.image_set_id {
                sets.entry(set_id).or_default().push(record.clone());
            }
        }

        let set_ids: Vec<i64> = sets.keys().copied().collect();
        let chosen = {
            let mut rng = rand::thread_rng();
            set_ids.choose(&mut rng).copied()
        };

        let images: Vec<PromptRecord> = match chosen.and_then(|id| sets.remove(&id)) {
            Some(set) => set,
            None => sample(&records, self.image_set_size),
        };

        Ok(Deck::tat(images.into_iter().map(DeckEntry::from)))
    }
}
