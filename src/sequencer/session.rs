use serde::{Deserialize, Serialize};

use super::deck::{Deck, DeckEntry};
use super::timing::{format_countdown, TestKind, TimingProfile, TAT_DECK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingStart,
    Display,
    Gap,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Started {
        kind: TestKind,
        remaining_seconds: u32,
    },
    GapStarted {
        cursor: usize,
        remaining_seconds: u32,
    },
    Advanced {
        cursor: usize,
        remaining_seconds: u32,
    },
    Completed {
        kind: TestKind,
        items_presented: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session has already been started")]
    AlreadyStarted,
}

/// Timed walk through a deck of prompts.
///
/// The session never reads a clock itself: a driver calls [`TestSession::on_tick`]
/// once per elapsed second, and [`TestSession::on_expire`] is the single place
/// where phase transitions happen. Once [`Phase::Complete`] is reached every
/// further call is a no-op.
#[derive(Debug, Clone, Serialize)]
pub struct TestSession {
    kind: TestKind,
    profile: TimingProfile,
    deck: Deck,
    cursor: usize,
    phase: Phase,
    remaining_seconds: u32,
    paused: bool,
    timer_visible: bool,
}

impl TestSession {
    pub fn new(kind: TestKind) -> Self {
        Self {
            kind,
            profile: TimingProfile::for_kind(kind),
            deck: Deck::empty(),
            cursor: 0,
            phase: Phase::AwaitingStart,
            remaining_seconds: 0,
            paused: false,
            timer_visible: true,
        }
    }

    pub fn start(&mut self, deck: Deck, profile: TimingProfile) -> Result<SessionEvent, SessionError> {
        if self.phase != Phase::AwaitingStart {
            return Err(SessionError::AlreadyStarted);
        }

        self.deck = deck;
        self.profile = profile;
        self.cursor = 0;
        self.phase = Phase::Display;
        self.remaining_seconds = profile.display_seconds;

        if self.deck_limit() == 0 {
            tracing::debug!(kind = %self.kind, "session started without content");
        }

        Ok(SessionEvent::Started {
            kind: self.kind,
            remaining_seconds: self.remaining_seconds,
        })
    }

    /// Advances the countdown by one second, expiring the phase when it reaches zero.
    pub fn on_tick(&mut self) -> Option<SessionEvent> {
        if !self.is_running() || self.paused {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.on_expire()
        } else {
            None
        }
    }

    pub fn on_expire(&mut self) -> Option<SessionEvent> {
        match self.phase {
            Phase::AwaitingStart | Phase::Complete => None,
            Phase::Display if !self.profile.per_item => Some(self.complete()),
            Phase::Display => match self.profile.gap_seconds {
                Some(gap) => {
                    self.phase = Phase::Gap;
                    self.remaining_seconds = gap;
                    Some(SessionEvent::GapStarted {
                        cursor: self.cursor,
                        remaining_seconds: gap,
                    })
                }
                None => Some(self.advance_or_complete()),
            },
            Phase::Gap => Some(self.advance_or_complete()),
        }
    }

    fn advance_or_complete(&mut self) -> SessionEvent {
        if self.cursor + 1 < self.deck_limit() {
            self.cursor += 1;
            self.phase = Phase::Display;
            self.remaining_seconds = self.profile.display_seconds;
            SessionEvent::Advanced {
                cursor: self.cursor,
                remaining_seconds: self.remaining_seconds,
            }
        } else {
            self.complete()
        }
    }

    fn complete(&mut self) -> SessionEvent {
        let limit = self.deck_limit();
        let items_presented = if self.profile.per_item {
            (self.cursor + 1).min(limit)
        } else {
            limit
        };

        self.phase = Phase::Complete;
        self.remaining_seconds = 0;
        self.paused = false;
        tracing::info!(kind = %self.kind, items_presented, "test session complete");

        SessionEvent::Completed {
            kind: self.kind,
            items_presented,
        }
    }

    pub fn pause(&mut self) {
        if self.is_running() {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_timer_visibility(&mut self) -> bool {
        self.timer_visible = !self.timer_visible;
        self.timer_visible
    }

    pub fn set_timer_visible(&mut self, visible: bool) {
        self.timer_visible = visible;
    }

    pub fn is_timer_visible(&self) -> bool {
        self.timer_visible
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn countdown(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Display | Phase::Gap)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Running with nothing to show; the timer still counts down and completes.
    pub fn is_empty_state(&self) -> bool {
        self.is_running() && self.deck_limit() == 0
    }

    /// Number of deck entries the session will present.
    pub fn deck_limit(&self) -> usize {
        match self.profile.item_cap {
            Some(cap) => self.deck.len().min(cap),
            None => self.deck.len(),
        }
    }

    /// The entry under the cursor while a prompt is on screen.
    pub fn current(&self) -> Option<&DeckEntry> {
        if self.phase != Phase::Display || self.cursor >= self.deck_limit() {
            return None;
        }
        self.deck.get(self.cursor)
    }

    /// Entries on screen right now: the whole deck for a single-countdown test,
    /// the current prompt otherwise, nothing during a gap.
    pub fn visible_entries(&self) -> &[DeckEntry] {
        match self.phase {
            Phase::Display if !self.profile.per_item => &self.deck.entries()[..self.deck_limit()],
            Phase::Display if self.cursor < self.deck_limit() => {
                &self.deck.entries()[self.cursor..self.cursor + 1]
            }
            _ => &[],
        }
    }

    pub fn progress_percent(&self) -> f64 {
        match self.phase {
            Phase::AwaitingStart => 0.0,
            Phase::Complete => 100.0,
            Phase::Display | Phase::Gap if !self.profile.per_item => {
                if self.profile.display_seconds == 0 {
                    return 100.0;
                }
                self.remaining_seconds as f64 / self.profile.display_seconds as f64 * 100.0
            }
            Phase::Display | Phase::Gap => {
                let total = match self.kind {
                    TestKind::Tat => TAT_DECK_SIZE,
                    _ => self.deck_limit(),
                };
                if total == 0 {
                    return 0.0;
                }
                (self.cursor + 1) as f64 / total as f64 * 100.0
            }
        }
    }
}
