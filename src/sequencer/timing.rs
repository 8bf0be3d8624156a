use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TAT_IMAGE_COUNT: usize = 11;
/// Real images plus the closing blank slide.
pub const TAT_DECK_SIZE: usize = TAT_IMAGE_COUNT + 1;
pub const WAT_WORD_CAP: usize = 60;
pub const SRT_SCENARIO_CAP: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Tat,
    Wat,
    Srt,
    Sdt,
}

impl TestKind {
    pub fn title(&self) -> &'static str {
        match self {
            TestKind::Tat => "Thematic Apperception Test",
            TestKind::Wat => "Word Association Test",
            TestKind::Srt => "Situation Reaction Test",
            TestKind::Sdt => "Self Description Test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestKind::Tat => "tat",
            TestKind::Wat => "wat",
            TestKind::Srt => "srt",
            TestKind::Sdt => "sdt",
        };
        f.write_str(name)
    }
}

impl FromStr for TestKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tat" => Ok(TestKind::Tat),
            "wat" => Ok(TestKind::Wat),
            "srt" => Ok(TestKind::Srt),
            "sdt" => Ok(TestKind::Sdt),
            other => Err(crate::error::Error::NotFound(format!(
                "Unknown test kind '{}'",
                other
            ))),
        }
    }
}

/// Per-test durations, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub tat_display_seconds: u32,
    pub tat_gap_seconds: u32,
    pub wat_display_seconds: u32,
    pub srt_display_seconds: u32,
    pub sdt_total_seconds: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tat_display_seconds: 30,
            tat_gap_seconds: 240,
            wat_display_seconds: 15,
            srt_display_seconds: 30,
            sdt_total_seconds: 15 * 60,
        }
    }
}

impl TimingConfig {
    pub fn profile(&self, kind: TestKind) -> TimingProfile {
        match kind {
            TestKind::Tat => TimingProfile {
                display_seconds: self.tat_display_seconds,
                gap_seconds: Some(self.tat_gap_seconds),
                item_cap: Some(TAT_DECK_SIZE),
                per_item: true,
            },
            TestKind::Wat => TimingProfile {
                display_seconds: self.wat_display_seconds,
                gap_seconds: None,
                item_cap: Some(WAT_WORD_CAP),
                per_item: true,
            },
            TestKind::Srt => TimingProfile {
                display_seconds: self.srt_display_seconds,
                gap_seconds: None,
                item_cap: Some(SRT_SCENARIO_CAP),
                per_item: true,
            },
            TestKind::Sdt => TimingProfile {
                display_seconds: self.sdt_total_seconds,
                gap_seconds: None,
                item_cap: None,
                per_item: false,
            },
        }
    }
}

/// Timing for one session.
///
/// With `per_item` unset, `display_seconds` is a single countdown over the whole deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingProfile {
    pub display_seconds: u32,
    pub gap_seconds: Option<u32>,
    pub item_cap: Option<usize>,
    pub per_item: bool,
}

impl TimingProfile {
    pub fn for_kind(kind: TestKind) -> Self {
        TimingConfig::default().profile(kind)
    }
}

/// Formats a countdown as `MM:SS`.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
