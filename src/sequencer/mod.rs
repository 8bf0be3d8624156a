//! Timed presentation of test decks.

pub mod deck;
pub mod driver;
pub mod session;
pub mod timing;

pub use deck::{Deck, DeckEntry, BLANK_SLIDE_ID};
pub use driver::{run_session, spawn_session, IntervalTicker, SessionCommand, SessionHandle, Ticker};
pub use session::{Phase, SessionError, SessionEvent, TestSession};
pub use timing::{format_countdown, TestKind, TimingConfig, TimingProfile};
