use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::session::{SessionEvent, TestSession};

/// Source of one-second ticks for a running session.
pub trait Ticker: Send {
    fn tick(&mut self) -> impl Future<Output = ()> + Send;
}

/// Wall-clock ticker backed by a tokio interval.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn every_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    ToggleTimer,
    /// Ends the current phase early, exactly as if its countdown had run out.
    Expire,
    /// Tears the session down without completing it.
    Exit,
}

/// Feeds ticks and commands into `session` until it completes or is torn down.
///
/// Events are forwarded to `events`; a closed receiver does not stop the session.
pub async fn run_session<T: Ticker>(
    mut session: TestSession,
    mut ticker: T,
    mut commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> TestSession {
    let mut commands_open = true;

    while !session.is_complete() {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = session.on_tick() {
                    let _ = events.send(event);
                }
            }
            command = commands.recv(), if commands_open => match command {
                Some(SessionCommand::Pause) => session.pause(),
                Some(SessionCommand::Resume) => session.resume(),
                Some(SessionCommand::ToggleTimer) => {
                    session.toggle_timer_visibility();
                }
                Some(SessionCommand::Expire) => {
                    if let Some(event) = session.on_expire() {
                        let _ = events.send(event);
                    }
                }
                Some(SessionCommand::Exit) => {
                    tracing::debug!(kind = %session.kind(), cursor = session.cursor(), "session torn down");
                    break;
                }
                None => commands_open = false,
            },
        }
    }

    session
}

/// Handle to a session running on its own task.
pub struct SessionHandle {
    pub commands: mpsc::Sender<SessionCommand>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    pub task: JoinHandle<TestSession>,
}

pub fn spawn_session<T>(session: TestSession, ticker: T) -> SessionHandle
where
    T: Ticker + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_session(session, ticker, command_rx, event_tx));
    SessionHandle {
        commands: command_tx,
        events: event_rx,
        task,
    }
}
