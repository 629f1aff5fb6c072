mod controller;
mod progress;
mod sequencer;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionController, SessionState};
pub use progress::SessionProgress;
pub use sequencer::QuestionSequencer;
pub use timer::{SessionTimer, TimerSignal};
pub use view::format_remaining;
pub use workflow::{RunningSession, SessionLoopService, SessionOutcome};
