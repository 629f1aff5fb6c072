#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod source;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use sessions::{
    QuestionSequencer, RunningSession, SessionController, SessionLoopService, SessionOutcome,
    SessionProgress, SessionState, SessionTimer, TimerSignal, format_remaining,
};
pub use source::{
    ContentError, ContentSource, InMemoryContent, RecordingSink, ReportError, ReportSink,
};
