use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::QuizId;
use quiz_core::score::ScoreReport;

use super::controller::{SessionController, SessionState};
use super::progress::SessionProgress;
use super::timer::{SessionTimer, TimerSignal};
use crate::error::SessionError;
use crate::source::{ContentSource, ReportSink};

/// Result of driving a running session one event forward.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Continue,
    Completed { report: ScoreReport },
}

/// A started session: the state machine plus its countdown task.
///
/// Dropping a `RunningSession` aborts the countdown, which is how an
/// abandoned session (user navigates away) tears down its resources.
#[derive(Debug)]
pub struct RunningSession {
    controller: SessionController,
    timer: SessionTimer,
    submitted: bool,
}

impl RunningSession {
    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.controller.is_complete()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.controller.progress()
    }

    /// Record a pending answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` for an out-of-range option
    /// and `SessionError::InvalidState` once the session is completed.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.controller.select_answer(option)
    }

    /// Receive the next timer signal for the driving event loop.
    /// Returns `None` once the timer is exhausted or stopped.
    pub async fn next_signal(&mut self) -> Option<TimerSignal> {
        self.timer.recv().await
    }
}

/// Orchestrates session start, answer commits, timer ticks, and the single
/// completion report hand-off to the sink.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    content: Arc<dyn ContentSource>,
    reports: Arc<dyn ReportSink>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentSource>,
        reports: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            clock,
            content,
            reports,
        }
    }

    /// Load the quiz and begin a session: the controller enters
    /// `InProgress` and the countdown starts with the quiz's time limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Content` if the quiz cannot be loaded.
    pub async fn start_session(&self, quiz_id: QuizId) -> Result<RunningSession, SessionError> {
        let quiz = self.content.load_quiz(quiz_id).await?;
        let time_limit_secs = quiz.time_limit_secs();

        let mut controller = SessionController::new(quiz)?;
        controller.start(self.clock.now())?;
        let timer = SessionTimer::start(time_limit_secs);

        Ok(RunningSession {
            controller,
            timer,
            submitted: false,
        })
    }

    /// Commit the current question's answer and move on; submits the report
    /// when this was the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if no answer is pending, and
    /// `SessionError::Report` if the sink rejects the completion report.
    pub async fn advance(
        &self,
        session: &mut RunningSession,
    ) -> Result<SessionOutcome, SessionError> {
        session.controller.advance(self.clock.now())?;
        self.settle(session).await
    }

    /// Apply one elapsed second; submits the report if the countdown just
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Report` if the sink rejects the completion
    /// report.
    pub async fn tick(&self, session: &mut RunningSession) -> Result<SessionOutcome, SessionError> {
        session.controller.tick(self.clock.now())?;
        self.settle(session).await
    }

    /// Apply a signal received from the session's timer.
    ///
    /// `Expired` forces completion; since `complete` is idempotent it is
    /// safe even when the final tick already ended the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Report` if the sink rejects the completion
    /// report.
    pub async fn apply_signal(
        &self,
        session: &mut RunningSession,
        signal: TimerSignal,
    ) -> Result<SessionOutcome, SessionError> {
        match signal {
            TimerSignal::Tick => self.tick(session).await,
            TimerSignal::Expired => {
                session.controller.complete(self.clock.now())?;
                self.settle(session).await
            }
        }
    }

    /// Retry report submission for a completed session.
    ///
    /// Useful when the sink failed transiently at completion time; a report
    /// that was already submitted is not submitted again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is not complete.
    /// Returns `SessionError::Report` if the sink fails again.
    pub async fn finalize_report(
        &self,
        session: &mut RunningSession,
    ) -> Result<ScoreReport, SessionError> {
        let Some(report) = session.controller.report().cloned() else {
            return Err(SessionError::InvalidState {
                expected: SessionState::Completed,
                actual: session.controller.state(),
            });
        };

        if !session.submitted {
            self.reports
                .submit(session.controller.quiz_id(), &report)
                .await?;
            session.submitted = true;
        }
        Ok(report)
    }

    /// Settle a possible completion: stop the timer first on every path,
    /// then hand the report to the sink exactly once.
    async fn settle(&self, session: &mut RunningSession) -> Result<SessionOutcome, SessionError> {
        if !session.controller.is_complete() {
            return Ok(SessionOutcome::Continue);
        }

        session.timer.stop();

        let report = session
            .controller
            .report()
            .cloned()
            .ok_or(SessionError::MissingReport)?;
        if !session.submitted {
            self.reports
                .submit(session.controller.quiz_id(), &report)
                .await?;
            session.submitted = true;
        }

        Ok(SessionOutcome::Completed { report })
    }
}
