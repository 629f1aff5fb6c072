use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{Question, Quiz, QuizId};
use quiz_core::score::ScoreReport;

use super::progress::SessionProgress;
use super::sequencer::QuestionSequencer;
use crate::error::SessionError;

/// Lifecycle of a session. Transitions only ever move rightward:
/// `NotStarted -> InProgress -> Completed`; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

//
// ─── SESSION CONTROLLER ────────────────────────────────────────────────────────
//

/// State machine for one user's attempt at one quiz.
///
/// All mutation goes through the operations below, driven one at a time by a
/// single event loop: user selection, user advance, and timer tick.
/// `complete` is the terminal mutation on every path; once the session is
/// `Completed` every further operation is either rejected or a no-op.
#[derive(Debug)]
pub struct SessionController {
    quiz_id: QuizId,
    time_limit_secs: u32,
    sequencer: QuestionSequencer,
    state: SessionState,
    selected: Option<usize>,
    correct_count: u32,
    answered_count: u32,
    remaining_secs: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    report: Option<ScoreReport>,
}

impl SessionController {
    /// Build a session over the given quiz. The session stays `NotStarted`
    /// until `start` is called.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz carries no questions.
    /// `Quiz` validation already rules this out; the guard is defensive.
    pub fn new(quiz: Quiz) -> Result<Self, SessionError> {
        let quiz_id = quiz.id();
        let time_limit_secs = quiz.time_limit_secs();
        Ok(Self {
            quiz_id,
            time_limit_secs,
            sequencer: QuestionSequencer::new(quiz.into_questions())?,
            state: SessionState::NotStarted,
            selected: None,
            correct_count: 0,
            answered_count: 0,
            remaining_secs: time_limit_secs,
            started_at: None,
            completed_at: None,
            report: None,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// The active question, or `None` once the session is completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            Some(self.sequencer.current())
        }
    }

    /// Pending selection for the current question, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Number of questions whose answers have been committed.
    #[must_use]
    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.sequencer.total()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Final report; `Some` exactly when the session is completed.
    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.sequencer.total(),
            position: self.sequencer.position(),
            answered: self.answered_count as usize,
            remaining_secs: self.remaining_secs,
            is_complete: self.is_complete(),
        }
    }

    /// Begin the session: `NotStarted -> InProgress`, question index at 0,
    /// full time budget.
    ///
    /// `now` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session was already
    /// started.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::InvalidState {
                expected: SessionState::NotStarted,
                actual: self.state,
            });
        }

        self.state = SessionState::InProgress;
        self.correct_count = 0;
        self.answered_count = 0;
        self.remaining_secs = self.time_limit_secs;
        self.started_at = Some(now);
        Ok(())
    }

    /// Record `option` as the pending selection for the current question,
    /// overwriting any prior selection (the user may change their mind
    /// before advancing).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in
    /// progress. Returns `SessionError::InvalidSelection` if `option` does
    /// not point at one of the question's options; the prior selection is
    /// left unchanged.
    pub fn select_answer(&mut self, option: usize) -> Result<(), SessionError> {
        self.require_in_progress()?;

        let limit = self.sequencer.current().options().len();
        if option >= limit {
            return Err(SessionError::InvalidSelection {
                index: option,
                limit,
            });
        }

        self.selected = Some(option);
        Ok(())
    }

    /// Commit the pending selection and move to the next question, or
    /// complete the session when the current question is the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in
    /// progress. Returns `SessionError::NoSelection` if no answer is
    /// pending (the UI gates this, the core still guards it).
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.require_in_progress()?;
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }

        self.tally_pending();
        if self.sequencer.is_last() {
            self.complete(now)
        } else {
            self.sequencer.advance()
        }
    }

    /// Apply one elapsed second. Reaching zero forces completion, whether
    /// or not a selection is pending.
    ///
    /// A tick landing on a completed session is a no-op rather than an
    /// error: a timer signal already queued when the session completed is
    /// expected, not a caller bug.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session was never
    /// started.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_complete() {
            return Ok(());
        }
        self.require_in_progress()?;

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.complete(now)?;
        }
        Ok(())
    }

    /// Terminal transition. Idempotent: completing an already-completed
    /// session changes nothing and emits nothing.
    ///
    /// An untallied pending selection is folded into the score here; an
    /// unanswered current question counts as incorrect. Both the manual
    /// advance path and timer expiry land on this same rule.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session was never
    /// started.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.state {
            SessionState::Completed => Ok(()),
            SessionState::NotStarted => Err(SessionError::InvalidState {
                expected: SessionState::InProgress,
                actual: self.state,
            }),
            SessionState::InProgress => {
                self.tally_pending();
                let total = u32::try_from(self.sequencer.total()).unwrap_or(u32::MAX);
                self.report = Some(ScoreReport::from_counts(self.correct_count, total)?);
                self.state = SessionState::Completed;
                self.completed_at = Some(now);
                Ok(())
            }
        }
    }

    /// Fold the pending selection, if any, into the score. The selection is
    /// consumed, so it can never be tallied twice and is always cleared
    /// before the next question becomes current.
    fn tally_pending(&mut self) {
        if let Some(option) = self.selected.take() {
            self.answered_count += 1;
            if self.sequencer.current().is_correct(option) {
                self.correct_count += 1;
            }
        }
    }

    fn require_in_progress(&self) -> Result<(), SessionError> {
        if self.state != SessionState::InProgress {
            return Err(SessionError::InvalidState {
                expected: SessionState::InProgress,
                actual: self.state,
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
