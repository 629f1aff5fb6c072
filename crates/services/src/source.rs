//! External collaborators the session core reads from and reports to.
//!
//! The content source supplies quiz data once at session creation; the
//! report sink receives the single completion event. Both are black boxes
//! to the state machine, so they are modeled as trait objects with
//! in-memory doubles for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use quiz_core::model::{Quiz, QuizId};
use quiz_core::score::ScoreReport;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("quiz {0} not found")]
    NotFound(QuizId),

    #[error("content source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("report sink unavailable: {0}")]
    Unavailable(String),
}

/// Read-only supplier of quiz content for a given quiz identifier.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` for unknown quiz ids.
    async fn load_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ContentError>;
}

/// Receives the completion report of a session.
///
/// Consumers (profile score update, ranking update) own persistence; the
/// core calls this exactly once per completed session.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `ReportError` when the sink cannot accept the report; the
    /// caller may retry via the workflow's `finalize_report`.
    async fn submit(&self, quiz_id: QuizId, report: &ScoreReport) -> Result<(), ReportError>;
}

/// In-memory content source for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryContent {
    quizzes: HashMap<QuizId, Quiz>,
}

impl InMemoryContent {
    #[must_use]
    pub fn new(quizzes: impl IntoIterator<Item = Quiz>) -> Self {
        Self {
            quizzes: quizzes
                .into_iter()
                .map(|quiz| (quiz.id(), quiz))
                .collect(),
        }
    }
}

#[async_trait]
impl ContentSource for InMemoryContent {
    async fn load_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ContentError> {
        self.quizzes
            .get(&quiz_id)
            .cloned()
            .ok_or(ContentError::NotFound(quiz_id))
    }
}

/// Report sink that records every submission it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<(QuizId, ScoreReport)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything submitted so far.
    #[must_use]
    pub fn submissions(&self) -> Vec<(QuizId, ScoreReport)> {
        self.submissions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn submit(&self, quiz_id: QuizId, report: &ScoreReport) -> Result<(), ReportError> {
        self.submissions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((quiz_id, report.clone()));
        Ok(())
    }
}
