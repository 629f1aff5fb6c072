use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz title is empty")]
    EmptyTitle,

    #[error("quiz has no questions")]
    NoQuestions,

    #[error("quiz time limit must be at least one second")]
    ZeroTimeLimit,
}

/// An ordered set of questions with a global time limit. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: Option<String>,
    time_limit_secs: u32,
    questions: Vec<Question>,
}

impl Quiz {
    /// Create a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` if the title is blank.
    /// Returns `QuizError::ZeroTimeLimit` if the time limit is zero.
    /// Returns `QuizError::NoQuestions` if the question list is empty.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: Option<String>,
        time_limit_secs: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if time_limit_secs == 0 {
            return Err(QuizError::ZeroTimeLimit);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        Ok(Self {
            id,
            title,
            description,
            time_limit_secs,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Consume the quiz, yielding its ordered question list.
    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
