use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range (0..{OPTION_COUNT})")]
    CorrectOptionOutOfRange { index: usize },
}

/// A single multiple-choice question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_option: usize,
    explanation: Option<String>,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    /// Returns `QuestionError::EmptyOption` if any option text is blank.
    /// Returns `QuestionError::CorrectOptionOutOfRange` if the correct index
    /// does not point at one of the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_option: usize,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if let Some(index) = options.iter().position(|option| option.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_option >= OPTION_COUNT {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: correct_option,
            });
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
            explanation,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Returns true if the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}
