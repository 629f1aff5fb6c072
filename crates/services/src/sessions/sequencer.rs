use quiz_core::model::Question;

use crate::error::SessionError;

/// One-way cursor over the ordered question list.
///
/// Sole owner of the current index: the index only moves forward, and a
/// question, once advanced past, cannot be revisited.
#[derive(Debug, Clone)]
pub struct QuestionSequencer {
    questions: Vec<Question>,
    current: usize,
}

impl QuestionSequencer {
    /// Build a sequencer over an ordered, non-empty question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the list has no questions. `Quiz`
    /// already validates this, but the sequencer guards its own invariant.
    pub fn new(questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
        })
    }

    /// The active question.
    #[must_use]
    pub fn current(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Move to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` when already on the last question;
    /// finishing from there must go through session completion instead.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.is_last() {
            return Err(SessionError::OutOfRange);
        }
        self.current += 1;
        Ok(())
    }
}
