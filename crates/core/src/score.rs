use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("cannot score a quiz with zero questions")]
    NoQuestions,

    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Performance band derived from the final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Excellent,
    Good,
    KeepPracticing,
}

impl Classification {
    /// Band boundaries: >= 80 Excellent, 60..=79 Good, below 60 KeepPracticing.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            _ => Self::KeepPracticing,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::KeepPracticing => "KeepPracticing",
        };
        write!(f, "{name}")
    }
}

/// Final outcome of a completed session.
///
/// Built exactly once at completion; the percentage and classification are
/// never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    correct_count: u32,
    total_questions: u32,
    percentage: u8,
    classification: Classification,
}

impl ScoreReport {
    /// Build a report from the final counts.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NoQuestions` if `total` is zero.
    /// Returns `ScoreError::CorrectExceedsTotal` if `correct > total`.
    pub fn from_counts(correct: u32, total: u32) -> Result<Self, ScoreError> {
        if total == 0 {
            return Err(ScoreError::NoQuestions);
        }
        if correct > total {
            return Err(ScoreError::CorrectExceedsTotal { correct, total });
        }

        let percentage = percentage_of(correct, total);
        Ok(Self {
            correct_count: correct,
            total_questions: total,
            percentage,
            classification: Classification::from_percentage(percentage),
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }
}

/// Integer percentage rounded half away from zero. `total` must be non-zero
/// and `correct <= total`, which `from_counts` enforces.
fn percentage_of(correct: u32, total: u32) -> u8 {
    let scaled = (f64::from(correct) / f64::from(total) * 100.0).round();
    scaled as u8
}
