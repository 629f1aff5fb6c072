mod ids;
mod question;
mod quiz;

pub use ids::{ParseIdError, QuestionId, QuizId};
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use quiz::{Quiz, QuizError};
