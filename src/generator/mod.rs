//! Quiz generation: prompt construction, the completion API call and
//! validation of the model's answer.

pub mod client;
pub mod prompt;
pub mod quiz;

pub use client::{GenerationError, QuizGenerator, QuizSource};
pub use quiz::{parse_quiz, Quiz, QuizError};
