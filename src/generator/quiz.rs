use serde::Deserialize;
use thiserror::Error;

pub const OPTIONS_COUNT: usize = 4;

// Telegram Bot API limits for quiz polls.
pub const MAX_QUESTION_LEN: usize = 300;
pub const MAX_OPTION_LEN: usize = 100;
pub const MAX_EXPLANATION_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("response is not valid quiz JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} options, got {0}", expected = OPTIONS_COUNT)]
    OptionsCount(usize),
    #[error("correctIndex {0} is out of range 0..={max}", max = OPTIONS_COUNT - 1)]
    CorrectIndex(i64),
    #[error("question must be 1..={max} characters, got {0}", max = MAX_QUESTION_LEN)]
    QuestionLength(usize),
    #[error("option #{index} must be 1..={max} characters, got {len}", max = MAX_OPTION_LEN)]
    OptionLength { index: usize, len: usize },
}

/// A single generated multiple-choice question, ready to be posted as a quiz poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    question: String,
    options: [String; OPTIONS_COUNT],
    correct_index: u8,
    explanation: String,
}

/// Wire shape the model is asked to produce.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuiz {
    question: String,
    options: Vec<String>,
    correct_index: i64,
    explanation: String,
}

impl Quiz {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index in the form `sendPoll` expects for `correct_option_id`.
    pub fn correct_option_id(&self) -> u8 {
        self.correct_index
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    fn validate(raw: RawQuiz) -> Result<Self, QuizError> {
        let question = raw.question.trim().to_owned();
        let question_len = question.chars().count();
        if question_len == 0 || question_len > MAX_QUESTION_LEN {
            return Err(QuizError::QuestionLength(question_len));
        }

        let options: [String; OPTIONS_COUNT] = raw
            .options
            .try_into()
            .map_err(|options: Vec<String>| QuizError::OptionsCount(options.len()))?;
        let options = options.map(|option| option.trim().to_owned());
        for (index, option) in options.iter().enumerate() {
            let len = option.chars().count();
            if len == 0 || len > MAX_OPTION_LEN {
                return Err(QuizError::OptionLength { index, len });
            }
        }

        let correct_index = u8::try_from(raw.correct_index)
            .ok()
            .filter(|&index| usize::from(index) < OPTIONS_COUNT)
            .ok_or(QuizError::CorrectIndex(raw.correct_index))?;

        let explanation = raw
            .explanation
            .trim()
            .chars()
            .take(MAX_EXPLANATION_LEN)
            .collect();

        Ok(Self {
            question,
            options,
            correct_index,
            explanation,
        })
    }
}

/// Removes a Markdown code fence (```` ``` ```` or ```` ```json ````) wrapped
/// around the payload, if there is one.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...), which may share a line with the payload.
    let body = body
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the raw model output into a validated [`Quiz`].
pub fn parse_quiz(raw: &str) -> Result<Quiz, QuizError> {
    let raw: RawQuiz = serde_json::from_str(strip_code_fence(raw))?;
    Quiz::validate(raw)
}
