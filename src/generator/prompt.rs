use rand::{seq::SliceRandom, Rng};

/// Topics drawn from when `/quiz` is sent without an argument. No science or
/// math.
pub const TOPICS: &[&str] = &[
    "история",
    "география",
    "литература",
    "кино",
    "музыка",
    "живопись",
    "спорт",
    "мифология",
    "кулинария",
    "архитектура",
    "языки мира",
    "путешествия",
];

const SYSTEM_PROMPT: &str = "Ты создаешь викторины. Отвечай строго JSON без лишнего текста.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub topic: String,
    pub system: String,
    pub user: String,
}

/// Normalizes the `/quiz` argument: blank means "pick something for me".
pub fn normalize_topic(arg: &str) -> Option<String> {
    let topic = arg.trim();
    (!topic.is_empty()).then(|| topic.to_owned())
}

pub fn random_topic<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // TOPICS is a non-empty constant.
    TOPICS.choose(rng).copied().unwrap_or(TOPICS[0])
}

/// Builds the system/user prompt pair asking for one quiz question on `topic`,
/// or on a random allow-listed topic when none is given.
pub fn build_prompt<R: Rng + ?Sized>(topic: Option<&str>, rng: &mut R) -> Prompt {
    let topic = match topic {
        Some(topic) => topic.to_owned(),
        None => random_topic(rng).to_owned(),
    };

    let user = format!(
        r#"Сгенерируй 1 вопрос викторины средней сложности на тему «{topic}».
Ровно 4 варианта ответа, только один из них правильный.
Пояснение не длиннее 200 символов.
Формат:
{{
  "question": "текст вопроса",
  "options": ["A", "B", "C", "D"],
  "correctIndex": 1,
  "explanation": "пояснение"
}}"#
    );

    Prompt {
        topic,
        system: SYSTEM_PROMPT.to_owned(),
        user,
    }
}
