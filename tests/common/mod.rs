//! Shared fixtures: a wiremock stand-in for the Telegram Bot API and canned
//! updates.

#![allow(dead_code)]

use std::sync::Mutex;

use quizbot::generator::{parse_quiz, GenerationError, Quiz, QuizSource};
use serde_json::{json, Value};
use teloxide::{
    types::{Me, Update},
    Bot,
};
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const CHAT_ID: i64 = 424242;
pub const BOT_USERNAME: &str = "quizbot";

pub const WELL_FORMED_QUIZ: &str = r#"{
    "question": "Какая река самая длинная в Европе?",
    "options": ["Дунай", "Днепр", "Волга", "Рейн"],
    "correctIndex": 2,
    "explanation": "Волга — около 3530 км."
}"#;

/// Quiz source returning a fixed answer and recording the topics it was asked for.
pub struct CannedSource {
    raw: Option<&'static str>,
    topics: Mutex<Vec<Option<String>>>,
}

impl CannedSource {
    pub fn answering(raw: &'static str) -> Self {
        Self {
            raw: Some(raw),
            topics: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            raw: None,
            topics: Mutex::default(),
        }
    }

    pub fn topics(&self) -> Vec<Option<String>> {
        self.topics.lock().unwrap().clone()
    }
}

impl QuizSource for CannedSource {
    async fn generate(&self, topic: Option<&str>) -> Result<Quiz, GenerationError> {
        self.topics.lock().unwrap().push(topic.map(str::to_owned));
        match self.raw {
            Some(raw) => Ok(parse_quiz(raw)?),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

pub fn bot_for(server: &MockServer) -> Bot {
    Bot::new("123456:TEST-TOKEN").set_api_url(server.uri().parse().unwrap())
}

// teloxide's `Update` does not deserialize from a `serde_json::Value` (it
// falls back to `UpdateKind::Error`), so fixtures go through a string.
fn from_fixture<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_str(&value.to_string()).expect("Failed to deserialize fixture")
}

pub fn me() -> Me {
    from_fixture(json!({
        "id": 123456,
        "is_bot": true,
        "first_name": "Quiz",
        "username": BOT_USERNAME,
        "can_join_groups": true,
        "can_read_all_group_messages": false,
        "supports_inline_queries": false,
        "can_connect_to_business": false,
        "has_main_web_app": false
    }))
}

fn message_json(message_id: i32, text: &str) -> Value {
    json!({
        "message_id": message_id,
        "date": 1735992000,
        "chat": {
            "id": CHAT_ID,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": CHAT_ID,
            "is_bot": false,
            "first_name": "Test",
            "username": "testuser"
        },
        "text": text
    })
}

pub fn text_update(text: &str) -> Update {
    from_fixture(json!({
        "update_id": 1,
        "message": message_json(1, text)
    }))
}

fn telegram_method(name: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(path_regex(format!("(?i)/bot[^/]+/{name}$")))
}

fn sent_message(text: &str) -> ResponseTemplate {
    let mut message = message_json(77, text);
    message["from"] = json!({
        "id": 123456,
        "is_bot": true,
        "first_name": "Quiz",
        "username": BOT_USERNAME
    });
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": message }))
}

/// Mounts every Bot API method the quiz flow touches, with call-count
/// expectations checked by `MockServer::verify`.
pub async fn mock_telegram(server: &MockServer, polls: u64, edits: u64, deletes: u64) {
    mount_telegram(server, sent_message("poll"), polls, edits, deletes).await;
}

/// Like [`mock_telegram`], but Telegram refuses every poll with a 400.
pub async fn mock_telegram_rejecting_polls(server: &MockServer, edits: u64, deletes: u64) {
    let rejected = ResponseTemplate::new(400).set_body_json(json!({
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: POLL_OPTION_INVALID"
    }));
    mount_telegram(server, rejected, 1, edits, deletes).await;
}

async fn mount_telegram(
    server: &MockServer,
    poll_response: ResponseTemplate,
    polls: u64,
    edits: u64,
    deletes: u64,
) {
    telegram_method("sendMessage")
        .respond_with(sent_message("placeholder"))
        .mount(server)
        .await;
    telegram_method("sendPoll")
        .respond_with(poll_response)
        .expect(polls)
        .mount(server)
        .await;
    telegram_method("editMessageText")
        .respond_with(sent_message("edited"))
        .expect(edits)
        .mount(server)
        .await;
    telegram_method("deleteMessage")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
        .expect(deletes)
        .mount(server)
        .await;
}

/// JSON bodies of the requests made to `name`, in order.
pub async fn request_bodies(server: &MockServer, name: &str) -> Vec<Value> {
    let name = name.to_lowercase();
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().to_lowercase().ends_with(&format!("/{name}")))
        .map(|r: &Request| serde_json::from_slice(&r.body).expect("Bot API body is JSON"))
        .collect()
}
