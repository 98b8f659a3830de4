use std::sync::Arc;

use teloxide::{
    payloads::SendPollSetters,
    prelude::Requester,
    types::{Message, PollType},
    Bot,
};
use tracing::instrument;

use crate::{
    generator::{prompt::normalize_topic, QuizSource},
    HandlerResult,
};

pub const PLACEHOLDER_TEXT: &str = "Генерирую вопрос… ⏳";
pub const FAILURE_TEXT: &str = "Ошибка генерации вопроса 😢";

/// Handles `/quiz [topic]`: shows a placeholder while the quiz is generated,
/// then swaps it for a quiz poll, or for an apology if generation or the
/// poll failed.
#[instrument(level = "info", skip(bot, msg, source), fields(chat = msg.chat.id.0))]
pub async fn run_quiz<Source: QuizSource>(
    bot: Bot,
    msg: Message,
    topic: String,
    source: Arc<Source>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let topic = normalize_topic(&topic);

    let placeholder = bot.send_message(chat_id, PLACEHOLDER_TEXT).await?;

    match source.generate(topic.as_deref()).await {
        Ok(quiz) => {
            tracing::info!(question = quiz.question(), "quiz generated");

            let mut poll = bot
                .send_poll(chat_id, quiz.question(), quiz.options().to_vec())
                .type_(PollType::Quiz)
                .correct_option_id(quiz.correct_option_id());
            if !quiz.explanation().is_empty() {
                poll = poll.explanation(quiz.explanation());
            }

            // The placeholder goes away only once the poll is in the chat.
            if let Err(e) = poll.await {
                tracing::error!(error = %e, "failed to send the quiz poll");
                bot.edit_message_text(chat_id, placeholder.id, FAILURE_TEXT)
                    .await?;
                return Ok(());
            }
            if let Err(e) = bot.delete_message(chat_id, placeholder.id).await {
                tracing::warn!(error = %e, "failed to delete the placeholder");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, ?topic, "quiz generation failed");
            bot.edit_message_text(chat_id, placeholder.id, FAILURE_TEXT)
                .await?;
        }
    }

    Ok(())
}
