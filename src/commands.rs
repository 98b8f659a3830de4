use teloxide::{prelude::Requester, types::Message, utils::command::BotCommands, Bot};
use tracing::instrument;

use crate::HandlerResult;

#[derive(Debug, Clone, PartialEq, Eq, BotCommands)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "показать справку.")]
    Help,
    #[command(description = "начать.")]
    Start,
    #[command(description = "вопрос викторины, например: /quiz история. Без темы — случайная.")]
    Quiz(String),
}

#[instrument(level = "debug", skip(bot, msg), fields(chat = msg.chat.id.0))]
pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

#[instrument(level = "debug", skip(bot, msg), fields(chat = msg.chat.id.0))]
pub(crate) async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        format!(
            "Привет! Я придумываю вопросы для викторины.\n\n{}",
            Command::descriptions()
        ),
    )
    .await?;
    Ok(())
}
