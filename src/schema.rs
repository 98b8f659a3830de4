use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::Update,
};

use crate::{
    commands::{help, start, Command},
    generator::QuizSource,
    runner, HandlerError,
};

/// Dispatch tree: only commands are handled, anything else falls through to
/// the dispatcher's default handler.
pub fn schema<Source>() -> UpdateHandler<HandlerError>
where
    Source: QuizSource + Send + Sync + 'static,
{
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Quiz(topic)].endpoint(runner::run_quiz::<Source>));

    Update::filter_message().branch(command_handler)
}
