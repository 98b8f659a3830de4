use std::{sync::Arc, time::Instant};

use dotenvy::dotenv;
use quizbot::{
    config::Config,
    generator::QuizGenerator,
    health,
    schema::schema,
};
use teloxide::{
    payloads::SetWebhookSetters,
    prelude::*,
    update_listeners::webhooks::{self, Options},
};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[tokio::main]
async fn main() {
    let started = Instant::now();
    dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "Starting bot...");

    let generator = match QuizGenerator::new(
        &config.openai_api_base,
        &config.openai_api_key,
        &config.openai_model,
    ) {
        Ok(generator) => {
            tracing::info!(model = generator.model(), "completion client ready");
            Arc::new(generator)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to build the completion client");
            std::process::exit(1);
        }
    };
    let bot = Bot::new(&config.telegram_token);

    let mut options = Options::new(config.bind_addr, config.webhook_url.clone());
    if let Some(secret) = &config.webhook_secret {
        options = options.secret_token(secret.clone());
    }
    let (listener, stop_flag, webhook_router) = webhooks::axum_no_setup(options);
    let app = webhook_router.merge(health::router(started));

    register_webhook(&bot, &config).await;

    let tcp_listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %config.bind_addr, "listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(tcp_listener, app)
            .with_graceful_shutdown(stop_flag)
            .await
        {
            tracing::error!(error = %e, "HTTP server stopped");
        }
    });

    Dispatcher::builder(bot, schema::<QuizGenerator>())
        .dependencies(dptree::deps![generator])
        .default_handler(|update| async move {
            tracing::trace!(update_id = ?update.id, "ignoring update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
}

fn init_tracing() {
    let rust_log = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let filter = EnvFilter::try_new(&rust_log).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_line_number(true)
        .with_target(false)
        .finish();

    // teloxide logs through `log`.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("failed to forward log records: {e}");
    }
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install the tracing subscriber: {e}");
    }
}

/// Points Telegram at our webhook. Failures are logged, not fatal.
async fn register_webhook(bot: &Bot, config: &Config) {
    let mut request = bot.set_webhook(config.webhook_url.clone());
    if let Some(secret) = &config.webhook_secret {
        request = request.secret_token(secret.clone());
    }

    match request.await {
        Ok(_) => tracing::info!(public_url = %config.public_url, "webhook registered"),
        Err(e) => tracing::error!(error = %e, "failed to register the webhook"),
    }
}
