pub mod commands;
pub mod config;
pub mod generator;
pub mod health;
pub mod runner;
pub mod schema;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
