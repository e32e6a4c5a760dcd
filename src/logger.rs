use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

use crate::config::LoggerConfig;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unrecognized log_level: {0}")]
    UnknownLevel(String),
    #[error("failed to install logger: {0}")]
    Init(#[from] TryInitError),
}

/// Уровень из конфига, регистр не важен.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    match level.to_ascii_uppercase().as_str() {
        "ERROR" => Ok(LevelFilter::ERROR),
        "WARN" => Ok(LevelFilter::WARN),
        "INFO" => Ok(LevelFilter::INFO),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        _ => Err(LoggerError::UnknownLevel(level.to_string())),
    }
}

pub fn level_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy("")
}

pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
}

/// Ставит глобальный логгер. `RUST_LOG`, если задан, важнее уровня из конфига.
pub fn init(conf: &LoggerConfig) -> Result<(), LoggerError> {
    let level = parse_level(&conf.level)?;
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => level_filter(level),
    };
    subscriber(filter, std::io::stdout).try_init()?;
    Ok(())
}
