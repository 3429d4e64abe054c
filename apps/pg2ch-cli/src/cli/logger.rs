//! # Logger Module
//!
//! Logging for the CLI, built on `tracing-subscriber`.
//!
//! - An `EnvFilter` layer honours `RUST_LOG` (e.g. `RUST_LOG=pg2ch=debug`) and
//!   falls back to the configured level.
//! - A line layer writes either `[timestamp LEVEL - target] message` or one
//!   JSON object per event.
//!
//! Lines go to stderr unless `logger.file` is set, so stdout only ever carries
//! DDL or JSON results.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: module-level filtering, takes precedence over the level
//! - `PG2CH_LOGGER__LEVEL`: DEBUG, INFO, WARN or ERROR (default: WARN)
//! - `PG2CH_LOGGER__FORMAT`: Text or Json (default: Text)
//! - `PG2CH_LOGGER__FILE`: append log lines to this file instead of stderr

use serde::Deserialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum LoggerLevel {
    #[serde(alias = "DEBUG", alias = "debug")]
    Debug,
    #[serde(alias = "INFO", alias = "info")]
    Info,
    #[serde(alias = "WARN", alias = "warn")]
    Warn,
    #[serde(alias = "ERROR", alias = "error")]
    Error,
}

impl LoggerLevel {
    pub fn to_tracing_level(&self) -> LevelFilter {
        match self {
            LoggerLevel::Debug => LevelFilter::DEBUG,
            LoggerLevel::Info => LevelFilter::INFO,
            LoggerLevel::Warn => LevelFilter::WARN,
            LoggerLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum LogFormat {
    #[serde(alias = "JSON", alias = "json")]
    Json,
    #[serde(alias = "TEXT", alias = "text")]
    Text,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: LoggerLevel,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> LoggerLevel {
    LoggerLevel::Warn
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoggerError {
    #[error("Log file path {0} has no file name")]
    InvalidLogFile(PathBuf),

    #[error("Failed to install the log subscriber")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Formats every event as a single line, text or JSON.
struct LineFormatLayer<W> {
    writer: W,
    format: LogFormat,
}

impl<W> LineFormatLayer<W> {
    fn new(writer: W, format: LogFormat) -> Self {
        Self { writer, format }
    }

    fn format_line(&self, level: &Level, target: &str, message: &str) -> String {
        let timestamp = humantime::format_rfc3339_seconds(SystemTime::now());
        match self.format {
            LogFormat::Text => format!("[{timestamp} {level} - {target}] {message}"),
            LogFormat::Json => serde_json::json!({
                "timestamp": timestamp.to_string(),
                "severity": level.to_string(),
                "target": target,
                "message": message,
            })
            .to_string(),
        }
    }
}

impl<S, W> Layer<S> for LineFormatLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let output = self.format_line(metadata.level(), metadata.target(), &visitor.message);

        let mut writer = self.writer.make_writer();
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.write_all(b"\n");
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

fn split_log_file(path: &Path) -> Result<(PathBuf, PathBuf), LoggerError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggerError::InvalidLogFile(path.to_path_buf()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

pub fn setup_logging(settings: &LoggerSettings) -> Result<(), LoggerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_tracing_level().to_string()));

    match &settings.file {
        Some(path) => {
            let (directory, file_name) = split_log_file(path)?;
            let file_appender = tracing_appender::rolling::never(directory, file_name);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(LineFormatLayer::new(file_appender, settings.format.clone()))
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(LineFormatLayer::new(
                    std::io::stderr,
                    settings.format.clone(),
                ))
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LoggerSettings::default();
        assert_eq!(settings.level, LoggerLevel::Warn);
        assert_eq!(settings.format, LogFormat::Text);
        assert!(settings.file.is_none());
    }

    #[test]
    fn test_level_aliases() {
        let level: LoggerLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level.to_tracing_level(), LevelFilter::DEBUG);
        let level: LoggerLevel = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(level.to_tracing_level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_text_line() {
        let layer = LineFormatLayer::new(std::io::sink, LogFormat::Text);
        let line = layer.format_line(&Level::INFO, "pg2ch::local", "Validating DDL");
        assert!(line.starts_with('['));
        assert!(line.ends_with(" INFO - pg2ch::local] Validating DDL"));
    }

    #[test]
    fn test_json_line() {
        let layer = LineFormatLayer::new(std::io::sink, LogFormat::Json);
        let line = layer.format_line(&Level::WARN, "pg2ch", "timed out");
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["severity"], "WARN");
        assert_eq!(value["target"], "pg2ch");
        assert_eq!(value["message"], "timed out");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_split_log_file() {
        let (directory, file) = split_log_file(Path::new("logs/pg2ch.log")).unwrap();
        assert_eq!(directory, PathBuf::from("logs"));
        assert_eq!(file, PathBuf::from("pg2ch.log"));

        let (directory, _) = split_log_file(Path::new("pg2ch.log")).unwrap();
        assert_eq!(directory, PathBuf::from("."));

        assert!(matches!(
            split_log_file(Path::new("/")),
            Err(LoggerError::InvalidLogFile(_))
        ));
    }
}
