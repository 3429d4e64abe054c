//! # Routines
//!
//! A routine is what a CLI command runs: a function returning either a
//! [`RoutineSuccess`] or a [`RoutineFailure`], each carrying the [`Message`]
//! shown to the user once the command finishes. Results meant for other
//! programs (DDL, JSON) are printed to stdout by the routine itself.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::display::{show_message_wrapper, Message, MessageType};
use crate::utilities::constants::STDIN_PATH;

pub mod convert;
pub mod examples;
pub mod inspect;
pub mod validate;

#[derive(Debug, Clone)]
#[must_use = "The message should be displayed."]
pub struct RoutineSuccess {
    pub message: Message,
    pub message_type: MessageType,
}

impl RoutineSuccess {
    pub fn success(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Success,
        }
    }

    /// A success whose output was already written to stdout.
    pub fn silent() -> Self {
        Self::success(Message::new(String::new(), String::new()))
    }

    pub fn is_silent(&self) -> bool {
        self.message.action.is_empty() && self.message.details.is_empty()
    }

    pub fn show(&self) {
        show_message_wrapper(self.message_type, self.message.clone());
    }
}

#[derive(Debug)]
pub struct RoutineFailure {
    pub message: Message,
    pub message_type: MessageType,
    pub error: Option<anyhow::Error>,
}

impl RoutineFailure {
    pub fn new<F: Into<anyhow::Error>>(message: Message, error: F) -> Self {
        Self {
            message,
            message_type: MessageType::Error,
            error: Some(error.into()),
        }
    }

    /// create a RoutineFailure error without an error
    pub fn error(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Error,
            error: None,
        }
    }
}

/// Reads DDL from `file`, or from stdin when no file (or `-`) is given.
pub fn read_input(file: Option<&Path>, action: &str) -> Result<String, RoutineFailure> {
    let text = match file {
        Some(path) if path != Path::new(STDIN_PATH) => {
            std::fs::read_to_string(path).map_err(|e| {
                RoutineFailure::new(
                    Message::new(
                        action.to_string(),
                        format!("Failed to read file: {}", path.display()),
                    ),
                    e,
                )
            })?
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).map_err(|e| {
                RoutineFailure::new(
                    Message::new(action.to_string(), "Failed to read from stdin".to_string()),
                    e,
                )
            })?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err(RoutineFailure::error(Message::new(
            action.to_string(),
            "No SQL provided (use a FILE argument or stdin)".to_string(),
        )));
    }

    Ok(text)
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T, action: &str) -> Result<(), RoutineFailure> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        RoutineFailure::new(
            Message::new(action.to_string(), "Failed to serialize result".to_string()),
            e,
        )
    })?;
    println!("{json}");
    Ok(())
}

pub fn input_label(file: Option<&PathBuf>) -> String {
    match file {
        Some(path) if path.as_path() != Path::new(STDIN_PATH) => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "CREATE TABLE t (id INT);").unwrap();
        let text = read_input(Some(file.path()), "Convert").unwrap();
        assert_eq!(text, "CREATE TABLE t (id INT);");
    }

    #[test]
    fn test_read_input_missing_file() {
        let failure = read_input(Some(Path::new("/nonexistent/schema.sql")), "Convert").unwrap_err();
        assert_eq!(failure.message.action, "Convert");
        assert!(failure.message.details.contains("/nonexistent/schema.sql"));
        assert!(failure.error.is_some());
    }

    #[test]
    fn test_read_input_blank_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  \n\t").unwrap();
        let failure = read_input(Some(file.path()), "Inspect").unwrap_err();
        assert!(failure.error.is_none());
        assert!(failure.message.details.starts_with("No SQL provided"));
    }

    #[test]
    fn test_input_label() {
        assert_eq!(input_label(None), "stdin");
        assert_eq!(input_label(Some(&PathBuf::from("-"))), "stdin");
        assert_eq!(input_label(Some(&PathBuf::from("schema.sql"))), "schema.sql");
    }

    #[test]
    fn test_silent_success() {
        assert!(RoutineSuccess::silent().is_silent());
        assert!(!RoutineSuccess::success(Message::new("Valid".to_string(), String::new())).is_silent());
    }
}
