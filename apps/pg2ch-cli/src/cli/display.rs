//! # Display
//!
//! User-facing status lines. Every line is an action column, right-aligned
//! and styled by [`MessageType`], followed by free-form details. Status lines
//! go to stderr so that DDL and JSON written to stdout can be piped.
//!
//! Use the `show_message!` macro from routines and command handlers:
//!
//! ```text
//! show_message!(
//!     MessageType::Success,
//!     Message::new("Converted".to_string(), "2 tables".to_string())
//! );
//! ```

pub mod status;
pub mod terminal;

use serde::Serialize;
use tracing::warn;

use crate::utilities::display_config::load_display_config;
use terminal::{write_styled_line, StyledText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub action: String,
    pub details: String,
}

impl Message {
    pub fn new(action: String, details: String) -> Message {
        Message { action, details }
    }
}

macro_rules! show_message {
    ($message_type:expr, $message:expr) => {
        $crate::cli::display::show_message_wrapper($message_type, $message)
    };
}

fn styled_action(message_type: MessageType, action: &str) -> StyledText {
    let text = StyledText::from_str(action);
    match message_type {
        MessageType::Success => text.green().bold(),
        MessageType::Warning => text.yellow().bold(),
        MessageType::Error => text.red().bold(),
    }
}

fn is_shown(message_type: MessageType, quiet: bool) -> bool {
    !quiet || message_type == MessageType::Error
}

pub fn show_message_wrapper(message_type: MessageType, message: Message) {
    let config = load_display_config();
    if !is_shown(message_type, config.quiet) {
        return;
    }

    let styled = styled_action(message_type, &message.action);
    if let Err(e) = write_styled_line(&styled, &message.details, config.no_ansi) {
        warn!("Failed to write message to the terminal: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_new() {
        let message = Message::new("Converted".to_string(), "1 table".to_string());
        assert_eq!(message.action, "Converted");
        assert_eq!(message.details, "1 table");
    }

    #[test]
    fn test_styles_per_message_type() {
        assert_eq!(
            styled_action(MessageType::Error, "Failed"),
            StyledText::from_str("Failed").red().bold()
        );
        assert_eq!(
            styled_action(MessageType::Warning, "Warning"),
            StyledText::from_str("Warning").yellow().bold()
        );
        assert_eq!(
            styled_action(MessageType::Success, "Valid"),
            StyledText::from_str("Valid").green().bold()
        );
    }

    #[test]
    fn test_quiet_keeps_errors_only() {
        assert!(is_shown(MessageType::Error, true));
        assert!(!is_shown(MessageType::Warning, true));
        assert!(!is_shown(MessageType::Success, true));
        assert!(is_shown(MessageType::Success, false));
    }
}
