//! Styled terminal output built on crossterm.

use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{stderr, Result as IoResult};

/// Width of the action column in terminal output
pub const ACTION_WIDTH: usize = 15;

/// Builder for text with a foreground color and bold.
///
/// Styling is applied when the text is written, and skipped entirely when
/// ANSI output is disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    text: String,
    foreground: Option<Color>,
    bold: bool,
}

impl StyledText {
    pub fn new(text: String) -> Self {
        Self {
            text,
            foreground: None,
            bold: false,
        }
    }

    pub fn from_str(text: &str) -> Self {
        Self::new(text.to_string())
    }

    pub fn green(mut self) -> Self {
        self.foreground = Some(Color::Green);
        self
    }

    pub fn yellow(mut self) -> Self {
        self.foreground = Some(Color::Yellow);
        self
    }

    pub fn red(mut self) -> Self {
        self.foreground = Some(Color::Red);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Writes `[ACTION] message` with the action right-aligned in a column of
/// [`ACTION_WIDTH`] characters. Longer actions are cut on a char boundary.
fn write_styled_line_to<W: std::io::Write>(
    writer: &mut W,
    styled_text: &StyledText,
    message: &str,
    no_ansi: bool,
) -> IoResult<()> {
    let action: String = styled_text.text.chars().take(ACTION_WIDTH).collect();
    let padded_action = format!("{action:>ACTION_WIDTH$}");

    if !no_ansi {
        if let Some(color) = styled_text.foreground {
            execute!(writer, SetForegroundColor(color))?;
        }
        if styled_text.bold {
            execute!(writer, SetAttribute(Attribute::Bold))?;
        }
    }

    execute!(writer, Print(&padded_action))?;

    if !no_ansi {
        execute!(writer, ResetColor)?;
        if styled_text.bold {
            execute!(writer, SetAttribute(Attribute::Reset))?;
        }
    }

    execute!(writer, Print(" "), Print(message), Print("\n"))?;

    Ok(())
}

pub fn write_styled_line(styled_text: &StyledText, message: &str, no_ansi: bool) -> IoResult<()> {
    let mut stderr = stderr();
    write_styled_line_to(&mut stderr, styled_text, message, no_ansi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(styled: &StyledText, message: &str, no_ansi: bool) -> String {
        let mut buffer = Vec::new();
        write_styled_line_to(&mut buffer, styled, message, no_ansi).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_styled_text_equality() {
        let styled1 = StyledText::from_str("Test").green().bold();
        let styled2 = StyledText::from_str("Test").green().bold();
        assert_eq!(styled1, styled2);
        assert_ne!(styled1, StyledText::from_str("Test").red().bold());
    }

    #[test]
    fn test_plain_line_is_right_aligned() {
        let output = render(&StyledText::from_str("Converted").green(), "2 tables", true);
        assert_eq!(output, "      Converted 2 tables\n");
    }

    #[test]
    fn test_long_action_is_cut() {
        let output = render(
            &StyledText::from_str("AVeryLongActionNameHere"),
            "details",
            true,
        );
        assert_eq!(output, "AVeryLongAction details\n");
    }

    #[test]
    fn test_multibyte_action_does_not_panic() {
        let output = render(&StyledText::from_str("ééééééééééééééééé"), "x", true);
        assert!(output.starts_with("ééééééééééééééé x"));
    }

    #[test]
    fn test_ansi_codes_only_when_enabled() {
        let styled = StyledText::from_str("Failed").red().bold();

        let with_ansi = render(&styled, "message", false);
        assert!(with_ansi.contains("\x1b["));
        assert!(with_ansi.contains("\x1b[1m"));

        let without_ansi = render(&styled, "message", true);
        assert!(!without_ansi.contains("\x1b["));
        assert!(without_ansi.contains("Failed"));
        assert!(without_ansi.contains("message"));
    }

    #[test]
    fn test_bold_without_color() {
        let output = render(&StyledText::from_str("Valid").bold(), "ok", false);
        assert!(output.contains("\x1b[1m"));
        assert!(output.contains("Valid"));
        assert!(output.ends_with(" ok\n"));
    }
}
