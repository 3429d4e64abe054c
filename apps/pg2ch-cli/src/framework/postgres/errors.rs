use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A location in the DDL text. `line` and `column` are 1-based; `column`
/// counts characters, `offset` counts bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedIdentifier,
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnexpectedCharacter => write!(f, "unexpected character"),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedIdentifier => write!(f, "unterminated quoted identifier"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated block comment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

/// Errors raised while turning DDL text into [`super::model::Table`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Unexpected token at {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("Unsupported construct at {position}: {construct} is not supported")]
    Unsupported {
        position: Position,
        construct: String,
    },

    #[error("Table '{table}' declares its primary key more than once (at {position})")]
    ConflictingPrimaryKey { table: String, position: Position },

    #[error("Primary key of table '{table}' references unknown column '{column}' at {position}")]
    UnknownPrimaryKeyColumn {
        table: String,
        column: String,
        position: Position,
    },

    #[error("Column '{column}' appears twice in the primary key of table '{table}' at {position}")]
    DuplicatePrimaryKeyColumn {
        table: String,
        column: String,
        position: Position,
    },

    #[error("Column '{column}' is declared twice in table '{table}' at {position}")]
    DuplicateColumn {
        table: String,
        column: String,
        position: Position,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let position = Position::locate("CREATE TABLE t", 7);
        assert_eq!(position.line, 1);
        assert_eq!(position.column, 8);
        assert_eq!(position.offset, 7);
    }

    #[test]
    fn test_locate_after_newlines() {
        let source = "CREATE TABLE t (\n  id INT,\n  name TEXT\n)";
        let offset = source.find("name").unwrap();
        let position = Position::locate(source, offset);
        assert_eq!(position.line, 3);
        assert_eq!(position.column, 3);
        assert_eq!(position.to_string(), "line 3, column 3");
    }

    #[test]
    fn test_locate_past_end_is_clamped() {
        let position = Position::locate("abc", 100);
        assert_eq!(position.offset, 3);
        assert_eq!(position.column, 4);
    }
}
