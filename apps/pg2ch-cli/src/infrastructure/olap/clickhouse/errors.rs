use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
#[error("failed to generate clickhouse DDL")]
#[non_exhaustive]
pub enum ClickhouseError {
    #[error("Clickhouse - Invalid {identifier_type}: '{name}' - {reason}")]
    InvalidIdentifier {
        identifier_type: String,
        name: String,
        reason: String,
    },
    #[error("Clickhouse - Invalid parameters: {message}")]
    InvalidParameters { message: String },
    QueryRender(#[from] handlebars::RenderError),
}

/// Checks if a string is a plain ClickHouse identifier.
///
/// Plain identifiers are non-empty, contain only alphanumeric characters and
/// underscores, and do not start with a digit. Anything else has to be quoted.
pub fn is_valid_clickhouse_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Validates that a string can name a ClickHouse object at all, returning a
/// typed error on failure.
pub fn validate_clickhouse_identifier(
    name: &str,
    identifier_type: &str,
) -> Result<(), ClickhouseError> {
    let reason = if name.is_empty() {
        "cannot be empty"
    } else if name.contains('\0') {
        "cannot contain NUL characters"
    } else {
        return Ok(());
    };

    Err(ClickhouseError::InvalidIdentifier {
        identifier_type: identifier_type.to_string(),
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Returns `name` unchanged when it is a plain identifier, otherwise wrapped
/// in backticks with embedded backticks and backslashes escaped.
pub fn quote_identifier(name: &str) -> Cow<'_, str> {
    if is_valid_clickhouse_identifier(name) {
        Cow::Borrowed(name)
    } else {
        let escaped = name.replace('\\', "\\\\").replace('`', "\\`");
        Cow::Owned(format!("`{escaped}`"))
    }
}
