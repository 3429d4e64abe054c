//! Translation of PostgreSQL `DEFAULT` expressions into ClickHouse ones.
//!
//! Only expressions with a known equivalent are translated: a small table of
//! functions, boolean, numeric and string literals, and flat array constants.
//! Everything else is reported as dropped so the caller can warn about it.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::model::{ClickHouseColumnType, ClickHouseInt};

static NUMERIC_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("Valid regex pattern")
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'(?:[^']|'')*'$").expect("Valid regex pattern"));

/// `CURRENT_TIMESTAMP(3)` and friends; the precision is irrelevant for `now()`
static TIME_FUNCTION_PRECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(CURRENT_TIMESTAMP|LOCALTIMESTAMP)\(\d+\)$").expect("Valid regex pattern")
});

const BUILTIN_FUNCTIONS: &[(&str, &str)] = &[
    ("CURRENT_TIMESTAMP", "now()"),
    ("NOW()", "now()"),
    ("LOCALTIMESTAMP", "now()"),
    ("TRANSACTION_TIMESTAMP()", "now()"),
    ("STATEMENT_TIMESTAMP()", "now()"),
    ("CLOCK_TIMESTAMP()", "now()"),
    ("CURRENT_DATE", "today()"),
    ("GEN_RANDOM_UUID()", "generateUUIDv4()"),
    ("UUID_GENERATE_V4()", "generateUUIDv4()"),
];

/// Outcome of translating one default expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultTranslation {
    Translated(String),
    /// `DEFAULT NULL`, which is the same as having no default
    NoDefault,
    Dropped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRules {
    functions: HashMap<String, String>,
}

impl Default for DefaultRules {
    fn default() -> Self {
        Self {
            functions: BUILTIN_FUNCTIONS
                .iter()
                .map(|(pg, ch)| (pg.to_string(), ch.to_string()))
                .collect(),
        }
    }
}

/// Lookup key for a function expression: upper case, whitespace removed.
fn function_key(expression: &str) -> String {
    let key: String = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    match TIME_FUNCTION_PRECISION.captures(&key) {
        Some(captures) => captures[1].to_string(),
        None => key,
    }
}

impl DefaultRules {
    /// Built-in rules extended (or overridden) by `functions`, given as
    /// PostgreSQL expression to ClickHouse expression pairs.
    pub fn with_functions<I, K, V>(functions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut rules = Self::default();
        for (postgres, clickhouse) in functions {
            rules
                .functions
                .insert(function_key(postgres.as_ref()), clickhouse.into());
        }
        rules
    }

    /// Translates the raw PostgreSQL default `expression` for a column of
    /// `column_type`.
    pub fn translate(
        &self,
        expression: &str,
        column_type: &ClickHouseColumnType,
    ) -> DefaultTranslation {
        let expression = strip_casts(expression);

        if expression.eq_ignore_ascii_case("NULL") {
            return DefaultTranslation::NoDefault;
        }

        if let Some(function) = self.functions.get(&function_key(expression)) {
            return DefaultTranslation::Translated(function.clone());
        }

        let as_uint8 = matches!(
            column_type.inner(),
            ClickHouseColumnType::ClickhouseInt(ClickHouseInt::UInt8)
        );
        if expression.eq_ignore_ascii_case("TRUE") {
            let literal = if as_uint8 { "1" } else { "true" };
            return DefaultTranslation::Translated(literal.to_string());
        }
        if expression.eq_ignore_ascii_case("FALSE") {
            let literal = if as_uint8 { "0" } else { "false" };
            return DefaultTranslation::Translated(literal.to_string());
        }

        if let ClickHouseColumnType::Array(element) = column_type.inner() {
            return match array_literal(expression, element) {
                Some(literal) => DefaultTranslation::Translated(literal),
                None => DefaultTranslation::Dropped {
                    reason: format!("array default `{expression}` has no ClickHouse equivalent"),
                },
            };
        }

        if NUMERIC_LITERAL.is_match(expression) {
            return DefaultTranslation::Translated(expression.to_string());
        }
        if STRING_LITERAL.is_match(expression) {
            // backslashes are literal in PostgreSQL strings but escapes in ClickHouse
            return DefaultTranslation::Translated(expression.replace('\\', "\\\\"));
        }

        DefaultTranslation::Dropped {
            reason: format!("default expression `{expression}` has no ClickHouse equivalent"),
        }
    }
}

/// Rewrites a PostgreSQL array constant such as `'{1,2}'` into a ClickHouse
/// array literal. Only flat arrays of plain elements are handled; quoted or
/// `NULL` elements and nested braces yield `None`.
fn array_literal(expression: &str, element: &ClickHouseColumnType) -> Option<String> {
    if !STRING_LITERAL.is_match(expression) {
        return None;
    }
    let content = expression[1..expression.len() - 1].replace("''", "'");
    let items = content.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
    if items.is_empty() {
        return Some("[]".to_string());
    }

    let elements = items
        .split(',')
        .map(|item| array_element(item.trim(), element))
        .collect::<Option<Vec<_>>>()?;
    Some(format!("[{}]", elements.join(", ")))
}

fn array_element(item: &str, element: &ClickHouseColumnType) -> Option<String> {
    if item.is_empty()
        || item.eq_ignore_ascii_case("NULL")
        || item.contains(['{', '}', '"', '\\'])
    {
        return None;
    }
    match element {
        ClickHouseColumnType::ClickhouseInt(_)
        | ClickHouseColumnType::ClickhouseFloat(_)
        | ClickHouseColumnType::Decimal { .. } => {
            NUMERIC_LITERAL.is_match(item).then(|| item.to_string())
        }
        ClickHouseColumnType::Boolean => match item.to_ascii_lowercase().as_str() {
            "t" | "true" => Some("true".to_string()),
            "f" | "false" => Some("false".to_string()),
            _ => None,
        },
        ClickHouseColumnType::String
        | ClickHouseColumnType::FixedString(_)
        | ClickHouseColumnType::Uuid
        | ClickHouseColumnType::Date
        | ClickHouseColumnType::DateTime
        | ClickHouseColumnType::DateTime64 { .. } => {
            Some(format!("'{}'", item.replace('\'', "\\'")))
        }
        ClickHouseColumnType::Array(_) | ClickHouseColumnType::Nullable(_) => None,
    }
}

fn strip_outer_parens(mut expression: &str) -> &str {
    loop {
        expression = expression.trim();
        match expression
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) if is_balanced(inner) => expression = inner,
            _ => return expression,
        }
    }
}

/// True when every parenthesis outside string literals is matched, in order.
fn is_balanced(expression: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    for c in expression.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !in_string
}

/// Removes outer parentheses and every trailing top-level `::type` cast.
fn strip_casts(expression: &str) -> &str {
    let expression = strip_outer_parens(expression);
    let mut depth = 0i32;
    let mut in_string = false;
    let mut previous = '\0';
    for (i, c) in expression.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            ':' if !in_string && depth == 0 && previous == ':' => {
                return strip_outer_parens(&expression[..i - 1]);
            }
            _ => {}
        }
        previous = c;
    }
    expression
}
