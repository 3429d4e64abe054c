//! Offline syntax check of ClickHouse DDL using sqlparser's ClickHouse
//! dialect.
//!
//! This only catches grammar errors. Type names, engine parameters and
//! semantic problems are left to `clickhouse local`.

use sqlparser::dialect::ClickHouseDialect;
use sqlparser::parser::Parser;

use crate::infrastructure::olap::clickhouse::local::ValidationOutcome;

/// Parses `sql` and returns the number of statements it contains, or the
/// parser error message.
pub fn validate_sql_statements(sql: &str) -> Result<usize, String> {
    let dialect = ClickHouseDialect {};
    Parser::parse_sql(&dialect, sql)
        .map(|statements| statements.len())
        .map_err(|e| e.to_string())
}

/// Runs the offline check and phrases the result so it cannot be mistaken
/// for a `clickhouse local` verdict.
pub fn basic_validate(ddl: &str) -> ValidationOutcome {
    match validate_sql_statements(ddl) {
        Ok(0) => ValidationOutcome {
            valid: false,
            message: "No SQL statements found".to_string(),
        },
        Ok(count) => ValidationOutcome {
            valid: true,
            message: format!(
                "Basic syntax check passed for {count} statement(s); clickhouse local was not used"
            ),
        },
        Err(message) => ValidationOutcome {
            valid: false,
            message: format!("Basic syntax check failed: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sql_statements_counts() {
        let sql = "CREATE TABLE a (x Int32) ENGINE = MergeTree() ORDER BY tuple();
CREATE TABLE b (y String) ENGINE = MergeTree() ORDER BY tuple();";
        assert_eq!(validate_sql_statements(sql), Ok(2));
    }

    #[test]
    fn test_validate_sql_statements_invalid_typo() {
        let result = validate_sql_statements("CRATE TABLE users (id Int32)");
        assert!(result.unwrap_err().contains("CRATE"));
    }

    #[test]
    fn test_basic_validate_labels_its_method() {
        let outcome = basic_validate("CREATE TABLE t (a Int32) ENGINE = MergeTree() ORDER BY tuple()");
        assert!(outcome.valid);
        assert!(outcome.message.starts_with("Basic syntax check passed"));
        assert!(outcome.message.contains("clickhouse local was not used"));
    }

    #[test]
    fn test_basic_validate_failure() {
        let outcome = basic_validate("CREATE TABLE t (a Int32,, b String)");
        assert!(!outcome.valid);
        assert!(outcome.message.starts_with("Basic syntax check failed"));
    }

    #[test]
    fn test_basic_validate_empty_input() {
        let outcome = basic_validate("  ");
        assert!(!outcome.valid);
    }
}
