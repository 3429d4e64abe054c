//! # ClickHouse Local Validator
//!
//! Checks generated DDL by running it through `clickhouse local`, which
//! executes queries against a throwaway in-process server. The DDL is written
//! to a temporary `.sql` file and passed with `--queries-file`.
//!
//! The child process is spawned with `kill_on_drop`, so a timeout or a
//! cancelled future kills it; the temporary file is removed when it goes out
//! of scope. A validator that cannot be run is reported as
//! [`ValidatorUnavailable`], never as a passing result.

use serde::Serialize;
use std::io::Write;
use std::process::Stdio;
use tracing::{debug, info, warn};

use super::config::ValidatorConfig;

pub const VALID_MESSAGE: &str = "DDL is valid";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidatorUnavailable {
    #[error("Validator executable `{command}` was not found")]
    NotFound { command: String },

    #[error("Failed to start validator `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Validator did not finish within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Failed to write DDL to a temporary file")]
    TempFile(#[source] std::io::Error),

    #[error("Failed to collect validator output")]
    Wait(#[source] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct ClickHouseLocal {
    config: ValidatorConfig,
}

impl ClickHouseLocal {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub async fn validate(&self, ddl: &str) -> Result<ValidationOutcome, ValidatorUnavailable> {
        let mut queries_file = tempfile::Builder::new()
            .prefix("pg2ch-")
            .suffix(".sql")
            .tempfile()
            .map_err(ValidatorUnavailable::TempFile)?;
        queries_file
            .write_all(ddl.as_bytes())
            .and_then(|_| queries_file.flush())
            .map_err(ValidatorUnavailable::TempFile)?;

        let mut command = tokio::process::Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .arg("--queries-file")
            .arg(queries_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            "Validating DDL with {} {}",
            self.config.command,
            self.config.args.join(" ")
        );

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ValidatorUnavailable::NotFound {
                    command: self.config.command.clone(),
                }
            } else {
                ValidatorUnavailable::Spawn {
                    command: self.config.command.clone(),
                    source: e,
                }
            }
        })?;

        let output =
            match tokio::time::timeout(self.config.timeout(), child.wait_with_output()).await {
                Ok(result) => result.map_err(ValidatorUnavailable::Wait)?,
                Err(_) => {
                    warn!(
                        "Validator timed out after {}s, killing it",
                        self.config.timeout_secs
                    );
                    return Err(ValidatorUnavailable::Timeout {
                        seconds: self.config.timeout_secs,
                    });
                }
            };

        debug!("Validator exited with {}", output.status);

        if output.status.success() {
            return Ok(ValidationOutcome {
                valid: true,
                message: VALID_MESSAGE.to_string(),
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostics = match (stderr.trim(), stdout.trim()) {
            ("", "") => format!("validator exited with {}", output.status),
            ("", stdout) => stdout.to_string(),
            (stderr, _) => stderr.to_string(),
        };

        Ok(ValidationOutcome {
            valid: false,
            message: truncate_chars(&diagnostics, self.config.max_message_chars),
        })
    }
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_chars("0123456789abc", 10), "0123456789...");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let validator = ClickHouseLocal::new(ValidatorConfig {
            command: "pg2ch-validator-that-does-not-exist".to_string(),
            ..ValidatorConfig::default()
        });
        let err = validator.validate("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ValidatorUnavailable::NotFound { ref command } if command == "pg2ch-validator-that-does-not-exist"));
    }

    #[cfg(unix)]
    fn shell(script: &str) -> ClickHouseLocal {
        // `sh -c script sh --queries-file <path>` puts the path in $2
        ClickHouseLocal::new(ValidatorConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            ..ValidatorConfig::default()
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_is_valid() {
        let outcome = shell(r#"grep -q "CREATE TABLE" "$2""#)
            .validate("CREATE TABLE t (a Int32) ENGINE = MergeTree() ORDER BY tuple();")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome {
                valid: true,
                message: VALID_MESSAGE.to_string()
            }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_reports_stderr() {
        let outcome = shell("echo 'Code: 62. DB::Exception: Syntax error' >&2; echo ignored; exit 1")
            .validate("CREATE TABLE")
            .await
            .unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Code: 62. DB::Exception: Syntax error");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_falls_back_to_stdout() {
        let outcome = shell("echo 'only stdout'; exit 2")
            .validate("CREATE TABLE")
            .await
            .unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "only stdout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_long_diagnostics_are_truncated() {
        let mut validator = shell("printf 'x%.0s' $(seq 1 50) >&2; exit 1");
        validator.config.max_message_chars = 10;
        let outcome = validator.validate("CREATE TABLE").await.unwrap();
        assert_eq!(outcome.message, "xxxxxxxxxx...");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let mut validator = shell("sleep 10");
        validator.config.timeout_secs = 1;
        let err = validator.validate("CREATE TABLE").await.unwrap_err();
        assert!(matches!(err, ValidatorUnavailable::Timeout { seconds: 1 }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_temp_file_is_removed() {
        let outcome = shell(r#"echo "$2"; exit 1"#)
            .validate("CREATE TABLE")
            .await
            .unwrap();
        let path = std::path::PathBuf::from(&outcome.message);
        assert!(path.extension().is_some_and(|ext| ext == "sql"));
        assert!(!path.exists());
    }
}
