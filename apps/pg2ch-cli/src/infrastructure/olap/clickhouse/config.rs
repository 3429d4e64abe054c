//! # Validator Config
//! How the external `clickhouse local` validator is invoked.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_command() -> String {
    "clickhouse".to_string()
}

fn default_args() -> Vec<String> {
    vec!["local".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_message_chars() -> usize {
    2000
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Executable to run, resolved through `PATH`
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments placed before `--queries-file <file>`
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Diagnostics longer than this are truncated
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl ValidatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.command, "clickhouse");
        assert_eq!(config.args, vec!["local"]);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_message_chars, 2000);
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{"command": "/opt/clickhouse/bin/clickhouse"}"#).unwrap();
        assert_eq!(config.command, "/opt/clickhouse/bin/clickhouse");
        assert_eq!(config.args, vec!["local"]);
        assert_eq!(config.timeout_secs, 30);
    }
}
