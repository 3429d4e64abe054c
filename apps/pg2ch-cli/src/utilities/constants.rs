pub const CLI_NAME: &str = "pg2ch";

/// Looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "pg2ch.config.toml";

/// Environment overrides look like `PG2CH_LOGGER__LEVEL=debug`
pub const ENV_PREFIX: &str = "PG2CH";
pub const ENV_PREFIX_SEPARATOR: &str = "_";
pub const ENV_NESTING_SEPARATOR: &str = "__";

/// Path argument meaning "read from stdin"
pub const STDIN_PATH: &str = "-";
