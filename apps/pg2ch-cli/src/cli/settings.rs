//! # Settings
//!
//! CLI settings are read from `pg2ch.config.toml` in the working directory
//! (optional) or from the file given with `--config` (required), then
//! overridden by `PG2CH_`-prefixed environment variables. Nested keys use a
//! double underscore:
//!
//! ```text
//! PG2CH_LOGGER__LEVEL=debug
//! PG2CH_VALIDATOR__COMMAND=/opt/clickhouse/bin/clickhouse
//! PG2CH_VALIDATOR__ARGS="local --no-system-tables"
//! PG2CH_CONVERSION__BOOL_AS_UINT8=true
//! ```
//!
//! Example file:
//!
//! ```toml
//! [validator]
//! timeout_secs = 10
//!
//! [conversion]
//! keep_schema = true
//!
//! [[conversion.default_functions]]
//! postgres = "clock_timestamp()"
//! clickhouse = "now64()"
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use super::logger::LoggerSettings;
use crate::framework::conversion::ConversionSettings;
use crate::infrastructure::olap::clickhouse::config::ValidatorConfig;
use crate::utilities::constants::{
    CONFIG_FILE, ENV_NESTING_SEPARATOR, ENV_PREFIX, ENV_PREFIX_SEPARATOR,
};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub logger: LoggerSettings,
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub conversion: ConversionSettings,
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_NESTING_SEPARATOR)
        .list_separator(" ")
        .with_list_parse_key("validator.args")
}

pub fn read_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match config_path {
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::from(Path::new(CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    };

    Config::builder()
        .add_source(file)
        .add_source(environment())
        .build()?
        .try_deserialize()
}
