#[macro_use]
pub(crate) mod display;

mod commands;
pub mod logger;
pub mod routines;
pub mod settings;

use clap::Parser;
use commands::Commands;
use routines::{RoutineFailure, RoutineSuccess};
use settings::Settings;
use std::path::PathBuf;
use tracing::info;

use crate::framework::validation::ValidationMethod;
use crate::infrastructure::olap::clickhouse::ClickHouseLocal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help(true), next_display_order = None)]
pub struct Cli {
    /// Settings file (defaults to ./pg2ch.config.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colors and other ANSI styling
    #[arg(long, global = true)]
    pub no_ansi: bool,

    /// Only print errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print backtraces for all errors (same as RUST_LIB_BACKTRACE=1)
    #[arg(long, global = true)]
    pub backtrace: bool,

    #[command(subcommand)]
    pub command: Commands,
}

pub async fn top_command_handler(
    settings: Settings,
    commands: &Commands,
) -> Result<RoutineSuccess, RoutineFailure> {
    match commands {
        Commands::Convert {
            file,
            validate,
            json,
            bool_as_uint8,
            keep_schema,
        } => {
            info!(
                "Running convert command with file: {:?}, validate: {}",
                file, validate
            );

            let mut options = settings.conversion.to_options();
            options.bool_as_uint8 |= *bool_as_uint8;
            options.keep_schema |= *keep_schema;

            let validator = validate.then(|| ClickHouseLocal::new(settings.validator.clone()));
            routines::convert::convert(file.as_ref(), &options, validator.as_ref(), *json).await
        }
        Commands::Inspect { file, json } => {
            info!("Running inspect command with file: {:?}", file);
            routines::inspect::inspect(file.as_ref(), *json)
        }
        Commands::Validate { file, basic, json } => {
            info!(
                "Running validate command with file: {:?}, basic: {}",
                file, basic
            );

            let method = if *basic {
                ValidationMethod::Basic
            } else {
                ValidationMethod::ClickhouseLocal
            };
            let validator = ClickHouseLocal::new(settings.validator.clone());
            routines::validate::validate(file.as_ref(), method, &validator, *json).await
        }
        Commands::Examples { json } => routines::examples::examples(*json),
    }
}
