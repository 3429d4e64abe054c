#[macro_use]
mod cli;
pub mod framework;
pub mod infrastructure;
pub mod utilities;

use std::process::ExitCode;

use clap::Parser;
use cli::display::{Message, MessageType};
use utilities::display_config::{update_display_config, DisplayConfig};

// Entry point for the CLI application
fn main() -> ExitCode {
    let cli_result = cli::Cli::parse();

    if cli_result.backtrace {
        // Safe: no other threads have started and no errors have been created yet.
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }

    update_display_config(DisplayConfig {
        no_ansi: cli_result.no_ansi,
        quiet: cli_result.quiet,
    });

    let settings = match cli::settings::read_settings(cli_result.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            show_message!(
                MessageType::Error,
                Message {
                    action: "Config".to_string(),
                    details: format!("Failed to read settings: {e}"),
                }
            );
            return ExitCode::from(1);
        }
    };

    if let Err(e) = cli::logger::setup_logging(&settings.logger) {
        show_message!(
            MessageType::Error,
            Message {
                action: "Logging".to_string(),
                details: format!("Failed to set up logging: {e}"),
            }
        );
        return ExitCode::from(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            show_message!(
                MessageType::Error,
                Message {
                    action: "Startup".to_string(),
                    details: format!("Failed to create Tokio runtime: {e}"),
                }
            );
            return ExitCode::from(1);
        }
    };

    let result = runtime.block_on(cli::top_command_handler(settings, &cli_result.command));

    match result {
        Ok(s) => {
            // Routines that already wrote JSON to stdout return an empty message
            if !s.is_silent() {
                s.show();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            show_message!(e.message_type, e.message);
            if let Some(err) = e.error {
                eprintln!("{err:?}");
            }
            ExitCode::from(1)
        }
    }
}
