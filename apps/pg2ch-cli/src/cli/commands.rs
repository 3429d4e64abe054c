//! # CLI Commands
//! A module for all the commands that can be run from the CLI

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert PostgreSQL CREATE TABLE statements to ClickHouse DDL
    Convert {
        /// File with PostgreSQL DDL; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Check the generated DDL with `clickhouse local`
        #[arg(long)]
        validate: bool,

        /// Print DDL, metadata, warnings and validation as JSON
        #[arg(long)]
        json: bool,

        /// Emit UInt8 instead of Bool for BOOLEAN columns
        #[arg(long)]
        bool_as_uint8: bool,

        /// Keep non-public schema names as ClickHouse database names
        #[arg(long)]
        keep_schema: bool,
    },
    /// Show the tables, columns and keys found in PostgreSQL DDL
    Inspect {
        /// File with PostgreSQL DDL; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate ClickHouse DDL
    Validate {
        /// File with ClickHouse DDL; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Only check the syntax, without running `clickhouse local`
        #[arg(long)]
        basic: bool,

        /// Print the validation report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List built-in sample PostgreSQL schemas
    Examples {
        /// Print the samples as JSON
        #[arg(long)]
        json: bool,
    },
}
