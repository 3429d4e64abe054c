//! # ClickHouse Target
//!
//! Everything specific to the ClickHouse side of a conversion:
//!
//! - `model`: column types, columns and `MergeTree` tables
//! - `mapper`: PostgreSQL data types to ClickHouse column types
//! - `defaults`: column default expressions
//! - `queries`: `CREATE TABLE` rendering
//! - `local`: validation through `clickhouse local`
//!
//! ## Usage Example
//! ```rust
//! let table = ClickHouseTable { /* ... */ };
//! let ddl = create_table_query(&table)?;
//! let outcome = ClickHouseLocal::default().validate(&ddl).await?;
//! ```

pub mod config;
pub mod defaults;
pub mod errors;
pub mod local;
pub mod mapper;
pub mod model;
pub mod queries;

pub use errors::ClickhouseError;
pub use local::{ClickHouseLocal, ValidationOutcome, ValidatorUnavailable};
pub use queries::create_table_query;
