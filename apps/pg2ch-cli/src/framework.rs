//! PostgreSQL-facing side of pg2ch: parsing, conversion and validation
//! orchestration.

pub mod conversion;
pub mod metadata;
pub mod postgres;
pub mod samples;
pub mod validation;
