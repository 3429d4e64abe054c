//! Validation of generated ClickHouse DDL.
//!
//! The authoritative check runs the DDL through `clickhouse local`. The
//! sqlparser-based [`ValidationMethod::Basic`] check is only used when asked
//! for explicitly; an unavailable validator is an error, not a fallback.

pub mod sql_validation;

use serde::Serialize;
use std::fmt;

use crate::infrastructure::olap::clickhouse::local::{ClickHouseLocal, ValidatorUnavailable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMethod {
    ClickhouseLocal,
    Basic,
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMethod::ClickhouseLocal => write!(f, "clickhouse-local"),
            ValidationMethod::Basic => write!(f, "basic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub message: String,
    pub method: ValidationMethod,
}

pub async fn validate_ddl(
    ddl: &str,
    method: ValidationMethod,
    validator: &ClickHouseLocal,
) -> Result<ValidationReport, ValidatorUnavailable> {
    let outcome = match method {
        ValidationMethod::ClickhouseLocal => validator.validate(ddl).await?,
        ValidationMethod::Basic => sql_validation::basic_validate(ddl),
    };
    Ok(ValidationReport {
        valid: outcome.valid,
        message: outcome.message,
        method,
    })
}
