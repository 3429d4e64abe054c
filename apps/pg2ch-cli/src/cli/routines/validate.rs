//! `pg2ch validate`: check ClickHouse DDL that was written or edited by hand.

use std::path::PathBuf;

use super::{print_json, read_input, RoutineFailure, RoutineSuccess};
use crate::cli::display::Message;
use crate::framework::validation::{validate_ddl, ValidationMethod};
use crate::infrastructure::olap::clickhouse::ClickHouseLocal;

pub async fn validate(
    file: Option<&PathBuf>,
    method: ValidationMethod,
    validator: &ClickHouseLocal,
    json: bool,
) -> Result<RoutineSuccess, RoutineFailure> {
    let ddl = read_input(file.map(PathBuf::as_path), "Validate")?;

    let report = validate_ddl(&ddl, method, validator).await.map_err(|e| {
        RoutineFailure::new(
            Message::new("Validation".to_string(), format!("unavailable: {e}")),
            e,
        )
    })?;

    if json {
        print_json(&report, "Validate")?;
    }

    if !report.valid {
        return Err(RoutineFailure::error(Message::new(
            "Invalid".to_string(),
            report.message,
        )));
    }

    if json {
        return Ok(RoutineSuccess::silent());
    }

    Ok(RoutineSuccess::success(Message::new(
        "Valid".to_string(),
        format!("{} ({method})", report.message),
    )))
}
