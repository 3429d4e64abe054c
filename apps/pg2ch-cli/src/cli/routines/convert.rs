//! `pg2ch convert`: PostgreSQL DDL in, ClickHouse DDL out.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{input_label, print_json, read_input, RoutineFailure, RoutineSuccess};
use crate::cli::display::status::format_warning;
use crate::cli::display::{Message, MessageType};
use crate::framework::conversion::{convert_ddl, ConversionOptions, ConversionWarning};
use crate::framework::metadata::ConversionMetadata;
use crate::framework::validation::{validate_ddl, ValidationMethod, ValidationReport};
use crate::infrastructure::olap::clickhouse::ClickHouseLocal;

#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    ddl: &'a str,
    metadata: ConversionMetadata,
    warnings: &'a [ConversionWarning],
    validation: Option<ValidationReport>,
}

pub fn warning_item(warning: &ConversionWarning) -> String {
    match &warning.column {
        Some(column) => format!("{}.{}", warning.table, column),
        None => warning.table.clone(),
    }
}

pub async fn convert(
    file: Option<&PathBuf>,
    options: &ConversionOptions,
    validator: Option<&ClickHouseLocal>,
    json: bool,
) -> Result<RoutineSuccess, RoutineFailure> {
    let source = read_input(file.map(PathBuf::as_path), "Convert")?;

    let conversion = convert_ddl(&source, options).map_err(|e| {
        RoutineFailure::error(Message::new("Convert".to_string(), e.to_string()))
    })?;
    info!(
        "Converted {} table(s) with {} warning(s)",
        conversion.tables.len(),
        conversion.warnings.len()
    );

    let validation = match validator {
        Some(validator) => Some(
            validate_ddl(&conversion.ddl, ValidationMethod::ClickhouseLocal, validator)
                .await
                .map_err(|e| {
                    RoutineFailure::new(
                        Message::new("Validation".to_string(), format!("unavailable: {e}")),
                        e,
                    )
                })?,
        ),
        None => None,
    };

    if json {
        print_json(
            &ConvertOutput {
                ddl: &conversion.ddl,
                metadata: ConversionMetadata::from_tables(&conversion.tables),
                warnings: &conversion.warnings,
                validation: validation.clone(),
            },
            "Convert",
        )?;
    } else {
        println!("{}", conversion.ddl);
        for warning in &conversion.warnings {
            show_message!(
                MessageType::Warning,
                Message::new(
                    "Warning".to_string(),
                    format_warning(&warning_item(warning), &warning.message),
                )
            );
        }
    }

    if let Some(report) = validation.filter(|report| !report.valid) {
        return Err(RoutineFailure::error(Message::new(
            "Invalid".to_string(),
            report.message,
        )));
    }

    if json {
        return Ok(RoutineSuccess::silent());
    }

    let mut details = format!(
        "{} table(s) from {}",
        conversion.tables.len(),
        input_label(file)
    );
    if validator.is_some() {
        details.push_str(", validated with clickhouse local");
    }
    Ok(RoutineSuccess::success(Message::new(
        "Converted".to_string(),
        details,
    )))
}
