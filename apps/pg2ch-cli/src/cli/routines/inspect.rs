//! `pg2ch inspect`: what the parser saw, without converting anything.

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::path::PathBuf;

use super::{print_json, read_input, RoutineFailure, RoutineSuccess};
use crate::cli::display::Message;
use crate::framework::metadata::{ConversionMetadata, TableMetadata};
use crate::framework::postgres::parse_ddl;

fn table_title(table: &TableMetadata) -> String {
    match &table.schema {
        Some(schema) => format!("{schema}.{}", table.name),
        None => table.name.clone(),
    }
}

fn render_table(table: &TableMetadata) -> String {
    let mut rendered = Table::new();
    rendered
        .load_preset(UTF8_FULL)
        .set_header(vec!["Column", "Type", "Nullable", "Primary key", "Default"]);
    for column in &table.column_details {
        let primary_key = table.primary_keys.contains(&column.name);
        rendered.add_row(vec![
            column.name.clone(),
            column.data_type.clone(),
            if column.nullable { "yes" } else { "no" }.to_string(),
            if primary_key { "yes" } else { "" }.to_string(),
            column.default.clone().unwrap_or_default(),
        ]);
    }
    rendered.to_string()
}

pub fn inspect(file: Option<&PathBuf>, json: bool) -> Result<RoutineSuccess, RoutineFailure> {
    let source = read_input(file.map(PathBuf::as_path), "Inspect")?;
    let tables = parse_ddl(&source).map_err(|e| {
        RoutineFailure::error(Message::new("Inspect".to_string(), e.to_string()))
    })?;
    let metadata = ConversionMetadata::from_tables(&tables);

    if json {
        print_json(&metadata, "Inspect")?;
        return Ok(RoutineSuccess::silent());
    }

    for table in &metadata.tables {
        println!("{}", table_title(table));
        println!("{}", render_table(table));
    }

    Ok(RoutineSuccess::success(Message::new(
        "Inspected".to_string(),
        format!(
            "{} table(s), {} column(s)",
            metadata.tables_count, metadata.total_columns
        ),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let tables = parse_ddl(
            "CREATE TABLE sales.orders (id BIGSERIAL PRIMARY KEY, note TEXT DEFAULT 'n/a')",
        )
        .unwrap();
        let metadata = ConversionMetadata::from_tables(&tables);
        let table = &metadata.tables[0];

        assert_eq!(table_title(table), "sales.orders");
        let rendered = render_table(table);
        assert!(rendered.contains("Primary key"));
        assert!(rendered.contains("BIGSERIAL"));
        assert!(rendered.contains("'n/a'"));
    }
}
