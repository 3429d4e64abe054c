//! Summary of parsed tables for tooling and display.

use serde::Serialize;

use crate::framework::postgres::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDetails {
    pub name: String,
    /// PostgreSQL type as written, e.g. `VARCHAR(255)` or `INTEGER[]`
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMetadata {
    pub name: String,
    pub schema: Option<String>,
    pub columns: usize,
    pub primary_keys: Vec<String>,
    pub column_details: Vec<ColumnDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionMetadata {
    pub tables_count: usize,
    pub total_columns: usize,
    pub tables: Vec<TableMetadata>,
}

impl ConversionMetadata {
    pub fn from_tables(tables: &[Table]) -> Self {
        let tables: Vec<TableMetadata> = tables.iter().map(TableMetadata::from_table).collect();
        Self {
            tables_count: tables.len(),
            total_columns: tables.iter().map(|t| t.columns).sum(),
            tables,
        }
    }
}

impl TableMetadata {
    fn from_table(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            schema: table.schema.clone(),
            columns: table.columns.len(),
            primary_keys: table.primary_keys.clone(),
            column_details: table
                .columns
                .iter()
                .map(|column| ColumnDetails {
                    name: column.name.clone(),
                    data_type: column.data_type.to_string(),
                    nullable: column.nullable,
                    default: column.default.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::postgres::parse_ddl;
    use serde_json::json;

    #[test]
    fn test_metadata_counts() {
        let tables = parse_ddl(
            "CREATE TABLE a (x INT PRIMARY KEY, y TEXT);
             CREATE TABLE b (z DECIMAL(10,2) NOT NULL DEFAULT 0, w TEXT, v DATE);",
        )
        .unwrap();
        let metadata = ConversionMetadata::from_tables(&tables);
        assert_eq!(metadata.tables_count, 2);
        assert_eq!(metadata.total_columns, 5);
        assert_eq!(metadata.tables[0].columns, 2);
        assert_eq!(metadata.tables[1].columns, 3);
    }

    #[test]
    fn test_metadata_json_shape() {
        let tables =
            parse_ddl("CREATE TABLE users (id SERIAL PRIMARY KEY, email VARCHAR(255) DEFAULT 'x')")
                .unwrap();
        let value = serde_json::to_value(ConversionMetadata::from_tables(&tables)).unwrap();
        assert_eq!(
            value,
            json!({
                "tables_count": 1,
                "total_columns": 2,
                "tables": [{
                    "name": "users",
                    "schema": null,
                    "columns": 2,
                    "primary_keys": ["id"],
                    "column_details": [
                        {"name": "id", "type": "SERIAL", "nullable": false, "default": null},
                        {"name": "email", "type": "VARCHAR(255)", "nullable": true, "default": "'x'"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_empty_metadata() {
        let metadata = ConversionMetadata::from_tables(&[]);
        assert_eq!(metadata.tables_count, 0);
        assert_eq!(metadata.total_columns, 0);
        assert!(metadata.tables.is_empty());
    }
}
