//! # Schema Conversion
//!
//! Turns parsed PostgreSQL tables into ClickHouse `CREATE TABLE` statements.
//!
//! Every column is mapped with [`TypeMapper`], defaults go through
//! [`DefaultRules`] and the primary key becomes the `ORDER BY` key of a
//! `MergeTree()` table. Anything that cannot be carried over faithfully
//! (lossy types, dropped defaults and constraints) is returned as a
//! [`ConversionWarning`] next to the DDL.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::framework::postgres::{parse_ddl, ParseError, Table};
use crate::infrastructure::olap::clickhouse::defaults::{DefaultRules, DefaultTranslation};
use crate::infrastructure::olap::clickhouse::errors::ClickhouseError;
use crate::infrastructure::olap::clickhouse::mapper::{
    lossy_conversion_note, TypeMapper, TypeMappingError,
};
use crate::infrastructure::olap::clickhouse::model::{
    ClickHouseColumn, ClickHouseTable, ClickhouseEngine, OrderBy,
};
use crate::infrastructure::olap::clickhouse::queries::create_table_query;

/// PostgreSQL's default schema, never carried over as a database name
const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConversionError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No CREATE TABLE statements found")]
    NoTables,

    #[error("Table '{table}' has no columns")]
    NoColumns { table: String },

    #[error("Column '{column}' of table '{table}': {source}")]
    TypeMapping {
        table: String,
        column: String,
        #[source]
        source: TypeMappingError,
    },

    #[error("Failed to render DDL for table '{table}': {source}")]
    Render {
        table: String,
        #[source]
        source: ClickhouseError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    LossyType,
    DefaultDropped,
    ConstraintDropped,
    ArrayNullability,
    SchemaDropped,
}

/// Something the generated DDL does not preserve from the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionWarning {
    pub table: String,
    pub column: Option<String>,
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}.{}: {}", self.table, column, self.message),
            None => write!(f, "{}: {}", self.table, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Emit `UInt8` instead of `Bool` for `BOOLEAN` columns
    pub bool_as_uint8: bool,
    /// Qualify table names with their (non-`public`) schema
    pub keep_schema: bool,
    pub default_rules: DefaultRules,
}

/// One extra entry for the default-expression function table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultFunctionRule {
    pub postgres: String,
    pub clickhouse: String,
}

/// The `[conversion]` section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    #[serde(default)]
    pub bool_as_uint8: bool,
    #[serde(default)]
    pub keep_schema: bool,
    #[serde(default)]
    pub default_functions: Vec<DefaultFunctionRule>,
}

impl ConversionSettings {
    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions {
            bool_as_uint8: self.bool_as_uint8,
            keep_schema: self.keep_schema,
            default_rules: DefaultRules::with_functions(
                self.default_functions
                    .iter()
                    .map(|rule| (rule.postgres.as_str(), rule.clickhouse.as_str())),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConversion {
    /// The statement without a trailing `;`
    pub ddl: String,
    pub warnings: Vec<ConversionWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlConversion {
    /// All statements, each ending with `;`, separated by a blank line
    pub ddl: String,
    pub tables: Vec<Table>,
    pub warnings: Vec<ConversionWarning>,
}

/// Parses `text` and converts every `CREATE TABLE` statement in it.
pub fn convert_ddl(text: &str, options: &ConversionOptions) -> Result<DdlConversion, ConversionError> {
    let tables = parse_ddl(text)?;
    if tables.is_empty() {
        return Err(ConversionError::NoTables);
    }

    let mut statements = Vec::with_capacity(tables.len());
    let mut warnings = Vec::new();
    for table in &tables {
        let conversion = convert_table(table, options)?;
        statements.push(format!("{};", conversion.ddl));
        warnings.extend(conversion.warnings);
    }

    Ok(DdlConversion {
        ddl: statements.join("\n\n"),
        tables,
        warnings,
    })
}

pub fn convert_table(
    table: &Table,
    options: &ConversionOptions,
) -> Result<TableConversion, ConversionError> {
    if table.columns.is_empty() {
        return Err(ConversionError::NoColumns {
            table: table.name.clone(),
        });
    }

    let mapper = TypeMapper::new(options.bool_as_uint8);
    let mut warnings = Vec::new();
    let mut warn = |column: Option<&str>, kind: WarningKind, message: String| {
        debug!("{}: {}", table.name, message);
        warnings.push(ConversionWarning {
            table: table.name.clone(),
            column: column.map(str::to_string),
            kind,
            message,
        });
    };

    let mut columns = Vec::with_capacity(table.columns.len());
    for column in &table.columns {
        let mapping_error = |source| ConversionError::TypeMapping {
            table: table.name.clone(),
            column: column.name.clone(),
            source,
        };
        let name = Some(column.name.as_str());
        let primary_key = table.is_primary_key(&column.name);

        let default = match &column.default {
            None => None,
            Some(expression) => {
                let plain_type = mapper
                    .map(&column.data_type, false)
                    .map_err(mapping_error)?;
                match options.default_rules.translate(expression, &plain_type) {
                    DefaultTranslation::Translated(value) => Some(value),
                    DefaultTranslation::NoDefault => None,
                    DefaultTranslation::Dropped { reason } => {
                        warn(name, WarningKind::DefaultDropped, reason);
                        None
                    }
                }
            }
        };

        // a column with a default always has a value
        let nullable = column.nullable && !primary_key && default.is_none();
        let column_type = mapper
            .map(&column.data_type, nullable)
            .map_err(mapping_error)?;

        // the mapper never wraps arrays
        if nullable && !column_type.is_nullable() {
            warn(
                name,
                WarningKind::ArrayNullability,
                "ClickHouse arrays cannot be Nullable; NULL values become empty arrays"
                    .to_string(),
            );
        }
        if let Some(note) = lossy_conversion_note(&column.data_type) {
            warn(name, WarningKind::LossyType, note);
        }
        for constraint in &column.inline_constraints {
            warn(
                name,
                WarningKind::ConstraintDropped,
                format!("constraint `{constraint}` is not supported by ClickHouse and was dropped"),
            );
        }

        columns.push(ClickHouseColumn {
            name: column.name.clone(),
            column_type,
            primary_key,
            default,
        });
    }

    for constraint in &table.table_constraints {
        warn(
            None,
            WarningKind::ConstraintDropped,
            format!("constraint `{constraint}` is not supported by ClickHouse and was dropped"),
        );
    }

    let database = match &table.schema {
        Some(schema) if schema.eq_ignore_ascii_case(DEFAULT_SCHEMA) => None,
        Some(schema) if options.keep_schema => Some(schema.clone()),
        Some(schema) => {
            warn(
                None,
                WarningKind::SchemaDropped,
                format!("schema `{schema}` was dropped from the table name"),
            );
            None
        }
        None => None,
    };

    let clickhouse_table = ClickHouseTable {
        name: table.name.clone(),
        database,
        if_not_exists: table.if_not_exists,
        columns,
        order_by: OrderBy::Fields(table.primary_keys.clone()),
        engine: ClickhouseEngine::MergeTree,
    };

    let ddl = create_table_query(&clickhouse_table).map_err(|source| ConversionError::Render {
        table: table.name.clone(),
        source,
    })?;

    debug!(
        "Converted table {} ({} columns, key columns {:?}, {} warnings)",
        table.qualified_name(),
        clickhouse_table.columns.len(),
        clickhouse_table.primary_key_columns(),
        warnings.len()
    );

    Ok(TableConversion { ddl, warnings })
}
