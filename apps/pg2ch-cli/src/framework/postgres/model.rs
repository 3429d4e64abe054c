//! Structured model of a PostgreSQL `CREATE TABLE` statement.
//!
//! Values are built once by the parser and handed to the caller. The type
//! mapper and the schema converter only ever read them.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub schema: Option<String>,
    pub name: String,
    pub if_not_exists: bool,
    pub columns: Vec<Column>,
    pub primary_keys: Vec<String>,
    pub table_constraints: Vec<String>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn is_primary_key(&self, column_name: &str) -> bool {
        self.primary_keys.iter().any(|pk| pk == column_name)
    }

    /// `schema.name`, or just `name` when no schema was written.
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<String>,
    pub is_serial: bool,
    pub inline_constraints: Vec<String>,
}

/// A column type as written in the source: base keyword, its modifiers and
/// the number of array dimensions (`INTEGER[][]` has two).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub base: BaseType,
    pub array_dimensions: usize,
}

impl DataType {
    pub fn new(base: BaseType) -> Self {
        Self {
            base,
            array_dimensions: 0,
        }
    }

    pub fn array_of(base: BaseType, dimensions: usize) -> Self {
        Self {
            base,
            array_dimensions: dimensions,
        }
    }

    pub fn is_array(&self) -> bool {
        self.array_dimensions > 0
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for _ in 0..self.array_dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// PostgreSQL base types understood by the parser.
///
/// Anything else is kept as [`BaseType::Custom`] so that parsing never fails
/// on an unknown type; the type mapper decides whether it can be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    SmallInt,
    Integer,
    BigInt,
    SmallSerial,
    Serial,
    BigSerial,
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Real,
    DoublePrecision,
    Varchar {
        length: Option<u32>,
    },
    Text,
    Char {
        length: Option<u32>,
    },
    Boolean,
    Date,
    Timestamp {
        precision: Option<u32>,
        with_time_zone: bool,
    },
    Time {
        precision: Option<u32>,
        with_time_zone: bool,
    },
    Json,
    Jsonb,
    Uuid,
    Bytea,
    Custom(String),
}

impl BaseType {
    pub fn is_serial(&self) -> bool {
        matches!(
            self,
            BaseType::SmallSerial | BaseType::Serial | BaseType::BigSerial
        )
    }
}

fn write_modifiers(
    f: &mut fmt::Formatter<'_>,
    first: Option<u32>,
    second: Option<u32>,
) -> fmt::Result {
    match (first, second) {
        (Some(p), Some(s)) => write!(f, "({p},{s})"),
        (Some(p), None) => write!(f, "({p})"),
        _ => Ok(()),
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::SmallInt => write!(f, "SMALLINT"),
            BaseType::Integer => write!(f, "INTEGER"),
            BaseType::BigInt => write!(f, "BIGINT"),
            BaseType::SmallSerial => write!(f, "SMALLSERIAL"),
            BaseType::Serial => write!(f, "SERIAL"),
            BaseType::BigSerial => write!(f, "BIGSERIAL"),
            BaseType::Decimal { precision, scale } => {
                write!(f, "DECIMAL")?;
                write_modifiers(f, *precision, *scale)
            }
            BaseType::Numeric { precision, scale } => {
                write!(f, "NUMERIC")?;
                write_modifiers(f, *precision, *scale)
            }
            BaseType::Real => write!(f, "REAL"),
            BaseType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            BaseType::Varchar { length } => {
                write!(f, "VARCHAR")?;
                write_modifiers(f, *length, None)
            }
            BaseType::Text => write!(f, "TEXT"),
            BaseType::Char { length } => {
                write!(f, "CHAR")?;
                write_modifiers(f, *length, None)
            }
            BaseType::Boolean => write!(f, "BOOLEAN"),
            BaseType::Date => write!(f, "DATE"),
            BaseType::Timestamp {
                precision,
                with_time_zone,
            } => {
                write!(f, "TIMESTAMP")?;
                write_modifiers(f, *precision, None)?;
                if *with_time_zone {
                    write!(f, " WITH TIME ZONE")?;
                }
                Ok(())
            }
            BaseType::Time {
                precision,
                with_time_zone,
            } => {
                write!(f, "TIME")?;
                write_modifiers(f, *precision, None)?;
                if *with_time_zone {
                    write!(f, " WITH TIME ZONE")?;
                }
                Ok(())
            }
            BaseType::Json => write!(f, "JSON"),
            BaseType::Jsonb => write!(f, "JSONB"),
            BaseType::Uuid => write!(f, "UUID"),
            BaseType::Bytea => write!(f, "BYTEA"),
            BaseType::Custom(name) => write!(f, "{name}"),
        }
    }
}
