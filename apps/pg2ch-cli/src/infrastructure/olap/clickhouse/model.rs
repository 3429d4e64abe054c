use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::errors::quote_identifier;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ClickHouseColumnType {
    String,
    FixedString(u32),
    Boolean,
    ClickhouseInt(ClickHouseInt),
    ClickhouseFloat(ClickHouseFloat),
    Decimal {
        precision: u8,
        scale: u8,
    },
    Date,
    DateTime,
    DateTime64 {
        precision: u8,
    },
    Uuid,
    Array(Box<ClickHouseColumnType>),
    Nullable(Box<ClickHouseColumnType>),
}

impl ClickHouseColumnType {
    pub fn is_nullable(&self) -> bool {
        matches!(self, ClickHouseColumnType::Nullable(_))
    }

    /// The type without its `Nullable` wrapper.
    pub fn inner(&self) -> &ClickHouseColumnType {
        match self {
            ClickHouseColumnType::Nullable(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for ClickHouseColumnType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClickHouseColumnType::String => write!(f, "String"),
            ClickHouseColumnType::FixedString(length) => write!(f, "FixedString({length})"),
            ClickHouseColumnType::Boolean => write!(f, "Bool"),
            ClickHouseColumnType::ClickhouseInt(int) => write!(f, "{int}"),
            ClickHouseColumnType::ClickhouseFloat(float) => write!(f, "{float}"),
            ClickHouseColumnType::Decimal { precision, scale } => {
                write!(f, "Decimal({precision},{scale})")
            }
            ClickHouseColumnType::Date => write!(f, "Date"),
            ClickHouseColumnType::DateTime => write!(f, "DateTime"),
            ClickHouseColumnType::DateTime64 { precision } => write!(f, "DateTime64({precision})"),
            ClickHouseColumnType::Uuid => write!(f, "UUID"),
            ClickHouseColumnType::Array(inner) => write!(f, "Array({inner})"),
            ClickHouseColumnType::Nullable(inner) => write!(f, "Nullable({inner})"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClickHouseInt {
    UInt8,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
}

impl fmt::Display for ClickHouseInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ClickHouseFloat {
    Float32,
    Float64,
}

impl fmt::Display for ClickHouseFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClickHouseColumn {
    pub name: String,
    pub column_type: ClickHouseColumnType,
    pub primary_key: bool,
    /// Already translated to a ClickHouse expression
    pub default: Option<String>,
}

/// Sorting key of a MergeTree table. An empty field list means `tuple()`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderBy {
    Fields(Vec<String>),
}

impl OrderBy {
    pub fn to_expr(&self) -> Cow<'_, str> {
        match self {
            OrderBy::Fields(v) if v.is_empty() => "tuple()".into(),
            OrderBy::Fields(v) => format!(
                "({})",
                v.iter()
                    .map(|name| quote_identifier(name))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
            .into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OrderBy::Fields(v) if v.is_empty())
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickhouseEngine {
    #[default]
    MergeTree,
}

impl fmt::Display for ClickhouseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickhouseEngine::MergeTree => write!(f, "MergeTree()"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClickHouseTable {
    pub name: String,
    /// Database qualifier, only set when the source schema is kept
    pub database: Option<String>,
    pub if_not_exists: bool,
    pub columns: Vec<ClickHouseColumn>,
    pub order_by: OrderBy,
    pub engine: ClickhouseEngine,
}

impl ClickHouseTable {
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| {
                if c.primary_key {
                    Some(c.name.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Table name as it appears in DDL, quoted where needed.
    pub fn qualified_name(&self) -> String {
        match &self.database {
            Some(database) => format!(
                "{}.{}",
                quote_identifier(database),
                quote_identifier(&self.name)
            ),
            None => quote_identifier(&self.name).into_owned(),
        }
    }
}
