//! Maps PostgreSQL column types onto ClickHouse column types.

use crate::framework::postgres::model::{BaseType, DataType};

use super::model::{ClickHouseColumnType, ClickHouseFloat, ClickHouseInt};

/// Largest precision a ClickHouse `Decimal` accepts
pub const MAX_DECIMAL_PRECISION: u32 = 38;
/// Largest sub-second precision of `DateTime64`
pub const MAX_DATETIME64_PRECISION: u32 = 9;

/// Precision and scale used for `NUMERIC`/`DECIMAL` without modifiers
pub const UNCONSTRAINED_DECIMAL: (u8, u8) = (38, 10);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TypeMappingError {
    #[error("Unsupported PostgreSQL type: {type_name}")]
    UnsupportedType { type_name: String },
    #[error("Invalid parameters for {type_name}: {message}")]
    InvalidParameters { type_name: String, message: String },
}

/// Pure mapping from a PostgreSQL [`DataType`] to a ClickHouse type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMapper {
    /// Emit `UInt8` instead of `Bool` for `BOOLEAN` columns
    pub bool_as_uint8: bool,
}

impl TypeMapper {
    pub fn new(bool_as_uint8: bool) -> Self {
        Self { bool_as_uint8 }
    }

    /// Maps `data_type`, wrapping the result in `Nullable` when `nullable`
    /// is set. Arrays are never wrapped since ClickHouse rejects
    /// `Nullable(Array(...))`.
    pub fn map(
        &self,
        data_type: &DataType,
        nullable: bool,
    ) -> Result<ClickHouseColumnType, TypeMappingError> {
        let mut column_type = self.map_base(&data_type.base)?;
        for _ in 0..data_type.array_dimensions {
            column_type = ClickHouseColumnType::Array(Box::new(column_type));
        }

        if nullable && !data_type.is_array() {
            Ok(ClickHouseColumnType::Nullable(Box::new(column_type)))
        } else {
            Ok(column_type)
        }
    }

    fn map_base(&self, base: &BaseType) -> Result<ClickHouseColumnType, TypeMappingError> {
        match base {
            BaseType::SmallInt => Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::Int16)),
            BaseType::Integer => Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::Int32)),
            BaseType::BigInt => Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::Int64)),
            BaseType::SmallSerial => {
                Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::UInt16))
            }
            BaseType::Serial => Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::UInt32)),
            BaseType::BigSerial => Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::UInt64)),
            BaseType::Decimal { precision, scale } | BaseType::Numeric { precision, scale } => {
                map_decimal(base, *precision, *scale)
            }
            BaseType::Real => Ok(ClickHouseColumnType::ClickhouseFloat(
                ClickHouseFloat::Float32,
            )),
            BaseType::DoublePrecision => Ok(ClickHouseColumnType::ClickhouseFloat(
                ClickHouseFloat::Float64,
            )),
            BaseType::Varchar { .. } | BaseType::Text => Ok(ClickHouseColumnType::String),
            BaseType::Char { length } => match length {
                Some(0) => Err(TypeMappingError::InvalidParameters {
                    type_name: base.to_string(),
                    message: "length must be at least 1".to_string(),
                }),
                Some(length) => Ok(ClickHouseColumnType::FixedString(*length)),
                None => Ok(ClickHouseColumnType::FixedString(1)),
            },
            BaseType::Boolean if self.bool_as_uint8 => {
                Ok(ClickHouseColumnType::ClickhouseInt(ClickHouseInt::UInt8))
            }
            BaseType::Boolean => Ok(ClickHouseColumnType::Boolean),
            BaseType::Date => Ok(ClickHouseColumnType::Date),
            BaseType::Timestamp { precision, .. } => match precision {
                None => Ok(ClickHouseColumnType::DateTime),
                Some(p) if *p <= MAX_DATETIME64_PRECISION => {
                    Ok(ClickHouseColumnType::DateTime64 { precision: *p as u8 })
                }
                Some(p) => Err(TypeMappingError::InvalidParameters {
                    type_name: base.to_string(),
                    message: format!(
                        "precision {p} exceeds the DateTime64 maximum of {MAX_DATETIME64_PRECISION}"
                    ),
                }),
            },
            BaseType::Time { .. } | BaseType::Json | BaseType::Jsonb | BaseType::Bytea => {
                Ok(ClickHouseColumnType::String)
            }
            BaseType::Uuid => Ok(ClickHouseColumnType::Uuid),
            BaseType::Custom(name) => Err(TypeMappingError::UnsupportedType {
                type_name: name.clone(),
            }),
        }
    }
}

fn map_decimal(
    base: &BaseType,
    precision: Option<u32>,
    scale: Option<u32>,
) -> Result<ClickHouseColumnType, TypeMappingError> {
    let Some(precision) = precision else {
        let (precision, scale) = UNCONSTRAINED_DECIMAL;
        return Ok(ClickHouseColumnType::Decimal { precision, scale });
    };
    let scale = scale.unwrap_or(0);

    let invalid = |message: String| TypeMappingError::InvalidParameters {
        type_name: base.to_string(),
        message,
    };
    if precision == 0 || precision > MAX_DECIMAL_PRECISION {
        return Err(invalid(format!(
            "precision must be between 1 and {MAX_DECIMAL_PRECISION}, got {precision}"
        )));
    }
    if scale > precision {
        return Err(invalid(format!(
            "scale {scale} exceeds precision {precision}"
        )));
    }

    Ok(ClickHouseColumnType::Decimal {
        precision: precision as u8,
        scale: scale as u8,
    })
}

/// Describes what is lost when `data_type` is converted, if anything.
pub fn lossy_conversion_note(data_type: &DataType) -> Option<String> {
    match &data_type.base {
        BaseType::Decimal {
            precision: None, ..
        }
        | BaseType::Numeric {
            precision: None, ..
        } => {
            let (precision, scale) = UNCONSTRAINED_DECIMAL;
            Some(format!(
                "{} has no precision; mapped to Decimal({precision},{scale}) which may truncate values",
                data_type.base
            ))
        }
        BaseType::Timestamp {
            with_time_zone: true,
            ..
        } => Some(
            "time zone information is dropped; values are stored without a time zone".to_string(),
        ),
        BaseType::Time { .. } => {
            Some(format!("{} has no ClickHouse equivalent; stored as String", data_type.base))
        }
        BaseType::Json | BaseType::Jsonb => Some(format!(
            "{} structure is not preserved; stored as String",
            data_type.base
        )),
        BaseType::Bytea => Some("binary data is stored as String".to_string()),
        _ => None,
    }
}
