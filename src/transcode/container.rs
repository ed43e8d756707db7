// In: src/transcode/container.rs

//! Defines `StorageContainer`, the append-only accumulator for one column.
//!
//! There is one variant per source encoding rather than one per storage kind.
//! The variant carries what the column was planned with (timestamp unit, decimal
//! scale), so a container can only ever be fed by the transcoding path that
//! matches its column. Several variants share a storage kind and collapse into
//! the same `FieldValues` variant when the column is finalized.

use arrow::datatypes::TimeUnit;
use chrono::{DateTime, Utc};

use crate::frame::FieldValues;
use crate::types::{ColumnType, StorageKind};

/// The placeholder written into time containers for null cells and for
/// instants that cannot be represented.
pub const ZERO_INSTANT: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageContainer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
    LargeUtf8(Vec<String>),
    Boolean(Vec<bool>),
    Timestamp {
        unit: TimeUnit,
        values: Vec<DateTime<Utc>>,
    },
    Date32(Vec<DateTime<Utc>>),
    Date64(Vec<DateTime<Utc>>),
    Decimal128 {
        scale: i8,
        values: Vec<f64>,
    },
    Decimal256 {
        scale: i8,
        values: Vec<f64>,
    },
    /// Generic stringification of any encoding the catalog does not know.
    Fallback(Vec<String>),
}

fn pad<T: Clone>(values: &mut Vec<T>, count: usize, placeholder: T) {
    values.resize(values.len() + count, placeholder);
}

impl StorageContainer {
    /// Allocates an empty container for a column of the given source type.
    pub fn for_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Int8 => Self::Int8(Vec::new()),
            ColumnType::Int16 => Self::Int16(Vec::new()),
            ColumnType::Int32 => Self::Int32(Vec::new()),
            ColumnType::Int64 => Self::Int64(Vec::new()),
            ColumnType::UInt8 => Self::UInt8(Vec::new()),
            ColumnType::UInt16 => Self::UInt16(Vec::new()),
            ColumnType::UInt32 => Self::UInt32(Vec::new()),
            ColumnType::UInt64 => Self::UInt64(Vec::new()),
            ColumnType::Float32 => Self::Float32(Vec::new()),
            ColumnType::Float64 => Self::Float64(Vec::new()),
            ColumnType::Utf8 => Self::Utf8(Vec::new()),
            ColumnType::LargeUtf8 => Self::LargeUtf8(Vec::new()),
            ColumnType::Boolean => Self::Boolean(Vec::new()),
            ColumnType::Timestamp(unit) => Self::Timestamp {
                unit: *unit,
                values: Vec::new(),
            },
            ColumnType::Date32 => Self::Date32(Vec::new()),
            ColumnType::Date64 => Self::Date64(Vec::new()),
            ColumnType::Decimal128 { scale } => Self::Decimal128 {
                scale: *scale,
                values: Vec::new(),
            },
            ColumnType::Decimal256 { scale } => Self::Decimal256 {
                scale: *scale,
                values: Vec::new(),
            },
            ColumnType::Unknown(_) => Self::Fallback(Vec::new()),
        }
    }

    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Self::Int8(_) => StorageKind::Int8,
            Self::Int16(_) => StorageKind::Int16,
            Self::Int32(_) => StorageKind::Int32,
            Self::Int64(_) => StorageKind::Int64,
            Self::UInt8(_) => StorageKind::UInt8,
            Self::UInt16(_) => StorageKind::UInt16,
            Self::UInt32(_) => StorageKind::UInt32,
            Self::UInt64(_) => StorageKind::UInt64,
            Self::Float32(_) => StorageKind::Float32,
            Self::Float64(_) | Self::Decimal128 { .. } | Self::Decimal256 { .. } => {
                StorageKind::Float64
            }
            Self::Utf8(_) | Self::LargeUtf8(_) | Self::Fallback(_) => StorageKind::Text,
            Self::Boolean(_) => StorageKind::Boolean,
            Self::Timestamp { .. } | Self::Date32(_) | Self::Date64(_) => StorageKind::Time,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Decimal128 { values, .. } | Self::Decimal256 { values, .. } => values.len(),
            Self::Utf8(v) | Self::LargeUtf8(v) | Self::Fallback(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Timestamp { values, .. } => values.len(),
            Self::Date32(v) | Self::Date64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `count` null placeholders: zero for numbers, `""` for text,
    /// `false` for booleans and `ZERO_INSTANT` for time.
    pub fn push_placeholders(&mut self, count: usize) {
        match self {
            Self::Int8(v) => pad(v, count, 0),
            Self::Int16(v) => pad(v, count, 0),
            Self::Int32(v) => pad(v, count, 0),
            Self::Int64(v) => pad(v, count, 0),
            Self::UInt8(v) => pad(v, count, 0),
            Self::UInt16(v) => pad(v, count, 0),
            Self::UInt32(v) => pad(v, count, 0),
            Self::UInt64(v) => pad(v, count, 0),
            Self::Float32(v) => pad(v, count, 0.0),
            Self::Float64(v) => pad(v, count, 0.0),
            Self::Decimal128 { values, .. } | Self::Decimal256 { values, .. } => {
                pad(values, count, 0.0)
            }
            Self::Utf8(v) | Self::LargeUtf8(v) | Self::Fallback(v) => {
                pad(v, count, String::new())
            }
            Self::Boolean(v) => pad(v, count, false),
            Self::Timestamp { values, .. } => pad(values, count, ZERO_INSTANT),
            Self::Date32(v) | Self::Date64(v) => pad(v, count, ZERO_INSTANT),
        }
    }

    /// Consumes the container, collapsing it onto its storage kind.
    pub fn into_values(self) -> FieldValues {
        match self {
            Self::Int8(v) => FieldValues::Int8(v),
            Self::Int16(v) => FieldValues::Int16(v),
            Self::Int32(v) => FieldValues::Int32(v),
            Self::Int64(v) => FieldValues::Int64(v),
            Self::UInt8(v) => FieldValues::UInt8(v),
            Self::UInt16(v) => FieldValues::UInt16(v),
            Self::UInt32(v) => FieldValues::UInt32(v),
            Self::UInt64(v) => FieldValues::UInt64(v),
            Self::Float32(v) => FieldValues::Float32(v),
            Self::Float64(v) => FieldValues::Float64(v),
            Self::Decimal128 { values, .. } | Self::Decimal256 { values, .. } => {
                FieldValues::Float64(values)
            }
            Self::Utf8(v) | Self::LargeUtf8(v) | Self::Fallback(v) => FieldValues::Text(v),
            Self::Boolean(v) => FieldValues::Boolean(v),
            Self::Timestamp { values, .. } => FieldValues::Time(values),
            Self::Date32(v) | Self::Date64(v) => FieldValues::Time(v),
        }
    }
}
