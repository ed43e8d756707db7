//! This module defines the Type Catalog: the closed set of source value encodings
//! the transcoder understands, and the native storage kind each one lands in.

use arrow::datatypes::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The source encoding of a column, as announced by the batch stream's schema.
///
/// Every arrow type maps to exactly one variant; anything not explicitly
/// supported becomes `Unknown`, which is still a legal, plannable column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    LargeUtf8,
    Boolean,
    /// Epoch offset in the given unit. Timezone annotations are ignored.
    Timestamp(TimeUnit),
    /// Days since the epoch.
    Date32,
    /// Milliseconds since the epoch.
    Date64,
    Decimal128 { scale: i8 },
    Decimal256 { scale: i8 },
    /// Carries the arrow type's display name for diagnostics.
    Unknown(String),
}

/// The native element type of a storage container.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Text,
    Boolean,
    Time,
}

impl ColumnType {
    /// Converts an Arrow `DataType` into a `ColumnType`. This never fails.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Self {
        match arrow_type {
            ArrowDataType::Int8 => Self::Int8,
            ArrowDataType::Int16 => Self::Int16,
            ArrowDataType::Int32 => Self::Int32,
            ArrowDataType::Int64 => Self::Int64,
            ArrowDataType::UInt8 => Self::UInt8,
            ArrowDataType::UInt16 => Self::UInt16,
            ArrowDataType::UInt32 => Self::UInt32,
            ArrowDataType::UInt64 => Self::UInt64,
            ArrowDataType::Float32 => Self::Float32,
            ArrowDataType::Float64 => Self::Float64,
            ArrowDataType::Utf8 => Self::Utf8,
            ArrowDataType::LargeUtf8 => Self::LargeUtf8,
            ArrowDataType::Boolean => Self::Boolean,
            ArrowDataType::Timestamp(unit, _) => Self::Timestamp(*unit),
            ArrowDataType::Date32 => Self::Date32,
            ArrowDataType::Date64 => Self::Date64,
            ArrowDataType::Decimal128(_, scale) => Self::Decimal128 { scale: *scale },
            ArrowDataType::Decimal256(_, scale) => Self::Decimal256 { scale: *scale },
            dt => Self::Unknown(dt.to_string()),
        }
    }

    /// The storage element this source encoding is materialized into.
    pub fn storage_kind(&self) -> StorageKind {
        match self {
            Self::Int8 => StorageKind::Int8,
            Self::Int16 => StorageKind::Int16,
            Self::Int32 => StorageKind::Int32,
            Self::Int64 => StorageKind::Int64,
            Self::UInt8 => StorageKind::UInt8,
            Self::UInt16 => StorageKind::UInt16,
            Self::UInt32 => StorageKind::UInt32,
            Self::UInt64 => StorageKind::UInt64,
            Self::Float32 => StorageKind::Float32,
            Self::Float64 => StorageKind::Float64,
            Self::Utf8 | Self::LargeUtf8 | Self::Unknown(_) => StorageKind::Text,
            Self::Boolean => StorageKind::Boolean,
            Self::Timestamp(_) | Self::Date32 | Self::Date64 => StorageKind::Time,
            Self::Decimal128 { .. } | Self::Decimal256 { .. } => StorageKind::Float64,
        }
    }

    /// Returns `true` for encodings that are materialized as time instants.
    pub fn is_temporal(&self) -> bool {
        self.storage_kind() == StorageKind::Time
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(unit) => write!(f, "Timestamp({:?})", unit),
            Self::Decimal128 { scale } => write!(f, "Decimal128(scale={})", scale),
            Self::Decimal256 { scale } => write!(f, "Decimal256(scale={})", scale),
            Self::Unknown(name) => write!(f, "Unknown({})", name),
            other => write!(f, "{:?}", other),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
