//! The output model handed back to the presentation layer: a named `Frame`
//! holding an ordered list of fully materialized, homogeneously typed `Field`s.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::StorageKind;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod reshape;

pub use self::reshape::reshape_for_time_series;

/// The name given to frames whose caller did not supply one.
pub const DEFAULT_FRAME_NAME: &str = "result";

//==================================================================================
// 2. Field Values
//==================================================================================

/// The materialized values of one field, one variant per `StorageKind`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum FieldValues {
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
    Text(Vec<String>),
    Boolean(Vec<bool>),
    Time(Vec<DateTime<Utc>>),
}

impl FieldValues {
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
            Self::Text(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> StorageKind {
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
            Self::Float64(_) => StorageKind::Float64,
            Self::Text(_) => StorageKind::Text,
            Self::Boolean(_) => StorageKind::Boolean,
            Self::Time(_) => StorageKind::Time,
        }
    }
}

//==================================================================================
// 3. Field & Frame
//==================================================================================

/// One named output column.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn kind(&self) -> StorageKind {
        self.values.kind()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The final, immutable result of one transcode.
///
/// **Invariant:** every field holds the same number of rows.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    /// Creates a frame with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Number of rows, taken from the first field. A frame with no fields has zero rows.
    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
