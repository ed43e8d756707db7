//! This module defines the core, strongly-typed data representations used
//! throughout the transcoding pipeline.
//!
//! It currently holds the Type Catalog: the `ColumnType` enum for source encodings
//! and the `StorageKind` enum for the native element each encoding lands in.

pub mod column_type;

// Re-export the main type(s) for easier access.
pub use column_type::{ColumnType, StorageKind};
