//! This module holds the transcoding pipeline that turns a stream of Arrow
//! `RecordBatch`es into a single `Frame`.
//!
//!   1. [Schema Planner (planner)]       -> one empty `StorageContainer` per column
//!   2. [Batch Transcoder (transcoder)]  -> appends each batch, cell by cell
//!   3. [Frame Assembler (assembler)]    -> drives 1 and 2, then finalizes fields

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod assembler;
pub mod container;
pub mod planner;
pub mod transcoder;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::assembler::{transcode, FrameAssembler};
pub use self::container::{StorageContainer, ZERO_INSTANT};
pub use self::planner::{column_specs, plan_columns, ColumnPlan, ColumnSpec};

#[cfg(test)]
mod assembler_tests;
