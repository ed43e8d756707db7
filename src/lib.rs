//! This file is the root of the `flight_frame` Rust crate.
//!
//! The crate turns the Arrow record batches streamed back by a Flight SQL
//! engine into a single named `Frame` of natively typed fields, and offers the
//! two small steps around it: time-range macro substitution before a query is
//! sent, and time-series reshaping after the frame is built.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod cancel;
pub mod config;
pub mod error;
pub mod frame;
pub mod macros;
pub mod observability;
pub mod query;
pub mod transcode;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use cancel::CancellationToken;
pub use error::TranscodeError;
pub use frame::{reshape_for_time_series, Field, FieldValues, Frame};
pub use macros::{substitute_macros, TimeRange};
pub use query::{query_data, run_query, DataQuery, DataResponse, QueryExecutor};
pub use transcode::{transcode, FrameAssembler};
pub use types::{ColumnType, StorageKind};
