// In: src/query/mod.rs

// ====================================================================================
// OVERVIEW: The Query Layer
// ====================================================================================
//
// The query layer is the boundary between the host application and the transcoding
// core. Connection handling, authentication and the Flight SQL handshake belong to
// the `QueryExecutor` collaborator; this module only drives it.
//
// Data Flow (one query):
//
//   1. [DataQuery]            -> parse `QueryModel`, reject empty SQL
//         |
//   2. [Macro Substitutor]    -> `$__timeFrom` / `$__timeTo` / `$__timeFilter`
//         |
//   3. [QueryExecutor]        -> `Option<BatchStream>` (None: no result endpoint)
//         |
//   4. [FrameAssembler]       -> `Frame` named after the query's ref id
//         |
//   5. [Reshaper]             -> only for `QueryFormat::TimeSeries`
//
// Every query is answered independently: a failing query yields an error response
// under its ref id and never aborts its siblings.
// ====================================================================================

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatchReader;
use serde::{Deserialize, Serialize};

use crate::cancel::CancellationToken;
use crate::config::{QueryFormat, QueryModel};
use crate::error::TranscodeError;
use crate::frame::{reshape_for_time_series, Frame};
use crate::macros::{substitute_macros, TimeRange};
use crate::transcode::FrameAssembler;

/// An owned batch stream handed over by the executor.
pub type BatchStream = Box<dyn RecordBatchReader + Send>;

/// The transport collaborator that runs SQL on the remote engine.
pub trait QueryExecutor {
    /// Runs `sql` and returns its result stream, or `None` when the engine
    /// reported no result endpoint.
    fn execute(&self, sql: &str) -> Result<Option<BatchStream>, TranscodeError>;
}

/// One query of a data request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataQuery {
    #[serde(rename = "refId")]
    pub ref_id: String,
    /// The raw query model JSON, parsed into a `QueryModel` at execution time.
    pub json: serde_json::Value,
    #[serde(rename = "timeRange")]
    pub time_range: TimeRange,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    BadRequest,
    Internal,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

/// The answer to one query: either frames or an error.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct DataResponse {
    pub frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl DataResponse {
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            error: None,
        }
    }

    pub fn from_error(status: Status, message: impl Into<String>) -> Self {
        Self {
            frames: Vec::new(),
            error: Some(ErrorResponse {
                status,
                message: message.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Executes the substituted SQL and transcodes whatever comes back.
fn execute_to_frame(
    executor: &dyn QueryExecutor,
    sql: &str,
    ref_id: &str,
    cancel: &CancellationToken,
) -> Result<Frame, TranscodeError> {
    let Some(mut stream) = executor.execute(sql)? else {
        log::debug!("query '{}': no result endpoint, returning an empty frame", ref_id);
        return Ok(Frame::new(ref_id));
    };
    FrameAssembler::new(ref_id)
        .with_cancellation(cancel.clone())
        .transcode(stream.as_mut())
}

/// Runs one query end to end.
pub fn run_query(
    executor: &dyn QueryExecutor,
    query: &DataQuery,
    cancel: &CancellationToken,
) -> DataResponse {
    let model = match QueryModel::from_json(&query.json) {
        Ok(model) => model,
        Err(e) => {
            return DataResponse::from_error(
                Status::BadRequest,
                format!("failed to unmarshal query: {}", e),
            )
        }
    };

    if model.raw_sql.is_empty() {
        return DataResponse::from_error(Status::BadRequest, "query is empty");
    }

    let sql = substitute_macros(&model.raw_sql, &query.time_range);
    log::debug!("query '{}': executing {}", query.ref_id, sql);

    match execute_to_frame(executor, &sql, &query.ref_id, cancel) {
        Ok(frame) => {
            let frame = match model.format {
                QueryFormat::TimeSeries => reshape_for_time_series(frame),
                QueryFormat::Table => frame,
            };
            DataResponse::from_frame(frame)
        }
        Err(e) => {
            log::warn!("query '{}' failed: {}", query.ref_id, e);
            DataResponse::from_error(Status::Internal, format!("query execution failed: {}", e))
        }
    }
}

/// Runs every query and keys the responses by ref id.
pub fn query_data(
    executor: &dyn QueryExecutor,
    queries: &[DataQuery],
    cancel: &CancellationToken,
) -> BTreeMap<String, DataResponse> {
    queries
        .iter()
        .map(|query| (query.ref_id.clone(), run_query(executor, query, cancel)))
        .collect()
}
