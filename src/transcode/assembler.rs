// In: src/transcode/assembler.rs

//! The frame assembler: drives one batch stream from schema to finished `Frame`.
//!
//! The assembler reads the stream's schema once, plans the containers, feeds
//! every batch through the transcoder in arrival order and finally converts the
//! containers into fields. Containers live only for the duration of one call.
//! If the stream reports an error, or the caller cancels, they are dropped and
//! no partial frame is returned.

use arrow::record_batch::RecordBatchReader;

use super::planner::{self, ColumnPlan};
use super::transcoder;
use crate::cancel::CancellationToken;
use crate::error::TranscodeError;
use crate::frame::{Frame, DEFAULT_FRAME_NAME};

/// Transcodes one batch stream into one frame.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    frame_name: String,
    cancel: Option<CancellationToken>,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_NAME)
    }
}

impl FrameAssembler {
    pub fn new(frame_name: impl Into<String>) -> Self {
        Self {
            frame_name: frame_name.into(),
            cancel: None,
        }
    }

    /// Makes the transcode observe `token` between batch pulls.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn ensure_not_cancelled(&self) -> Result<(), TranscodeError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(TranscodeError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Consumes `reader` to exhaustion and returns the assembled frame.
    ///
    /// A stream that yields no batches produces a frame with no fields. The
    /// first stream error aborts the transcode and is returned as-is.
    pub fn transcode(&self, reader: &mut dyn RecordBatchReader) -> Result<Frame, TranscodeError> {
        let schema = reader.schema();
        log::debug!(
            "frame '{}': planning {} columns",
            self.frame_name,
            schema.fields().len()
        );
        let mut columns: Vec<ColumnPlan> = planner::plan_columns(&schema);

        let mut batch_count: usize = 0;
        let mut row_count: usize = 0;
        loop {
            self.ensure_not_cancelled()?;
            let Some(batch_result) = reader.next() else {
                break;
            };
            let batch = batch_result.map_err(|e| {
                log::warn!(
                    "frame '{}': stream failed after {} batches ({} rows): {}",
                    self.frame_name,
                    batch_count,
                    row_count,
                    e
                );
                TranscodeError::from(e)
            })?;

            transcoder::append_batch(&mut columns, &batch);
            batch_count += 1;
            row_count += batch.num_rows();
        }
        self.ensure_not_cancelled()?;

        if batch_count == 0 {
            log::debug!("frame '{}': stream was empty", self.frame_name);
            return Ok(Frame::new(self.frame_name.clone()));
        }

        log::debug!(
            "frame '{}': transcoded {} batches, {} rows",
            self.frame_name,
            batch_count,
            row_count
        );
        let fields = columns.into_iter().map(ColumnPlan::into_field).collect();
        Ok(Frame::with_fields(self.frame_name.clone(), fields))
    }
}

/// Transcodes `reader` into a frame named `result`.
pub fn transcode(reader: &mut dyn RecordBatchReader) -> Result<Frame, TranscodeError> {
    FrameAssembler::default().transcode(reader)
}
