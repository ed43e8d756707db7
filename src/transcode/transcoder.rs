// In: src/transcode/transcoder.rs

//! The batch transcoder.
//!
//! Appends every cell of one `RecordBatch` into the planned containers, in row
//! order. Null cells become the container's placeholder. Values are converted
//! according to the container variant, which was chosen from the column's
//! source encoding at planning time.
//!
//! This layer never fails. If a batch column does not have the runtime type its
//! container was planned for, the whole column slice degrades to placeholders so
//! that every container still grows by exactly the batch's row count.

use arrow::array::{Array, ArrowPrimitiveType, AsArray};
use arrow::datatypes::*;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{DateTime, Utc};

use super::container::{StorageContainer, ZERO_INSTANT};
use super::planner::ColumnPlan;

const SECONDS_PER_DAY: i64 = 86_400;

//==================================================================================
// 1. Value Conversions
//==================================================================================

/// Converts an epoch offset in `unit` into an instant, or `None` if out of range.
pub fn instant_from_epoch(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => DateTime::from_timestamp(value, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(value),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(value)),
    }
}

/// Midnight UTC of the day `days` after the epoch.
pub fn instant_from_days(days: i32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(days) * SECONDS_PER_DAY, 0)
}

/// `raw / 10^scale`. Lossy by construction; meant for display only.
pub fn scale_decimal(raw: f64, scale: i8) -> f64 {
    raw / 10f64.powi(i32::from(scale))
}

/// Converts through `i128` when the value fits, otherwise through the
/// magnitude's halves so the unsigned low half never cancels a negative high half.
fn i256_to_f64(value: i256) -> f64 {
    if let Some(narrow) = value.to_i128() {
        return narrow as f64;
    }
    let magnitude = value.wrapping_abs();
    let (low, high) = magnitude.to_parts();
    let abs = (high as f64) * 2f64.powi(128) + (low as f64);
    // `i256::MIN` has no positive magnitude and is already signed.
    if value.is_negative() && !magnitude.is_negative() {
        -abs
    } else {
        abs
    }
}

//==================================================================================
// 2. Typed Append Helpers
//==================================================================================

// Each helper returns `false` when `array` is not the runtime type it expects,
// in which case nothing has been appended.

fn append_native<T: ArrowPrimitiveType>(array: &dyn Array, values: &mut Vec<T::Native>) -> bool {
    let Some(typed) = array.as_primitive_opt::<T>() else {
        return false;
    };
    values.extend(typed.iter().map(|cell| cell.unwrap_or_default()));
    true
}

fn append_converted<T, U, F>(array: &dyn Array, values: &mut Vec<U>, placeholder: U, convert: F) -> bool
where
    T: ArrowPrimitiveType,
    U: Clone,
    F: Fn(T::Native) -> Option<U>,
{
    let Some(typed) = array.as_primitive_opt::<T>() else {
        return false;
    };
    values.extend(
        typed
            .iter()
            .map(|cell| cell.and_then(&convert).unwrap_or_else(|| placeholder.clone())),
    );
    true
}

/// Converts with the unit recorded on the batch column's own type, which may
/// differ from the unit the column was planned with.
fn append_timestamps(array: &dyn Array, values: &mut Vec<DateTime<Utc>>) -> bool {
    let DataType::Timestamp(unit, _) = array.data_type() else {
        return false;
    };
    let unit = *unit;
    let convert = move |v: i64| instant_from_epoch(v, unit);
    match unit {
        TimeUnit::Second => {
            append_converted::<TimestampSecondType, _, _>(array, values, ZERO_INSTANT, convert)
        }
        TimeUnit::Millisecond => {
            append_converted::<TimestampMillisecondType, _, _>(array, values, ZERO_INSTANT, convert)
        }
        TimeUnit::Microsecond => {
            append_converted::<TimestampMicrosecondType, _, _>(array, values, ZERO_INSTANT, convert)
        }
        TimeUnit::Nanosecond => {
            append_converted::<TimestampNanosecondType, _, _>(array, values, ZERO_INSTANT, convert)
        }
    }
}

fn append_strings<O: arrow::array::OffsetSizeTrait>(array: &dyn Array, values: &mut Vec<String>) -> bool {
    let Some(typed) = array.as_string_opt::<O>() else {
        return false;
    };
    values.extend(typed.iter().map(|cell| cell.unwrap_or_default().to_string()));
    true
}

fn append_booleans(array: &dyn Array, values: &mut Vec<bool>) -> bool {
    let Some(typed) = array.as_boolean_opt() else {
        return false;
    };
    values.extend(typed.iter().map(|cell| cell.unwrap_or_default()));
    true
}

/// Generic stringification. Accepts any array and never panics.
fn append_display(array: &dyn Array, values: &mut Vec<String>) {
    let options = FormatOptions::default();
    match ArrayFormatter::try_new(array, &options) {
        Ok(formatter) => values.extend((0..array.len()).map(|row| {
            if array.is_null(row) {
                String::new()
            } else {
                formatter.value(row).try_to_string().unwrap_or_default()
            }
        })),
        Err(e) => {
            log::warn!(
                "no display formatter for {}, writing placeholders: {}",
                array.data_type(),
                e
            );
            values.resize(values.len() + array.len(), String::new());
        }
    }
}

//==================================================================================
// 3. Column & Batch Dispatch
//==================================================================================

/// Appends one column slice into its container. Returns `false` on a runtime type mismatch.
fn append_array(container: &mut StorageContainer, array: &dyn Array) -> bool {
    match container {
        StorageContainer::Int8(v) => append_native::<Int8Type>(array, v),
        StorageContainer::Int16(v) => append_native::<Int16Type>(array, v),
        StorageContainer::Int32(v) => append_native::<Int32Type>(array, v),
        StorageContainer::Int64(v) => append_native::<Int64Type>(array, v),
        StorageContainer::UInt8(v) => append_native::<UInt8Type>(array, v),
        StorageContainer::UInt16(v) => append_native::<UInt16Type>(array, v),
        StorageContainer::UInt32(v) => append_native::<UInt32Type>(array, v),
        StorageContainer::UInt64(v) => append_native::<UInt64Type>(array, v),
        StorageContainer::Float32(v) => append_native::<Float32Type>(array, v),
        StorageContainer::Float64(v) => append_native::<Float64Type>(array, v),
        StorageContainer::Utf8(v) => append_strings::<i32>(array, v),
        StorageContainer::LargeUtf8(v) => append_strings::<i64>(array, v),
        StorageContainer::Boolean(v) => append_booleans(array, v),
        StorageContainer::Timestamp { values, .. } => append_timestamps(array, values),
        StorageContainer::Date32(v) => {
            append_converted::<Date32Type, _, _>(array, v, ZERO_INSTANT, instant_from_days)
        }
        StorageContainer::Date64(v) => append_converted::<Date64Type, _, _>(
            array,
            v,
            ZERO_INSTANT,
            DateTime::from_timestamp_millis,
        ),
        StorageContainer::Decimal128 { scale, values } => {
            let scale = *scale;
            append_converted::<Decimal128Type, _, _>(array, values, 0.0, move |raw| {
                Some(scale_decimal(raw as f64, scale))
            })
        }
        StorageContainer::Decimal256 { scale, values } => {
            let scale = *scale;
            append_converted::<Decimal256Type, _, _>(array, values, 0.0, move |raw| {
                Some(scale_decimal(i256_to_f64(raw), scale))
            })
        }
        StorageContainer::Fallback(v) => {
            append_display(array, v);
            true
        }
    }
}

/// Appends every row of `batch` into `columns`. Afterwards each container has
/// grown by exactly `batch.num_rows()`.
pub fn append_batch(columns: &mut [ColumnPlan], batch: &RecordBatch) {
    let num_rows = batch.num_rows();
    if batch.num_columns() != columns.len() {
        log::error!(
            "batch has {} columns but {} were planned; missing columns are padded",
            batch.num_columns(),
            columns.len()
        );
    }

    for (idx, column) in columns.iter_mut().enumerate() {
        let appended = match batch.columns().get(idx) {
            Some(array) => append_array(&mut column.container, array.as_ref()),
            None => false,
        };
        if !appended {
            log::error!(
                "column {} ('{}') planned as {} did not match the batch; writing {} placeholders",
                idx,
                column.spec.name,
                column.spec.column_type,
                num_rows
            );
            column.container.push_placeholders(num_rows);
        }
    }
}
