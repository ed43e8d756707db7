use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryArray, BooleanArray, Date32Array, Date64Array, Decimal128Array,
    Decimal256Array, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    LargeStringArray, StringArray, TimestampMillisecondArray, TimestampSecondArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow::record_batch::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use arrow::datatypes::{i256, DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::error::ArrowError;
use chrono::{DateTime, Utc};

use crate::cancel::CancellationToken;
use crate::error::TranscodeError;
use crate::frame::FieldValues;
use crate::transcode::{transcode, FrameAssembler, ZERO_INSTANT};

//==============================================================================
// Test Helpers
//==============================================================================

fn reader_from(
    schema: SchemaRef,
    batches: Vec<Result<RecordBatch, ArrowError>>,
) -> RecordBatchIterator<std::vec::IntoIter<Result<RecordBatch, ArrowError>>> {
    RecordBatchIterator::new(batches.into_iter(), schema)
}

fn two_column_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, true),
        Field::new("label", DataType::Utf8, true),
    ]))
}

fn two_column_batch(schema: &SchemaRef, ids: Vec<Option<i64>>, labels: Vec<Option<&str>>) -> RecordBatch {
    RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(labels)),
        ],
    )
    .unwrap()
}

fn instant(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

/// Yields its batches, cancelling `token` as soon as the first one is handed out.
struct CancellingReader {
    schema: SchemaRef,
    batches: std::vec::IntoIter<RecordBatch>,
    token: CancellationToken,
    pulled: usize,
}

impl Iterator for CancellingReader {
    type Item = Result<RecordBatch, ArrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pulled += 1;
        let next = self.batches.next().map(Ok);
        self.token.cancel();
        next
    }
}

impl RecordBatchReader for CancellingReader {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}

//==============================================================================
// Stream-Level Behaviour
//==============================================================================

#[test]
fn test_rows_accumulate_across_batches_in_order() {
    let schema = two_column_schema();
    let batches = vec![
        Ok(two_column_batch(&schema, vec![Some(1), Some(2)], vec![Some("a"), Some("b")])),
        Ok(two_column_batch(&schema, vec![], vec![])),
        Ok(two_column_batch(&schema, vec![Some(3), None, Some(5)], vec![None, Some("d"), Some("e")])),
    ];
    let mut reader = reader_from(schema, batches);

    let frame = transcode(&mut reader).unwrap();

    assert_eq!(frame.name, "result");
    assert_eq!(frame.field_names(), vec!["id", "label"]);
    assert_eq!(frame.row_count(), 5);
    assert!(frame.fields.iter().all(|f| f.len() == 5));
    assert_eq!(frame.fields[0].values, FieldValues::Int64(vec![1, 2, 3, 0, 5]));
    assert_eq!(
        frame.fields[1].values,
        FieldValues::Text(vec!["a".into(), "b".into(), "".into(), "d".into(), "e".into()])
    );
}

#[test]
fn test_empty_stream_yields_named_frame_without_fields() {
    let mut reader = reader_from(two_column_schema(), vec![]);
    let frame = FrameAssembler::new("A").transcode(&mut reader).unwrap();
    assert_eq!(frame.name, "A");
    assert!(frame.fields.is_empty());
    assert_eq!(frame.row_count(), 0);
}

#[test]
fn test_single_empty_batch_yields_zero_length_fields() {
    let schema = two_column_schema();
    let batches = vec![Ok(two_column_batch(&schema, vec![], vec![]))];
    let mut reader = reader_from(schema, batches);
    let frame = transcode(&mut reader).unwrap();
    assert_eq!(frame.fields.len(), 2);
    assert_eq!(frame.row_count(), 0);
}

#[test]
fn test_stream_error_discards_partial_state() {
    let schema = two_column_schema();
    let batches = vec![
        Ok(two_column_batch(&schema, vec![Some(1)], vec![Some("a")])),
        Err(ArrowError::IpcError("connection reset".to_string())),
        Ok(two_column_batch(&schema, vec![Some(2)], vec![Some("b")])),
    ];
    let mut reader = reader_from(schema, batches);

    let result = transcode(&mut reader);

    match result {
        Err(err @ TranscodeError::StreamRead(_)) => {
            assert!(err.is_stream_error());
            assert!(err.to_string().contains("connection reset"));
        }
        other => panic!("expected a stream read error, got {:?}", other),
    }
}

#[test]
fn test_retry_after_error_starts_from_empty_plan() {
    let schema = two_column_schema();
    let assembler = FrameAssembler::new("A");

    let mut failing = reader_from(
        schema.clone(),
        vec![
            Ok(two_column_batch(&schema, vec![Some(1)], vec![Some("a")])),
            Err(ArrowError::IpcError("boom".to_string())),
        ],
    );
    assert!(assembler.transcode(&mut failing).is_err());

    let mut healthy = reader_from(
        schema.clone(),
        vec![Ok(two_column_batch(&schema, vec![Some(9)], vec![Some("z")]))],
    );
    let frame = assembler.transcode(&mut healthy).unwrap();
    assert_eq!(frame.fields[0].values, FieldValues::Int64(vec![9]));
}

#[test]
fn test_cancellation_stops_pulling_batches() {
    let schema = two_column_schema();
    let token = CancellationToken::new();
    let mut reader = CancellingReader {
        schema: schema.clone(),
        batches: vec![
            two_column_batch(&schema, vec![Some(1)], vec![Some("a")]),
            two_column_batch(&schema, vec![Some(2)], vec![Some("b")]),
            two_column_batch(&schema, vec![Some(3)], vec![Some("c")]),
        ]
        .into_iter(),
        token: token.clone(),
        pulled: 0,
    };

    let result = FrameAssembler::new("A")
        .with_cancellation(token)
        .transcode(&mut reader);

    assert!(matches!(result, Err(TranscodeError::Cancelled)));
    assert_eq!(reader.pulled, 1);
}

#[test]
fn test_already_cancelled_token_pulls_nothing() {
    let schema = two_column_schema();
    let token = CancellationToken::new();
    token.cancel();
    let mut reader = CancellingReader {
        schema: schema.clone(),
        batches: vec![two_column_batch(&schema, vec![Some(1)], vec![Some("a")])].into_iter(),
        token: token.clone(),
        pulled: 0,
    };
    let result = FrameAssembler::default()
        .with_cancellation(token)
        .transcode(&mut reader);
    assert!(matches!(result, Err(TranscodeError::Cancelled)));
    assert_eq!(reader.pulled, 0);
}

#[test]
fn test_mismatched_batch_is_padded_not_fatal() {
    let declared = Arc::new(Schema::new(vec![
        Field::new("n", DataType::Int32, true),
        Field::new("s", DataType::Utf8, true),
    ]));
    let actual = Arc::new(Schema::new(vec![Field::new("n", DataType::Utf8, true)]));
    let odd_batch = RecordBatch::try_new(
        actual,
        vec![Arc::new(StringArray::from(vec!["x", "y"])) as ArrayRef],
    )
    .unwrap();
    let good_batch = RecordBatch::try_new(
        declared.clone(),
        vec![
            Arc::new(Int32Array::from(vec![7])),
            Arc::new(StringArray::from(vec!["ok"])),
        ],
    )
    .unwrap();
    let mut reader = reader_from(declared, vec![Ok(odd_batch), Ok(good_batch)]);

    let frame = transcode(&mut reader).unwrap();

    assert_eq!(frame.fields[0].values, FieldValues::Int32(vec![0, 0, 7]));
    assert_eq!(
        frame.fields[1].values,
        FieldValues::Text(vec!["".into(), "".into(), "ok".into()])
    );
}

#[test]
fn test_batch_timestamp_unit_overrides_the_planned_unit() {
    let declared = Arc::new(Schema::new(vec![Field::new(
        "time",
        DataType::Timestamp(TimeUnit::Second, None),
        true,
    )]));
    let millis = Arc::new(Schema::new(vec![Field::new(
        "time",
        DataType::Timestamp(TimeUnit::Millisecond, None),
        true,
    )]));
    let planned_batch = RecordBatch::try_new(
        declared.clone(),
        vec![Arc::new(TimestampSecondArray::from(vec![1_700_000_000])) as ArrayRef],
    )
    .unwrap();
    let millis_batch = RecordBatch::try_new(
        millis,
        vec![Arc::new(TimestampMillisecondArray::from(vec![Some(1_700_000_060_000), None])) as ArrayRef],
    )
    .unwrap();
    let mut reader = reader_from(declared, vec![Ok(planned_batch), Ok(millis_batch)]);

    let frame = transcode(&mut reader).unwrap();

    assert_eq!(
        frame.fields[0].values,
        FieldValues::Time(vec![instant(1_700_000_000), instant(1_700_000_060), ZERO_INSTANT])
    );
}

//==============================================================================
// Per-Type Conversion
//==============================================================================

#[test]
fn test_every_supported_type_with_nulls() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("i8", DataType::Int8, true),
        Field::new("i16", DataType::Int16, true),
        Field::new("i32", DataType::Int32, true),
        Field::new("u8", DataType::UInt8, true),
        Field::new("u16", DataType::UInt16, true),
        Field::new("u32", DataType::UInt32, true),
        Field::new("u64", DataType::UInt64, true),
        Field::new("f32", DataType::Float32, true),
        Field::new("f64", DataType::Float64, true),
        Field::new("big_text", DataType::LargeUtf8, true),
        Field::new("flag", DataType::Boolean, true),
        Field::new("ts_s", DataType::Timestamp(TimeUnit::Second, None), true),
        Field::new("ts_ms", DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())), true),
        Field::new("day", DataType::Date32, true),
        Field::new("day_ms", DataType::Date64, true),
        Field::new("price", DataType::Decimal128(10, 2), true),
        Field::new("wide", DataType::Decimal256(40, 1), true),
        Field::new("blob", DataType::Binary, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int8Array::from(vec![Some(-8), None])),
        Arc::new(Int16Array::from(vec![Some(-16), None])),
        Arc::new(Int32Array::from(vec![Some(-32), None])),
        Arc::new(UInt8Array::from(vec![Some(8), None])),
        Arc::new(UInt16Array::from(vec![Some(16), None])),
        Arc::new(UInt32Array::from(vec![Some(32), None])),
        Arc::new(UInt64Array::from(vec![Some(u64::MAX), None])),
        Arc::new(Float32Array::from(vec![Some(1.5), None])),
        Arc::new(Float64Array::from(vec![Some(-2.25), None])),
        Arc::new(LargeStringArray::from(vec![Some("large"), None])),
        Arc::new(BooleanArray::from(vec![Some(true), None])),
        Arc::new(TimestampSecondArray::from(vec![Some(1_700_000_000), None])),
        Arc::new(
            TimestampMillisecondArray::from(vec![Some(1_700_000_000_000), None]).with_timezone("UTC"),
        ),
        Arc::new(Date32Array::from(vec![Some(19_723), None])),
        Arc::new(Date64Array::from(vec![Some(1_704_067_200_000), None])),
        Arc::new(
            Decimal128Array::from(vec![Some(12_345), None])
                .with_precision_and_scale(10, 2)
                .unwrap(),
        ),
        Arc::new(
            Decimal256Array::from(vec![Some(i256::from_i128(-250)), None])
                .with_precision_and_scale(40, 1)
                .unwrap(),
        ),
        Arc::new(BinaryArray::from_opt_vec(vec![Some(b"ab".as_ref()), None])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let mut reader = reader_from(schema, vec![Ok(batch)]);

    let frame = transcode(&mut reader).unwrap();
    let values = |name: &str| frame.field(name).unwrap().values.clone();

    assert_eq!(values("i8"), FieldValues::Int8(vec![-8, 0]));
    assert_eq!(values("i16"), FieldValues::Int16(vec![-16, 0]));
    assert_eq!(values("i32"), FieldValues::Int32(vec![-32, 0]));
    assert_eq!(values("u8"), FieldValues::UInt8(vec![8, 0]));
    assert_eq!(values("u16"), FieldValues::UInt16(vec![16, 0]));
    assert_eq!(values("u32"), FieldValues::UInt32(vec![32, 0]));
    assert_eq!(values("u64"), FieldValues::UInt64(vec![u64::MAX, 0]));
    assert_eq!(values("f32"), FieldValues::Float32(vec![1.5, 0.0]));
    assert_eq!(values("f64"), FieldValues::Float64(vec![-2.25, 0.0]));
    assert_eq!(values("big_text"), FieldValues::Text(vec!["large".into(), "".into()]));
    assert_eq!(values("flag"), FieldValues::Boolean(vec![true, false]));
    assert_eq!(values("ts_s"), FieldValues::Time(vec![instant(1_700_000_000), ZERO_INSTANT]));
    assert_eq!(values("ts_ms"), values("ts_s"));
    assert_eq!(values("day"), FieldValues::Time(vec![instant(1_704_067_200), ZERO_INSTANT]));
    assert_eq!(values("day_ms"), values("day"));
    assert_eq!(values("price"), FieldValues::Float64(vec![123.45, 0.0]));
    assert_eq!(values("wide"), FieldValues::Float64(vec![-25.0, 0.0]));
    assert_eq!(values("blob"), FieldValues::Text(vec!["6162".into(), "".into()]));
}

#[test]
fn test_sliced_batches_respect_offsets() {
    let schema = two_column_schema();
    let full = two_column_batch(
        &schema,
        vec![Some(1), None, Some(3), Some(4)],
        vec![Some("a"), Some("b"), None, Some("d")],
    );
    let mut reader = reader_from(schema, vec![Ok(full.slice(1, 2))]);

    let frame = transcode(&mut reader).unwrap();

    assert_eq!(frame.fields[0].values, FieldValues::Int64(vec![0, 3]));
    assert_eq!(frame.fields[1].values, FieldValues::Text(vec!["b".into(), "".into()]));
}
