//! Time-series reshaping: moves the frame's time column to the front, which is
//! where time-series consumers expect to find it.

use super::Frame;
use crate::types::StorageKind;

/// Column names recognised as the time axis, compared case-insensitively.
const TIME_COLUMN_NAMES: [&str; 4] = ["time", "timestamp", "ts", "datetime"];

fn is_time_name(name: &str) -> bool {
    TIME_COLUMN_NAMES
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// Finds the first field that is named like a time column or holds instants.
fn find_time_field(frame: &Frame) -> Option<usize> {
    frame
        .fields
        .iter()
        .position(|field| is_time_name(&field.name) || field.kind() == StorageKind::Time)
}

/// Moves the detected time field to position 0, keeping the relative order of
/// every other field. Frames without a time field are returned unchanged.
pub fn reshape_for_time_series(mut frame: Frame) -> Frame {
    match find_time_field(&frame) {
        Some(idx) if idx > 0 => {
            let time_field = frame.fields.remove(idx);
            frame.fields.insert(0, time_field);
            log::debug!(
                "frame '{}': moved time field '{}' from position {} to 0",
                frame.name,
                frame.fields[0].name,
                idx
            );
            frame
        }
        _ => frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Field, FieldValues};
    use chrono::{DateTime, Utc};

    fn text(name: &str) -> Field {
        Field::new(name, FieldValues::Text(vec!["a".into()]))
    }

    fn float(name: &str) -> Field {
        Field::new(name, FieldValues::Float64(vec![1.0]))
    }

    fn instants(name: &str) -> Field {
        Field::new(name, FieldValues::Time(vec![DateTime::<Utc>::UNIX_EPOCH]))
    }

    #[test]
    fn test_named_time_column_moves_to_front() {
        let frame = Frame::with_fields("A", vec![float("value"), text("host"), text("TimeStamp")]);
        let reshaped = reshape_for_time_series(frame);
        assert_eq!(reshaped.field_names(), vec!["TimeStamp", "value", "host"]);
    }

    #[test]
    fn test_typed_time_column_moves_to_front() {
        let frame = Frame::with_fields("A", vec![float("value"), text("host"), instants("created")]);
        let reshaped = reshape_for_time_series(frame);
        assert_eq!(reshaped.field_names(), vec!["created", "value", "host"]);
    }

    #[test]
    fn test_first_match_wins() {
        let frame = Frame::with_fields("A", vec![float("v"), instants("created"), text("ts")]);
        let reshaped = reshape_for_time_series(frame);
        assert_eq!(reshaped.field_names(), vec!["created", "v", "ts"]);
    }

    #[test]
    fn test_frame_without_time_column_is_unchanged() {
        let frame = Frame::with_fields("A", vec![float("value"), text("host")]);
        let reshaped = reshape_for_time_series(frame.clone());
        assert_eq!(reshaped, frame);
    }

    #[test]
    fn test_reshape_is_idempotent() {
        let frame = Frame::with_fields("A", vec![float("a"), text("b"), instants("time"), float("c")]);
        let once = reshape_for_time_series(frame);
        let twice = reshape_for_time_series(once.clone());
        assert_eq!(once, twice);
        assert_eq!(twice.field_names(), vec!["time", "a", "b", "c"]);
    }

    #[test]
    fn test_empty_frame_is_unchanged() {
        let frame = Frame::new("A");
        assert_eq!(reshape_for_time_series(frame.clone()), frame);
    }
}
