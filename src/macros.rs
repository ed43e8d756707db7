//! Time-range macro substitution for raw SQL.
//!
//! Placeholders are matched as literal substrings, wherever they appear. No SQL
//! parsing happens here, so a placeholder inside a string literal or a comment
//! is replaced too.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const TIME_FROM_MACRO: &str = "$__timeFrom";
pub const TIME_TO_MACRO: &str = "$__timeTo";
pub const TIME_FILTER_MACRO: &str = "$__timeFilter";

/// The dashboard time range a query is evaluated over.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

fn rfc3339(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Replaces `$__timeFrom`, `$__timeTo` and `$__timeFilter` with the bounds of `range`.
pub fn substitute_macros(sql: &str, range: &TimeRange) -> String {
    let from = rfc3339(&range.from);
    let to = rfc3339(&range.to);

    sql.replace(TIME_FROM_MACRO, &format!("'{}'", from))
        .replace(TIME_TO_MACRO, &format!("'{}'", to))
        .replace(
            TIME_FILTER_MACRO,
            &format!("time >= '{}' AND time <= '{}'", from, to),
        )
}
