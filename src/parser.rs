//! CSV parser for city trip logs.

use std::io::Read;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BikeshareError, Result};
use crate::record::{ColumnPresence, OptionalColumn, RecordStore, TripRecord};

/// Headers every trip log must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "End Time",
    "Start Station",
    "End Station",
    "Trip Duration",
];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A row as it appears in the file, before typing.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// Reads a whole trip log into a [`RecordStore`].
///
/// # Errors
///
/// Returns [`BikeshareError::DataFormat`] if a required column is missing or
/// any row fails to parse. No row is ever skipped.
pub fn parse_trips<R: Read>(reader: R) -> Result<RecordStore> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(BikeshareError::DataFormat {
                line: 1,
                reason: format!("missing required column '{required}'"),
            });
        }
    }

    let mut columns = ColumnPresence::default();
    for column in OptionalColumn::ALL {
        columns.set(column, headers.iter().any(|h| h == column.header()));
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| BikeshareError::DataFormat {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        // first physical line of the row; quoted fields may span several
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawTrip = row
            .deserialize(Some(&headers))
            .map_err(|e| BikeshareError::DataFormat {
                line,
                reason: e.to_string(),
            })?;
        records.push(to_record(raw, line)?);
    }

    debug!(rows = records.len(), ?columns, "Trip log parsed");
    Ok(RecordStore::new(records, columns))
}

fn to_record(raw: RawTrip, line: u64) -> Result<TripRecord> {
    let bad = |reason: String| BikeshareError::DataFormat { line, reason };

    let start_time = parse_timestamp(&raw.start_time)
        .ok_or_else(|| bad(format!("unparseable Start Time '{}'", raw.start_time)))?;
    let end_time = parse_timestamp(&raw.end_time)
        .ok_or_else(|| bad(format!("unparseable End Time '{}'", raw.end_time)))?;
    let trip_duration = parse_duration(&raw.trip_duration)
        .ok_or_else(|| bad(format!("invalid Trip Duration '{}'", raw.trip_duration)))?;
    let birth_year = match non_empty(raw.birth_year) {
        Some(text) => Some(
            parse_year(&text).ok_or_else(|| bad(format!("invalid Birth Year '{text}'")))?,
        ),
        None => None,
    };

    Ok(TripRecord {
        start_time,
        end_time,
        start_station: raw.start_station,
        end_station: raw.end_station,
        trip_duration,
        user_type: non_empty(raw.user_type),
        gender: non_empty(raw.gender),
        birth_year,
    })
}

/// Parses `YYYY-MM-DD HH:MM:SS` or the ISO `T` form, fractional seconds allowed.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Seconds, possibly written as a decimal; rounded to the nearest second.
fn parse_duration(text: &str) -> Option<u64> {
    let secs: f64 = text.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let secs = secs.round();
    // u64::MAX as f64 rounds up to 2^64, which no longer fits
    if secs >= u64::MAX as f64 {
        return None;
    }
    Some(secs as u64)
}

/// Integral year, `1992` or `1992.0`.
fn parse_year(text: &str) -> Option<i32> {
    let year: f64 = text.trim().parse().ok()?;
    if !year.is_finite() || year.fract() != 0.0 {
        return None;
    }
    i32::try_from(year as i64).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
