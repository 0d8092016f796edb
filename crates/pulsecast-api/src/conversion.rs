//! Conversion of raw request records into engine observations.
//!
//! Existing callers send the measurement either as `value` or as `actual`.
//! This is the only place that ambiguity is resolved; the engine only ever sees
//! [`Observation`].

use crate::types::RawRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pulsecast_core::{ForecastError, Observation, Result};
use serde_json::Value;
use tracing::warn;

/// Most records accepted in one request.
pub const MAX_RECORDS: usize = 100_000;

/// Parse an ISO-8601 calendar date, also accepting full timestamps.
///
/// Timestamps keep their calendar date as written (no timezone shift).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    Err(ForecastError::InvalidDateFormat(format!(
        "'{}' is not an ISO-8601 date",
        s
    )))
}

/// Interpret one value field. `None` means the field is absent or null.
fn numeric_field(field: &str, value: Option<&Value>, index: usize) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).map(Some).ok_or_else(|| {
            ForecastError::InvalidInput(format!(
                "record {}: field '{}' is not a finite number",
                index, field
            ))
        }),
        Some(other) => Err(ForecastError::InvalidInput(format!(
            "record {}: field '{}' must be a number, got {}",
            index, field, other
        ))),
    }
}

/// Measurement of a record: `value` if present, else `actual`, else 0.
///
/// The zero default mirrors what existing callers rely on; it is logged because
/// a record without any measurement is usually a caller bug.
pub fn record_value(record: &RawRecord, index: usize) -> Result<f64> {
    if let Some(v) = numeric_field("value", record.value.as_ref(), index)? {
        return Ok(v);
    }
    if let Some(v) = numeric_field("actual", record.actual.as_ref(), index)? {
        return Ok(v);
    }
    warn!(
        record = index,
        "record has neither 'value' nor 'actual', defaulting to 0"
    );
    Ok(0.0)
}

/// Convert one record.
pub fn to_observation(record: &RawRecord, index: usize) -> Result<Observation> {
    let date = match record.date.as_deref() {
        Some(s) => parse_date(s).map_err(|e| match e {
            ForecastError::InvalidDateFormat(msg) => {
                ForecastError::InvalidDateFormat(format!("record {}: {}", index, msg))
            }
            other => other,
        })?,
        None => {
            return Err(ForecastError::InvalidInput(format!(
                "record {}: missing 'date'",
                index
            )))
        }
    };
    Ok(Observation::new(date, record_value(record, index)?))
}

/// Convert every record, failing on the first malformed one.
pub fn to_observations(records: &[RawRecord]) -> Result<Vec<Observation>> {
    if records.len() > MAX_RECORDS {
        return Err(ForecastError::InvalidInput(format!(
            "{} records exceed the limit of {}",
            records.len(),
            MAX_RECORDS
        )));
    }
    records
        .iter()
        .enumerate()
        .map(|(i, r)| to_observation(r, i))
        .collect()
}
