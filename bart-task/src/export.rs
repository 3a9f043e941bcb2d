//! CSV layout consumed by downstream analysis scripts.
//!
//! One row per record, header first, columns in a fixed order. The reward
//! triple is a single `base,step,max` field (quoted by the writer) and `gain`
//! is left empty for anything other than a pump.
use std::io::Write;

use serde::Serialize;

use crate::event::EventRecord;

/// Column order of the session file.
pub const CSV_COLUMNS: [&str; 12] = [
    "participant",
    "session",
    "balloon",
    "balloon_type",
    "event_time",
    "event",
    "pump_number",
    "threshold",
    "gain",
    "reward_params",
    "temp_points",
    "total_points",
];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    participant: &'a str,
    session: &'a str,
    balloon: u32,
    balloon_type: &'static str,
    event_time: f64,
    event: &'static str,
    pump_number: u32,
    threshold: u32,
    gain: Option<u32>,
    reward_params: String,
    temp_points: u32,
    total_points: u32,
}

impl<'a> From<&'a EventRecord> for CsvRow<'a> {
    fn from(record: &'a EventRecord) -> Self {
        Self {
            participant: &record.participant,
            session: &record.session,
            balloon: record.balloon_index,
            balloon_type: record.balloon_type.label(),
            event_time: record.event_time_secs(),
            event: record.kind.label(),
            pump_number: record.pump_number,
            threshold: record.threshold,
            gain: record.gain,
            reward_params: record.reward.triple(),
            temp_points: record.points_this_trial,
            total_points: record.total_points,
        }
    }
}

/// Write `records` as CSV with a header row.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(writer: W, records: &[EventRecord]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    if records.is_empty() {
        out.write_record(CSV_COLUMNS)?;
    }
    for record in records {
        out.serialize(CsvRow::from(record))?;
    }
    out.flush()?;
    Ok(())
}
