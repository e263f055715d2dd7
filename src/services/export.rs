//! CSV export of window- and hive-filtered records.
//!
//! Column sets match the original dashboard's export endpoints. A `None`
//! selection means "all hives"; an explicitly empty selection yields a
//! header-only document, consistent with the hive selector's degenerate
//! case.

use crate::models::{
    EnvironmentalRecord, HiveSelection, InspectionRecord, SensorRecord, TimeWindow,
};
use crate::services::error::{EngineError, EngineResult};
use crate::services::filters;

const INSPECTION_HEADERS: [&str; 12] = [
    "Date",
    "Tag",
    "ColonySize",
    "Fob1st",
    "Fob2nd",
    "Fob3rd",
    "FoBrood",
    "FramesHoney",
    "QueenStatus",
    "Open",
    "Close",
    "Notes",
];

const SENSOR_HEADERS: [&str; 4] = ["Date", "Tag", "Temperature", "Humidity"];

const WEATHER_HEADERS: [&str; 4] = ["DateTime", "Temperature", "Humidity", "Precipitation"];

/// Export inspections in the window (and selection, when given) as CSV.
pub fn export_inspections_csv(
    records: &[InspectionRecord],
    window: &TimeWindow,
    selection: Option<&HiveSelection>,
) -> EngineResult<String> {
    let mut filtered = filters::filter_inspections(records, window);
    if let Some(selection) = selection {
        filtered = filters::select_hives(&filtered, selection);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(&mut writer, &INSPECTION_HEADERS)?;
    for r in &filtered {
        write_row(
            &mut writer,
            &[
                r.date.to_string(),
                r.tag_number.clone(),
                format_count(r.colony_size),
                format_count(r.fob_1st),
                format_count(r.fob_2nd),
                format_count(r.fob_3rd),
                format_count(r.fo_brood),
                format_count(r.frames_of_honey),
                r.queen_status.clone(),
                r.open.clone().unwrap_or_default(),
                r.close.clone().unwrap_or_default(),
                r.notes.clone().unwrap_or_default(),
            ],
        )?;
    }
    finish(writer)
}

/// Export per-hive sensor readings in the window as CSV.
pub fn export_sensor_csv(
    records: &[SensorRecord],
    window: &TimeWindow,
    selection: Option<&HiveSelection>,
) -> EngineResult<String> {
    let mut filtered = filters::filter_sensors(records, window);
    if let Some(selection) = selection {
        filtered = filters::select_sensor_hives(&filtered, selection);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(&mut writer, &SENSOR_HEADERS)?;
    for r in &filtered {
        write_row(
            &mut writer,
            &[
                r.date_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
                r.tag_number.clone(),
                r.temperature.to_string(),
                r.humidity.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// Export weather records in the window as CSV.
pub fn export_weather_csv(
    records: &[EnvironmentalRecord],
    window: &TimeWindow,
) -> EngineResult<String> {
    let filtered = filters::filter_environmental(records, window);

    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(&mut writer, &WEATHER_HEADERS)?;
    for r in &filtered {
        write_row(
            &mut writer,
            &[
                r.date_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
                r.temperature.to_string(),
                r.humidity.to_string(),
                r.precipitation.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// Frame counts are integral in the source data; keep "6" rather than "6.0"
/// when the value carries no fractional part.
fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn write_row<S: AsRef<[u8]>>(
    writer: &mut csv::Writer<Vec<u8>>,
    row: &[S],
) -> EngineResult<()> {
    writer
        .write_record(row.iter().map(|cell| cell.as_ref()))
        .map_err(|e| EngineError::malformed_record(format!("failed to encode CSV row: {}", e)))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> EngineResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EngineError::malformed_record(format!("failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| EngineError::malformed_record(format!("CSV output is not UTF-8: {}", e)))
}
