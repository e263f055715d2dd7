// ============================================================================
// Decode boundary
// ============================================================================
//
// Raw payloads enter the system here and nowhere else. JSON arrays follow the
// camelCase wire format of the dashboard API; CSV follows the original UrBAN
// inspections_2021.csv schema. Everything past this module is well-typed:
// unparseable dates and non-finite numbers are rejected as MalformedRecord
// instead of leaking into the aggregation logic.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::models::{EnvironmentalRecord, InspectionRecord, SensorRecord};
use crate::services::error::{EngineError, EngineResult};

/// Parse an array of environmental records from JSON.
pub fn parse_environmental_json_str(json: &str) -> EngineResult<Vec<EnvironmentalRecord>> {
    let records = decode_environmental(json).map_err(into_malformed)?;
    log::debug!("decoded {} environmental records", records.len());
    Ok(records)
}

/// Parse an array of inspection records from JSON.
pub fn parse_inspections_json_str(json: &str) -> EngineResult<Vec<InspectionRecord>> {
    let records = decode_inspections(json).map_err(into_malformed)?;
    log::debug!("decoded {} inspection records", records.len());
    Ok(records)
}

/// Parse an array of per-hive sensor records from JSON.
pub fn parse_sensors_json_str(json: &str) -> EngineResult<Vec<SensorRecord>> {
    let records = decode_sensors(json).map_err(into_malformed)?;
    log::debug!("decoded {} sensor records", records.len());
    Ok(records)
}

fn into_malformed(err: anyhow::Error) -> EngineError {
    EngineError::malformed_record(format!("{:#}", err))
}

fn decode_environmental(json: &str) -> Result<Vec<EnvironmentalRecord>> {
    let records: Vec<EnvironmentalRecord> =
        serde_json::from_str(json).context("Failed to deserialize environmental records JSON")?;
    for (i, r) in records.iter().enumerate() {
        ensure_finite(i, "temperature", r.temperature)?;
        ensure_finite(i, "humidity", r.humidity)?;
        ensure_finite(i, "precipitation", r.precipitation)?;
    }
    Ok(records)
}

fn decode_inspections(json: &str) -> Result<Vec<InspectionRecord>> {
    let records: Vec<InspectionRecord> =
        serde_json::from_str(json).context("Failed to deserialize inspection records JSON")?;
    for (i, r) in records.iter().enumerate() {
        ensure_finite(i, "colonySize", r.colony_size)?;
        ensure_finite(i, "fob1st", r.fob_1st)?;
        ensure_finite(i, "fob2nd", r.fob_2nd)?;
        ensure_finite(i, "fob3rd", r.fob_3rd)?;
        ensure_finite(i, "foBrood", r.fo_brood)?;
        ensure_finite(i, "framesOfHoney", r.frames_of_honey)?;
    }
    Ok(records)
}

fn decode_sensors(json: &str) -> Result<Vec<SensorRecord>> {
    let records: Vec<SensorRecord> =
        serde_json::from_str(json).context("Failed to deserialize sensor records JSON")?;
    for (i, r) in records.iter().enumerate() {
        ensure_finite(i, "temperature", r.temperature)?;
        ensure_finite(i, "humidity", r.humidity)?;
    }
    Ok(records)
}

fn ensure_finite(index: usize, field: &str, value: f64) -> Result<()> {
    anyhow::ensure!(
        value.is_finite(),
        "record {}: field '{}' is not a finite number ({})",
        index,
        field,
        value
    );
    Ok(())
}

/// Parse inspection rows from the original `inspections_2021.csv` schema.
///
/// Headers are matched case-insensitively. Numeric cells may be empty or in
/// `"6.0"` form; empty or unparsable cells coerce to 0 as the original
/// loader did. An unparseable date is a hard `MalformedRecord` failure.
pub fn parse_inspections_csv_str(raw: &str) -> EngineResult<Vec<InspectionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EngineError::malformed_record(format!("unreadable CSV header: {}", e)))?
        .clone();

    let date_col = header_index(&headers, "Date")?;
    let tag_col = header_index(&headers, "Tag number")?;
    let colony_col = header_index(&headers, "Colony Size")?;
    let fob1_col = header_index(&headers, "Fob 1st")?;
    let fob2_col = header_index(&headers, "Fob 2nd")?;
    let fob3_col = header_index(&headers, "Fob 3rd")?;
    let brood_col = header_index(&headers, "FoBrood")?;
    let queen_col = header_index(&headers, "Queen status")?;
    let honey_col = header_index(&headers, "Frames of Honey")?;
    let open_col = headers.iter().position(|h| h.eq_ignore_ascii_case("Open"));
    let close_col = headers.iter().position(|h| h.eq_ignore_ascii_case("Close"));
    let notes_col = headers.iter().position(|h| h.eq_ignore_ascii_case("Notes"));

    let mut result = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            EngineError::malformed_record(format!("unreadable CSV row {}: {}", row, e))
        })?;

        let raw_date = record.get(date_col).unwrap_or_default();
        let date = chrono::NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            EngineError::malformed_record(format!("row {}: unparseable date '{}'", row, raw_date))
        })?;

        result.push(InspectionRecord {
            date,
            tag_number: record.get(tag_col).unwrap_or_default().to_string(),
            colony_size: parse_count(record.get(colony_col)),
            fob_1st: parse_count(record.get(fob1_col)),
            fob_2nd: parse_count(record.get(fob2_col)),
            fob_3rd: parse_count(record.get(fob3_col)),
            fo_brood: parse_count(record.get(brood_col)),
            queen_status: record.get(queen_col).unwrap_or_default().to_string(),
            frames_of_honey: parse_count(record.get(honey_col)),
            open: optional_cell(&record, open_col),
            close: optional_cell(&record, close_col),
            notes: optional_cell(&record, notes_col),
        });
    }

    log::debug!("decoded {} inspection records from CSV", result.len());
    Ok(result)
}

fn header_index(headers: &csv::StringRecord, name: &str) -> EngineResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| EngineError::malformed_record(format!("missing CSV column '{}'", name)))
}

/// Coerce an integer-like cell that may be empty or in "6.0" form.
/// Returns 0.0 when empty or unparsable, matching the original loader.
fn parse_count(cell: Option<&str>) -> f64 {
    match cell {
        Some(raw) if !raw.is_empty() => raw.parse::<f64>().unwrap_or(0.0).trunc(),
        _ => 0.0,
    }
}

fn optional_cell(record: &csv::StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|i| record.get(i))
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.to_string())
}

/// SHA-256 checksum of a raw dataset payload, hex-encoded.
///
/// Used by boundaries for deduplication and provenance; the engine itself
/// never keys anything on it.
pub fn dataset_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::EngineError;

    #[test]
    fn test_parse_environmental_json() {
        let json = r#"[
            {"dateTime": "2021-06-01T00:00:00", "temperature": 18.2, "humidity": 55.0, "precipitation": 0.0},
            {"dateTime": "2021-06-01T01:00:00", "temperature": 17.9, "humidity": 57.5, "precipitation": 1.25}
        ]"#;
        let records = parse_environmental_json_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].precipitation, 1.25);
    }

    #[test]
    fn test_parse_environmental_rejects_bad_timestamp() {
        let json = r#"[{"dateTime": "yesterday", "temperature": 18.2, "humidity": 55.0, "precipitation": 0.0}]"#;
        let err = parse_environmental_json_str(json).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_inspections_json() {
        let json = r#"[{
            "date": "2021-06-01",
            "tagNumber": "H1",
            "colonySize": 20000,
            "fob1st": 2, "fob2nd": 1, "fob3rd": 1,
            "foBrood": 3,
            "queenStatus": "QR",
            "framesOfHoney": 4
        }]"#;
        let records = parse_inspections_json_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].adult_frames(), 4.0);
    }

    #[test]
    fn test_parse_sensors_json() {
        let json = r#"[
            {"dateTime": "2021-06-01T10:00:00", "tagNumber": "H1", "temperature": 34.5, "humidity": 62.0},
            {"dateTime": "2021-06-01T11:00:00", "tagNumber": "H2", "temperature": 35.1, "humidity": 60.5}
        ]"#;
        let records = parse_sensors_json_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag_number, "H1");
        assert_eq!(records[1].temperature, 35.1);
    }

    #[test]
    fn test_parse_sensors_rejects_missing_field() {
        let json =
            r#"[{"dateTime": "2021-06-01T10:00:00", "tagNumber": "H1", "temperature": 34.5}]"#;
        let err = parse_sensors_json_str(json).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_inspections_csv_with_decimal_and_empty_cells() {
        let csv = "\
Date,Tag number,Colony Size,Fob 1st,Fob 2nd,Fob 3rd,FoBrood,Queen status,Frames of Honey,Open,Close,Notes
2021-06-01,H1,6.0,2.0,1.0,1.0,3.0,QR,4.0,09:00,09:30,calm
2021-06-02,H2,,1,,0,2,Missing,6,,,
";
        let records = parse_inspections_csv_str(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].colony_size, 6.0);
        assert_eq!(records[0].notes.as_deref(), Some("calm"));
        assert_eq!(records[1].colony_size, 0.0);
        assert_eq!(records[1].fob_2nd, 0.0);
        assert_eq!(records[1].frames_of_honey, 6.0);
        assert_eq!(records[1].notes, None);
    }

    #[test]
    fn test_parse_inspections_csv_header_case_insensitive() {
        let csv = "\
date,TAG NUMBER,colony size,fob 1st,fob 2nd,fob 3rd,fobrood,queen status,frames of honey
2021-06-01,H1,6,2,1,1,3,QR,4
";
        let records = parse_inspections_csv_str(csv).unwrap();
        assert_eq!(records[0].tag_number, "H1");
    }

    #[test]
    fn test_parse_inspections_csv_missing_column_fails() {
        let csv = "Date,Tag number\n2021-06-01,H1\n";
        let err = parse_inspections_csv_str(csv).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_inspections_csv_bad_date_fails() {
        let csv = "\
Date,Tag number,Colony Size,Fob 1st,Fob 2nd,Fob 3rd,FoBrood,Queen status,Frames of Honey
06/01/2021,H1,6,2,1,1,3,QR,4
";
        let err = parse_inspections_csv_str(csv).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { .. }));
    }

    #[test]
    fn test_checksum_consistency() {
        let content = r#"[{"tagNumber": "H1"}]"#;
        assert_eq!(dataset_checksum(content), dataset_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(dataset_checksum("[1]"), dataset_checksum("[2]"));
    }
}
