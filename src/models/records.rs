//! Record model: the typed data contract shared across the engine.
//!
//! These types carry no behavior beyond small derived accessors. No
//! validation happens here; malformed input is rejected at the decode
//! boundary ([`crate::models::ingest`]) before it ever reaches the
//! aggregation logic, so the engine can assume all numeric fields are
//! finite and all date/time fields are valid instants.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The only semantically special queen-status value: queen-right, i.e. the
/// hive has a viable laying queen. All other categories form an open set
/// inferred from the data.
pub const QUEEN_RIGHT: &str = "QR";

/// One environmental reading at a specific timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalRecord {
    pub date_time: NaiveDateTime,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent (0–100 by convention).
    pub humidity: f64,
    /// Precipitation in millimeters (non-negative by convention, unenforced).
    pub precipitation: f64,
}

/// One row of a periodic hive inspection.
///
/// Frame counts arrive as reals because the source CSV stores them in
/// `"6.0"` form; the engine sums and averages them, so nothing is gained by
/// forcing them back to integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    /// Inspection date, no time-of-day. Compared at local midnight.
    pub date: NaiveDate,
    /// Hive identifier.
    pub tag_number: String,
    /// Number of frames occupied by bees (proxy for population).
    pub colony_size: f64,
    /// Adult-bee frame counts for three life-stage buckets.
    pub fob_1st: f64,
    pub fob_2nd: f64,
    pub fob_3rd: f64,
    /// Brood frame count.
    pub fo_brood: f64,
    pub queen_status: String,
    pub frames_of_honey: f64,
    /// Inspection start/end times and free-text remarks from the source CSV.
    /// Carried through for export, ignored by the engine.
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InspectionRecord {
    /// Adult frames across all three life-stage buckets.
    pub fn adult_frames(&self) -> f64 {
        self.fob_1st + self.fob_2nd + self.fob_3rd
    }

    /// Brood frames per adult frame. Defined as 0 when there are no adult
    /// frames, never NaN, so downstream averaging stays finite.
    pub fn brood_ratio(&self) -> f64 {
        let adult = self.adult_frames();
        if adult > 0.0 {
            self.fo_brood / adult
        } else {
            0.0
        }
    }

    pub fn is_queen_right(&self) -> bool {
        self.queen_status == QUEEN_RIGHT
    }
}

/// One per-hive sensor reading from the UrBAN dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRecord {
    pub date_time: NaiveDateTime,
    pub tag_number: String,
    pub temperature: f64,
    pub humidity: f64,
}

/// Simulated honey production for one hive at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    pub hive_id: String,
    pub timestamp: NaiveDateTime,
    /// Honey produced, in kilograms.
    pub honey_kg: f64,
}

/// An ordered, deduplicated set of hive identifiers.
///
/// Order matters: hive-keyed aggregates and series follow the selection
/// order, so a consumer's stable hive → color mapping survives across runs.
/// An empty selection is a valid input meaning "no hives selected"; filters
/// then return empty results by design and the boundary surfaces a
/// user-facing guidance message rather than a core error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HiveSelection {
    ids: Vec<String>,
}

impl HiveSelection {
    /// Build a selection, keeping the first occurrence of each id.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        HiveSelection { ids: unique }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.ids.iter().any(|id| id == tag)
    }

    /// Selected ids in caller-supplied order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_frames(fob_1st: f64, fob_2nd: f64, fob_3rd: f64, fo_brood: f64) -> InspectionRecord {
        InspectionRecord {
            date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            tag_number: "H1".to_string(),
            colony_size: 20000.0,
            fob_1st,
            fob_2nd,
            fob_3rd,
            fo_brood,
            queen_status: QUEEN_RIGHT.to_string(),
            frames_of_honey: 4.0,
            open: None,
            close: None,
            notes: None,
        }
    }

    #[test]
    fn test_adult_frames_sums_buckets() {
        let record = record_with_frames(2.0, 1.0, 1.0, 3.0);
        assert_eq!(record.adult_frames(), 4.0);
    }

    #[test]
    fn test_brood_ratio() {
        let record = record_with_frames(2.0, 1.0, 1.0, 3.0);
        assert!((record.brood_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_brood_ratio_zero_adult_frames_is_zero() {
        let record = record_with_frames(0.0, 0.0, 0.0, 5.0);
        let ratio = record.brood_ratio();
        assert_eq!(ratio, 0.0);
        assert!(ratio.is_finite());
    }

    #[test]
    fn test_is_queen_right() {
        let mut record = record_with_frames(1.0, 1.0, 1.0, 1.0);
        assert!(record.is_queen_right());
        record.queen_status = "Missing".to_string();
        assert!(!record.is_queen_right());
    }

    #[test]
    fn test_inspection_record_json_roundtrip() {
        let json = r#"{
            "date": "2021-06-01",
            "tagNumber": "H1",
            "colonySize": 20000,
            "fob1st": 2,
            "fob2nd": 1,
            "fob3rd": 1,
            "foBrood": 3,
            "queenStatus": "QR",
            "framesOfHoney": 4
        }"#;
        let record: InspectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.tag_number, "H1");
        assert_eq!(record.frames_of_honey, 4.0);
        assert_eq!(record.open, None);
    }

    #[test]
    fn test_environmental_record_parses_iso_timestamp() {
        let json = r#"{
            "dateTime": "2021-06-01T10:30:00",
            "temperature": 21.5,
            "humidity": 60.0,
            "precipitation": 0.0
        }"#;
        let record: EnvironmentalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.date_time,
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap().and_hms_opt(10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_hive_selection_preserves_order_and_dedupes() {
        let selection = HiveSelection::new(["H3", "H1", "H3", "H2"]);
        assert_eq!(selection.ids(), &["H3", "H1", "H2"]);
        assert_eq!(selection.len(), 3);
        assert!(selection.contains("H1"));
        assert!(!selection.contains("H4"));
    }

    #[test]
    fn test_hive_selection_empty_is_valid() {
        let selection = HiveSelection::new(Vec::<String>::new());
        assert!(selection.is_empty());
        assert!(!selection.contains("H1"));
    }
}
