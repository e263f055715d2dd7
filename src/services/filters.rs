//! Time-window and hive-selection filters.
//!
//! Both filters are stable: they return the matching subsequence in original
//! relative order and never mutate or reorder the input. Window validity is
//! enforced when the [`TimeWindow`] is constructed, so the filters themselves
//! are infallible.

use log::debug;

use crate::models::{
    EnvironmentalRecord, HiveSelection, InspectionRecord, ProductionRecord, SensorRecord,
    TimeWindow,
};

/// Environmental records whose timestamp falls inside the window, inclusive.
pub fn filter_environmental(
    records: &[EnvironmentalRecord],
    window: &TimeWindow,
) -> Vec<EnvironmentalRecord> {
    let filtered: Vec<EnvironmentalRecord> = records
        .iter()
        .filter(|r| window.contains(r.date_time))
        .cloned()
        .collect();
    debug!(
        "window [{} .. {}] kept {}/{} environmental records",
        window.start(),
        window.end(),
        filtered.len(),
        records.len()
    );
    filtered
}

/// Inspection records whose date, taken at local midnight, falls inside the
/// window, inclusive.
pub fn filter_inspections(
    records: &[InspectionRecord],
    window: &TimeWindow,
) -> Vec<InspectionRecord> {
    records
        .iter()
        .filter(|r| window.contains_date(r.date))
        .cloned()
        .collect()
}

/// Sensor records whose timestamp falls inside the window, inclusive.
pub fn filter_sensors(records: &[SensorRecord], window: &TimeWindow) -> Vec<SensorRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.date_time))
        .cloned()
        .collect()
}

/// Production records inside the window for the selected hives.
pub fn filter_production(
    records: &[ProductionRecord],
    window: &TimeWindow,
    selection: &HiveSelection,
) -> Vec<ProductionRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.timestamp) && selection.contains(&r.hive_id))
        .cloned()
        .collect()
}

/// Inspection records belonging to the selected hives, order preserved.
///
/// An empty selection returns an empty result by design; the boundary is
/// expected to surface "select at least one hive" instead of treating this
/// as an engine failure.
pub fn select_hives(
    records: &[InspectionRecord],
    selection: &HiveSelection,
) -> Vec<InspectionRecord> {
    records
        .iter()
        .filter(|r| selection.contains(&r.tag_number))
        .cloned()
        .collect()
}

/// Sensor records belonging to the selected hives, order preserved.
pub fn select_sensor_hives(
    records: &[SensorRecord],
    selection: &HiveSelection,
) -> Vec<SensorRecord> {
    records
        .iter()
        .filter(|r| selection.contains(&r.tag_number))
        .cloned()
        .collect()
}

/// Unique hive identifiers in first-seen order, for populating a hive
/// multi-select control.
pub fn hive_ids(records: &[InspectionRecord]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for r in records {
        if !ids.contains(&r.tag_number) {
            ids.push(r.tag_number.clone());
        }
    }
    ids
}
