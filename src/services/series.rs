//! Series builder: aggregates to chart-ready label/value sequences.
//!
//! The core contract is alignment: every returned dataset has exactly as
//! many values as there are labels, and any (label, metric) combination
//! absent from the underlying aggregate is filled with an explicit `0.0`
//! rather than left as a hole. Stacked and grouped chart consumers rely on
//! that positional correspondence.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::api::{ChartDataset, ChartSeries};
use crate::models::{EnvironmentalRecord, HiveSelection, ProductionRecord};
use crate::services::aggregate::{Aggregate, GroupEntry, GroupKey};

/// Build a single-dataset series from a date-, hive-, or month-keyed
/// aggregate. A (date, hive) aggregate goes through [`matrix_series`]
/// instead.
pub fn single_series(name: impl Into<String>, agg: &Aggregate) -> ChartSeries {
    if agg.key == GroupKey::DateHive {
        return matrix_series(agg, None);
    }

    let labels: Vec<String> = agg.entries.iter().map(|e| entry_label(agg.key, e)).collect();
    let values: Vec<f64> = agg.entries.iter().map(|e| e.value).collect();
    ChartSeries {
        labels,
        datasets: vec![ChartDataset {
            label: name.into(),
            values,
        }],
    }
}

/// Build one series carrying several metrics over the union of their group
/// labels, zero-filling combinations absent from an aggregate.
///
/// All aggregates must share the same grouping key; entries follow the
/// canonical order of that key (dates/months ascending, hives in the order
/// the first aggregate presents them).
///
/// # Panics
///
/// Mixing grouping keys is a caller bug, not a data condition: with debug
/// assertions enabled a mixed-key call panics. Keep the key uniform at the
/// call site rather than relying on the release-mode output.
pub fn aligned_series(named: &[(&str, &Aggregate)]) -> ChartSeries {
    let Some((_, first)) = named.first() else {
        return ChartSeries {
            labels: vec![],
            datasets: vec![],
        };
    };
    let key = first.key;
    debug_assert!(
        named.iter().all(|(_, a)| a.key == key),
        "aligned_series requires a uniform grouping key"
    );

    let labels = union_labels(key, named.iter().map(|(_, a)| *a));
    let datasets = named
        .iter()
        .map(|(name, agg)| {
            let by_label: HashMap<String, f64> = agg
                .entries
                .iter()
                .map(|e| (entry_label(key, e), e.value))
                .collect();
            ChartDataset {
                label: (*name).to_string(),
                values: labels
                    .iter()
                    .map(|l| by_label.get(l).copied().unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();

    ChartSeries { labels, datasets }
}

/// Build a matrix-style series from a (date, hive) aggregate: one label per
/// date ascending, one dataset per hive, `0.0` where a hive has no record on
/// a date.
///
/// When `hives` is supplied, every selected hive gets a dataset — including
/// hives with no rows at all — in selection order. Otherwise hives appear in
/// the order the aggregate presents them.
pub fn matrix_series(agg: &Aggregate, hives: Option<&HiveSelection>) -> ChartSeries {
    let dates: BTreeSet<NaiveDate> = agg.entries.iter().filter_map(|e| e.date).collect();
    let labels: Vec<String> = dates.iter().map(|d| d.to_string()).collect();

    let hive_order: Vec<String> = match hives {
        Some(selection) => selection.ids().to_vec(),
        None => {
            let mut seen: Vec<String> = Vec::new();
            for e in &agg.entries {
                if let Some(hive) = &e.hive {
                    if !seen.contains(hive) {
                        seen.push(hive.clone());
                    }
                }
            }
            seen
        }
    };

    let mut cells: HashMap<(NaiveDate, &str), f64> = HashMap::new();
    for e in &agg.entries {
        if let (Some(date), Some(hive)) = (e.date, e.hive.as_deref()) {
            cells.insert((date, hive), e.value);
        }
    }

    let datasets = hive_order
        .iter()
        .map(|hive| ChartDataset {
            label: hive.clone(),
            values: dates
                .iter()
                .map(|d| cells.get(&(*d, hive.as_str())).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    ChartSeries { labels, datasets }
}

/// Pass filtered environmental records through as three parallel datasets
/// labeled by timestamp. No aggregation; one label per reading.
pub fn environmental_series(records: &[EnvironmentalRecord]) -> ChartSeries {
    let labels = records
        .iter()
        .map(|r| r.date_time.format("%Y-%m-%dT%H:%M:%S").to_string())
        .collect();
    let dataset = |label: &str, values: Vec<f64>| ChartDataset {
        label: label.to_string(),
        values,
    };
    ChartSeries {
        labels,
        datasets: vec![
            dataset("Temperature", records.iter().map(|r| r.temperature).collect()),
            dataset("Humidity", records.iter().map(|r| r.humidity).collect()),
            dataset(
                "Precipitation",
                records.iter().map(|r| r.precipitation).collect(),
            ),
        ],
    }
}

/// Daily honey production per hive as a (date × hive) matrix: dates
/// ascending, one dataset per hive in first-seen order, zero-filled.
pub fn production_matrix(records: &[ProductionRecord]) -> ChartSeries {
    let mut totals: HashMap<(NaiveDate, String), f64> = HashMap::new();
    let mut hive_order: Vec<String> = Vec::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for r in records {
        let date = r.timestamp.date();
        dates.insert(date);
        if !hive_order.contains(&r.hive_id) {
            hive_order.push(r.hive_id.clone());
        }
        *totals.entry((date, r.hive_id.clone())).or_insert(0.0) += r.honey_kg;
    }

    let labels: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
    let datasets = hive_order
        .iter()
        .map(|hive| ChartDataset {
            label: hive.clone(),
            values: dates
                .iter()
                .map(|d| totals.get(&(*d, hive.clone())).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    ChartSeries { labels, datasets }
}

fn entry_label(key: GroupKey, entry: &GroupEntry) -> String {
    match key {
        GroupKey::Date => entry.date.map(|d| d.to_string()).unwrap_or_default(),
        GroupKey::Hive => entry.hive.clone().unwrap_or_default(),
        GroupKey::Month => entry.month.clone().unwrap_or_default(),
        GroupKey::DateHive => match (entry.date, entry.hive.as_deref()) {
            (Some(date), Some(hive)) => format!("{} {}", date, hive),
            _ => String::new(),
        },
    }
}

fn union_labels<'a>(key: GroupKey, aggs: impl Iterator<Item = &'a Aggregate>) -> Vec<String> {
    match key {
        // Parsed-date order; formatting back to ISO keeps it stable.
        GroupKey::Date => {
            let dates: BTreeSet<NaiveDate> = aggs
                .flat_map(|a| a.entries.iter().filter_map(|e| e.date))
                .collect();
            dates.iter().map(|d| d.to_string()).collect()
        }
        GroupKey::Month => {
            let months: BTreeSet<String> = aggs
                .flat_map(|a| a.entries.iter().filter_map(|e| e.month.clone()))
                .collect();
            months.into_iter().collect()
        }
        // First-appearance order, which is selection order upstream.
        GroupKey::Hive | GroupKey::DateHive => {
            let mut labels: Vec<String> = Vec::new();
            for agg in aggs {
                for e in &agg.entries {
                    let label = entry_label(key, e);
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
            }
            labels
        }
    }
}
