//! Public DTO surface for dashboard consumers.
//!
//! This module consolidates the chart- and KPI-facing types the services
//! layer produces. All types derive Serialize/Deserialize for JSON
//! serialization and use camelCase field names on the wire.

use serde::{Deserialize, Serialize};

/// One named value sequence inside a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub values: Vec<f64>,
}

/// A complete chart payload: shared labels plus one or more datasets.
///
/// Every dataset carries exactly one value per label; positions with no
/// underlying data hold `0.0` rather than a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartSeries {
    /// True when every dataset has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        self.datasets
            .iter()
            .all(|d| d.values.len() == self.labels.len())
    }
}

/// Headline indicators for one filtered inspection set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub honey_yield_kg: f64,
    pub avg_colony_size: f64,
    pub avg_brood_ratio: f64,
    pub queen_right_percent: u32,
}

/// One slice of the queen-status distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}
