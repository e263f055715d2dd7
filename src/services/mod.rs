//! Service layer: the filtering, grouping, and aggregation engine.
//!
//! Every function here is a pure, synchronous transformation from immutable
//! inputs to a freshly allocated output. The boundary that owns record
//! retrieval and rendering calls in with already-decoded records and
//! consumes the returned aggregates, series, and KPIs as-is.

pub mod aggregate;

pub mod error;

pub mod export;

pub mod filters;

pub mod kpi;

pub mod series;

pub mod simulator;

pub use aggregate::{aggregate_inspections, queen_status_counts, Aggregate, Field, GroupKey, Reduction};
pub use error::{EngineError, EngineResult};
pub use export::{export_inspections_csv, export_sensor_csv, export_weather_csv};
pub use filters::{
    filter_environmental, filter_inspections, filter_production, filter_sensors, hive_ids,
    select_hives, select_sensor_hives,
};
pub use kpi::{compute_kpis, KG_PER_HONEY_FRAME};
pub use series::{
    aligned_series, environmental_series, matrix_series, production_matrix, single_series,
};
pub use simulator::{generate_environmental, generate_production, SimulatorConfig};
