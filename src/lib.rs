//! # Smart Beekeeping Dashboard Backend
//!
//! Filtering, grouping, and aggregation engine for apiary dashboards.
//!
//! This crate turns raw heterogeneous records — environmental sensor readings
//! and periodic hive-inspection records — into chart-ready projections and
//! scalar key-performance-indicators (KPIs). It is the computational core of
//! the dashboard: correct inclusive date-range semantics, stable multi-key
//! grouping, ratio/average computation with zero-division guards, and
//! deterministic ordering for presentation.
//!
//! ## Features
//!
//! - **Data Loading**: Parse environmental, inspection, and sensor records
//!   from JSON and the original inspection CSV schema
//! - **Filtering**: Inclusive time-window and hive-selection filters
//! - **Aggregation**: Parameterized grouping by date, hive, (date, hive), or
//!   month with sum/count/ratio reductions
//! - **KPIs**: Honey yield, average colony size, average brood ratio, and
//!   queen-right percentage over a filtered inspection set
//! - **Series Building**: Ordered, gap-filled label/value sequences with
//!   guaranteed positional alignment across datasets
//! - **Export & Simulation**: CSV export of filtered records and a simulated
//!   data generator for development fixtures
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Chart-facing Data Transfer Objects (DTOs)
//! - [`models`]: Record types, time windows, and the decode boundary
//! - [`services`]: Filtering, aggregation, KPI, and series-building logic
//!
//! ## Purity
//!
//! Every service call is a pure, synchronous function from immutable inputs
//! to a freshly allocated output. The engine holds no cross-call state, so
//! repeated invocations under a changed window or hive selection fully
//! supersede the previous result and callers may evaluate independent
//! computations in parallel.

pub mod api;

pub mod models;

pub mod services;
