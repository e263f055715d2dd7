//! Simulated environmental and production data.
//!
//! Development fixture generator: hourly environmental samples and daily
//! per-hive production records over a half-open `[start, end)` range. Yield
//! follows a seasonal flower-availability index so simulated charts look
//! plausible. Callers supply the RNG, so tests can seed a [`rand::rngs::StdRng`]
//! and get reproducible fixtures.

use anyhow::{ensure, Context, Result};
use chrono::{Datelike, Duration, NaiveDateTime};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::models::{EnvironmentalRecord, ProductionRecord};

/// Sampling parameters for the simulator. Deserializable from TOML so a
/// development config file can reshape the fixtures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Gaussian temperature, degrees Celsius.
    pub temperature_mean_c: f64,
    pub temperature_sd_c: f64,
    /// Uniform relative humidity, percent.
    pub humidity_range: (f64, f64),
    /// Uniform precipitation, millimeters.
    pub precipitation_range: (f64, f64),
    /// Honey produced per hive per day at full flower availability, kg.
    pub peak_daily_yield_kg: f64,
    /// Standard deviation of the gaussian noise on daily yield.
    pub yield_noise_sd: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            temperature_mean_c: 20.0,
            temperature_sd_c: 5.0,
            humidity_range: (40.0, 90.0),
            precipitation_range: (0.0, 10.0),
            peak_daily_yield_kg: 2.0,
            yield_noise_sd: 0.3,
        }
    }
}

impl SimulatorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SimulatorConfig =
            toml::from_str(raw).context("Failed to parse simulator config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.temperature_sd_c >= 0.0,
            "temperature_sd_c must be non-negative"
        );
        ensure!(
            self.humidity_range.0 < self.humidity_range.1,
            "humidity_range must be (low, high) with low < high"
        );
        ensure!(
            self.precipitation_range.0 < self.precipitation_range.1,
            "precipitation_range must be (low, high) with low < high"
        );
        ensure!(
            self.yield_noise_sd >= 0.0,
            "yield_noise_sd must be non-negative"
        );
        Ok(())
    }
}

/// Generate one environmental sample per hour over `[start, end)`.
pub fn generate_environmental<R: Rng>(
    config: &SimulatorConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<EnvironmentalRecord>> {
    config.validate()?;
    let temperature = Normal::new(config.temperature_mean_c, config.temperature_sd_c)
        .context("invalid temperature distribution")?;

    let mut result = Vec::new();
    let mut current = start;
    while current < end {
        result.push(EnvironmentalRecord {
            date_time: current,
            temperature: temperature.sample(rng),
            humidity: rng.gen_range(config.humidity_range.0..config.humidity_range.1),
            precipitation: rng
                .gen_range(config.precipitation_range.0..config.precipitation_range.1),
        });
        current += Duration::hours(1);
    }
    Ok(result)
}

/// Generate one production record per hive per day over `[start, end)`.
///
/// Daily yield is `flower_index * peak_daily_yield_kg` plus gaussian noise,
/// clamped at zero.
pub fn generate_production<R: Rng>(
    config: &SimulatorConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
    hive_ids: &[String],
    rng: &mut R,
) -> Result<Vec<ProductionRecord>> {
    config.validate()?;
    let noise = Normal::new(0.0, config.yield_noise_sd)
        .context("invalid yield noise distribution")?;

    let mut result = Vec::new();
    let mut current = start;
    while current < end {
        let index = flower_index(current.month(), rng);
        for hive_id in hive_ids {
            let honey_kg = (index * config.peak_daily_yield_kg + noise.sample(rng)).max(0.0);
            result.push(ProductionRecord {
                hive_id: hive_id.clone(),
                timestamp: current,
                honey_kg,
            });
        }
        current += Duration::days(1);
    }
    Ok(result)
}

/// Flower availability in `[0, 1]` by month: peak bloom March–June, low
/// availability in late autumn and winter.
fn flower_index<R: Rng>(month: u32, rng: &mut R) -> f64 {
    match month {
        3..=6 => rng.gen_range(0.7..1.0),
        7 | 8 => rng.gen_range(0.4..0.7),
        9 | 10 => rng.gen_range(0.3..0.6),
        _ => rng.gen_range(0.0..0.3),
    }
}
