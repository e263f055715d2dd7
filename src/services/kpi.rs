//! Scalar KPI computation over a filtered inspection set.
//!
//! The input is expected to be time- and hive-filtered already. Each metric
//! is a standalone function over the same set so a problem computing one can
//! never block the other three; [`compute_kpis`] just assembles them.

use log::debug;

use crate::api::KpiSet;
use crate::models::InspectionRecord;
use crate::services::error::{EngineError, EngineResult};

/// Domain constant: one frame of honey weighs roughly 1.5 kg. Not
/// configurable.
pub const KG_PER_HONEY_FRAME: f64 = 1.5;

/// Total honey yield in kilograms, rounded to one decimal.
pub fn honey_yield_kg(records: &[InspectionRecord]) -> EngineResult<f64> {
    ensure_non_empty(records, "honey yield")?;
    let total_frames: f64 = records.iter().map(|r| r.frames_of_honey).sum();
    Ok(round1(total_frames * KG_PER_HONEY_FRAME))
}

/// Mean colony size, rounded to one decimal.
pub fn avg_colony_size(records: &[InspectionRecord]) -> EngineResult<f64> {
    ensure_non_empty(records, "average colony size")?;
    let total: f64 = records.iter().map(|r| r.colony_size).sum();
    Ok(round1(total / records.len() as f64))
}

/// Arithmetic mean of per-record brood/adult ratios — not a ratio of sums.
/// Records with zero adult frames contribute exactly 0.
pub fn avg_brood_ratio(records: &[InspectionRecord]) -> EngineResult<f64> {
    ensure_non_empty(records, "average brood ratio")?;
    let total: f64 = records.iter().map(|r| r.brood_ratio()).sum();
    Ok(total / records.len() as f64)
}

/// Share of queen-right inspections as an integer percent in `[0, 100]`.
pub fn queen_right_percent(records: &[InspectionRecord]) -> EngineResult<u32> {
    ensure_non_empty(records, "queen-right percentage")?;
    let queen_right = records.iter().filter(|r| r.is_queen_right()).count();
    Ok((queen_right as f64 / records.len() as f64 * 100.0).round() as u32)
}

/// Compute all four KPIs over one filtered inspection set.
///
/// Fails with `EmptyDataset` on an empty set rather than producing a
/// spurious 0/0 result; the caller decides whether to render "no data" or
/// keep a stale display.
pub fn compute_kpis(records: &[InspectionRecord]) -> EngineResult<KpiSet> {
    let kpis = KpiSet {
        honey_yield_kg: honey_yield_kg(records)?,
        avg_colony_size: avg_colony_size(records)?,
        avg_brood_ratio: avg_brood_ratio(records)?,
        queen_right_percent: queen_right_percent(records)?,
    };
    debug!(
        "computed KPIs over {} inspections: {:?}",
        records.len(),
        kpis
    );
    Ok(kpis)
}

fn ensure_non_empty(records: &[InspectionRecord], what: &str) -> EngineResult<()> {
    if records.is_empty() {
        return Err(EngineError::empty_dataset(format!(
            "cannot compute {} over zero inspections",
            what
        )));
    }
    Ok(())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn inspection(
        day: u32,
        tag: &str,
        honey: f64,
        colony: f64,
        brood: f64,
        adult: (f64, f64, f64),
        queen: &str,
    ) -> InspectionRecord {
        InspectionRecord {
            date: NaiveDate::from_ymd_opt(2021, 6, day).unwrap(),
            tag_number: tag.to_string(),
            colony_size: colony,
            fob_1st: adult.0,
            fob_2nd: adult.1,
            fob_3rd: adult.2,
            fo_brood: brood,
            queen_status: queen.to_string(),
            frames_of_honey: honey,
            open: None,
            close: None,
            notes: None,
        }
    }

    /// The reference scenario: two June inspections of hive H1.
    fn scenario() -> Vec<InspectionRecord> {
        vec![
            inspection(1, "H1", 4.0, 20000.0, 3.0, (2.0, 1.0, 1.0), "QR"),
            inspection(2, "H1", 6.0, 22000.0, 5.0, (1.0, 1.0, 0.0), "Missing"),
        ]
    }

    #[test]
    fn test_honey_yield() {
        assert_eq!(honey_yield_kg(&scenario()).unwrap(), 15.0);
    }

    #[test]
    fn test_avg_colony_size() {
        assert_eq!(avg_colony_size(&scenario()).unwrap(), 21000.0);
    }

    #[test]
    fn test_avg_brood_ratio_is_mean_of_record_ratios() {
        // 3/4 = 0.75 and 5/2 = 2.5, mean 1.625 — not (3+5)/(4+2).
        let ratio = avg_brood_ratio(&scenario()).unwrap();
        assert!((ratio - 1.625).abs() < 1e-12);
    }

    #[test]
    fn test_queen_right_percent() {
        assert_eq!(queen_right_percent(&scenario()).unwrap(), 50);
    }

    #[test]
    fn test_compute_kpis_full_scenario() {
        let kpis = compute_kpis(&scenario()).unwrap();
        assert_eq!(kpis.honey_yield_kg, 15.0);
        assert_eq!(kpis.avg_colony_size, 21000.0);
        assert!((kpis.avg_brood_ratio - 1.625).abs() < 1e-12);
        assert_eq!(kpis.queen_right_percent, 50);
    }

    #[test]
    fn test_empty_set_fails_each_metric() {
        assert!(honey_yield_kg(&[]).unwrap_err().is_empty_dataset());
        assert!(avg_colony_size(&[]).unwrap_err().is_empty_dataset());
        assert!(avg_brood_ratio(&[]).unwrap_err().is_empty_dataset());
        assert!(queen_right_percent(&[]).unwrap_err().is_empty_dataset());
        assert!(compute_kpis(&[]).unwrap_err().is_empty_dataset());
    }

    #[test]
    fn test_zero_adult_frames_contributes_zero_ratio() {
        let records = vec![
            inspection(1, "H1", 0.0, 100.0, 5.0, (0.0, 0.0, 0.0), "QR"),
            inspection(2, "H1", 0.0, 100.0, 2.0, (1.0, 1.0, 0.0), "QR"),
        ];
        let ratio = avg_brood_ratio(&records).unwrap();
        // (0 + 1.0) / 2
        assert!((ratio - 0.5).abs() < 1e-12);
        assert!(ratio.is_finite());
    }

    #[test]
    fn test_queen_right_percent_bounds() {
        let all_qr = vec![inspection(1, "H1", 0.0, 1.0, 0.0, (1.0, 0.0, 0.0), "QR")];
        assert_eq!(queen_right_percent(&all_qr).unwrap(), 100);

        let none_qr = vec![inspection(1, "H1", 0.0, 1.0, 0.0, (1.0, 0.0, 0.0), "Replaced")];
        assert_eq!(queen_right_percent(&none_qr).unwrap(), 0);
    }

    #[test]
    fn test_honey_yield_rounds_to_one_decimal() {
        // 3 frames * 1.5 = 4.5; 1 frame of 0.11 would not appear, counts are
        // integral in practice, but the rounding contract still holds.
        let records = vec![inspection(1, "H1", 3.33, 1.0, 0.0, (1.0, 0.0, 0.0), "QR")];
        assert_eq!(honey_yield_kg(&records).unwrap(), 5.0);
    }
}
