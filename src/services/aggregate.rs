//! Parameterized grouping aggregator.
//!
//! The original dashboard re-implemented essentially the same
//! filter-group-reduce loop once per chart. That collapses here into a
//! single engine: grouping key and reduction are explicit parameters, and
//! every call returns a freshly allocated [`Aggregate`] with deterministic
//! entry ordering so chart consumers can rely on stable label → color
//! assignment across reloads.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::StatusCount;
use crate::models::{HiveSelection, InspectionRecord};
use crate::services::error::{EngineError, EngineResult};

/// Grouping key for inspection aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    /// One group per calendar date.
    Date,
    /// One group per hive identifier.
    Hive,
    /// One group per (date, hive) pair, for matrix-style views.
    DateHive,
    /// One group per `YYYY-MM` truncation of the date.
    Month,
}

/// A numeric inspection field, including the derived adult-frames sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    FramesOfHoney,
    FoBrood,
    ColonySize,
    AdultFrames,
}

impl Field {
    fn extract(&self, r: &InspectionRecord) -> f64 {
        match self {
            Field::FramesOfHoney => r.frames_of_honey,
            Field::FoBrood => r.fo_brood,
            Field::ColonySize => r.colony_size,
            Field::AdultFrames => r.adult_frames(),
        }
    }
}

/// Reduction applied to each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    /// Sum of a field over the group.
    Sum(Field),
    /// Number of records in the group.
    Count,
    /// Ratio of two summed fields. A zero denominator yields 0 for that
    /// group, never NaN, so downstream averaging stays numerically
    /// consistent.
    Ratio { numerator: Field, denominator: Field },
}

/// One reduced group.
///
/// Exactly the key parts implied by the grouping key are populated: `date`
/// for [`GroupKey::Date`] and [`GroupKey::DateHive`], `hive` for
/// [`GroupKey::Hive`] and [`GroupKey::DateHive`], `month` for
/// [`GroupKey::Month`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub date: Option<NaiveDate>,
    pub hive: Option<String>,
    pub month: Option<String>,
    pub value: f64,
}

/// An ordered grouped reduction of inspection records.
///
/// Date- and month-keyed entries are sorted ascending by parsed date;
/// hive-keyed entries follow the caller-supplied selection order. Produced
/// fresh on every call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub key: GroupKey,
    pub entries: Vec<GroupEntry>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CompositeKey {
    date: Option<NaiveDate>,
    hive: Option<String>,
    month: Option<String>,
}

#[derive(Default)]
struct Accumulator {
    primary: f64,
    secondary: f64,
}

impl Reduction {
    fn accumulate(&self, acc: &mut Accumulator, r: &InspectionRecord) {
        match self {
            Reduction::Sum(field) => acc.primary += field.extract(r),
            Reduction::Count => acc.primary += 1.0,
            Reduction::Ratio {
                numerator,
                denominator,
            } => {
                acc.primary += numerator.extract(r);
                acc.secondary += denominator.extract(r);
            }
        }
    }

    fn finalize(&self, acc: &Accumulator) -> f64 {
        match self {
            Reduction::Sum(_) | Reduction::Count => acc.primary,
            Reduction::Ratio { .. } => {
                if acc.secondary == 0.0 {
                    0.0
                } else {
                    acc.primary / acc.secondary
                }
            }
        }
    }
}

/// Group a filtered inspection sequence and reduce each group.
///
/// `selection` supplies the presentation order for hive-keyed groups; pass
/// the same selection that was used for filtering. Hives without any record
/// are omitted here — the series builder is responsible for zero-filling
/// matrix views.
///
/// Requesting an aggregate over zero records fails with `EmptyDataset`; no
/// partial or best-effort aggregate is ever returned.
pub fn aggregate_inspections(
    records: &[InspectionRecord],
    key: GroupKey,
    reduction: Reduction,
    selection: Option<&HiveSelection>,
) -> EngineResult<Aggregate> {
    if records.is_empty() {
        return Err(EngineError::empty_dataset(
            "no inspection records to aggregate",
        ));
    }

    let mut groups: HashMap<CompositeKey, Accumulator> = HashMap::new();
    let mut insertion_order: Vec<CompositeKey> = Vec::new();

    for r in records {
        let composite = composite_key(key, r);
        if !groups.contains_key(&composite) {
            insertion_order.push(composite.clone());
        }
        reduction.accumulate(groups.entry(composite).or_default(), r);
    }

    let ordered = order_keys(key, insertion_order, selection);
    let entries: Vec<GroupEntry> = ordered
        .into_iter()
        .map(|composite| {
            let value = reduction.finalize(&groups[&composite]);
            GroupEntry {
                date: composite.date,
                hive: composite.hive,
                month: composite.month,
                value,
            }
        })
        .collect();

    debug!(
        "aggregated {} records into {} groups (key {:?})",
        records.len(),
        entries.len(),
        key
    );
    Ok(Aggregate { key, entries })
}

fn composite_key(key: GroupKey, r: &InspectionRecord) -> CompositeKey {
    match key {
        GroupKey::Date => CompositeKey {
            date: Some(r.date),
            hive: None,
            month: None,
        },
        GroupKey::Hive => CompositeKey {
            date: None,
            hive: Some(r.tag_number.clone()),
            month: None,
        },
        GroupKey::DateHive => CompositeKey {
            date: Some(r.date),
            hive: Some(r.tag_number.clone()),
            month: None,
        },
        GroupKey::Month => CompositeKey {
            date: None,
            hive: None,
            month: Some(r.date.format("%Y-%m").to_string()),
        },
    }
}

fn order_keys(
    key: GroupKey,
    insertion_order: Vec<CompositeKey>,
    selection: Option<&HiveSelection>,
) -> Vec<CompositeKey> {
    let hive_rank = hive_ranks(&insertion_order, selection);
    let rank_of = |hive: &Option<String>| {
        hive.as_deref()
            .and_then(|h| hive_rank.get(h).copied())
            .unwrap_or(usize::MAX)
    };

    let mut ordered = insertion_order;
    match key {
        // Ascending by parsed date, not string order.
        GroupKey::Date => ordered.sort_by_key(|k| k.date),
        // YYYY-MM sorts chronologically as a string.
        GroupKey::Month => ordered.sort_by(|a, b| a.month.cmp(&b.month)),
        // Selection order keeps a consumer's hive -> color mapping stable.
        GroupKey::Hive => ordered.sort_by_key(|k| rank_of(&k.hive)),
        GroupKey::DateHive => ordered.sort_by_key(|k| (k.date, rank_of(&k.hive))),
    }
    ordered
}

/// Presentation rank per hive: selection order when supplied, first-seen
/// record order otherwise.
fn hive_ranks(
    insertion_order: &[CompositeKey],
    selection: Option<&HiveSelection>,
) -> HashMap<String, usize> {
    match selection {
        Some(selection) => selection
            .ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect(),
        None => {
            let mut ranks = HashMap::new();
            for key in insertion_order {
                if let Some(hive) = &key.hive {
                    let next = ranks.len();
                    ranks.entry(hive.clone()).or_insert(next);
                }
            }
            ranks
        }
    }
}

/// Count inspections per queen-status category, first-seen order.
///
/// The category set is open: whatever statuses appear in the data define
/// the slices, with `"QR"` carrying no special treatment here.
pub fn queen_status_counts(records: &[InspectionRecord]) -> EngineResult<Vec<StatusCount>> {
    if records.is_empty() {
        return Err(EngineError::empty_dataset(
            "no inspection records for queen-status distribution",
        ));
    }

    let mut counts: Vec<StatusCount> = Vec::new();
    for r in records {
        match counts.iter_mut().find(|c| c.status == r.queen_status) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount {
                status: r.queen_status.clone(),
                count: 1,
            }),
        }
    }
    Ok(counts)
}
