pub mod filter;

pub use filter::{apply_filter, best_response_by_location, FilterMode};

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::normalize::{BreakoutCategory, QuestionRow};

/// Fixed half-width multiplier for the ~95% normal-approximation interval.
pub const CI_MULTIPLIER: f64 = 2.0;

/// Additional grouping dimension for a panel, beyond the response label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDimension {
    BreakOut,
    Year,
    Location,
}

/// One aggregated (group x response) prevalence estimate. Only the grouping
/// dimensions the panel asked for are set; the rest stay `None` and are
/// omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub response: String,
    pub persons_sum: f64,
    pub effective_sample_sum: f64,
    pub percent: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

type GroupKey = (Option<String>, Option<i32>, Option<String>, String);

/// Build the group key for a row, or `None` if the row is missing a value
/// for a requested dimension (such rows drop out of the grouping).
fn group_key(row: &QuestionRow, dims: &[GroupDimension]) -> Option<GroupKey> {
    let mut break_out = None;
    let mut year = None;
    let mut location = None;
    for dim in dims {
        match dim {
            GroupDimension::BreakOut => {
                if row.break_out.is_empty() {
                    return None;
                }
                break_out = Some(row.break_out.clone());
            }
            GroupDimension::Year => {
                year = Some(row.year?);
            }
            GroupDimension::Location => {
                if row.location.is_empty() {
                    return None;
                }
                location = Some(row.location.clone());
            }
        }
    }
    Some((break_out, year, location, row.response.clone()))
}

/// Re-weight one question slice into pooled prevalence estimates.
///
/// Each stratum reports a weighted `sample_size` for one response plus the
/// within-stratum prevalence of that response. Dividing the two recovers
/// the effective denominator the stratum's percentage was computed against
/// (`effective_n = sample_size * 100 / value`). Summing numerators and
/// denominators per group pools strata at their true weights; averaging
/// the reported percentages directly would misweight uneven strata.
///
/// Rows missing a sample size or value after coercion are dropped, as are
/// zero-value rows (the value is the divisor above). Groups whose summed
/// numerator or denominator is not positive are discarded, and so is any
/// record left with a non-finite estimate or bound.
pub fn compute_panel(
    rows: &[QuestionRow],
    category: BreakoutCategory,
    dims: &[GroupDimension],
) -> Vec<GroupRecord> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<GroupKey, (f64, f64)> = BTreeMap::new();
    for row in rows {
        if row.category != Some(category) {
            continue;
        }
        let (Some(sample_size), Some(value)) = (row.sample_size, row.value) else {
            continue;
        };
        if value == 0.0 {
            continue;
        }
        let Some(key) = group_key(row, dims) else {
            continue;
        };
        let effective_n = sample_size * 100.0 / value;
        let entry = groups.entry(key).or_insert((0.0, 0.0));
        entry.0 += sample_size;
        entry.1 += effective_n;
    }

    let mut records = Vec::with_capacity(groups.len());
    for ((break_out, year, location, response), (persons_sum, effective_sample_sum)) in groups {
        if persons_sum <= 0.0 || effective_sample_sum <= 0.0 {
            continue;
        }
        let percent = persons_sum * 100.0 / effective_sample_sum;
        // floor of 1 keeps a near-zero pool from dividing to infinity
        let se = (percent * (100.0 - percent) / effective_sample_sum.max(1.0)).sqrt();
        let ci_low = percent - CI_MULTIPLIER * se;
        let ci_high = percent + CI_MULTIPLIER * se;
        if !percent.is_finite() || !ci_low.is_finite() || !ci_high.is_finite() {
            continue;
        }
        records.push(GroupRecord {
            break_out,
            year,
            location,
            response,
            persons_sum,
            effective_sample_sum,
            percent,
            ci_low,
            ci_high,
        });
    }

    debug!(?category, groups = records.len(), "panel computed");
    records
}

/// Overall prevalence, one record per response.
pub fn aggregate_overall(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Overall, &[])
}

/// Prevalence by gender group.
pub fn aggregate_gender(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Gender, &[GroupDimension::BreakOut])
}

/// Prevalence by age group.
pub fn aggregate_age(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Age, &[GroupDimension::BreakOut])
}

/// Prevalence by race group.
pub fn aggregate_race(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Race, &[GroupDimension::BreakOut])
}

/// Prevalence by education group.
pub fn aggregate_education(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(
        rows,
        BreakoutCategory::Education,
        &[GroupDimension::BreakOut],
    )
}

/// Prevalence by income bracket.
pub fn aggregate_income(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Income, &[GroupDimension::BreakOut])
}

/// Overall prevalence per survey year.
pub fn aggregate_temporal(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Overall, &[GroupDimension::Year])
}

/// Overall prevalence per state / territory.
pub fn aggregate_location(rows: &[QuestionRow]) -> Vec<GroupRecord> {
    compute_panel(rows, BreakoutCategory::Overall, &[GroupDimension::Location])
}
