use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::GroupRecord;

/// Post-aggregation selection filter: everything, the three strongest
/// records, or the three weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    All,
    More,
    Less,
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "more" => Ok(Self::More),
            "less" => Ok(Self::Less),
            other => Err(anyhow!(
                "unknown filter mode `{}` (expected all, more or less)",
                other
            )),
        }
    }
}

/// Reduce a panel to its top or bottom three records by percent. `All`
/// returns the input untouched. The sort is stable, so ties keep the
/// aggregation's deterministic group order.
pub fn apply_filter(mut records: Vec<GroupRecord>, mode: FilterMode) -> Vec<GroupRecord> {
    match mode {
        FilterMode::All => records,
        FilterMode::More => {
            records.sort_by(|a, b| b.percent.total_cmp(&a.percent));
            records.truncate(3);
            records
        }
        FilterMode::Less => {
            records.sort_by(|a, b| a.percent.total_cmp(&b.percent));
            records.truncate(3);
            records
        }
    }
}

/// Collapse a geographic panel to the single strongest response per
/// location, for choropleth rendering. Only 2-character location codes are
/// kept; longer territory-aggregate codes have no map geometry. Output is
/// sorted by location. On a percent tie the earlier record wins.
pub fn best_response_by_location(records: &[GroupRecord]) -> Vec<GroupRecord> {
    let mut best: BTreeMap<&str, &GroupRecord> = BTreeMap::new();
    for record in records {
        let Some(location) = record.location.as_deref() else {
            continue;
        };
        if location.chars().count() != 2 {
            continue;
        }
        match best.get(location) {
            Some(current) if current.percent >= record.percent => {}
            _ => {
                best.insert(location, record);
            }
        }
    }
    best.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location: Option<&str>, response: &str, percent: f64) -> GroupRecord {
        GroupRecord {
            break_out: None,
            year: None,
            location: location.map(String::from),
            response: response.to_string(),
            persons_sum: 100.0,
            effective_sample_sum: 400.0,
            percent,
            ci_low: percent - 1.0,
            ci_high: percent + 1.0,
        }
    }

    #[test]
    fn all_mode_returns_input_untouched() {
        let records = vec![record(None, "a", 10.0), record(None, "b", 5.0)];
        assert_eq!(apply_filter(records.clone(), FilterMode::All), records);
    }

    #[test]
    fn more_keeps_top_three_descending() {
        let records = vec![
            record(None, "a", 10.0),
            record(None, "b", 40.0),
            record(None, "c", 20.0),
            record(None, "d", 30.0),
            record(None, "e", 5.0),
        ];
        let filtered = apply_filter(records, FilterMode::More);
        let percents: Vec<f64> = filtered.iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![40.0, 30.0, 20.0]);
    }

    #[test]
    fn less_keeps_bottom_three_ascending() {
        let records = vec![
            record(None, "a", 10.0),
            record(None, "b", 40.0),
            record(None, "c", 20.0),
            record(None, "d", 30.0),
        ];
        let filtered = apply_filter(records, FilterMode::Less);
        let percents: Vec<f64> = filtered.iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn small_result_sets_pass_through_whole() {
        let records = vec![record(None, "a", 10.0), record(None, "b", 40.0)];
        let filtered = apply_filter(records.clone(), FilterMode::More);
        assert_eq!(filtered.len(), 2);
        for r in &records {
            assert!(filtered.contains(r));
        }
    }

    #[test]
    fn best_response_keeps_strongest_per_location() {
        let records = vec![
            record(Some("CA"), "yes", 60.0),
            record(Some("CA"), "no", 40.0),
            record(Some("NY"), "yes", 30.0),
        ];
        let reduced = best_response_by_location(&records);
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced[0].location.as_deref(), Some("CA"));
        assert_eq!(reduced[0].response, "yes");
        assert_eq!(reduced[0].percent, 60.0);
        assert_eq!(reduced[1].location.as_deref(), Some("NY"));
    }

    #[test]
    fn non_two_character_locations_are_excluded() {
        let records = vec![
            record(Some("CA"), "yes", 60.0),
            record(Some("GUM"), "yes", 80.0),
            record(Some("V"), "yes", 70.0),
            record(None, "yes", 90.0),
        ];
        let reduced = best_response_by_location(&records);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].location.as_deref(), Some("CA"));
    }

    #[test]
    fn filter_mode_parses_from_str() {
        assert_eq!("all".parse::<FilterMode>().unwrap(), FilterMode::All);
        assert_eq!(" More ".parse::<FilterMode>().unwrap(), FilterMode::More);
        assert_eq!("LESS".parse::<FilterMode>().unwrap(), FilterMode::Less);
        assert!("top".parse::<FilterMode>().is_err());
    }
}
