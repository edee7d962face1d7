//! Selection of records by state and district, and the option lists offered to users.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Category, Layer, ALL_DISTRICTS, NATIONAL_AVERAGE},
    data::{Level, Record},
};

/// What the user is looking at. Passed explicitly into every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub state: String,
    pub district: String,
    pub category: Category,
    pub layer: Layer,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            state: NATIONAL_AVERAGE.into(),
            district: ALL_DISTRICTS.into(),
            category: Category::Adaptation,
            layer: Layer::default(),
        }
    }
}

/// Which kind of view a selection produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scope {
    National,
    State,
    District,
}

impl Selection {
    pub fn new(state: impl Into<String>, district: impl Into<String>, category: Category, layer: Layer) -> Self {
        Self { state: state.into(), district: district.into(), category, layer }
    }

    pub fn scope(&self) -> Scope {
        if self.state == NATIONAL_AVERAGE { Scope::National }
        else if self.district == ALL_DISTRICTS { Scope::State }
        else { Scope::District }
    }
}

/// Records matching a state/district pair.
///
/// `"National Average"` selects the national rollup regardless of district,
/// `"All Districts"` selects the state rollup, anything else selects one district.
/// No match yields an empty vector.
pub fn select(records: &[Record], state: &str, district: &str) -> Vec<Record> {
    records.iter()
        .filter(|r| {
            if state == NATIONAL_AVERAGE {
                r.state_name == NATIONAL_AVERAGE
            } else if district == ALL_DISTRICTS {
                r.state_name == state && r.district_name == ALL_DISTRICTS
            } else {
                r.state_name == state && r.district_name == district
            }
        })
        .cloned()
        .collect()
}

/// District rows drawn on the map for a selection: every district nationally,
/// the state's districts for a state view, or the single district.
pub fn map_subset<'a>(records: &'a [Record], selection: &Selection) -> Vec<&'a Record> {
    records.iter()
        .filter(|r| r.level == Level::District)
        .filter(|r| match selection.scope() {
            Scope::National => r.state_name != NATIONAL_AVERAGE,
            Scope::State => r.state_name == selection.state,
            Scope::District => r.state_name == selection.state && r.district_name == selection.district,
        })
        .collect()
}

/// `"National Average"` followed by every other state, sorted.
pub fn state_options(records: &[Record]) -> Vec<String> {
    let states: BTreeSet<&str> = records.iter()
        .map(|r| r.state_name.as_str())
        .filter(|s| *s != NATIONAL_AVERAGE)
        .collect();
    std::iter::once(NATIONAL_AVERAGE)
        .chain(states)
        .map(str::to_string)
        .collect()
}

/// `"All Districts"` followed by the state's districts, sorted. Nationally only `"All Districts"`.
pub fn district_options(records: &[Record], state: &str) -> Vec<String> {
    let districts: BTreeSet<&str> = if state == NATIONAL_AVERAGE {
        BTreeSet::new()
    } else {
        records.iter()
            .filter(|r| r.state_name == state && r.district_name != ALL_DISTRICTS)
            .map(|r| r.district_name.as_str())
            .collect()
    };
    std::iter::once(ALL_DISTRICTS)
        .chain(districts)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::national(),
            Record::state("Bihar"),
            Record::state("Assam"),
            Record::district("Bihar", "Patna"),
            Record::district("Bihar", "Gaya"),
            Record::district("Assam", "Dhubri"),
        ]
    }

    #[test]
    fn national_ignores_district() {
        let out = select(&records(), NATIONAL_AVERAGE, "Patna");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, Level::National);
    }

    #[test]
    fn state_and_district() {
        let out = select(&records(), "Bihar", ALL_DISTRICTS);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, Level::State);

        let out = select(&records(), "Bihar", "Gaya");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].district_name, "Gaya");
    }

    #[test]
    fn no_match_is_empty() {
        assert!(select(&records(), "Kerala", ALL_DISTRICTS).is_empty());
        assert!(select(&records(), "Assam", "Patna").is_empty());
    }

    #[test]
    fn map_subsets() {
        let records = records();
        let mut selection = Selection::default();
        assert_eq!(map_subset(&records, &selection).len(), 3);

        selection.state = "Bihar".into();
        assert_eq!(map_subset(&records, &selection).len(), 2);

        selection.district = "Patna".into();
        let subset = map_subset(&records, &selection);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].district_name, "Patna");
        assert_eq!(selection.scope(), Scope::District);
    }

    #[test]
    fn options_are_sorted_with_sentinels_first() {
        let records = records();
        assert_eq!(state_options(&records), vec!["National Average", "Assam", "Bihar"]);
        assert_eq!(district_options(&records, "Bihar"), vec!["All Districts", "Gaya", "Patna"]);
        assert_eq!(district_options(&records, NATIONAL_AVERAGE), vec!["All Districts"]);
        assert_eq!(district_options(&records, "Kerala"), vec!["All Districts"]);
    }
}
