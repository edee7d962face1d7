//! Summary statistics for a selection and the suitability distributions behind its pie chart.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    classify::{label_color, Rgb, Tier},
    data::{Level, Record, Value},
    select::{select, Scope, Selection},
};

/// Headline metrics for the selected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// "Selected Level" for rollups, "Selected District" otherwise.
    pub heading: &'static str,
    pub title: String,
    pub category_value: Option<String>,
    /// Layer value, numbers formatted to two decimals.
    pub layer_value: Option<String>,
}

impl Summary {
    /// Metrics for the first record matching `selection`, `None` when nothing matches.
    pub fn for_selection(records: &[Record], selection: &Selection) -> Option<Self> {
        let selected = select(records, &selection.state, &selection.district);
        let record = selected.first()?;

        let (heading, title) = match selection.scope() {
            Scope::National => ("Selected Level", "National Average".to_string()),
            Scope::State => ("Selected Level", format!("{} State Average", selection.state)),
            Scope::District => ("Selected District", selection.district.clone()),
        };

        let category_value = record.get(selection.category.column()).map(Value::to_string);
        let layer_value = record.get(selection.layer.column()).map(Value::to_string);

        Some(Self { heading, title, category_value, layer_value })
    }
}

/// One slice of the suitability pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of labelled entries, rounded to two decimals.
    pub percentage: f64,
    pub color: Rgb,
}

/// Distribution of a category's labels over a state's districts or over all states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub title: String,
    /// "Districts" for a state view, "States" nationally.
    pub unit: &'static str,
    pub slices: Vec<Slice>,
    /// Number of entries considered, labelled or not.
    pub total: usize,
    /// Percentage of entries labelled exactly "Highly Suitable".
    pub highly_suitable_pct: f64,
}

impl Distribution {
    /// Distribution for the selection's scope. Single-district selections and empty scopes have none.
    pub fn for_selection(records: &[Record], selection: &Selection) -> Option<Self> {
        let category = selection.category;
        let (entries, title, unit): (Vec<&Record>, String, &'static str) = match selection.scope() {
            Scope::State => (
                records.iter()
                    .filter(|r| r.level == Level::District && r.state_name == selection.state)
                    .collect(),
                format!("Distribution of {} in {}", category.column(), selection.state),
                "Districts",
            ),
            Scope::National => (
                records.iter().filter(|r| r.level == Level::State).collect(),
                format!("Distribution of {} Across States", category.column()),
                "States",
            ),
            Scope::District => return None,
        };
        if entries.is_empty() { return None }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for label in entries.iter().filter_map(|r| r.category_label(category)) {
            *counts.entry(label).or_default() += 1;
        }
        let labelled: usize = counts.values().sum();

        let mut slices: Vec<Slice> = counts.into_iter()
            .map(|(label, count)| Slice {
                label: label.to_string(),
                count,
                percentage: round_to(count as f64 / labelled as f64 * 100.0, 2),
                color: label_color(label),
            })
            .collect();
        // Largest first; the sort is stable so equal counts keep label order.
        slices.sort_by(|a, b| b.count.cmp(&a.count));

        let highly = slices.iter()
            .find(|s| s.label == Tier::HighlySuitable.label())
            .map_or(0, |s| s.count);

        Some(Self {
            title,
            unit,
            slices,
            total: entries.len(),
            highly_suitable_pct: highly as f64 / entries.len() as f64 * 100.0,
        })
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Layer};

    fn district(state: &str, name: &str, label: Option<&str>, gw: f64) -> Record {
        Record::district(state, name)
            .with("Mitigation", Value::Text(label.map(str::to_string)))
            .with("GW_dev_sta", Value::number(gw))
    }

    fn records() -> Vec<Record> {
        vec![
            Record::national().with("Mitigation", Value::text("Highly Suitable")).with("GW_dev_sta", Value::number(61.234)),
            Record::state("A").with("Mitigation", Value::text("Highly Suitable")),
            Record::state("B").with("Mitigation", Value::text("Less Suitable")),
            Record::state("C").with("Mitigation", Value::text("Highly Suitable")),
            district("A", "a1", Some("Highly Suitable"), 10.0),
            district("A", "a2", Some("Highly Suitable"), 20.0),
            district("A", "a3", Some("Less Suitable"), 30.0),
            district("A", "a4", None, 40.0),
        ]
    }

    fn selection(state: &str, district: &str) -> Selection {
        Selection::new(state, district, Category::Mitigation, Layer::GwDevelopmentStage)
    }

    #[test]
    fn summary_titles_and_values() {
        let records = records();
        let national = Summary::for_selection(&records, &selection("National Average", "All Districts")).unwrap();
        assert_eq!(national.title, "National Average");
        assert_eq!(national.category_value.as_deref(), Some("Highly Suitable"));
        assert_eq!(national.layer_value.as_deref(), Some("61.23"));

        let state = Summary::for_selection(&records, &selection("A", "All Districts")).unwrap();
        assert_eq!(state.title, "A State Average");
        assert_eq!(state.layer_value, None);

        let district = Summary::for_selection(&records, &selection("A", "a3")).unwrap();
        assert_eq!(district.heading, "Selected District");
        assert_eq!(district.title, "a3");
        assert_eq!(district.layer_value.as_deref(), Some("30.00"));

        assert!(Summary::for_selection(&records, &selection("Z", "All Districts")).is_none());
    }

    #[test]
    fn state_distribution() {
        let dist = Distribution::for_selection(&records(), &selection("A", "All Districts")).unwrap();
        assert_eq!(dist.unit, "Districts");
        assert_eq!(dist.total, 4);
        assert_eq!(dist.slices.len(), 2);
        assert_eq!(dist.slices[0].label, "Highly Suitable");
        assert_eq!(dist.slices[0].count, 2);
        assert_eq!(dist.slices[0].percentage, 66.67);
        assert_eq!(dist.slices[1].percentage, 33.33);
        assert_eq!(dist.highly_suitable_pct, 50.0);
        assert_eq!(dist.slices[1].color.to_string(), "#CC0000");
    }

    #[test]
    fn national_distribution_counts_states() {
        let dist = Distribution::for_selection(&records(), &selection("National Average", "All Districts")).unwrap();
        assert_eq!(dist.unit, "States");
        assert_eq!(dist.total, 3);
        assert_eq!(dist.slices[0].count, 2);
        assert_eq!(dist.title, "Distribution of Mitigation Across States");
    }

    #[test]
    fn district_view_has_no_distribution() {
        assert!(Distribution::for_selection(&records(), &selection("A", "a1")).is_none());
        assert!(Distribution::for_selection(&records(), &selection("Z", "All Districts")).is_none());
    }
}
