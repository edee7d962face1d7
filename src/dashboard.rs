//! The query surface a presentation layer drives: cached data plus one call per selection.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::{
    choropleth::Choropleth,
    config::Config,
    data::{Dataset, Record},
    load::{load_dataset, DatasetCache},
    select::{district_options, select, state_options, Selection},
    stats::{Distribution, Summary},
};

/// Everything shown for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub selection: Selection,
    /// Records matching the selection; empty when nothing matches.
    pub records: Vec<Record>,
    pub summary: Option<Summary>,
    pub distribution: Option<Distribution>,
    pub choropleth: Choropleth,
}

/// Dropdown contents for a state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    pub states: Vec<String>,
    pub districts: Vec<String>,
}

#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        let cache = DatasetCache::new(config.cache_ttl());
        Self { config, cache }
    }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    /// The aggregated dataset, reloaded once the cache expires.
    pub fn dataset(&mut self) -> Arc<Dataset> {
        let config = &self.config;
        self.cache.get_or_load(|| load_dataset(config))
    }

    /// Force the next access to reload from disk.
    pub fn refresh(&mut self) { self.cache.invalidate() }

    pub fn options(&mut self, state: &str) -> Options {
        let dataset = self.dataset();
        Options {
            states: state_options(dataset.records()),
            districts: district_options(dataset.records(), state),
        }
    }

    pub fn view(&mut self, selection: &Selection) -> View {
        let dataset = self.dataset();
        let records = select(dataset.records(), &selection.state, &selection.district);
        debug!(state = %selection.state, district = %selection.district, matches = records.len(), "selection");

        View {
            selection: selection.clone(),
            summary: Summary::for_selection(dataset.records(), selection),
            distribution: Distribution::for_selection(dataset.records(), selection),
            choropleth: Choropleth::build(&dataset.schema, dataset.records(), selection),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Layer};

    fn dashboard() -> Dashboard {
        Dashboard::new(Config {
            primary_path: "/nonexistent/a.shp".into(),
            fallback_path: "/nonexistent/b.shp".into(),
            ..Config::default()
        })
    }

    #[test]
    fn placeholder_view() {
        let mut dashboard = dashboard();
        let view = dashboard.view(&Selection::default());
        assert_eq!(view.records.len(), 1);
        let summary = view.summary.unwrap();
        assert_eq!(summary.title, "National Average");
        assert_eq!(summary.category_value.as_deref(), Some("Highly Suitable"));
        assert_eq!(summary.layer_value.as_deref(), Some("50.00"));
        assert_eq!(view.choropleth.features.len(), 1);
    }

    #[test]
    fn unknown_state_is_empty_not_an_error() {
        let mut dashboard = dashboard();
        let selection = Selection::new("Nowhere", "All Districts", Category::Mitigation, Layer::AridityIndex);
        let view = dashboard.view(&selection);
        assert!(view.records.is_empty());
        assert!(view.summary.is_none());
        assert!(view.distribution.is_none());
        assert!(view.choropleth.features.is_empty());
    }

    #[test]
    fn options_come_from_the_dataset() {
        let mut dashboard = dashboard();
        let options = dashboard.options("Dummy State");
        assert_eq!(options.states, vec!["National Average", "Dummy State"]);
        assert_eq!(options.districts, vec!["All Districts", "Dummy District"]);
    }

    #[test]
    fn dataset_is_cached() {
        let mut dashboard = dashboard();
        let first = dashboard.dataset();
        assert!(Arc::ptr_eq(&first, &dashboard.dataset()));
        dashboard.refresh();
        assert!(!Arc::ptr_eq(&first, &dashboard.dataset()));
    }
}
