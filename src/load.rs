//! Loading the district shapefile, with fallbacks, and caching the aggregated result.

use std::{path::PathBuf, sync::Arc, time::{Duration, Instant}};

use anyhow::Result;
use geo::Point;
use tracing::{error, info, warn};

use crate::{
    aggregate::aggregate,
    catalog::{Category, Layer},
    config::Config,
    data::{Dataset, Field, FieldKind, Record, Schema, Value},
    error::DataError,
};

/// WKT of EPSG:4326, used for the placeholder dataset.
const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// Pick the primary path if it exists, else the fallback.
pub fn resolve_path(config: &Config) -> Result<PathBuf, DataError> {
    [&config.primary_path, &config.fallback_path].into_iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| DataError::MissingData {
            primary: config.primary_path.clone(),
            fallback: config.fallback_path.clone(),
        })
}

/// Read and aggregate the configured shapefile.
pub fn try_load_dataset(config: &Config) -> Result<Dataset> {
    let path = resolve_path(config)?;
    info!(path = %path.display(), "loading shapefile");
    let districts = Dataset::read_shapefile(&path, &config.schema_options())?;
    info!(districts = districts.len(), fields = districts.schema.len(), "loaded districts");
    aggregate(&districts)
}

/// Read and aggregate the configured shapefile, substituting the placeholder dataset on any failure.
pub fn load_dataset(config: &Config) -> Dataset {
    match try_load_dataset(config) {
        Ok(dataset) => dataset,
        Err(err) => {
            match err.downcast_ref::<DataError>() {
                Some(missing @ DataError::MissingData { .. }) => warn!("{missing}; using placeholder data"),
                _ => error!("Error loading shapefile: {err:#}; using placeholder data"),
            }
            placeholder_dataset()
        }
    }
}

/// A single hand-built district, aggregated, so the rest of the system still has rows to show.
pub fn placeholder_dataset() -> Dataset {
    let gw = Layer::GwDevelopmentStage.column();
    let labels = [
        (Category::Adaptation, "Highly Suitable"),
        (Category::Mitigation, "Moderately Suitable"),
        (Category::Replacement, "Less Suitable"),
        (Category::GeneralSuitabilityIndex, "Highly Suitable"),
    ];

    let mut fields = vec![Field { name: gw.into(), kind: FieldKind::Numeric }];
    let mut record = Record::district("Dummy State", "Dummy District")
        .with(gw, Value::number(50.0))
        .with_geometry(Point::new(78.5, 20.5));
    for (category, label) in labels {
        fields.push(Field { name: category.column().into(), kind: FieldKind::Text });
        record = record.with(category.column(), Value::text(label));
    }

    let districts = Dataset::new(Schema::new(fields), vec![record], Some(WGS84_WKT.into()));
    // Aggregating one well-formed record cannot fail; keep the bare district if it somehow does.
    aggregate(&districts).unwrap_or(districts)
}

/// Aggregated dataset shared for a fixed time-to-live, then rebuilt wholesale.
#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<(Instant, Arc<Dataset>)>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self { Self { ttl, entry: None } }

    /// Cached dataset if still fresh, else the result of `load` (which is then cached).
    pub fn get_or_load(&mut self, load: impl FnOnce() -> Dataset) -> Arc<Dataset> {
        self.get_or_load_at(Instant::now(), load)
    }

    fn get_or_load_at(&mut self, now: Instant, load: impl FnOnce() -> Dataset) -> Arc<Dataset> {
        if let Some((loaded_at, dataset)) = &self.entry {
            if now.saturating_duration_since(*loaded_at) < self.ttl {
                return Arc::clone(dataset);
            }
        }
        let dataset = Arc::new(load());
        self.entry = Some((now, Arc::clone(&dataset)));
        dataset
    }

    /// Drop the cached dataset so the next access reloads.
    pub fn invalidate(&mut self) { self.entry = None }
}
