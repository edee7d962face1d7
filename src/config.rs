use std::{fs, path::{Path, PathBuf}, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::SchemaOptions;

/// Where the data lives and how it is processed.
///
/// Every field has a default, so a config file only needs the values it changes:
///
/// ```toml
/// primary_path = "data/shapefiles/Solar_Suitability_layer_optimized.shp"
/// cache_ttl_secs = 600
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred (optimized) shapefile.
    pub primary_path: PathBuf,
    /// Used when the primary shapefile is absent.
    pub fallback_path: PathBuf,
    /// How long a loaded dataset stays valid.
    pub cache_ttl_secs: u64,
    /// Douglas-Peucker tolerance for the optimizer, in source units.
    pub simplify_tolerance: f64,
    /// Columns always coerced to numbers.
    pub numeric_columns: Vec<String>,
    /// Fraction of non-blank text values that must parse for a column to count as numeric.
    pub numeric_majority: f64,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = SchemaOptions::default();
        Self {
            primary_path: "data/shapefiles/Solar_Suitability_layer_optimized.shp".into(),
            fallback_path: "data/shapefiles/Solar_Suitability_layer.shp".into(),
            cache_ttl_secs: 3600,
            simplify_tolerance: 0.01,
            numeric_columns: defaults.numeric_columns,
            numeric_majority: defaults.numeric_majority,
        }
    }
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse `path` if given, else use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    #[inline] pub fn cache_ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            numeric_columns: self.numeric_columns.clone(),
            numeric_majority: self.numeric_majority,
        }
    }
}
