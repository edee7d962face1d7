//! Format-specific reading and writing.
//!
//! - `shp` - Shapefile input (district records) and output (optimized copies)
//! - `frame` - Polars conversions: numeric coercion and the export table
//! - `csv` - CSV export
//! - `parquet` - Parquet export (requires `parquet` feature)

pub(crate) mod csv;
pub(crate) mod frame;
pub(crate) mod shp;

#[cfg(feature = "parquet")]
pub(crate) mod parquet;

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use crate::{common, data::Dataset};

impl Dataset {
    /// Write the export table as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        csv::write_csv(&mut self.to_dataframe()?, path)
    }

    /// The export table as CSV bytes.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        csv::write_csv_bytes(&self.to_dataframe()?)
    }

    /// Write the export table as Parquet.
    #[cfg(feature = "parquet")]
    pub fn write_parquet(&self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path)?;
        parquet::write_parquet(&mut self.to_dataframe()?, path)
    }

    /// Write the export table in the format named by the file extension (`csv` or `parquet`).
    pub fn export(&self, path: &Path) -> Result<()> {
        let ext = path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => self.write_csv(path)?,
            #[cfg(feature = "parquet")]
            Some("parquet") => self.write_parquet(path)?,
            _ => bail!("Unsupported export format: {}", path.display()),
        }
        info!(path = %path.display(), rows = self.len(), "exported dataset");
        Ok(())
    }
}
