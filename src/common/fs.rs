use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Create the parent directory of a file path, if it has one.
pub(crate) fn ensure_parent_exists(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir_exists(parent),
        _ => Ok(()),
    }
}

/// Path of a shapefile sidecar, e.g. `districts.prj` next to `districts.shp`.
#[inline]
pub(crate) fn sidecar(path: &Path, ext: &str) -> PathBuf { path.with_extension(ext) }

/// Read the coordinate reference WKT from the `.prj` sidecar, if present.
pub(crate) fn read_prj(shp_path: &Path) -> Result<Option<String>> {
    let prj = sidecar(shp_path, "prj");
    if !prj.is_file() { return Ok(None) }
    let wkt = fs::read_to_string(&prj)
        .with_context(|| format!("Failed to read projection file {}", prj.display()))?;
    Ok(Some(wkt.trim().to_string()))
}

/// Write coordinate reference WKT to the `.prj` sidecar of `shp_path`.
pub(crate) fn write_prj(shp_path: &Path, wkt: &str) -> Result<()> {
    let prj = sidecar(shp_path, "prj");
    fs::write(&prj, wkt)
        .with_context(|| format!("Failed to write projection file {}", prj.display()))
}
