use std::path::PathBuf;

use thiserror::Error;

/// Failures that callers of the loading and aggregation layer can tell apart.
///
/// Most of these are recovered close to where they occur: missing data falls
/// back to a placeholder dataset, and a field that cannot be computed degrades
/// to `None` or `"Mixed"` instead of aborting the rollup.
#[derive(Debug, Error)]
pub enum DataError {
    /// Neither the primary nor the fallback shapefile exists.
    #[error("no shapefile found at {} or {}", primary.display(), fallback.display())]
    MissingData { primary: PathBuf, fallback: PathBuf },

    /// A single attribute of a rollup could not be computed.
    #[error("could not compute field {field}: {reason}")]
    FieldComputation { field: String, reason: String },

    /// Input contained nothing to aggregate.
    #[error("cannot aggregate an empty record collection")]
    EmptyInput,

    /// A shape in the source file is not something we can use as district geometry.
    #[error("unsupported geometry: {0}")]
    Geometry(String),

    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),
}
