//! Feature dataset loading
//!
//! The dataset is a JSON array of feature records:
//!
//! ```json
//! [{"location": {"latitude": 407838351, "longitude": -746143763}, "name": "Patriots Path, Mendham, NJ"}]
//! ```
//!
//! A missing `name` reads as an unnamed feature and `[]` is an empty
//! dataset. An empty document, any syntax error or an out-of-range location
//! fails the whole load.

use crate::{Feature, FeatureStore, GuideError, Result};
use std::io::Read;
use std::path::Path;

/// Parse feature records from a JSON document
pub fn parse_features(json: &str) -> Result<Vec<Feature>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse feature records from any reader
pub fn read_features<R: Read>(reader: R) -> Result<Vec<Feature>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load the dataset at `path` into a ready-to-serve store
///
/// Every failure is reported as [`GuideError::DatasetLoad`] naming the file.
pub fn load_features(path: impl AsRef<Path>) -> Result<FeatureStore> {
    let path = path.as_ref();
    #[cfg(feature = "profiling")]
    profiling::scope!("dataset::load_features");

    let describe = |err: GuideError| {
        let reason = match err {
            GuideError::DatasetLoad(reason) => reason,
            other => other.to_string(),
        };
        GuideError::DatasetLoad(format!("{}: {}", path.display(), reason))
    };

    let file = std::fs::File::open(path).map_err(|err| describe(err.into()))?;
    let records = read_features(std::io::BufReader::new(file)).map_err(describe)?;
    tracing::debug!("Read {} records from {}", records.len(), path.display());

    FeatureStore::load(records).map_err(describe)
}
