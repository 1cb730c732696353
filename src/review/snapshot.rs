use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::errors::TriageError;
use crate::models::Classification;

/// Load the human-editable override snapshot. A missing file is an empty
/// override set; an unrecognized verdict token is fatal — a corrupt snapshot
/// must not silently become an empty one.
pub fn load(path: &Path) -> Result<BTreeMap<String, Classification>, TriageError> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let raw: serde_yaml::Value = serde_yaml::from_str(&content)?;
    let mapping = match raw {
        serde_yaml::Value::Null => serde_yaml::Mapping::new(),
        serde_yaml::Value::Mapping(mapping) => mapping,
        other => {
            return Err(TriageError::Snapshot(format!(
                "Expected a mapping of document ids, got {:?}",
                other
            )))
        }
    };

    let mut overrides = BTreeMap::new();
    for (key, value) in &mapping {
        let docid = key
            .as_str()
            .ok_or_else(|| TriageError::Snapshot(format!("Non-string document id: {:?}", key)))?;
        let classification = Classification::from_yaml(value).map_err(|_| {
            TriageError::Snapshot(format!(
                "{:?} was not recognized as a classification for {}",
                value, docid
            ))
        })?;
        overrides.insert(docid.to_string(), classification);
    }
    Ok(overrides)
}

/// Write the override table back out, keys sorted for stable diffs.
pub fn save(path: &Path, overrides: &BTreeMap<String, Classification>) -> Result<(), TriageError> {
    let content = serde_yaml::to_string(overrides)?;
    std::fs::write(path, content)?;
    info!(entries = overrides.len(), path = %path.display(), "Saved override snapshot");
    Ok(())
}
