use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::errors::TriageError;
use crate::models::Classification;

/// Immutable mapping from weakness identifier (e.g. "CWE-787") to its
/// memory-safety classification, loaded once at startup.
pub struct Vocabulary {
    entries: HashMap<String, Classification>,
}

impl Vocabulary {
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        if !path.exists() {
            return Err(TriageError::Config(format!(
                "Vocabulary file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_yaml_str(&content)?;
        info!(entries = vocabulary.len(), path = %path.display(), "Loaded weakness vocabulary");
        Ok(vocabulary)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, TriageError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mapping = match raw {
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            serde_yaml::Value::Mapping(mapping) => mapping,
            other => {
                return Err(TriageError::Vocabulary(format!(
                    "Expected a mapping of weakness identifiers, got {:?}",
                    other
                )))
            }
        };

        let mut entries = HashMap::with_capacity(mapping.len());
        for (key, value) in &mapping {
            let weakness_id = key.as_str().ok_or_else(|| {
                TriageError::Vocabulary(format!("Non-string weakness identifier: {:?}", key))
            })?;
            let classification = Classification::from_yaml(value).map_err(|_| {
                TriageError::Vocabulary(format!(
                    "{:?} was not recognized as a classification for {}",
                    value, weakness_id
                ))
            })?;
            entries.insert(weakness_id.to_string(), classification);
        }

        Ok(Self { entries })
    }

    pub fn lookup(&self, weakness_id: &str) -> Option<Classification> {
        self.entries.get(weakness_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
