use serde::{Deserialize, Serialize};

use crate::errors::TriageError;

/// Three-valued judgment of whether an advisory concerns a memory-safety
/// weakness class. `Maybe` is a real verdict, not an absent one: it queues
/// the advisory for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Yes,
    No,
    Maybe,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }

    /// Parse the canonical string encoding used in the database and the
    /// override snapshot.
    pub fn from_token(token: &str) -> Result<Self, TriageError> {
        match token {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "maybe" => Ok(Self::Maybe),
            other => Err(TriageError::Vocabulary(format!(
                "{:?} was not recognized as a classification",
                other
            ))),
        }
    }

    /// Parse a YAML value. Booleans are accepted as yes/no synonyms since
    /// the vocabulary file is hand-edited.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Self, TriageError> {
        match value {
            serde_yaml::Value::Bool(true) => Ok(Self::Yes),
            serde_yaml::Value::Bool(false) => Ok(Self::No),
            serde_yaml::Value::String(token) => Self::from_token(token),
            other => Err(TriageError::Vocabulary(format!(
                "{:?} was not recognized as a classification",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_as_str() {
        assert_eq!(Classification::Yes.as_str(), "yes");
        assert_eq!(Classification::No.as_str(), "no");
        assert_eq!(Classification::Maybe.as_str(), "maybe");
    }

    #[test]
    fn test_classification_from_token() {
        assert_eq!(Classification::from_token("yes").unwrap(), Classification::Yes);
        assert_eq!(Classification::from_token("no").unwrap(), Classification::No);
        assert_eq!(Classification::from_token("maybe").unwrap(), Classification::Maybe);
    }

    #[test]
    fn test_classification_from_token_rejects_unknown() {
        assert!(Classification::from_token("YES").is_err());
        assert!(Classification::from_token("unsure").is_err());
        assert!(Classification::from_token("").is_err());
    }

    #[test]
    fn test_classification_from_yaml_bool_synonyms() {
        let yes: serde_yaml::Value = serde_yaml::from_str("true").unwrap();
        let no: serde_yaml::Value = serde_yaml::from_str("false").unwrap();
        assert_eq!(Classification::from_yaml(&yes).unwrap(), Classification::Yes);
        assert_eq!(Classification::from_yaml(&no).unwrap(), Classification::No);
    }

    #[test]
    fn test_classification_from_yaml_rejects_numbers() {
        let value: serde_yaml::Value = serde_yaml::from_str("1").unwrap();
        assert!(Classification::from_yaml(&value).is_err());
    }

    #[test]
    fn test_classification_serialization_roundtrip() {
        let json = serde_json::to_string(&Classification::Maybe).unwrap();
        assert_eq!(json, "\"maybe\"");
        let parsed: Classification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Classification::Maybe);
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(format!("{}", Classification::Yes), "yes");
        assert_eq!(format!("{}", Classification::Maybe), "maybe");
    }
}
