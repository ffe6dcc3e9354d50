use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Run input: the keywords to search for plus optional per-run overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    #[serde(default, deserialize_with = "keywords_as_text")]
    pub keywords: Vec<String>,
    pub max_items: Option<usize>,
    pub output_format: Option<String>,
}

/// Accept any scalar keyword, e.g. `42` becomes `"42"`. Nulls become empty and are skipped later.
fn keywords_as_text<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

impl SearchInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Input(format!(
                "JSON file not found at: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let input: SearchInput = serde_json::from_str(&raw).map_err(|e| {
            Error::Input(format!("Failed to parse input file {}: {}", path.display(), e))
        })?;

        if input.keywords.is_empty() {
            return Err(Error::Input(
                "Input file must contain a non-empty 'keywords' array.".to_string(),
            ));
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_input(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_full_input() {
        let file = write_input(r#"{"keywords": ["cats", "dogs"], "maxItems": 20, "outputFormat": "csv"}"#);
        let input = SearchInput::from_file(file.path()).unwrap();
        assert_eq!(input.keywords, vec!["cats", "dogs"]);
        assert_eq!(input.max_items, Some(20));
        assert_eq!(input.output_format.as_deref(), Some("csv"));
    }

    #[test]
    fn test_non_string_keywords_coerced_to_text() {
        let file = write_input(r#"{"keywords": ["cats", 42, 1.5, true, null]}"#);
        let input = SearchInput::from_file(file.path()).unwrap();
        assert_eq!(input.keywords, vec!["cats", "42", "1.5", "true", ""]);
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let file = write_input(r#"{"keywords": []}"#);
        let err = SearchInput::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Input(_)));

        let file = write_input(r#"{"maxItems": 5}"#);
        assert!(SearchInput::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = SearchInput::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
