//! Flat display records loaded from page data files

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// One row of display data, e.g. one lecture's week, date, topic and notes path.
///
/// Fields keep their declaration order. Scalar YAML values are stored as their
/// display strings; `null` leaves the field absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentRecord {
    fields: IndexMap<String, String>,
}

impl ContentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Look up a field's display string
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Look up a field, treating an empty string as absent
    pub fn get_non_empty(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// Whether a field is set to a truthy value (`true`, `yes`, `1`)
    pub fn flag(&self, field: &str) -> bool {
        matches!(self.get(field), Some("true" | "yes" | "1"))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ContentRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, serde_yaml::Value>::deserialize(deserializer)?;
        let mut fields = IndexMap::with_capacity(raw.len());

        for (key, value) in raw {
            let display = match value {
                serde_yaml::Value::Null => continue,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::String(s) => s,
                other => {
                    return Err(de::Error::custom(format!(
                        "field `{}` must be a scalar, found {:?}",
                        key, other
                    )))
                }
            };
            fields.insert(key, display);
        }

        Ok(Self { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scalars() {
        let yaml = r#"
week: 0
date: '08/31'
topics: Python Basics
notes: /basics
graded: true
hw:
"#;
        let record: ContentRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.get("week"), Some("0"));
        assert_eq!(record.get("date"), Some("08/31"));
        assert_eq!(record.get("topics"), Some("Python Basics"));
        assert!(record.flag("graded"));
        assert_eq!(record.get("hw"), None);
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_field_order_preserved() {
        let yaml = "topics: A\nweek: 3\nnotes: /a\n";
        let record: ContentRecord = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["topics", "week", "notes"]);
    }

    #[test]
    fn test_nested_value_rejected() {
        let yaml = "topics:\n  - a\n  - b\n";
        let result: Result<ContentRecord, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_non_empty() {
        let record = ContentRecord::new().with("hw", "").with("notes", "/ml");
        assert_eq!(record.get("hw"), Some(""));
        assert_eq!(record.get_non_empty("hw"), None);
        assert_eq!(record.get_non_empty("notes"), Some("/ml"));
    }
}
