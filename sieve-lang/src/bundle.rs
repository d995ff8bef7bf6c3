//! Message bundles: rule name to message template for one language.

use crate::{LangError, Result};
use std::collections::HashMap;

/// Templates for one language, keyed by rule name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object of `"rule": "template"` pairs.
    ///
    /// Nested objects are flattened into dotted keys (`{"a": {"b": ".."}}`
    /// becomes `a.b`). Any other value type is a parse error.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut bundle = Self::new();
        bundle.insert_object(None, data)?;
        Ok(bundle)
    }

    fn insert_object(
        &mut self,
        prefix: Option<&str>,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        for (key, value) in data {
            let key = match prefix {
                Some(prefix) => format!("{}.{}", prefix, key),
                None => key,
            };

            match value {
                serde_json::Value::String(template) => {
                    self.messages.insert(key, template);
                }
                serde_json::Value::Object(nested) => self.insert_object(Some(&key), nested)?,
                other => {
                    return Err(LangError::ParseError(format!(
                        "message '{}' must be a string, found {}",
                        key, other
                    )));
                }
            }
        }
        Ok(())
    }

    /// Add or replace a template.
    pub fn add(&mut self, rule: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(rule.into(), template.into());
    }

    /// Copy every template of `other` over this bundle.
    pub fn merge(&mut self, other: &MessageBundle) {
        for (rule, template) in &other.messages {
            self.messages.insert(rule.clone(), template.clone());
        }
    }

    /// Template for a rule.
    pub fn get(&self, rule: &str) -> Option<&str> {
        self.messages.get(rule).map(String::as_str)
    }

    /// Whether the bundle has a template for `rule`.
    pub fn has(&self, rule: &str) -> bool {
        self.messages.contains_key(rule)
    }

    /// Rule names with a template.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.messages.keys()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let bundle = MessageBundle::from_json(
            r#"{"required": "The {field} field is required", "max_len": "Too long"}"#,
        )
        .unwrap();

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("required"), Some("The {field} field is required"));
        assert!(bundle.has("max_len"));
        assert!(!bundle.has("min_len"));
    }

    #[test]
    fn test_nested_keys_are_flattened() {
        let bundle = MessageBundle::from_json(r#"{"custom": {"is_odd": "Odd!"}}"#).unwrap();
        assert_eq!(bundle.get("custom.is_odd"), Some("Odd!"));
    }

    #[test]
    fn test_non_string_message_is_rejected() {
        let err = MessageBundle::from_json(r#"{"required": 3}"#).unwrap_err();
        assert!(matches!(err, LangError::ParseError(_)));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = MessageBundle::new();
        base.add("required", "base");
        base.add("alpha", "letters");

        let mut extra = MessageBundle::new();
        extra.add("required", "override");

        base.merge(&extra);
        assert_eq!(base.get("required"), Some("override"));
        assert_eq!(base.get("alpha"), Some("letters"));
    }
}
