// Validation outcomes and failure records

use crate::rule::Param;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Rule name recorded for input keys that have no validation rule.
pub const MISMATCH_RULE: &str = "mismatch";

/// What a validator says about one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail,
    /// A structured failure; treated exactly like [`Verdict::Fail`], the
    /// payload is not interpreted
    Rejected(Value),
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Verdict::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed { Verdict::Pass } else { Verdict::Fail }
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<E> {
    Valid,
    Invalid(E),
}

impl<E> Outcome<E> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    /// The failure payload, if any.
    pub fn invalid(self) -> Option<E> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(errors) => Some(errors),
        }
    }
}

/// One failed validation: which field, its value, and the rule that failed.
///
/// Messages are resolved later, see [`crate::message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub field: String,

    /// Whole field value, even when one element of a list failed
    pub value: Value,

    pub rule: String,

    pub params: Vec<Param>,
}

impl FailureRecord {
    pub fn new(
        field: impl Into<String>,
        value: Value,
        rule: impl Into<String>,
        params: Vec<Param>,
    ) -> Self {
        Self {
            field: field.into(),
            value,
            rule: rule.into(),
            params,
        }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.rule)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}

/// Ordered failures of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorReport {
    pub errors: Vec<FailureRecord>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, record: FailureRecord) {
        self.errors.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FailureRecord> {
        self.errors.iter()
    }

    /// The failure recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FailureRecord> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Failure records as JSON.
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "errors": self.errors })
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<Vec<FailureRecord>> for ErrorReport {
    fn from(errors: Vec<FailureRecord>) -> Self {
        Self { errors }
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = &'a FailureRecord;
    type IntoIter = std::slice::Iter<'a, FailureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_from_bool() {
        assert_eq!(Verdict::from(true), Verdict::Pass);
        assert!(Verdict::from(false).is_failure());
        assert!(Verdict::Rejected(json!(["bad"])).is_failure());
    }

    #[test]
    fn test_outcome() {
        let ok: Outcome<ErrorReport> = Outcome::Valid;
        assert!(ok.is_valid());
        assert_eq!(ok.invalid(), None);

        let report = ErrorReport::from(vec![FailureRecord::new("x", json!(""), "required", vec![])]);
        let bad = Outcome::Invalid(report.clone());
        assert!(!bad.is_valid());
        assert_eq!(bad.invalid(), Some(report));
    }

    #[test]
    fn test_report_lookup_and_display() {
        let mut report = ErrorReport::new();
        report.add(FailureRecord::new(
            "name",
            json!("ab"),
            "min_len",
            vec![Param::from("3")],
        ));
        report.add(FailureRecord::new("email", json!("x"), "valid_email", vec![]));

        assert_eq!(report.len(), 2);
        assert_eq!(report.get("email").unwrap().rule, "valid_email");
        assert!(report.get("age").is_none());
        assert_eq!(report.to_string(), "name: min_len(3)\nemail: valid_email\n");
    }

    #[test]
    fn test_report_to_json() {
        let report = ErrorReport::from(vec![FailureRecord::new(
            "tags",
            json!(["ok", ""]),
            "required",
            vec![],
        )]);
        assert_eq!(
            report.to_json(),
            json!({"errors": [{"field": "tags", "value": ["ok", ""], "rule": "required", "params": []}]})
        );
    }
}
