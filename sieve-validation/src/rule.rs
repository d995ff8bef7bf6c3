//! Rule grammar.
//!
//! A field's rule chain is written either as delimited text or as a
//! structured list, and both parse to the same `Vec<RuleSpec>`:
//!
//! ```
//! use sieve_validation::rule::{parse_chain, Delimiters, RuleEntry, RuleSource};
//! use serde_json::json;
//!
//! let d = Delimiters::default();
//! let text = parse_chain(&RuleSource::from("required|between_len,3;8"), &d);
//! let structured = parse_chain(
//!     &RuleSource::from(vec![
//!         RuleEntry::from("required"),
//!         RuleEntry::from(("between_len", json!([3, 8]))),
//!     ]),
//!     &d,
//! );
//! assert_eq!(text, structured);
//! ```
//!
//! Parsing is purely syntactic; whether a rule name exists is decided at
//! dispatch time.

use crate::value::to_text;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Rule grammar delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    /// Between rules, `|` by default
    pub rule: String,
    /// Between a rule name and its parameters, `,` by default
    pub param: String,
    /// Between list parameters, `;` by default
    pub array: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            rule: "|".to_string(),
            param: ",".to_string(),
            array: ";".to_string(),
        }
    }
}

/// One rule parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Text(String),
    /// Only produced by the structured syntax (`["rule", [["a", "b"]]]`)
    List(Vec<String>),
}

impl Param {
    /// Text of a scalar parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Text(text) => Some(text),
            Param::List(_) => None,
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Param::List(items.iter().map(to_text).collect()),
            other => Param::Text(to_text(other)),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Text(text) => f.write_str(text),
            Param::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for Param {
    fn from(text: &str) -> Self {
        Param::Text(text.to_string())
    }
}

/// A parsed rule: a name and its ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub params: Vec<Param>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Text of the `index`th parameter, if it is a scalar.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).and_then(Param::as_str)
    }
}

/// An ordered rule chain for one field.
pub type RuleChain = Vec<RuleSpec>;

/// One element of a structured chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// A rule written inline, `"required"` or `"max_len,5"`
    Inline(String),
    /// A rule name with a parameter list or a single parameter
    Pair(String, Value),
}

impl From<&str> for RuleEntry {
    fn from(rule: &str) -> Self {
        RuleEntry::Inline(rule.to_string())
    }
}

impl From<String> for RuleEntry {
    fn from(rule: String) -> Self {
        RuleEntry::Inline(rule)
    }
}

impl<V: Into<Value>> From<(&str, V)> for RuleEntry {
    fn from((name, params): (&str, V)) -> Self {
        RuleEntry::Pair(name.to_string(), params.into())
    }
}

/// The unparsed rule chain of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSource {
    Text(String),
    Structured(Vec<RuleEntry>),
}

impl From<&str> for RuleSource {
    fn from(text: &str) -> Self {
        RuleSource::Text(text.to_string())
    }
}

impl From<String> for RuleSource {
    fn from(text: String) -> Self {
        RuleSource::Text(text)
    }
}

impl From<Vec<RuleEntry>> for RuleSource {
    fn from(entries: Vec<RuleEntry>) -> Self {
        RuleSource::Structured(entries)
    }
}

/// Field name to rule chain, iterated in insertion order.
pub type Ruleset = IndexMap<String, RuleSource>;

/// Build a [`Ruleset`] from `(field, rules)` pairs.
///
/// ```
/// use sieve_validation::rule::ruleset;
///
/// let rules = ruleset([("username", "required|alpha_numeric"), ("bio", "max_len,200")]);
/// assert_eq!(rules.len(), 2);
/// ```
pub fn ruleset<I, K, S>(pairs: I) -> Ruleset
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<RuleSource>,
{
    pairs
        .into_iter()
        .map(|(field, rules)| (field.into(), rules.into()))
        .collect()
}

/// Parse a field's rule chain.
pub fn parse_chain(source: &RuleSource, delimiters: &Delimiters) -> RuleChain {
    match source {
        RuleSource::Text(text) => text
            .split(delimiters.rule.as_str())
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| parse_inline(segment, delimiters))
            .collect(),
        RuleSource::Structured(entries) => entries
            .iter()
            .map(|entry| parse_rule(entry, delimiters))
            .collect(),
    }
}

/// Parse one chain element.
pub fn parse_rule(entry: &RuleEntry, delimiters: &Delimiters) -> RuleSpec {
    match entry {
        RuleEntry::Inline(text) => parse_inline(text, delimiters),
        RuleEntry::Pair(name, params) => {
            RuleSpec::new(name.trim(), structured_params(params, delimiters))
        }
    }
}

/// `name` or `name<param>params`; the parameter text is split on the array
/// delimiter when it has one, otherwise on the parameter delimiter.
fn parse_inline(text: &str, delimiters: &Delimiters) -> RuleSpec {
    match text.split_once(delimiters.param.as_str()) {
        Some((name, params)) => {
            let separator = if params.contains(delimiters.array.as_str()) {
                delimiters.array.as_str()
            } else {
                delimiters.param.as_str()
            };
            let params = params.split(separator).map(Param::from).collect();
            RuleSpec::new(name.trim(), params)
        }
        None => RuleSpec::new(text.trim(), Vec::new()),
    }
}

fn structured_params(params: &Value, delimiters: &Delimiters) -> Vec<Param> {
    match params {
        Value::Array(items) => items.iter().map(Param::from_value).collect(),
        Value::String(text) if text.contains(delimiters.array.as_str()) => text
            .split(delimiters.array.as_str())
            .map(Param::from)
            .collect(),
        scalar => vec![Param::from_value(scalar)],
    }
}

/// Render a chain back to delimited text.
///
/// Parameters are joined with the array delimiter when there is more than
/// one, so re-parsing yields the same chain. List parameters flatten.
pub fn render_chain(chain: &[RuleSpec], delimiters: &Delimiters) -> String {
    chain
        .iter()
        .map(|spec| {
            if spec.params.is_empty() {
                return spec.name.clone();
            }
            let params: Vec<String> = spec
                .params
                .iter()
                .map(|param| match param {
                    Param::Text(text) => text.clone(),
                    Param::List(items) => items.join(&delimiters.array),
                })
                .collect();
            format!(
                "{}{}{}",
                spec.name,
                delimiters.param,
                params.join(&delimiters.array)
            )
        })
        .collect::<Vec<_>>()
        .join(&delimiters.rule)
}
