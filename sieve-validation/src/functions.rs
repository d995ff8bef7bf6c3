//! Named functions usable as filters.
//!
//! When a filter name matches neither a built-in nor a custom filter, the
//! dispatcher looks here. A function receives the value plus the rule's
//! parameters as text arguments, so `substr,0,3` calls `substr(value, "0", "3")`.

use crate::builtins::filters::{to_whole_number, TAG_REGEX};
use crate::builtins::validators::as_number;
use crate::value::to_text;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type NamedFunction = Arc<dyn Fn(Value, &[String]) -> Value + Send + Sync>;

static LEADING_FLOAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

const DEFAULT_TRIM: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Name to function table.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, NamedFunction>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table preloaded with the string and number helpers.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.insert("trim", |v, args| text_fn(v, |s| trim_with(s, args, Side::Both)));
        table.insert("ltrim", |v, args| text_fn(v, |s| trim_with(s, args, Side::Start)));
        table.insert("rtrim", |v, args| text_fn(v, |s| trim_with(s, args, Side::End)));
        table.insert("strtolower", |v, _| text_fn(v, |s| s.to_lowercase()));
        table.insert("strtoupper", |v, _| text_fn(v, |s| s.to_uppercase()));
        table.insert("ucfirst", |v, _| text_fn(v, |s| map_first(s, char::to_uppercase)));
        table.insert("lcfirst", |v, _| text_fn(v, |s| map_first(s, char::to_lowercase)));
        table.insert("ucwords", |v, _| text_fn(v, ucwords));
        table.insert("strrev", |v, _| text_fn(v, |s| s.chars().rev().collect()));
        table.insert("strip_tags", |v, _| text_fn(v, strip_tags));
        table.insert("htmlspecialchars", |v, _| text_fn(v, html_special_chars));
        table.insert("nl2br", |v, _| text_fn(v, |s| s.replace('\n', "<br />\n")));
        table.insert("intval", |v, _| Value::from(to_whole_number(&v)));
        table.insert("floatval", |v, _| float_value(&v));
        table.insert("strval", |v, _| Value::String(to_text(&v)));
        table.insert("substr", |v, args| text_fn(v, |s| substr(s, args)));
        table.insert("str_pad", |v, args| text_fn(v, |s| str_pad(s, args)));
        table.insert("round", |v, args| round(&v, args));
        table.insert("abs", |v, _| abs(v));
        table
    }

    /// Add or replace a function.
    pub fn insert<F>(&mut self, name: &str, function: F)
    where
        F: Fn(Value, &[String]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&NamedFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_list().entries(names).finish()
    }
}

fn text_fn(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => value,
        other => Value::String(f(&to_text(&other))),
    }
}

enum Side {
    Start,
    End,
    Both,
}

fn trim_with(s: &str, args: &[String], side: Side) -> String {
    let mask: Vec<char> = match args.first() {
        Some(chars) => chars.chars().collect(),
        None => DEFAULT_TRIM.to_vec(),
    };
    let mask = mask.as_slice();
    let trimmed = match side {
        Side::Start => s.trim_start_matches(mask),
        Side::End => s.trim_end_matches(mask),
        Side::Both => s.trim_matches(mask),
    };
    trimmed.to_string()
}

fn map_first<I>(s: &str, f: impl Fn(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first).chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-case the first letter of every whitespace-separated word.
pub(crate) fn ucwords(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

fn strip_tags(s: &str) -> String {
    TAG_REGEX.replace_all(s, "").into_owned()
}

fn html_special_chars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

fn float_value(value: &Value) -> Value {
    let number = match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => leading_float(s),
        other => as_number(other).unwrap_or(0.0),
    };
    serde_json::Number::from_f64(number).map_or(Value::from(0), Value::Number)
}

/// Longest numeric prefix of `s`, `0.0` when there is none.
fn leading_float(s: &str) -> f64 {
    LEADING_FLOAT_REGEX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

fn int_arg(args: &[String], index: usize) -> Option<i64> {
    args.get(index).and_then(|a| a.trim().parse().ok())
}

/// Character-based `substr(start, length?)`; negative values count from
/// the end.
fn substr(s: &str, args: &[String]) -> String {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;

    let start = int_arg(args, 0).unwrap_or(0);
    let start = if start < 0 { (len + start).max(0) } else { start.min(len) };

    let end = match int_arg(args, 1) {
        Some(n) if n < 0 => (len + n).max(start),
        Some(n) => start.saturating_add(n).min(len),
        None => len,
    };

    chars[start as usize..end as usize].iter().collect()
}

/// `str_pad(length, pad = " ", "STR_PAD_RIGHT" | "STR_PAD_LEFT" | "STR_PAD_BOTH")`
fn str_pad(s: &str, args: &[String]) -> String {
    let target = int_arg(args, 0).unwrap_or(0).max(0) as usize;
    let current = s.chars().count();
    let pad: Vec<char> = args
        .get(1)
        .filter(|p| !p.is_empty())
        .map_or(vec![' '], |p| p.chars().collect());

    if target <= current {
        return s.to_string();
    }

    let missing = target - current;
    let fill = |n: usize| -> String { pad.iter().cycle().take(n).collect() };

    match args.get(2).map(|mode| mode.trim().to_uppercase()).as_deref() {
        Some("STR_PAD_LEFT") | Some("LEFT") => format!("{}{}", fill(missing), s),
        Some("STR_PAD_BOTH") | Some("BOTH") => {
            let left = missing / 2;
            format!("{}{}{}", fill(left), s, fill(missing - left))
        }
        _ => format!("{}{}", s, fill(missing)),
    }
}

fn round(value: &Value, args: &[String]) -> Value {
    let Some(number) = as_number(value) else {
        return value.clone();
    };
    let precision = int_arg(args, 0).unwrap_or(0).clamp(-15, 15) as i32;
    let factor = 10f64.powi(precision);
    let rounded = (number * factor).round() / factor;

    if precision <= 0 && rounded.abs() < i64::MAX as f64 {
        return Value::from(rounded as i64);
    }
    serde_json::Number::from_f64(rounded).map_or_else(|| value.clone(), Value::Number)
}

fn abs(value: Value) -> Value {
    if let Some(n) = value.as_i64() {
        return Value::from(n.unsigned_abs());
    }
    match as_number(&value) {
        Some(n) => serde_json::Number::from_f64(n.abs()).map_or(value, Value::Number),
        None => value,
    }
}
