// Built-in validators

use super::{FALSES, TRUES};
use crate::registry::{text_of, BuiltinValidator, RuleCall};
use crate::report::Verdict;
use crate::rule::Param;
use crate::value::{data_get, to_text};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+(?:[/?#]\S*)?$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}+$").unwrap());

static ALPHA_NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}0-9]+$").unwrap());

static ALPHA_DASH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}_-]+$").unwrap());

static ALPHA_NUMERIC_DASH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}0-9_-]+$").unwrap());

static ALPHA_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\s]+$").unwrap());

static ALPHA_NUMERIC_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}0-9\s]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?(?:0|[1-9]\d*)$").unwrap());

/// Upload error code meaning no file was sent.
const NO_FILE_UPLOADED: i64 = 4;

static CATALOG: Lazy<HashMap<&'static str, BuiltinValidator>> = Lazy::new(|| {
    let entries: [(&'static str, BuiltinValidator); 35] = [
        ("required", required),
        ("required_file", required_file),
        ("contains", contains),
        ("contains_list", contains_list),
        ("doesnt_contain_list", doesnt_contain_list),
        ("boolean", boolean),
        ("valid_email", valid_email),
        ("max_len", max_len),
        ("min_len", min_len),
        ("exact_len", exact_len),
        ("between_len", between_len),
        ("alpha", alpha),
        ("alpha_numeric", alpha_numeric),
        ("alpha_dash", alpha_dash),
        ("alpha_numeric_dash", alpha_numeric_dash),
        ("alpha_space", alpha_space),
        ("alpha_numeric_space", alpha_numeric_space),
        ("numeric", numeric),
        ("integer", integer),
        ("float", float),
        ("valid_url", valid_url),
        ("valid_ip", valid_ip),
        ("valid_ipv4", valid_ipv4),
        ("valid_ipv6", valid_ipv6),
        ("min_numeric", min_numeric),
        ("max_numeric", max_numeric),
        ("starts", starts),
        ("equalsfield", equalsfield),
        ("regex", regex),
        ("valid_json_string", valid_json_string),
        ("date", date),
        ("extension", extension),
        ("valid_array_size_greater", valid_array_size_greater),
        ("valid_array_size_lesser", valid_array_size_lesser),
        ("valid_array_size_equal", valid_array_size_equal),
    ];
    entries.into_iter().collect()
});

/// Look up a built-in validator.
pub fn get(name: &str) -> Option<BuiltinValidator> {
    CATALOG.get(name).copied()
}

/// Names of every built-in validator, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATALOG.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Rules whose presence means the field may not be empty.
pub fn is_required_rule(name: &str) -> bool {
    matches!(name, "required" | "required_file")
}

fn required(call: &RuleCall<'_>) -> Verdict {
    (!crate::value::is_empty(call.value)).into()
}

fn required_file(call: &RuleCall<'_>) -> Verdict {
    let code = call.value.get("error").and_then(Value::as_i64);
    code.is_some_and(|code| code != NO_FILE_UPLOADED).into()
}

/// Scalar and list parameters flattened into one list.
fn flat_params(params: &[Param]) -> Vec<&str> {
    params
        .iter()
        .flat_map(|param| match param {
            Param::Text(text) => vec![text.as_str()],
            Param::List(items) => items.iter().map(String::as_str).collect(),
        })
        .collect()
}

fn one_of_params(call: &RuleCall<'_>) -> bool {
    let value = text_of(call).trim().to_lowercase();
    flat_params(call.params)
        .into_iter()
        .any(|param| param.trim().to_lowercase() == value)
}

fn contains(call: &RuleCall<'_>) -> Verdict {
    one_of_params(call).into()
}

fn contains_list(call: &RuleCall<'_>) -> Verdict {
    one_of_params(call).into()
}

fn doesnt_contain_list(call: &RuleCall<'_>) -> Verdict {
    (!one_of_params(call)).into()
}

fn boolean(call: &RuleCall<'_>) -> Verdict {
    let accepted = match call.value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_i64().is_some_and(|n| n == 0 || n == 1),
        Value::String(s) => TRUES.contains(&s.as_str()) || FALSES.contains(&s.as_str()),
        _ => false,
    };
    accepted.into()
}

fn valid_email(call: &RuleCall<'_>) -> Verdict {
    EMAIL_REGEX.is_match(&text_of(call)).into()
}

fn char_len(call: &RuleCall<'_>) -> usize {
    text_of(call).chars().count()
}

fn usize_param(call: &RuleCall<'_>, index: usize) -> Option<usize> {
    call.param(index).and_then(|p| p.trim().parse().ok())
}

fn max_len(call: &RuleCall<'_>) -> Verdict {
    usize_param(call, 0).is_some_and(|max| char_len(call) <= max).into()
}

fn min_len(call: &RuleCall<'_>) -> Verdict {
    usize_param(call, 0).is_some_and(|min| char_len(call) >= min).into()
}

fn exact_len(call: &RuleCall<'_>) -> Verdict {
    usize_param(call, 0).is_some_and(|len| char_len(call) == len).into()
}

fn between_len(call: &RuleCall<'_>) -> Verdict {
    match (usize_param(call, 0), usize_param(call, 1)) {
        (Some(min), Some(max)) => (min..=max).contains(&char_len(call)).into(),
        _ => Verdict::Fail,
    }
}

fn alpha(call: &RuleCall<'_>) -> Verdict {
    ALPHA_REGEX.is_match(&text_of(call)).into()
}

fn alpha_numeric(call: &RuleCall<'_>) -> Verdict {
    ALPHA_NUMERIC_REGEX.is_match(&text_of(call)).into()
}

fn alpha_dash(call: &RuleCall<'_>) -> Verdict {
    ALPHA_DASH_REGEX.is_match(&text_of(call)).into()
}

fn alpha_numeric_dash(call: &RuleCall<'_>) -> Verdict {
    ALPHA_NUMERIC_DASH_REGEX.is_match(&text_of(call)).into()
}

fn alpha_space(call: &RuleCall<'_>) -> Verdict {
    ALPHA_SPACE_REGEX.is_match(&text_of(call)).into()
}

fn alpha_numeric_space(call: &RuleCall<'_>) -> Verdict {
    ALPHA_NUMERIC_SPACE_REGEX.is_match(&text_of(call)).into()
}

/// Numeric value of a JSON number or a numeric string.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if NUMERIC_REGEX.is_match(s) => s.parse().ok(),
        _ => None,
    }
}

fn numeric(call: &RuleCall<'_>) -> Verdict {
    as_number(call.value).is_some().into()
}

fn integer(call: &RuleCall<'_>) -> Verdict {
    let accepted = match call.value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => INTEGER_REGEX.is_match(s),
        _ => false,
    };
    accepted.into()
}

fn float(call: &RuleCall<'_>) -> Verdict {
    as_number(call.value).is_some().into()
}

fn valid_url(call: &RuleCall<'_>) -> Verdict {
    URL_REGEX.is_match(&text_of(call)).into()
}

fn valid_ip(call: &RuleCall<'_>) -> Verdict {
    text_of(call).parse::<IpAddr>().is_ok().into()
}

fn valid_ipv4(call: &RuleCall<'_>) -> Verdict {
    text_of(call).parse::<Ipv4Addr>().is_ok().into()
}

fn valid_ipv6(call: &RuleCall<'_>) -> Verdict {
    text_of(call).parse::<Ipv6Addr>().is_ok().into()
}

fn numeric_param(call: &RuleCall<'_>) -> Option<f64> {
    call.param(0).and_then(|p| as_number(&Value::String(p.trim().to_string())))
}

fn min_numeric(call: &RuleCall<'_>) -> Verdict {
    match (as_number(call.value), numeric_param(call)) {
        (Some(value), Some(min)) => (value >= min).into(),
        _ => Verdict::Fail,
    }
}

fn max_numeric(call: &RuleCall<'_>) -> Verdict {
    match (as_number(call.value), numeric_param(call)) {
        (Some(value), Some(max)) => (value <= max).into(),
        _ => Verdict::Fail,
    }
}

fn starts(call: &RuleCall<'_>) -> Verdict {
    call.param(0)
        .is_some_and(|prefix| text_of(call).starts_with(prefix))
        .into()
}

fn equalsfield(call: &RuleCall<'_>) -> Verdict {
    call.param(0)
        .and_then(|other| data_get(call.input, other))
        .is_some_and(|other| to_text(&other) == text_of(call))
        .into()
}

/// Compile a `/pattern/flags` style expression. Patterns without a
/// delimiter compile as written.
pub(crate) fn compile_pattern(pattern: &str) -> Option<Regex> {
    let delimiter = pattern.chars().next()?;
    if delimiter.is_alphanumeric() || delimiter.is_whitespace() || delimiter == '\\' {
        return Regex::new(pattern).ok();
    }

    let end = pattern.rfind(delimiter)?;
    if end == 0 {
        return None;
    }
    let body = &pattern[delimiter.len_utf8()..end];
    let flags = &pattern[end + delimiter.len_utf8()..];

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            'u' => {}
            _ => return None,
        }
    }
    builder.build().ok()
}

fn regex(call: &RuleCall<'_>) -> Verdict {
    call.param(0)
        .and_then(compile_pattern)
        .is_some_and(|re| re.is_match(&text_of(call)))
        .into()
}

fn valid_json_string(call: &RuleCall<'_>) -> Verdict {
    match call.value {
        Value::String(s) => serde_json::from_str::<Value>(s).is_ok().into(),
        _ => Verdict::Fail,
    }
}

/// Translate a `Y-m-d H:i:s` style format into a chrono format string.
fn chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    for c in format.chars() {
        match c {
            'Y' => out.push_str("%Y"),
            'y' => out.push_str("%y"),
            'm' | 'n' => out.push_str("%m"),
            'd' | 'j' => out.push_str("%d"),
            'H' | 'G' => out.push_str("%H"),
            'h' | 'g' => out.push_str("%I"),
            'i' => out.push_str("%M"),
            's' => out.push_str("%S"),
            'A' | 'a' => out.push_str("%p"),
            'M' => out.push_str("%b"),
            'F' => out.push_str("%B"),
            'D' => out.push_str("%a"),
            'l' => out.push_str("%A"),
            '%' => out.push_str("%%"),
            other => out.push(other),
        }
    }
    out
}

fn matches_date_format(text: &str, format: &str) -> bool {
    let has_date = format.chars().any(|c| "YymndjMFDl".contains(c));
    let has_time = format.chars().any(|c| "HGhgis".contains(c));
    let pattern = chrono_format(format);

    match (has_date, has_time) {
        (true, true) => NaiveDateTime::parse_from_str(text, &pattern).is_ok(),
        (true, false) => NaiveDate::parse_from_str(text, &pattern).is_ok(),
        (false, true) => NaiveTime::parse_from_str(text, &pattern).is_ok(),
        (false, false) => false,
    }
}

fn date(call: &RuleCall<'_>) -> Verdict {
    let text = text_of(call);
    let valid = match call.param(0) {
        Some(format) => matches_date_format(&text, format),
        None => {
            matches_date_format(&text, "Y-m-d") || matches_date_format(&text, "Y-m-d H:i:s")
        }
    };
    valid.into()
}

fn extension(call: &RuleCall<'_>) -> Verdict {
    let name = match call.value {
        Value::Object(file) => {
            if file.get("error").and_then(Value::as_i64) == Some(NO_FILE_UPLOADED) {
                return Verdict::Pass;
            }
            file.get("name").map(to_text)
        }
        Value::String(name) => Some(name.clone()),
        _ => None,
    };

    let Some(ext) = name.as_deref().and_then(|name| Path::new(name).extension()) else {
        return Verdict::Fail;
    };
    let ext = ext.to_string_lossy().to_lowercase();

    flat_params(call.params)
        .into_iter()
        .any(|allowed| allowed.trim().trim_start_matches('.').to_lowercase() == ext)
        .into()
}

fn array_size(call: &RuleCall<'_>) -> Option<(usize, usize)> {
    let Value::Array(items) = call.field_value() else {
        return None;
    };
    usize_param(call, 0).map(|size| (items.len(), size))
}

fn valid_array_size_greater(call: &RuleCall<'_>) -> Verdict {
    array_size(call).is_some_and(|(len, min)| len >= min).into()
}

fn valid_array_size_lesser(call: &RuleCall<'_>) -> Verdict {
    array_size(call).is_some_and(|(len, max)| len <= max).into()
}

fn valid_array_size_equal(call: &RuleCall<'_>) -> Verdict {
    array_size(call).is_some_and(|(len, size)| len == size).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use serde_json::json;

    fn check(rule: &str, value: Value, params: &[&str]) -> bool {
        let mut input = Record::new();
        input.insert("f".to_string(), value.clone());
        check_with(rule, &input, value, params)
    }

    fn check_with(rule: &str, input: &Record, value: Value, params: &[&str]) -> bool {
        let params: Vec<Param> = params.iter().map(|p| Param::from(*p)).collect();
        let call = RuleCall {
            field: "f",
            input,
            params: &params,
            value: &value,
        };
        let validator = get(rule).unwrap();
        !validator(&call).is_failure()
    }

    #[test]
    fn test_catalog_names() {
        let names = names();
        assert_eq!(names.len(), 35);
        assert!(names.contains(&"valid_array_size_equal"));
        assert!(get("mismatch").is_none());
    }

    #[test]
    fn test_required() {
        assert!(check("required", json!("x"), &[]));
        assert!(check("required", json!(0), &[]));
        assert!(!check("required", json!(""), &[]));
        assert!(!check("required", Value::Null, &[]));
        assert!(!check("required", json!([]), &[]));
    }

    #[test]
    fn test_required_file() {
        assert!(check("required_file", json!({"name": "a.png", "error": 0}), &[]));
        assert!(!check("required_file", json!({"name": "", "error": 4}), &[]));
        assert!(!check("required_file", json!("a.png"), &[]));
    }

    #[test]
    fn test_contains() {
        assert!(check("contains", json!("Red"), &["red", "blue"]));
        assert!(!check("contains", json!("green"), &["red", "blue"]));
        assert!(check("doesnt_contain_list", json!("green"), &["red", "blue"]));
        assert!(!check("doesnt_contain_list", json!("blue"), &["red", "blue"]));
    }

    #[test]
    fn test_boolean() {
        for ok in [json!(true), json!(false), json!(1), json!("yes"), json!("off")] {
            assert!(check("boolean", ok, &[]));
        }
        assert!(!check("boolean", json!("maybe"), &[]));
        assert!(!check("boolean", json!(2), &[]));
    }

    #[test]
    fn test_email() {
        assert!(check("valid_email", json!("ada@example.com"), &[]));
        assert!(!check("valid_email", json!("ada@"), &[]));
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(check("max_len", json!("héllo"), &["5"]));
        assert!(!check("max_len", json!("héllo!"), &["5"]));
        assert!(check("min_len", json!("abc"), &["3"]));
        assert!(!check("min_len", json!("ab"), &["3"]));
        assert!(check("exact_len", json!(1234), &["4"]));
        assert!(check("between_len", json!("abcd"), &["3", "8"]));
        assert!(!check("between_len", json!("ab"), &["3", "8"]));
        assert!(!check("max_len", json!("a"), &["five"]));
    }

    #[test]
    fn test_alpha_family() {
        assert!(check("alpha", json!("Élodie"), &[]));
        assert!(!check("alpha", json!("abc1"), &[]));
        assert!(check("alpha_numeric", json!("abc1"), &[]));
        assert!(check("alpha_dash", json!("a-b_c"), &[]));
        assert!(!check("alpha_dash", json!("a-b1"), &[]));
        assert!(check("alpha_numeric_dash", json!("a-b1"), &[]));
        assert!(check("alpha_space", json!("Jean Luc"), &[]));
        assert!(check("alpha_numeric_space", json!("Route 66"), &[]));
    }

    #[test]
    fn test_numbers() {
        assert!(check("numeric", json!("-1.5e3"), &[]));
        assert!(check("numeric", json!(7), &[]));
        assert!(!check("numeric", json!("12abc"), &[]));
        assert!(check("integer", json!("-42"), &[]));
        assert!(!check("integer", json!("042"), &[]));
        assert!(!check("integer", json!(1.5), &[]));
        assert!(check("float", json!("1.5"), &[]));
        assert!(check("min_numeric", json!("10"), &["10"]));
        assert!(!check("min_numeric", json!(9.5), &["10"]));
        assert!(check("max_numeric", json!(3), &["3.5"]));
        assert!(!check("max_numeric", json!("abc"), &["3"]));
    }

    #[test]
    fn test_network() {
        assert!(check("valid_url", json!("https://example.com/a?b=c"), &[]));
        assert!(check("valid_url", json!("ftp://files.example.com"), &[]));
        assert!(!check("valid_url", json!("example.com"), &[]));
        assert!(check("valid_ip", json!("::1"), &[]));
        assert!(check("valid_ipv4", json!("192.168.0.1"), &[]));
        assert!(!check("valid_ipv4", json!("::1"), &[]));
        assert!(check("valid_ipv6", json!("fe80::1"), &[]));
    }

    #[test]
    fn test_starts_and_equalsfield() {
        assert!(check("starts", json!("sieve"), &["si"]));
        assert!(!check("starts", json!("sieve"), &["ve"]));

        let input = json!({"f": "secret", "confirm": "secret", "other": "nope"});
        let input = input.as_object().unwrap();
        assert!(check_with("equalsfield", input, json!("secret"), &["confirm"]));
        assert!(!check_with("equalsfield", input, json!("secret"), &["other"]));
        assert!(!check_with("equalsfield", input, json!("secret"), &["missing"]));
    }

    #[test]
    fn test_regex() {
        assert!(check("regex", json!("ABC"), &["/^[a-z]+$/i"]));
        assert!(!check("regex", json!("ABC"), &["/^[a-z]+$/"]));
        assert!(check("regex", json!("abc"), &["^[a-c]+$"]));
        assert!(!check("regex", json!("abc"), &["/unterminated"]));
    }

    #[test]
    fn test_json_string() {
        assert!(check("valid_json_string", json!(r#"{"a": 1}"#), &[]));
        assert!(!check("valid_json_string", json!("{a: 1}"), &[]));
        assert!(!check("valid_json_string", json!(12), &[]));
    }

    #[test]
    fn test_date() {
        assert!(check("date", json!("2024-02-29"), &[]));
        assert!(check("date", json!("2024-02-29 13:45:00"), &[]));
        assert!(!check("date", json!("2023-02-29"), &[]));
        assert!(check("date", json!("29/02/2024"), &["d/m/Y"]));
        assert!(!check("date", json!("2024-02-29"), &["d/m/Y"]));
    }

    #[test]
    fn test_extension() {
        assert!(check("extension", json!({"name": "cv.PDF", "error": 0}), &["pdf", "doc"]));
        assert!(!check("extension", json!({"name": "cv.exe", "error": 0}), &["pdf"]));
        assert!(check("extension", json!("photo.png"), &["png"]));
        assert!(!check("extension", json!("README"), &["md"]));
    }

    #[test]
    fn test_array_sizes_use_whole_field() {
        let input = json!({"f": [1, 2, 3]});
        let input = input.as_object().unwrap();
        assert!(check_with("valid_array_size_greater", input, json!(1), &["3"]));
        assert!(!check_with("valid_array_size_greater", input, json!(1), &["4"]));
        assert!(check_with("valid_array_size_lesser", input, json!(1), &["3"]));
        assert!(check_with("valid_array_size_equal", input, json!(1), &["3"]));
        assert!(!check("valid_array_size_equal", json!("abc"), &["3"]));
    }

    #[test]
    fn test_required_rule_names() {
        assert!(is_required_rule("required"));
        assert!(is_required_rule("required_file"));
        assert!(!is_required_rule("min_len"));
    }
}
