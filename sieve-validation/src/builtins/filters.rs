// Built-in filters
//
// String filters apply to strings and numbers (numbers through their text
// form); other values pass through untouched.

use super::TRUES;
use crate::registry::BuiltinFilter;
use crate::rule::Param;
use crate::value::to_text;
use ammonia::Builder;
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

static NOISE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "after", "all", "also", "an", "and", "another", "any", "are", "as", "at", "be",
        "because", "been", "before", "being", "between", "both", "but", "by", "came", "can",
        "come", "could", "did", "do", "each", "for", "from", "get", "got", "has", "had", "he",
        "have", "her", "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it",
        "its", "it's", "like", "make", "many", "me", "might", "more", "most", "much", "must",
        "my", "never", "now", "of", "on", "only", "or", "other", "our", "out", "over", "said",
        "same", "see", "should", "since", "some", "still", "such", "take", "than", "that", "the",
        "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "up", "very", "was", "way", "we", "well", "were", "what", "where",
        "which", "while", "who", "with", "would", "you", "your", "a", "b", "c", "d", "e", "f",
        "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x",
        "y", "z", "$", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "_",
    ]
    .into_iter()
    .collect()
});

/// Tags `basic_tags` keeps.
const BASIC_TAGS: &[&str] = &[
    "br", "p", "a", "strong", "b", "i", "em", "img", "blockquote", "code", "dd", "dl", "hr",
    "h1", "h2", "h3", "h4", "h5", "h6", "label", "ul", "li", "span", "sub", "sup",
];

/// Punctuation `rmpunctuation` keeps.
const KEPT_PUNCTUATION: &[char] = &['.', '=', '$', '\'', '€', '%', '-'];

/// Everything but ASCII letters, digits and `-._` is percent-encoded.
const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

static PUNCTUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{P}").unwrap());

pub(crate) static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static SLUG_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

static CATALOG: Lazy<HashMap<&'static str, BuiltinFilter>> = Lazy::new(|| {
    let entries: [(&'static str, BuiltinFilter); 15] = [
        ("noise_words", noise_words),
        ("rmpunctuation", rmpunctuation),
        ("urlencode", urlencode),
        ("htmlencode", htmlencode),
        ("sanitize_email", sanitize_email),
        ("sanitize_numbers", sanitize_numbers),
        ("sanitize_floats", sanitize_floats),
        ("sanitize_string", sanitize_string),
        ("boolean", boolean),
        ("basic_tags", basic_tags),
        ("whole_number", whole_number),
        ("ms_word_characters", ms_word_characters),
        ("lower_case", lower_case),
        ("upper_case", upper_case),
        ("slug", slug),
    ];
    entries.into_iter().collect()
});

/// Look up a built-in filter.
pub fn get(name: &str) -> Option<BuiltinFilter> {
    CATALOG.get(name).copied()
}

/// Names of every built-in filter, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATALOG.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Apply `f` to the text of strings and numbers.
fn map_text(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        Value::Number(_) => Value::String(f(&to_text(&value))),
        other => other,
    }
}

fn noise_words(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        text.split_whitespace()
            .filter(|word| !NOISE_WORDS.contains(word.to_lowercase().as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn rmpunctuation(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        PUNCTUATION_REGEX
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let matched = &caps[0];
                if matched.chars().all(|c| KEPT_PUNCTUATION.contains(&c)) {
                    matched.to_string()
                } else {
                    String::new()
                }
            })
            .into_owned()
    })
}

fn urlencode(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| utf8_percent_encode(text, URL_ENCODE_SET).to_string())
}

fn htmlencode(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' | '"' | '\'' | '<' | '>' => out.push_str(&format!("&#{};", c as u32)),
                c if (c as u32) < 32 => out.push_str(&format!("&#{};", c as u32)),
                c => out.push(c),
            }
        }
        out
    })
}

fn sanitize_email(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        text.chars()
            .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(*c))
            .collect()
    })
}

fn sanitize_numbers(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        text.chars()
            .filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-')
            .collect()
    })
}

fn sanitize_floats(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        text.chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
            .collect()
    })
}

fn sanitize_string(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| TAG_REGEX.replace_all(text, "").into_owned())
}

fn boolean(value: Value, _: &[Param]) -> Value {
    let truthy = match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => TRUES.contains(&s.as_str()),
        _ => false,
    };
    Value::Bool(truthy)
}

fn basic_tags(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        let mut builder = Builder::default();
        builder.tags(BASIC_TAGS.iter().copied().collect());
        builder.clean(text).to_string()
    })
}

/// Leading integer of a value, `0` when there is none.
pub(crate) fn to_whole_number(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => {
            let s = s.trim_start();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn whole_number(value: Value, _: &[Param]) -> Value {
    Value::from(to_whole_number(&value))
}

fn ms_word_characters(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        text.replace(['“', '”'], "\"")
            .replace(['‘', '’'], "'")
            .replace('–', "-")
            .replace('…', "...")
    })
}

fn lower_case(value: Value, _: &[Param]) -> Value {
    map_text(value, str::to_lowercase)
}

fn upper_case(value: Value, _: &[Param]) -> Value {
    map_text(value, str::to_uppercase)
}

/// ASCII spelling of common accented Latin letters.
fn fold_ascii(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' => "c",
        'Ç' => "C",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ñ' => "n",
        'Ñ' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

fn slug(value: Value, _: &[Param]) -> Value {
    map_text(value, |text| {
        let mut ascii = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\'' => {}
                '&' => ascii.push_str("and"),
                c => match fold_ascii(c) {
                    Some(folded) => ascii.push_str(folded),
                    None => ascii.push(c),
                },
            }
        }
        SLUG_SEPARATOR_REGEX
            .replace_all(&ascii, "-")
            .trim_matches('-')
            .to_lowercase()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(name: &str, value: Value) -> Value {
        get(name).unwrap()(value, &[])
    }

    #[test]
    fn test_catalog_names() {
        assert_eq!(names().len(), 15);
        assert!(get("trim").is_none());
    }

    #[test]
    fn test_noise_words() {
        assert_eq!(
            apply("noise_words", json!("The quick  fox and the dog")),
            json!("quick fox dog")
        );
    }

    #[test]
    fn test_rmpunctuation() {
        assert_eq!(
            apply("rmpunctuation", json!("Hi! It's 50% off, e-mail me.")),
            json!("Hi It's 50% off e-mail me.")
        );
    }

    #[test]
    fn test_urlencode() {
        assert_eq!(apply("urlencode", json!("a b&c/é")), json!("a%20b%26c%2F%C3%A9"));
    }

    #[test]
    fn test_htmlencode() {
        assert_eq!(
            apply("htmlencode", json!(r#"<a href="x">&</a>"#)),
            json!("&#60;a href=&#34;x&#34;&#62;&#38;&#60;/a&#62;")
        );
    }

    #[test]
    fn test_sanitizers() {
        assert_eq!(apply("sanitize_email", json!("ad(a)@exa mple.com")), json!("ada@example.com"));
        assert_eq!(apply("sanitize_numbers", json!("+1 (555) 12-34")), json!("+1555512-34"));
        assert_eq!(apply("sanitize_floats", json!("€ 12.50")), json!("12.50"));
        assert_eq!(
            apply("sanitize_string", json!("<b>bold</b> move")),
            json!("bold move")
        );
    }

    #[test]
    fn test_boolean() {
        assert_eq!(apply("boolean", json!("on")), json!(true));
        assert_eq!(apply("boolean", json!(1)), json!(true));
        assert_eq!(apply("boolean", json!("TRUE")), json!(false));
        assert_eq!(apply("boolean", Value::Null), json!(false));
    }

    #[test]
    fn test_basic_tags() {
        assert_eq!(
            apply("basic_tags", json!("<p>hi <script>x()</script><em>there</em></p>")),
            json!("<p>hi <em>there</em></p>")
        );
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(apply("whole_number", json!("42abc")), json!(42));
        assert_eq!(apply("whole_number", json!("-3.9")), json!(-3));
        assert_eq!(apply("whole_number", json!(7.8)), json!(7));
        assert_eq!(apply("whole_number", json!("abc")), json!(0));
    }

    #[test]
    fn test_ms_word_characters() {
        assert_eq!(
            apply("ms_word_characters", json!("“Hi” – it’s…")),
            json!("\"Hi\" - it's...")
        );
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(apply("upper_case", json!("straße")), json!("STRASSE"));
        assert_eq!(apply("lower_case", json!("ÉCOLE")), json!("école"));
        assert_eq!(apply("upper_case", json!(null)), Value::Null);
    }

    #[test]
    fn test_slug() {
        assert_eq!(
            apply("slug", json!("Crème Brûlée & Tom's  Café!")),
            json!("creme-brulee-and-toms-cafe")
        );
    }
}
