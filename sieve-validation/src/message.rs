//! Turns failure records into human-readable messages.
//!
//! A template is chosen per failure, first match wins:
//!
//! 1. the instance's per-field, per-rule override
//! 2. the shared override for the rule name (custom validators register
//!    theirs here)
//! 3. the catalog entry for the instance language
//!
//! Templates use `{field}`, `{param}` (all parameters joined by `", "`)
//! and `{param[0]}`, `{param[1]}`, ... Substitution is a single pass, so a
//! substituted value containing `{field}` is left alone.

use crate::context::Context;
use crate::functions::ucwords;
use crate::report::{ErrorReport, FailureRecord};
use crate::rule::Param;
use crate::{Result, SieveError};
use indexmap::IndexMap;
use sieve_log::warn;
use std::collections::HashMap;

/// Per-field, per-rule templates: field key, then rule name.
pub type FieldMessages = HashMap<String, HashMap<String, String>>;

/// CSS classes used by the markup renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Class of the `<span>` around the field name
    pub field_class: String,
    /// Class of the `<span>` around each message
    pub error_class: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            field_class: "sieve-field".to_string(),
            error_class: "sieve-error-message".to_string(),
        }
    }
}

/// Resolves and fills message templates for one language.
pub struct MessageFormatter<'a> {
    ctx: &'a Context,
    lang: &'a str,
    field_messages: &'a FieldMessages,
}

impl<'a> MessageFormatter<'a> {
    pub fn new(ctx: &'a Context, lang: &'a str, field_messages: &'a FieldMessages) -> Self {
        Self {
            ctx,
            lang,
            field_messages,
        }
    }

    /// The template for `rule` on `field`.
    pub fn template(&self, field: &str, rule: &str) -> Result<&'a str> {
        if let Some(template) = self.field_messages.get(field).and_then(|rules| rules.get(rule)) {
            return Ok(template.as_str());
        }

        if let Some(template) = self.ctx.message_override(rule) {
            return Ok(template);
        }

        if let Some(template) = self.ctx.catalog().get(self.lang, rule) {
            return Ok(template);
        }

        warn!("no '{}' message for rule '{}'", self.lang, rule);
        Err(SieveError::MissingMessage(rule.to_string()))
    }

    /// Readable label for a field key.
    pub fn readable_field(&self, field: &str) -> String {
        match self.ctx.field_name(field) {
            Some(name) => name.to_string(),
            None => prettify_field(field, &self.ctx.settings().field_chars_to_spaces),
        }
    }

    /// Message for one failure, the field label passed through `wrap_field`.
    pub fn format_with(
        &self,
        record: &FailureRecord,
        wrap_field: impl Fn(String) -> String,
    ) -> Result<String> {
        let template = self.template(&record.field, &record.rule)?;
        let params: Vec<String> = record
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| if i == 0 { self.readable_param(p) } else { p.to_string() })
            .collect();

        let mut replacements = vec![
            ("{field}".to_string(), wrap_field(self.readable_field(&record.field))),
            ("{param}".to_string(), params.join(", ")),
        ];
        replacements.extend(
            params
                .iter()
                .enumerate()
                .map(|(i, param)| (format!("{{param[{}]}}", i), param.clone())),
        );

        Ok(substitute(template, &replacements))
    }

    /// Message for one failure.
    pub fn format(&self, record: &FailureRecord) -> Result<String> {
        self.format_with(record, |label| label)
    }

    /// A first parameter naming a field with a readable name is shown by
    /// that name.
    fn readable_param(&self, param: &Param) -> String {
        match param.as_str().and_then(|text| self.ctx.field_name(text)) {
            Some(name) => name.to_string(),
            None => param.to_string(),
        }
    }

    /// One plain message per failure, in report order.
    pub fn readable_errors(&self, report: &ErrorReport) -> Result<Vec<String>> {
        report.iter().map(|record| self.format(record)).collect()
    }

    /// Field key to plain message; a field appearing twice keeps its last
    /// message.
    pub fn errors_by_field(&self, report: &ErrorReport) -> Result<IndexMap<String, String>> {
        report
            .iter()
            .map(|record| Ok((record.field.clone(), self.format(record)?)))
            .collect()
    }

    /// Messages with the field label wrapped in
    /// `<span class="{field_class}">`.
    pub fn render_markup(&self, report: &ErrorReport, markup: &Markup) -> Result<Vec<String>> {
        report
            .iter()
            .map(|record| {
                self.format_with(record, |label| {
                    format!("<span class=\"{}\">{}</span>", markup.field_class, label)
                })
            })
            .collect()
    }

    /// [`render_markup`](Self::render_markup) with each message wrapped in
    /// `<span class="{error_class}">`, concatenated.
    pub fn render_markup_string(&self, report: &ErrorReport, markup: &Markup) -> Result<String> {
        Ok(self
            .render_markup(report, markup)?
            .into_iter()
            .map(|message| format!("<span class=\"{}\">{}</span>", markup.error_class, message))
            .collect())
    }
}

/// `street_name` → `Street Name`.
pub fn prettify_field(field: &str, separators: &[String]) -> String {
    let mut label = field.to_string();
    for separator in separators.iter().filter(|s| !s.is_empty()) {
        label = label.replace(separator.as_str(), " ");
    }
    ucwords(&label)
}

/// Single-pass placeholder replacement; at each position the longest
/// matching placeholder wins.
fn substitute(template: &str, replacements: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while !rest.is_empty() {
        let matched = replacements
            .iter()
            .filter(|(placeholder, _)| rest.starts_with(placeholder.as_str()))
            .max_by_key(|(placeholder, _)| placeholder.len());

        match matched {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &rest[placeholder.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    out
}
