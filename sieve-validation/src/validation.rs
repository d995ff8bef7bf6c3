//! The `Validation` orchestrator.

use crate::context::SharedContext;
use crate::engine;
use crate::global::shared_context;
use crate::message::{FieldMessages, Markup, MessageFormatter};
use crate::report::{ErrorReport, Outcome};
use crate::rule::Ruleset;
use crate::sanitize;
use crate::value::Record;
use crate::{Result, SieveError};
use indexmap::IndexMap;
use sieve_log::{debug, warn};
use std::fmt;

/// Filters and validates records against stored rulesets, keeping the
/// failures of the last pass for reporting.
///
/// ```
/// use serde_json::json;
/// use sieve_validation::{ruleset, Validation};
///
/// let mut validation = Validation::new("en")?
///     .filters(ruleset([("username", "trim|lower_case")]))
///     .rules(ruleset([("username", "required|alpha_numeric|between_len,3;16")]));
///
/// let input = json!({"username": "  Ada99 "});
/// let clean = validation.run(input.as_object().unwrap().clone(), false)?;
/// assert_eq!(clean.unwrap()["username"], "ada99");
///
/// let input = json!({"username": "a"});
/// assert!(validation.run(input.as_object().unwrap().clone(), false)?.is_none());
/// assert_eq!(
///     validation.readable_errors()?,
///     vec!["The Username field needs to be between 3 and 16 characters"]
/// );
/// # Ok::<(), sieve_validation::SieveError>(())
/// ```
#[derive(Clone)]
pub struct Validation {
    context: SharedContext,
    lang: String,
    validation_rules: Ruleset,
    filter_rules: Ruleset,
    field_messages: FieldMessages,
    errors: ErrorReport,
}

impl Validation {
    /// A validator using the process-wide context.
    pub fn new(lang: &str) -> Result<Self> {
        Self::with_context(shared_context()?, lang)
    }

    /// A validator in the configured default language.
    pub fn with_default_lang() -> Result<Self> {
        let context = shared_context()?;
        let lang = context.read().settings().default_lang.clone();
        Self::with_context(context, &lang)
    }

    /// A validator bound to a caller-owned context.
    pub fn with_context(context: SharedContext, lang: &str) -> Result<Self> {
        if !context.read().catalog().supports(lang) {
            warn!("no message bundle for language '{}'", lang);
            return Err(SieveError::UnsupportedLanguage(lang.to_string()));
        }

        Ok(Self {
            context,
            lang: lang.to_string(),
            validation_rules: Ruleset::new(),
            filter_rules: Ruleset::new(),
            field_messages: FieldMessages::new(),
            errors: ErrorReport::new(),
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub fn validation_rules(&self) -> &Ruleset {
        &self.validation_rules
    }

    pub fn set_validation_rules(&mut self, rules: Ruleset) {
        self.validation_rules = rules;
    }

    /// Builder form of [`set_validation_rules`](Self::set_validation_rules).
    pub fn rules(mut self, rules: Ruleset) -> Self {
        self.set_validation_rules(rules);
        self
    }

    pub fn filter_rules(&self) -> &Ruleset {
        &self.filter_rules
    }

    pub fn set_filter_rules(&mut self, rules: Ruleset) {
        self.filter_rules = rules;
    }

    /// Builder form of [`set_filter_rules`](Self::set_filter_rules).
    pub fn filters(mut self, rules: Ruleset) -> Self {
        self.set_filter_rules(rules);
        self
    }

    /// Install per-field, per-rule message templates, replacing any set
    /// before.
    pub fn set_fields_error_messages(&mut self, messages: FieldMessages) {
        self.field_messages = messages;
    }

    /// Builder form of
    /// [`set_fields_error_messages`](Self::set_fields_error_messages).
    pub fn messages(mut self, messages: FieldMessages) -> Self {
        self.set_fields_error_messages(messages);
        self
    }

    /// Set one per-field message template.
    pub fn set_field_error_message(&mut self, field: &str, rule: &str, template: &str) {
        self.field_messages
            .entry(field.to_string())
            .or_default()
            .insert(rule.to_string(), template.to_string());
    }

    /// Filter with the stored filter rules, then validate with the stored
    /// validation rules. With `check_fields`, input keys that have no
    /// validation rule fail with `mismatch`.
    ///
    /// Returns the filtered data, or `None` when anything failed; see
    /// [`errors`](Self::errors) for the details.
    pub fn run(&mut self, data: Record, check_fields: bool) -> Result<Option<Record>> {
        self.errors = ErrorReport::new();

        let ctx = self.context.read();
        let data = engine::filter(&ctx, data, &self.filter_rules)?;
        let mut errors = engine::validate(&ctx, &data, &self.validation_rules)?
            .invalid()
            .unwrap_or_default();
        drop(ctx);

        if check_fields {
            for mismatch in engine::check_fields(&data, &self.validation_rules) {
                errors.add(mismatch);
            }
        }

        debug!("run finished with {} failure(s)", errors.len());
        self.errors = errors;

        if self.errors.is_empty() {
            Ok(Some(data))
        } else {
            Ok(None)
        }
    }

    /// Validate `input` against `ruleset`; the failures also become
    /// [`errors`](Self::errors).
    pub fn validate(&mut self, input: &Record, ruleset: &Ruleset) -> Result<Outcome<ErrorReport>> {
        self.errors = ErrorReport::new();

        let outcome = engine::validate(&self.context.read(), input, ruleset)?;
        if let Outcome::Invalid(report) = &outcome {
            self.errors = report.clone();
        }
        Ok(outcome)
    }

    /// Run `filterset` over `input`.
    pub fn filter(&self, input: Record, filterset: &Ruleset) -> Result<Record> {
        engine::filter(&self.context.read(), input, filterset)
    }

    /// See [`sanitize()`](crate::sanitize()).
    pub fn sanitize(&self, input: &Record, fields: &[&str]) -> Record {
        sanitize::sanitize(input, fields)
    }

    /// Failures of the last pass.
    pub fn errors(&self) -> &ErrorReport {
        &self.errors
    }

    fn with_formatter<T>(&self, f: impl FnOnce(&MessageFormatter<'_>) -> Result<T>) -> Result<T> {
        let ctx = self.context.read();
        let formatter = MessageFormatter::new(&ctx, &self.lang, &self.field_messages);
        f(&formatter)
    }

    /// One message per failure of the last pass.
    pub fn readable_errors(&self) -> Result<Vec<String>> {
        self.with_formatter(|formatter| formatter.readable_errors(&self.errors))
    }

    /// Messages with the field label wrapped in a `<span>`.
    pub fn readable_errors_markup(&self, markup: &Markup) -> Result<Vec<String>> {
        self.with_formatter(|formatter| formatter.render_markup(&self.errors, markup))
    }

    /// Marked-up messages, each wrapped in a `<span>`, as one string.
    pub fn readable_errors_string(&self, markup: &Markup) -> Result<String> {
        self.with_formatter(|formatter| formatter.render_markup_string(&self.errors, markup))
    }

    /// Field key to message for the last pass.
    pub fn errors_by_field(&self) -> Result<IndexMap<String, String>> {
        self.with_formatter(|formatter| formatter.errors_by_field(&self.errors))
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("lang", &self.lang)
            .field("validation_rules", &self.validation_rules)
            .field("filter_rules", &self.filter_rules)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::rule::ruleset;
    use serde_json::{json, Value};

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn local(lang: &str) -> Validation {
        Validation::with_context(Context::new().unwrap().into_shared(), lang).unwrap()
    }

    #[test]
    fn test_unsupported_language() {
        let context = Context::new().unwrap().into_shared();
        let err = Validation::with_context(context, "xx").unwrap_err();
        assert_eq!(err.to_string(), "'xx' language is not supported.");
    }

    #[test]
    fn test_region_falls_back_to_language() {
        assert_eq!(local("fr-CA").lang(), "fr-CA");
    }

    #[test]
    fn test_run_returns_filtered_data() {
        let mut validation = local("en")
            .filters(ruleset([("name", "trim|ucwords")]))
            .rules(ruleset([("name", "required|alpha_space")]));

        let data = validation
            .run(record(json!({"name": "  ada lovelace "})), false)
            .unwrap();
        assert_eq!(data, Some(record(json!({"name": "Ada Lovelace"}))));
        assert!(validation.errors().is_empty());
    }

    #[test]
    fn test_run_failure_returns_none() {
        let mut validation = local("en").rules(ruleset([("age", "required|integer")]));
        assert_eq!(validation.run(record(json!({"age": "x"})), false).unwrap(), None);
        assert_eq!(validation.errors().len(), 1);
        assert_eq!(
            validation.readable_errors().unwrap(),
            vec!["The Age field must be a number without a decimal"]
        );
    }

    #[test]
    fn test_run_with_field_check() {
        let mut validation = local("en").rules(ruleset([("name", "required")]));
        let input = record(json!({"name": "a", "admin": true}));

        assert!(validation.run(input.clone(), false).unwrap().is_some());
        assert!(validation.run(input, true).unwrap().is_none());

        let errors = validation.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].rule, "mismatch");
        assert_eq!(
            validation.readable_errors().unwrap(),
            vec!["There is no validation rule for Admin"]
        );
    }

    #[test]
    fn test_errors_reset_between_passes() {
        let mut validation = local("en");
        let rules = ruleset([("x", "numeric")]);
        validation.validate(&record(json!({"x": "a"})), &rules).unwrap();
        assert_eq!(validation.errors().len(), 1);

        validation.validate(&record(json!({"x": "1"})), &rules).unwrap();
        assert!(validation.errors().is_empty());
    }

    #[test]
    fn test_config_error_leaves_no_partial_errors() {
        let mut validation = local("en");
        let rules = ruleset([("a", "numeric"), ("b", "bogus")]);
        let result = validation.validate(&record(json!({"a": "x", "b": "y"})), &rules);
        assert!(result.is_err());
        assert!(validation.errors().is_empty());
    }

    #[test]
    fn test_field_messages_beat_catalog() {
        let mut validation = local("fr");
        validation.set_field_error_message("email", "valid_email", "Adresse invalide : {field}");
        validation
            .validate(&record(json!({"email": "nope"})), &ruleset([("email", "valid_email")]))
            .unwrap();
        assert_eq!(
            validation.readable_errors().unwrap(),
            vec!["Adresse invalide : Email"]
        );
    }

    #[test]
    fn test_fields_error_messages_replace_previous() {
        let mut messages = FieldMessages::new();
        messages
            .entry("a".to_string())
            .or_default()
            .insert("required".to_string(), "A!".to_string());
        let mut validation = local("en").messages(messages);

        let mut more = FieldMessages::new();
        more.entry("a".to_string())
            .or_default()
            .insert("numeric".to_string(), "A#".to_string());
        validation.set_fields_error_messages(more);

        validation
            .validate(&Record::new(), &ruleset([("a", "required")]))
            .unwrap();
        assert_eq!(
            validation.readable_errors().unwrap(),
            vec!["The A field is required"]
        );
    }

    #[test]
    fn test_single_field_message_merges() {
        let mut validation = local("en");
        validation.set_field_error_message("a", "required", "A!");
        validation.set_field_error_message("a", "numeric", "A#");

        validation
            .validate(&record(json!({"a": "x"})), &ruleset([("a", "required|numeric")]))
            .unwrap();
        assert_eq!(validation.readable_errors().unwrap(), vec!["A#"]);

        validation
            .validate(&Record::new(), &ruleset([("a", "required|numeric")]))
            .unwrap();
        assert_eq!(validation.readable_errors().unwrap(), vec!["A!"]);
    }

    #[test]
    fn test_markup_accessors() {
        let mut validation = local("en");
        validation
            .validate(&Record::new(), &ruleset([("zip_code", "required")]))
            .unwrap();

        let markup = Markup::default();
        assert_eq!(
            validation.readable_errors_markup(&markup).unwrap(),
            vec!["The <span class=\"sieve-field\">Zip Code</span> field is required"]
        );
        assert_eq!(
            validation.readable_errors_string(&markup).unwrap(),
            "<span class=\"sieve-error-message\">The <span class=\"sieve-field\">Zip Code</span> field is required</span>"
        );
        assert_eq!(
            validation.errors_by_field().unwrap()["zip_code"],
            "The Zip Code field is required"
        );
    }
}
