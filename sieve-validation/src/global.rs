//! Process-wide convenience API.
//!
//! These functions work on one lazily created [`SharedContext`] and, for
//! [`is_valid`] and [`filter_input`], one shared [`Validation`] instance.
//! Register custom rules at start-up: registering from inside a rule
//! callback blocks, because a running pass holds the context's read lock.

use crate::context::{Context, SharedContext};
use crate::message::FieldMessages;
use crate::registry::RuleCall;
use crate::report::{Outcome, Verdict};
use crate::rule::{Param, Ruleset};
use crate::settings::Settings;
use crate::validation::Validation;
use crate::value::Record;
use crate::Result;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use serde_json::Value;

static SHARED_CONTEXT: OnceCell<SharedContext> = OnceCell::new();

static INSTANCE: Lazy<Mutex<Option<Validation>>> = Lazy::new(|| Mutex::new(None));

/// The process-wide context, created on first use.
pub fn shared_context() -> Result<SharedContext> {
    SHARED_CONTEXT
        .get_or_try_init(|| Context::new().map(Context::into_shared))
        .cloned()
}

/// Run `f` on the shared instance, creating it in the default language.
fn with_instance<T>(f: impl FnOnce(&mut Validation) -> Result<T>) -> Result<T> {
    let mut slot = INSTANCE.lock();
    let mut validation = match slot.take() {
        Some(validation) => validation,
        None => Validation::with_default_lang()?,
    };

    let result = f(&mut validation);
    *slot = Some(validation);
    result
}

/// Validate `data` in one call; failures come back as readable messages.
///
/// ```
/// use serde_json::json;
/// use sieve_validation::{is_valid, ruleset, FieldMessages, Outcome};
///
/// let data = json!({"email": "ada@example.com", "age": "17"});
/// let rules = ruleset([("email", "required|valid_email"), ("age", "min_numeric,18")]);
///
/// let outcome = is_valid(data.as_object().unwrap(), &rules, &FieldMessages::new())?;
/// assert_eq!(
///     outcome,
///     Outcome::Invalid(vec![
///         "The Age field needs to be a numeric value, equal to, or higher than 18".to_string()
///     ])
/// );
/// # Ok::<(), sieve_validation::SieveError>(())
/// ```
pub fn is_valid(
    data: &Record,
    rules: &Ruleset,
    messages: &FieldMessages,
) -> Result<Outcome<Vec<String>>> {
    with_instance(|validation| {
        validation.set_validation_rules(rules.clone());
        validation.set_fields_error_messages(messages.clone());

        match validation.run(data.clone(), false)? {
            Some(_) => Ok(Outcome::Valid),
            None => Ok(Outcome::Invalid(validation.readable_errors()?)),
        }
    })
}

/// Filter `data` in one call.
pub fn filter_input(data: Record, filters: &Ruleset) -> Result<Record> {
    with_instance(|validation| validation.filter(data, filters))
}

/// Register a custom validator with its message template.
pub fn add_validator<F, R>(name: &str, callback: F, message: &str) -> Result<()>
where
    F: Fn(&RuleCall<'_>) -> R + Send + Sync + 'static,
    R: Into<Verdict>,
{
    shared_context()?.write().add_validator(name, callback, message)
}

/// Register a custom filter.
pub fn add_filter<F>(name: &str, callback: F) -> Result<()>
where
    F: Fn(Value, &[Param]) -> Value + Send + Sync + 'static,
{
    shared_context()?.write().add_filter(name, callback)
}

/// Add or replace a named function usable as a filter.
pub fn add_function<F>(name: &str, function: F) -> Result<()>
where
    F: Fn(Value, &[String]) -> Value + Send + Sync + 'static,
{
    shared_context()?.write().add_function(name, function);
    Ok(())
}

pub fn set_field_name(field: &str, readable: &str) -> Result<()> {
    shared_context()?.write().set_field_name(field, readable);
    Ok(())
}

pub fn set_field_names<I, K, V>(names: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    shared_context()?.write().set_field_names(names);
    Ok(())
}

pub fn set_error_message(rule: &str, template: &str) -> Result<()> {
    shared_context()?.write().set_error_message(rule, template);
    Ok(())
}

pub fn set_error_messages<I, K, V>(messages: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    shared_context()?.write().set_error_messages(messages);
    Ok(())
}

/// Apply new settings to the shared context. The shared instance is
/// rebuilt on next use so it picks up a changed default language.
pub fn configure(settings: Settings) -> Result<()> {
    shared_context()?.write().apply_settings(settings)?;
    *INSTANCE.lock() = None;
    Ok(())
}
