//! Rule dispatch.
//!
//! Rule names resolve through fixed tables, never by reflection:
//!
//! - validators: built-in catalog, then custom registrations, else
//!   [`SieveError::UnknownValidator`]
//! - filters: built-in catalog, then custom registrations, then the
//!   [`FunctionTable`], else [`SieveError::UnknownFilter`]
//!
//! Custom names may not shadow a built-in or an earlier registration, so
//! the order above holds no matter when rules were registered.

use crate::builtins::{filters, validators};
use crate::functions::{FunctionTable, NamedFunction};
use crate::report::Verdict;
use crate::rule::Param;
use crate::value::{to_text, Record};
use crate::{Result, SieveError};
use serde_json::Value;
use sieve_log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a validator sees for one application.
#[derive(Debug, Clone, Copy)]
pub struct RuleCall<'a> {
    /// Field key as written in the ruleset
    pub field: &'a str,
    /// Whole input, with the resolved field value stored under `field`
    pub input: &'a Record,
    pub params: &'a [Param],
    /// The value under test: the field value, or one element of a list
    pub value: &'a Value,
}

impl<'a> RuleCall<'a> {
    /// Text of the `index`th parameter.
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).and_then(Param::as_str)
    }

    /// The complete field value (not just the element under test).
    pub fn field_value(&self) -> &'a Value {
        self.input.get(self.field).unwrap_or(&Value::Null)
    }
}

pub type BuiltinValidator = fn(&RuleCall<'_>) -> Verdict;
pub type BuiltinFilter = fn(Value, &[Param]) -> Value;
pub type ValidatorFn = Arc<dyn Fn(&RuleCall<'_>) -> Verdict + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(Value, &[Param]) -> Value + Send + Sync>;

/// A resolved validator.
pub enum ValidatorRef<'r> {
    Builtin(BuiltinValidator),
    Custom(&'r ValidatorFn),
}

impl ValidatorRef<'_> {
    pub fn call(&self, call: &RuleCall<'_>) -> Verdict {
        match self {
            ValidatorRef::Builtin(validator) => validator(call),
            ValidatorRef::Custom(validator) => validator(call),
        }
    }
}

/// A resolved filter.
pub enum FilterRef<'r> {
    Builtin(BuiltinFilter),
    Custom(&'r FilterFn),
    /// General-purpose function; parameters become extra text arguments
    Function(&'r NamedFunction),
}

impl FilterRef<'_> {
    pub fn apply(&self, value: Value, params: &[Param]) -> Value {
        match self {
            FilterRef::Builtin(filter) => filter(value, params),
            FilterRef::Custom(filter) => filter(value, params),
            FilterRef::Function(function) => {
                let args: Vec<String> = params.iter().map(ToString::to_string).collect();
                function(value, &args)
            }
        }
    }
}

/// Custom validators and filters plus the function fallback table.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    validators: HashMap<String, ValidatorFn>,
    filters: HashMap<String, FilterFn>,
    functions: FunctionTable,
}

impl RuleRegistry {
    /// Registry with no custom rules and the default function table.
    pub fn new() -> Self {
        Self {
            validators: HashMap::new(),
            filters: HashMap::new(),
            functions: FunctionTable::with_defaults(),
        }
    }

    /// Whether `name` resolves to a built-in or custom validator.
    pub fn has_validator(&self, name: &str) -> bool {
        validators::get(name).is_some() || self.validators.contains_key(name)
    }

    /// Whether `name` resolves to a built-in or custom filter.
    pub fn has_filter(&self, name: &str) -> bool {
        filters::get(name).is_some() || self.filters.contains_key(name)
    }

    /// Register a custom validator. Returning `false` (or a
    /// [`Verdict::Fail`]) fails the field.
    pub fn add_validator<F, R>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(&RuleCall<'_>) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        if self.has_validator(name) {
            warn!("refusing to redefine validator '{}'", name);
            return Err(SieveError::DuplicateValidator(name.to_string()));
        }

        self.validators.insert(
            name.to_string(),
            Arc::new(move |call: &RuleCall<'_>| callback(call).into()),
        );
        info!("registered validator '{}'", name);
        Ok(())
    }

    /// Register a custom filter.
    pub fn add_filter<F>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(Value, &[Param]) -> Value + Send + Sync + 'static,
    {
        if self.has_filter(name) {
            warn!("refusing to redefine filter '{}'", name);
            return Err(SieveError::DuplicateFilter(name.to_string()));
        }

        self.filters.insert(name.to_string(), Arc::new(callback));
        info!("registered filter '{}'", name);
        Ok(())
    }

    /// Add or replace a general-purpose function usable as a filter.
    pub fn add_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(Value, &[String]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name, function);
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn resolve_validator(&self, name: &str) -> Result<ValidatorRef<'_>> {
        if let Some(validator) = validators::get(name) {
            return Ok(ValidatorRef::Builtin(validator));
        }

        if let Some(validator) = self.validators.get(name) {
            return Ok(ValidatorRef::Custom(validator));
        }

        warn!("no validator named '{}'", name);
        Err(SieveError::UnknownValidator(name.to_string()))
    }

    pub fn resolve_filter(&self, name: &str) -> Result<FilterRef<'_>> {
        if let Some(filter) = filters::get(name) {
            return Ok(FilterRef::Builtin(filter));
        }

        if let Some(filter) = self.filters.get(name) {
            return Ok(FilterRef::Custom(filter));
        }

        if let Some(function) = self.functions.get(name) {
            debug!("filter '{}' falls back to the function table", name);
            return Ok(FilterRef::Function(function));
        }

        warn!("no filter or function named '{}'", name);
        Err(SieveError::UnknownFilter(name.to_string()))
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut validators: Vec<&String> = self.validators.keys().collect();
        let mut filters: Vec<&String> = self.filters.keys().collect();
        validators.sort();
        filters.sort();

        f.debug_struct("RuleRegistry")
            .field("validators", &validators)
            .field("filters", &filters)
            .field("functions", &self.functions)
            .finish()
    }
}

/// Text of a value as most string rules see it.
pub(crate) fn text_of(call: &RuleCall<'_>) -> String {
    to_text(call.value)
}
