//! Declarative filtering and validation of loosely-typed input records.
//!
//! Rules are declared per field as a chain, either as delimited text
//! (`"required|max_len,100"`) or as a structured list. Filters rewrite
//! values, validators check them, and failures turn into messages from a
//! per-language catalog.
//!
//! # Examples
//!
//! ## Validating a record
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::{ruleset, Validation};
//!
//! let mut validation = Validation::new("en")?;
//! let input = json!({"email": "ada.example.com", "tags": ["rust", ""]});
//!
//! let outcome = validation.validate(
//!     input.as_object().unwrap(),
//!     &ruleset([("email", "required|valid_email"), ("tags", "required|alpha")]),
//! )?;
//!
//! assert!(!outcome.is_valid());
//! assert_eq!(
//!     validation.readable_errors()?,
//!     vec![
//!         "The Email field must be a valid email address",
//!         "The Tags field is required",
//!     ]
//! );
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```
//!
//! ## Custom rules
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::{add_validator, ruleset, RuleCall, Validation};
//!
//! add_validator(
//!     "even",
//!     |call: &RuleCall<'_>| call.value.as_i64().is_some_and(|n| n % 2 == 0),
//!     "The {field} field must be even",
//! )?;
//!
//! let mut validation = Validation::new("en")?;
//! let input = json!({"seats": 3});
//! validation.validate(input.as_object().unwrap(), &ruleset([("seats", "even")]))?;
//! assert_eq!(validation.readable_errors()?, vec!["The Seats field must be even"]);
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```
//!
//! ## Explicit context
//!
//! The free functions share one process-wide [`Context`]. A
//! [`Context`] can also be built and owned directly, with its own settings
//! and registrations:
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::{ruleset, Context, Settings, Validation};
//!
//! let settings = Settings::from_toml_str(r#"rules_delimiter = "&""#)?;
//! let context = Context::with_settings(settings)?.into_shared();
//!
//! let mut validation = Validation::with_context(context, "fr")?;
//! let input = json!({"code": "12"});
//! validation.validate(input.as_object().unwrap(), &ruleset([("code", "required&min_len,3")]))?;
//! assert_eq!(validation.errors().len(), 1);
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```

pub mod builtins;
mod context;
pub mod engine;
mod error;
mod functions;
mod global;
pub mod message;
mod registry;
mod report;
pub mod rule;
mod sanitize;
mod settings;
mod validation;
mod value;

pub use context::{Context, SharedContext};
pub use error::{Result, SieveError};
pub use functions::{FunctionTable, NamedFunction};
pub use global::{
    add_filter, add_function, add_validator, configure, filter_input, is_valid, set_error_message,
    set_error_messages, set_field_name, set_field_names, shared_context,
};
pub use message::{prettify_field, FieldMessages, Markup, MessageFormatter};
pub use registry::{
    BuiltinFilter, BuiltinValidator, FilterFn, FilterRef, RuleCall, RuleRegistry, ValidatorFn,
    ValidatorRef,
};
pub use report::{ErrorReport, FailureRecord, Outcome, Verdict, MISMATCH_RULE};
pub use rule::{
    parse_chain, parse_rule, render_chain, ruleset, Delimiters, Param, RuleChain, RuleEntry,
    RuleSource, RuleSpec, Ruleset,
};
pub use sanitize::sanitize;
pub use settings::Settings;
pub use validation::Validation;
pub use value::{data_get, field, is_empty, to_text, Record};
