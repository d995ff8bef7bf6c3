// Sieve - declarative filtering and validation for loosely-typed records
//
// This library re-exports the validation engine together with its message
// catalogs and logging, so applications depend on a single crate.

// Re-export the engine
pub use sieve_validation::*;

// Re-export member crates
pub use sieve_lang;
pub use sieve_log;
pub use sieve_validation;

// Re-export the value model
pub use serde_json::{Map, Value, json};

/// Message catalogs.
pub mod lang {
    pub use sieve_lang::{Catalog, LangError, LangTag, MessageBundle};
}

/// Prelude module for convenient imports.
///
/// ```
/// use sieve::prelude::*;
///
/// let data = json!({"name": "  Ada  "});
/// let filtered = filter_input(
///     data.as_object().cloned().unwrap_or_default(),
///     &ruleset([("name", "trim|upper_case")]),
/// )?;
/// assert_eq!(filtered["name"], "ADA");
/// # Ok::<(), sieve::SieveError>(())
/// ```
pub mod prelude {
    pub use sieve_validation::{
        FieldMessages, Outcome, Record, Result, RuleCall, Ruleset, SieveError, Validation, Verdict,
        add_filter, add_function, add_validator, filter_input, is_valid, ruleset,
    };

    pub use serde_json::{Value, json};
}
