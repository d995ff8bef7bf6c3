//! Fuzz target for a full validation pass.
//!
//! Runs a fixed set of built-in rules over arbitrary JSON input and
//! renders the resulting messages.

#![no_main]

use libfuzzer_sys::fuzz_target;

use sieve_validation::{ruleset, Context, Validation};

fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Object(input)) = serde_json::from_slice(data) else {
        return;
    };
    let Ok(context) = Context::new() else {
        return;
    };
    let Ok(mut validation) = Validation::with_context(context.into_shared(), "en") else {
        return;
    };

    let rules = ruleset([
        ("name", "required|alpha_space|between_len,1;64"),
        ("email", "valid_email"),
        ("age", "integer|min_numeric,0"),
        ("born", "date,Y-m-d"),
        ("tags.*", "alpha_dash"),
        ("site", "valid_url|regex,/^https/i"),
        ("settings", "valid_json_string"),
    ]);

    if validation.validate(&input, &rules).is_ok() {
        let _ = validation.readable_errors();
    }
});
