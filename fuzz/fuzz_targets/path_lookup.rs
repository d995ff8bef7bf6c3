//! Fuzz target for dotted path lookup.
//!
//! Resolves arbitrary `a.b.*.c` style keys against arbitrary JSON
//! documents without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sieve_validation::{data_get, is_empty, to_text};

#[derive(Debug, Arbitrary)]
struct FuzzLookup {
    document: String,
    keys: Vec<String>,
}

fuzz_target!(|data: FuzzLookup| {
    let Ok(serde_json::Value::Object(record)) = serde_json::from_str(&data.document) else {
        return;
    };

    for key in &data.keys {
        if let Some(value) = data_get(&record, key) {
            let _ = is_empty(&value);
            let _ = to_text(&value);
        }
    }
});
