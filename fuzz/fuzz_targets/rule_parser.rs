//! Fuzz target for rule chain parsing.
//!
//! Parses arbitrary chains under arbitrary delimiters and checks that
//! rendering a parsed chain and parsing it again is stable.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sieve_validation::rule::{parse_chain, render_chain, Delimiters, RuleSource};

#[derive(Debug, Arbitrary)]
struct FuzzChain {
    text: String,
    rule: char,
    param: char,
    array: char,
}

fuzz_target!(|data: FuzzChain| {
    // Default grammar
    let defaults = Delimiters::default();
    let chain = parse_chain(&RuleSource::Text(data.text.clone()), &defaults);
    for spec in &chain {
        assert_eq!(spec.name, spec.name.trim());
    }

    // Custom grammar, delimiters must be distinct
    if data.rule == data.param || data.rule == data.array || data.param == data.array {
        return;
    }
    let delimiters = Delimiters {
        rule: data.rule.to_string(),
        param: data.param.to_string(),
        array: data.array.to_string(),
    };
    let chain = parse_chain(&RuleSource::Text(data.text), &delimiters);

    let rendered = render_chain(&chain, &delimiters);
    let _ = parse_chain(&RuleSource::Text(rendered), &delimiters);
});
