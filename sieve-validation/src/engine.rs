//! Field execution: runs rule chains against an input record.
//!
//! Every pass works on its own copy of the input and its own report, so the
//! same context can serve any number of passes.

use crate::builtins::validators::is_required_rule;
use crate::context::Context;
use crate::registry::{RuleCall, ValidatorRef};
use crate::report::{ErrorReport, FailureRecord, Outcome, MISMATCH_RULE};
use crate::rule::{parse_chain, RuleSpec, Ruleset};
use crate::value::{data_get, is_empty, Record};
use crate::Result;
use serde_json::Value;
use sieve_log::{debug, trace};

/// Validate `input` against `ruleset`.
///
/// Fields run in ruleset order. A field whose chain has no required rule
/// and whose value is empty is skipped. Otherwise rules run in order and
/// the first failure is recorded for the field, ending its chain. List
/// values apply each rule element by element.
pub fn validate(ctx: &Context, input: &Record, ruleset: &Ruleset) -> Result<Outcome<ErrorReport>> {
    let mut working = input.clone();
    let mut report = ErrorReport::new();

    for (field, source) in ruleset {
        let value = data_get(&working, field).unwrap_or(Value::Null);
        working.insert(field.clone(), value.clone());

        let chain = parse_chain(source, ctx.delimiters());
        let required = chain.iter().any(|spec| is_required_rule(&spec.name));

        if !required && is_empty(&value) {
            trace!("'{}' is empty and optional, skipping {} rule(s)", field, chain.len());
            continue;
        }

        for spec in &chain {
            let validator = ctx.registry().resolve_validator(&spec.name)?;

            if !passes(&validator, field, &working, spec, &value) {
                debug!("'{}' failed '{}'", field, spec.name);
                report.add(FailureRecord::new(
                    field.as_str(),
                    value.clone(),
                    spec.name.as_str(),
                    spec.params.clone(),
                ));
                break;
            }
        }
    }

    if report.is_empty() {
        Ok(Outcome::Valid)
    } else {
        Ok(Outcome::Invalid(report))
    }
}

/// Apply one rule to a field value; a non-empty list passes only when every
/// element does.
fn passes(
    validator: &ValidatorRef<'_>,
    field: &str,
    input: &Record,
    spec: &RuleSpec,
    value: &Value,
) -> bool {
    let elements = match value {
        Value::Array(items) if !items.is_empty() => items.as_slice(),
        scalar => std::slice::from_ref(scalar),
    };

    elements.iter().all(|element| {
        let call = RuleCall {
            field,
            input,
            params: &spec.params,
            value: element,
        };
        !validator.call(&call).is_failure()
    })
}

/// Run the filter chains of `filterset` over `input`.
///
/// Fields missing from the input are left out; list values are filtered
/// element by element.
pub fn filter(ctx: &Context, mut input: Record, filterset: &Ruleset) -> Result<Record> {
    for (field, source) in filterset {
        let Some(slot) = input.get_mut(field) else {
            trace!("'{}' not in input, no filters applied", field);
            continue;
        };

        for spec in parse_chain(source, ctx.delimiters()) {
            let filter = ctx.registry().resolve_filter(&spec.name)?;

            match &mut *slot {
                Value::Array(items) => {
                    for item in items.iter_mut() {
                        *item = filter.apply(std::mem::take(item), &spec.params);
                    }
                }
                scalar => *scalar = filter.apply(std::mem::take(scalar), &spec.params),
            }
        }
    }

    Ok(input)
}

/// One `mismatch` failure for every input key without a validation rule.
pub fn check_fields(input: &Record, ruleset: &Ruleset) -> Vec<FailureRecord> {
    input
        .iter()
        .filter(|(key, _)| !ruleset.contains_key(key.as_str()))
        .map(|(key, value)| FailureRecord::new(key.as_str(), value.clone(), MISMATCH_RULE, Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ruleset;
    use crate::SieveError;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn ctx() -> Context {
        Context::new().unwrap()
    }

    #[test]
    fn test_optional_empty_field_is_skipped() {
        let outcome = validate(&ctx(), &record(json!({"x": ""})), &ruleset([("x", "max_len,5")]));
        assert!(outcome.unwrap().is_valid());
    }

    #[test]
    fn test_required_missing_field() {
        let report = validate(&ctx(), &Record::new(), &ruleset([("x", "required|max_len,5")]))
            .unwrap()
            .invalid()
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].field, "x");
        assert_eq!(report.errors[0].rule, "required");
        assert_eq!(report.errors[0].value, Value::Null);
    }

    #[test]
    fn test_first_failure_wins() {
        let report = validate(
            &ctx(),
            &record(json!({"x": "ab"})),
            &ruleset([("x", "min_len,10|max_len,2|numeric")]),
        )
        .unwrap()
        .invalid()
        .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].rule, "min_len");
    }

    #[test]
    fn test_list_fanout_reports_once() {
        let report = validate(
            &ctx(),
            &record(json!({"tags": ["ok", ""]})),
            &ruleset([("tags", "required")]),
        )
        .unwrap()
        .invalid()
        .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors[0].value, json!(["ok", ""]));
    }

    #[test]
    fn test_required_empty_list_fails() {
        let outcome = validate(&ctx(), &record(json!({"tags": []})), &ruleset([("tags", "required")]));
        assert!(!outcome.unwrap().is_valid());
    }

    #[test]
    fn test_dotted_paths() {
        let input = record(json!({"user": {"email": "not-an-email"}}));
        let report = validate(&ctx(), &input, &ruleset([("user.email", "required|valid_email")]))
            .unwrap()
            .invalid()
            .unwrap();
        assert_eq!(report.errors[0].field, "user.email");
        assert_eq!(report.errors[0].value, json!("not-an-email"));
    }

    #[test]
    fn test_unknown_rule_aborts() {
        let result = validate(&ctx(), &record(json!({"x": "a"})), &ruleset([("x", "no_such_rule")]));
        assert!(matches!(result, Err(SieveError::UnknownValidator(name)) if name == "no_such_rule"));
    }

    #[test]
    fn test_unknown_rule_on_skipped_field_is_not_resolved() {
        let result = validate(&ctx(), &Record::new(), &ruleset([("x", "no_such_rule")]));
        assert!(result.unwrap().is_valid());
    }

    #[test]
    fn test_validate_is_repeatable() {
        let context = ctx();
        let input = record(json!({"a": "x", "b": "not numeric"}));
        let rules = ruleset([("a", "min_len,3"), ("b", "numeric")]);
        let first = validate(&context, &input, &rules).unwrap();
        let second = validate(&context, &input, &rules).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_chain_feeds_forward() {
        let out = filter(&ctx(), record(json!({"x": " ab "})), &ruleset([("x", "trim|upper_case")]))
            .unwrap();
        assert_eq!(out, record(json!({"x": "AB"})));
    }

    #[test]
    fn test_filter_lists_and_missing_fields() {
        let out = filter(
            &ctx(),
            record(json!({"tags": [" a", "b "]})),
            &ruleset([("tags", "trim"), ("absent", "trim")]),
        )
        .unwrap();
        assert_eq!(out, record(json!({"tags": ["a", "b"]})));
    }

    #[test]
    fn test_unknown_filter_aborts() {
        let result = filter(&ctx(), record(json!({"x": "a"})), &ruleset([("x", "nope")]));
        assert!(matches!(result, Err(SieveError::UnknownFilter(_))));
    }

    #[test]
    fn test_check_fields() {
        let input = record(json!({"name": "a", "extra": 1}));
        let mismatches = check_fields(&input, &ruleset([("name", "required")]));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].field, "extra");
        assert_eq!(mismatches[0].rule, MISMATCH_RULE);
    }
}
