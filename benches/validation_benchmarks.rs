use criterion::{Criterion, criterion_group, criterion_main};
use sieve::rule::{Delimiters, RuleSource, parse_chain};
use sieve::{Context, Record, SharedContext, Validation, json, ruleset};
use std::hint::black_box;

fn record(value: sieve::Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

fn context() -> SharedContext {
    Context::new().unwrap().into_shared()
}

fn bench_rule_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_parsing");
    let delimiters = Delimiters::default();

    let short = RuleSource::from("required|valid_email");
    let long = RuleSource::from(
        "required|alpha_numeric_dash|between_len,3;32|starts,user_|doesnt_contain_list,admin;root|regex,/^[a-z]/i",
    );

    group.bench_function("short_chain", |b| {
        b.iter(|| parse_chain(black_box(&short), &delimiters))
    });

    group.bench_function("long_chain", |b| {
        b.iter(|| parse_chain(black_box(&long), &delimiters))
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let mut validation = Validation::with_context(context(), "en").unwrap();

    let rules = ruleset([
        ("username", "required|alpha_numeric|between_len,3;16"),
        ("email", "required|valid_email"),
        ("age", "integer|min_numeric,18|max_numeric,130"),
        ("website", "valid_url"),
    ]);

    let valid = record(json!({
        "username": "ada1815",
        "email": "ada@example.com",
        "age": "36",
        "website": "https://example.com/ada",
    }));

    let invalid = record(json!({
        "username": "a",
        "email": "not-an-email",
        "age": "twelve",
        "website": "example",
    }));

    group.bench_function("valid_record", |b| {
        b.iter(|| validation.validate(black_box(&valid), &rules).unwrap())
    });

    group.bench_function("invalid_record", |b| {
        b.iter(|| validation.validate(black_box(&invalid), &rules).unwrap())
    });

    group.finish();
}

fn bench_list_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_fanout");
    let mut validation = Validation::with_context(context(), "en").unwrap();
    let rules = ruleset([("tags", "required|alpha_dash|max_len,24")]);

    let tags: Vec<String> = (0..100).map(|i| format!("tag-{}", "x".repeat(i % 10))).collect();
    let input = record(json!({ "tags": tags }));

    group.bench_function("hundred_elements", |b| {
        b.iter(|| validation.validate(black_box(&input), &rules).unwrap())
    });

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let validation = Validation::with_context(context(), "en").unwrap();

    let filters = ruleset([
        ("name", "trim|ucwords"),
        ("bio", "basic_tags|noise_words"),
        ("slug", "slug"),
        ("price", "sanitize_floats"),
    ]);

    let input = record(json!({
        "name": "   ada lovelace  ",
        "bio": "<p>I wrote <b>the</b> first <script>x()</script>program for an engine</p>",
        "slug": "Notes on the Analytical Engine!",
        "price": "$1,234.50",
    }));

    group.bench_function("mixed_filters", |b| {
        b.iter(|| validation.filter(black_box(input.clone()), &filters).unwrap())
    });

    group.finish();
}

fn bench_messages(c: &mut Criterion) {
    let mut group = c.benchmark_group("messages");
    let mut validation = Validation::with_context(context(), "en").unwrap();

    let rules = ruleset([
        ("first_name", "required"),
        ("last_name", "required"),
        ("password", "required|min_len,12"),
        ("code", "between_len,4;8"),
    ]);
    let input = record(json!({"password": "short", "code": "ab"}));
    validation.validate(&input, &rules).unwrap();

    group.bench_function("readable_errors", |b| {
        b.iter(|| black_box(validation.readable_errors().unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_parsing,
    bench_validation,
    bench_list_fanout,
    bench_filters,
    bench_messages,
);
criterion_main!(benches);
