//! Benchmarks for intent routing throughput.
//!
//! Routing runs on every user message, so the full pipeline (typo
//! normalization, rule table scan, parameter extraction) should stay
//! well under a millisecond per message.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use veria_chat::router::IntentRouter;
use veria_core::config::RouterConfig;

/// Realistic message mix: direct commands, typos, questions, chatter.
fn sample_messages() -> Vec<String> {
    let templates = [
        "create asset named Mail Server {i} with description primary mail relay",
        "list processes",
        "update asset 'Server {i}' description to \"replaced disk\"",
        "creat a scop named Building {i}",
        "generate inventory of assets report",
        "what is a statement of applicability",
        "delete the scenario Phishing Wave {i}",
        "thanks, that was helpful",
        "the weather is nice today, reference {i}",
    ];
    (0..900)
        .map(|i| templates[i % templates.len()].replace("{i}", &i.to_string()))
        .collect()
}

fn bench_routing(c: &mut Criterion) {
    let router = IntentRouter::new(&RouterConfig::default()).unwrap();
    let messages = sample_messages();

    let mut group = c.benchmark_group("intent_routing");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("mixed_single_message", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let message = &messages[idx % messages.len()];
            let intent = router.route(message, false);
            idx += 1;
            intent
        });
    });

    group.bench_function("command_with_typos", |b| {
        b.iter(|| router.route("creat assest named Backup Robot", false));
    });

    group.bench_function("unrecognized_fallback", |b| {
        b.iter(|| router.route("the quick brown fox jumps over the lazy dog", false));
    });

    group.finish();
}

fn bench_router_construction(c: &mut Criterion) {
    let config = RouterConfig::default();
    c.bench_function("router_construction", |b| {
        b.iter(|| IntentRouter::new(&config).unwrap());
    });
}

criterion_group!(benches, bench_routing, bench_router_construction);
criterion_main!(benches);
