//! Dispatcher throughput benchmarks.
//!
//! Run: cargo bench --bench dispatch
//!
//! These benchmarks measure:
//! - Store clone cost as the store grows
//! - Committed calls through the dispatcher
//! - JSON decode plus dispatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use escalate_engine::core::{Card, EngineConfig, UserId};
use escalate_engine::dispatch::{Call, Dispatcher};
use rust_decimal::Decimal;
use serde_json::json;

fn populated(users: usize) -> Dispatcher {
    let mut d = Dispatcher::seeded(EngineConfig::new().with_seed(1));
    for i in 0..users {
        let user = UserId::new(format!("user-{i:04}"));
        let _ = d.execute(&user, Call::RegisterUser { bio: "bench".into() });
        let _ = d.execute(&user, Call::Deposit { amount: Decimal::from(50) });
        let _ = d.execute(&user, Call::BuyCards { amount: Decimal::from(10) });
    }
    d
}

// ============================================================================
// STORE
// ============================================================================

fn bench_store_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_clone");
    for users in [10, 100, 1000] {
        let d = populated(users);
        group.bench_with_input(BenchmarkId::from_parameter(users), &d, |b, d| {
            b.iter(|| black_box(d.store().clone()))
        });
    }
    group.finish();
}

// ============================================================================
// DISPATCH
// ============================================================================

fn bench_hand_round(c: &mut Criterion) {
    let alice = UserId::from("user-0000");
    let bob = UserId::from("user-0001");

    c.bench_function("hand_round", |b| {
        b.iter_batched(
            || populated(100),
            |mut d| {
                let cards = d.store().user(&alice).map(|u| u.cards[..2].to_vec());
                if let Some(cards) = cards {
                    let _ = d.execute(&alice, Call::StartHand { claim: Card::Ace, cards });
                    let hand_id = escalate_engine::core::HandId::from_sequence(1);
                    let _ = d.execute(&bob, Call::Check { hand_id });
                }
                d
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_json_calls(c: &mut Criterion) {
    let mut d = populated(100);
    let alice = UserId::from("user-0000");

    c.bench_function("json_deposit", |b| {
        b.iter(|| black_box(d.handle(&alice, "deposit", json!({ "amount": 1.5 }))))
    });

    c.bench_function("json_get_users", |b| {
        b.iter(|| black_box(d.handle(&alice, "get_users", serde_json::Value::Null)))
    });
}

criterion_group!(benches, bench_store_clone, bench_hand_round, bench_json_calls);
criterion_main!(benches);
