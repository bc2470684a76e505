//! Dispatcher integration tests.
//!
//! These tests exercise the JSON boundary: method names, params,
//! envelopes, atomicity of failed calls, journaling and replay.

use escalate_engine::core::{Card, EngineConfig, GameRng, RegistrationPolicy, Store, UserId};
use escalate_engine::dispatch::{Call, Dispatcher, Envelope};
use escalate_engine::error::ErrorKind;
use escalate_engine::supply::ScriptedSource;
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Route engine logs to the test harness; set RUST_LOG to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scripted(config: EngineConfig, script: Vec<Card>) -> Dispatcher<ScriptedSource> {
    init_tracing();
    Dispatcher::new(config, ScriptedSource::new(script))
}

fn ok(envelope: Envelope) -> Value {
    match envelope {
        Envelope::Ok(payload) => payload,
        Envelope::Err(err) => panic!("call failed: {err}"),
    }
}

fn err_kind(envelope: Envelope) -> Option<ErrorKind> {
    match envelope {
        Envelope::Ok(payload) => panic!("call succeeded: {payload}"),
        Envelope::Err(err) => err.kind,
    }
}

// =============================================================================
// Full Round Over JSON
// =============================================================================

/// Test a complete session driven entirely by method names and JSON params.
#[test]
fn test_json_session() {
    let mut d = scripted(
        EngineConfig::new(),
        vec![Card::Queen, Card::Joker, Card::Two],
    );
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    ok(d.handle(&alice, "register_user", json!({ "bio": "bluffer" })));
    ok(d.handle(&bob, "register_user", json!({ "bio": "skeptic" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 3.5 })));

    let cards = ok(d.handle(&alice, "buy_cards", json!({ "amount": 3.5 })));
    assert_eq!(cards, json!(["QUEEN", "JOKER", "TWO"]));

    let me = ok(d.handle(&alice, "get_user", json!({ "id": "alice" })));
    assert_eq!(me["balance"], json!(0.5));

    let hand = ok(d.handle(
        &alice,
        "start_hand",
        json!({ "claim": "QUEEN", "cards": ["QUEEN", "JOKER"] }),
    ));
    assert_eq!(hand["hand_id"], "hand-000001");
    assert_eq!(hand["claimed_card"], "QUEEN");

    let bluff = ok(d.handle(&bob, "check", json!({ "hand_id": "hand-000001" })));
    assert_eq!(bluff, json!(false));

    let users = ok(d.handle(&bob, "get_users", Value::Null));
    assert_eq!(users[0]["user_id"], "alice");
    assert_eq!(users[0]["points"], json!(2.0));
    assert_eq!(users[1]["points"], json!(-2.0));

    let mine = ok(d.handle(&alice, "get_my_cards", json!({})));
    assert_eq!(mine, json!(["TWO"]));

    assert!(d.store().audit().is_ok());
}

/// Test an auction driven over JSON, including the client's bid spelling.
#[test]
fn test_json_auction() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Seven]);
    let seller = UserId::from("seller");
    let buyer = UserId::from("buyer");
    ok(d.handle(&seller, "register_user", json!({ "bio": "s" })));
    ok(d.handle(&buyer, "register_user", json!({ "bio": "b" })));
    ok(d.handle(&seller, "deposit", json!({ "amount": 1 })));
    ok(d.handle(&seller, "buy_cards", json!({ "amount": 1 })));
    ok(d.handle(&buyer, "deposit", json!({ "amount": 10 })));

    let offer = ok(d.handle(&seller, "offer", json!({ "cards": ["SEVEN"], "amount": 2 })));
    assert_eq!(offer["offer_id"], "offer-000001");
    assert_eq!(offer["current_bid"], Value::Null);

    ok(d.handle(&buyer, "bid", json!({ "offer_id": "offer-000001", "bid_amout": 4 })));
    ok(d.handle(&seller, "resolve", json!({ "offer_id": "offer-000001" })));

    let offers = ok(d.handle(&buyer, "get_offers", Value::Null));
    assert_eq!(offers[0]["is_resolved"], json!(true));
    assert_eq!(offers[0]["current_bidder_id"], "buyer");

    assert_eq!(ok(d.handle(&buyer, "get_my_cards", Value::Null)), json!(["SEVEN"]));
    assert!(d.store().audit().is_ok());
}

// =============================================================================
// Rejections
// =============================================================================

/// Test that malformed calls are InvalidInput.
#[test]
fn test_malformed_calls() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));

    assert_eq!(err_kind(d.handle(&alice, "teleport", json!({}))), Some(ErrorKind::InvalidInput));
    assert_eq!(
        err_kind(d.handle(&alice, "deposit", json!({ "amount": "lots" }))),
        Some(ErrorKind::InvalidInput)
    );
    assert_eq!(
        err_kind(d.handle(&alice, "deposit", json!({ "amount": -1 }))),
        Some(ErrorKind::InvalidInput)
    );
    assert_eq!(
        err_kind(d.handle(&alice, "start_hand", json!({ "claim": "ELEVEN", "cards": ["ACE"] }))),
        Some(ErrorKind::InvalidInput)
    );
    assert_eq!(
        err_kind(d.handle_json(&alice, "deposit", "not json")),
        Some(ErrorKind::InvalidInput)
    );
}

/// Test that unregistered callers cannot mutate.
#[test]
fn test_unregistered_caller() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let ghost = UserId::from("ghost");

    assert_eq!(
        err_kind(d.handle(&ghost, "deposit", json!({ "amount": 1 }))),
        Some(ErrorKind::NotFound)
    );
    assert_eq!(ok(d.handle(&ghost, "get_my_cards", Value::Null)), json!([]));
    assert_eq!(ok(d.handle(&ghost, "get_user", json!({ "id": "ghost" }))), Value::Null);
}

/// Test that a failed call leaves the store and journal untouched.
#[test]
fn test_failed_call_is_atomic() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 2 })));
    ok(d.handle(&alice, "buy_cards", json!({ "amount": 1 })));

    let store: Store = d.store().clone();
    let journal = d.journal().len();

    let failures = [
        d.handle(&alice, "buy_cards", json!({ "amount": 5 })),
        d.handle(&alice, "start_hand", json!({ "claim": "ACE", "cards": ["ACE", "ACE"] })),
        d.handle(&alice, "offer", json!({ "cards": ["ACE"], "amount": 0 })),
        d.handle(&alice, "check", json!({ "hand_id": "hand-000001" })),
        d.handle(&alice, "withdraw_bid", json!({ "offer_id": "offer-000001" })),
    ];

    assert!(failures.iter().all(|envelope| !envelope.is_ok()));
    assert_eq!(d.store(), &store);
    assert_eq!(d.journal().len(), journal);
}

/// Test that amounts beyond the money range are rejected without effect.
#[test]
fn test_deposit_overflow_is_rejected() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
    d.execute(&alice, Call::RegisterUser { bio: "whale".into() })
        .unwrap();
    d.execute(&alice, Call::Deposit { amount: huge }).unwrap();
    let store = d.store().clone();

    let err = d.execute(&alice, Call::Deposit { amount: huge }).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(d.store(), &store);
    assert_eq!(d.journal().len(), 2);
    d.store().audit().unwrap();
}

/// Test that a purchase over the per-call card limit draws nothing.
#[test]
fn test_oversized_purchase_is_rejected() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 1_000_000_000_000_u64 })));
    let store = d.store().clone();

    let envelope = d.handle(&alice, "buy_cards", json!({ "amount": 1_000_000_000_000_u64 }));

    assert_eq!(err_kind(envelope), Some(ErrorKind::InvalidInput));
    assert_eq!(d.store(), &store);
    assert_eq!(d.source().drawn(), 0);
}

// =============================================================================
// Registration Policy and Config
// =============================================================================

/// Test that duplicate registration is rejected by default.
#[test]
fn test_duplicate_registration_rejected() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "first" })));

    assert_eq!(
        err_kind(d.handle(&alice, "register_user", json!({ "bio": "second" }))),
        Some(ErrorKind::InvalidInput)
    );
    assert_eq!(d.store().user(&alice).unwrap().bio, "first");
}

/// Test that ReturnExisting hands back the original account unchanged.
#[test]
fn test_duplicate_registration_returns_existing() {
    let config = EngineConfig::new()
        .with_registration(RegistrationPolicy::ReturnExisting)
        .with_starting_balance(Decimal::from(100));
    let mut d = scripted(config, vec![Card::Ace]);
    let alice = UserId::from("alice");

    ok(d.handle(&alice, "register_user", json!({ "bio": "first" })));
    let again = ok(d.handle(&alice, "register_user", json!({ "bio": "second" })));

    assert_eq!(again["bio"], "first");
    assert_eq!(again["balance"], json!(100.0));
    assert_eq!(d.store().supply().total_deposited, Decimal::from(100));
    assert!(d.store().audit().is_ok());
}

/// Test that empty bios and blank callers are rejected.
#[test]
fn test_registration_validation() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);

    assert_eq!(
        err_kind(d.handle(&UserId::from("alice"), "register_user", json!({ "bio": "  " }))),
        Some(ErrorKind::InvalidInput)
    );
    assert_eq!(
        err_kind(d.handle(&UserId::from(""), "register_user", json!({ "bio": "x" }))),
        Some(ErrorKind::InvalidInput)
    );
}

/// Test that config loads from JSON with defaults for missing keys.
#[test]
fn test_config_from_json() {
    let config = EngineConfig::from_json(
        r#"{ "starting_balance": 100, "registration": "return_existing" }"#,
    )
    .unwrap();

    assert_eq!(config.starting_balance, Decimal::from(100));
    assert_eq!(config.registration, RegistrationPolicy::ReturnExisting);
    assert_eq!(config.rewards.uncaught_bluff_card, Decimal::new(12, 1));
}

// =============================================================================
// Journal, Replay, Snapshots
// =============================================================================

/// Test that only committed mutations are journaled, in order.
#[test]
fn test_journal_contents() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));
    ok(d.handle(&alice, "get_users", Value::Null));
    err_kind(d.handle(&alice, "deposit", json!({ "amount": 0 })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 1 })));

    let methods: Vec<_> = d.journal().iter().map(|r| r.call.method()).collect();
    assert_eq!(methods, vec!["register_user", "deposit"]);

    let sequences: Vec<_> = d.journal().iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![1, 2]);
}

/// Test that replaying a journal with the same seed reproduces the store.
#[test]
fn test_replay_is_deterministic() {
    init_tracing();
    let config = EngineConfig::new().with_seed(2024);
    let mut d = Dispatcher::seeded(config.clone());
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");

    ok(d.handle(&alice, "register_user", json!({ "bio": "a" })));
    ok(d.handle(&bob, "register_user", json!({ "bio": "b" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 8 })));
    let drawn = ok(d.handle(&alice, "buy_cards", json!({ "amount": 8 })));
    let first = drawn[0].clone();
    ok(d.handle(&alice, "start_hand", json!({ "claim": "ACE", "cards": [first] })));
    ok(d.handle(&bob, "check", json!({ "hand_id": "hand-000001" })));

    let json = serde_json::to_string(d.journal()).unwrap();
    let records: Vec<escalate_engine::dispatch::CallRecord> = serde_json::from_str(&json).unwrap();

    let source = Dispatcher::seeded(config.clone()).source().clone();
    let replayed = Dispatcher::<GameRng>::replay(config, source, &records).unwrap();

    assert_eq!(replayed.store(), d.store());
    assert!(replayed.store().audit().is_ok());
}

/// Test that a dispatcher resumes from a snapshot.
#[test]
fn test_resume_from_snapshot() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Nine]);
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 2.5 })));
    ok(d.handle(&alice, "buy_cards", json!({ "amount": 2 })));

    let bytes = d.store().to_snapshot().unwrap();
    let store = Store::from_snapshot(&bytes).unwrap();
    let mut resumed = Dispatcher::with_store(
        EngineConfig::new(),
        store,
        ScriptedSource::repeating(Card::Nine),
    );

    let hand = ok(resumed.handle(&alice, "start_hand", json!({ "claim": "NINE", "cards": ["NINE"] })));
    assert_eq!(hand["hand_id"], "hand-000001");
    assert_eq!(resumed.store().user(&alice).unwrap().balance, Decimal::new(5, 1));
    assert!(resumed.store().audit().is_ok());
}

/// Test that a store snapshot plus RNG position resumes the same draws.
#[test]
fn test_resume_seeded_stream() {
    let mut d = Dispatcher::seeded(EngineConfig::new().with_seed(11));
    let alice = UserId::from("alice");
    ok(d.handle(&alice, "register_user", json!({ "bio": "x" })));
    ok(d.handle(&alice, "deposit", json!({ "amount": 10 })));
    ok(d.handle(&alice, "buy_cards", json!({ "amount": 4 })));

    let bytes = d.store().to_snapshot().unwrap();
    let position = d.source().state();

    let mut resumed = Dispatcher::with_store(
        EngineConfig::new().with_seed(11),
        Store::from_snapshot(&bytes).unwrap(),
        GameRng::from_state(&position),
    );

    let expected = ok(d.handle(&alice, "buy_cards", json!({ "amount": 6 })));
    let actual = ok(resumed.handle(&alice, "buy_cards", json!({ "amount": 6 })));
    assert_eq!(actual, expected);
    assert_eq!(resumed.store(), d.store());
}

// =============================================================================
// Wire Unwrapping
// =============================================================================

/// Test that host-wrapped responses decode to the same envelope.
#[test]
fn test_wire_layers() {
    let mut d = scripted(EngineConfig::new(), vec![Card::Ace]);
    let alice = UserId::from("alice");
    let envelope = d.handle(&alice, "register_user", json!({ "bio": "x" }));
    let direct = envelope.to_json().unwrap();

    let wrapped = json!({ "txn_result": direct }).to_string();
    assert_eq!(Envelope::from_wire(&wrapped).unwrap(), envelope);

    let payload = serde_json::to_string(&envelope.clone().into_result().unwrap()).unwrap();
    let double_encoded = json!({ "Ok": payload }).to_string();
    assert_eq!(Envelope::from_wire(&double_encoded).unwrap(), envelope);
}
