//! Throughput benchmarks for the ingestion hot path
//!
//! The per-message cost outside network I/O is envelope decoding plus
//! the registry check and store append; these verify it stays well
//! under the feed's delivery rate.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ethscope::types::FeedMessage;
use ethscope::{SubscriptionRegistry, Transaction, TransactionStore};

const NOTIFICATION: &str = r#"{"jsonrpc":"2.0","method":"eth_subscription","params":{"subscription":"0x7d196008e9ffbe655b64a52231ae5cae","result":"0x63336879edd91368ff2f924b605249f0e3b4926590c6afcfca7a02753b8c94a8"}}"#;

fn sample_tx() -> Transaction {
    Transaction {
        block_hash: None,
        block_number: None,
        from: "0x91199826dbc27ae3033357d91b6fd3b7eb4d2149".to_string(),
        gas: "0x575f2".to_string(),
        gas_price: Some("0x35f03481c".to_string()),
        max_fee_per_gas: Some("0x4ba2f83c3".to_string()),
        max_priority_fee_per_gas: Some("0x2cdd988".to_string()),
        hash: "0x63336879edd91368ff2f924b605249f0e3b4926590c6afcfca7a02753b8c94a8".to_string(),
        input: "0xe7a050aa".to_string(),
        nonce: "0x1b2".to_string(),
        to: Some("0x858646372cc42e1a627fce94aa7a7033e7cf075a".to_string()),
        value: Some("0x0".to_string()),
    }
}

/// Benchmark feed envelope decoding
fn bench_decode_notification(c: &mut Criterion) {
    c.bench_function("decode_notification", |b| {
        b.iter(|| {
            let message: FeedMessage = serde_json::from_str(black_box(NOTIFICATION)).unwrap();
            black_box(message.transaction_hash().is_some())
        })
    });
}

/// Benchmark the registry membership check
fn bench_registry_lookup(c: &mut Criterion) {
    let registry = SubscriptionRegistry::new();
    for i in 0..1000 {
        registry.subscribe(&format!("0x{i:040x}"));
    }

    c.bench_function("registry_lookup", |b| {
        b.iter(|| black_box(registry.is_subscribed(black_box("0x91199826dbc27ae3033357d91b6fd3b7eb4d2149"))))
    });
}

/// Benchmark a store append under one hot address
fn bench_store_append(c: &mut Criterion) {
    let store = TransactionStore::new();
    let tx = sample_tx();

    c.bench_function("store_append", |b| {
        b.iter(|| store.append(black_box("0x91199826dbc27ae3033357d91b6fd3b7eb4d2149"), tx.clone()))
    });
}

criterion_group!(
    benches,
    bench_decode_notification,
    bench_registry_lookup,
    bench_store_append
);
criterion_main!(benches);
