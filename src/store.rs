//! Transaction Store
//!
//! Append-only, per-address transaction history guarded by a read/write
//! lock. Entries are created lazily on first append, grow for the life
//! of the process, and are never evicted. Duplicate hashes are appended
//! as-is; the store does not deduplicate.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::types::Transaction;

/// Concurrency-safe map from address to its observed transactions.
#[derive(Debug, Default)]
pub struct TransactionStore {
    inner: RwLock<HashMap<String, Vec<Transaction>>>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions recorded for `address`, in append order.
    ///
    /// Returns an empty vec for an address with no entries; never fails.
    pub fn get(&self, address: &str) -> Vec<Transaction> {
        let map = self.inner.read().expect("store lock poisoned");
        map.get(address).cloned().unwrap_or_default()
    }

    /// Appends `transaction` to the end of `address`'s history,
    /// creating the entry if absent.
    pub fn append(&self, address: &str, transaction: Transaction) {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.entry(address.to_owned()).or_default().push(transaction);
    }
}
