//! Subscription Registry
//!
//! The set of addresses the caller has registered interest in. Addresses
//! are opaque, case-sensitive strings; no canonicalization is applied.
//! The set only grows: there is no unsubscribe operation.

use std::collections::HashSet;
use std::sync::RwLock;

/// Concurrency-safe set of subscribed addresses.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: RwLock<HashSet<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `address` as subscribed. Re-subscribing is a no-op; the
    /// call always reports success.
    pub fn subscribe(&self, address: &str) -> bool {
        let mut set = self.inner.write().expect("registry lock poisoned");
        set.insert(address.to_owned());
        true
    }

    /// Whether `address` is currently subscribed.
    pub fn is_subscribed(&self, address: &str) -> bool {
        let set = self.inner.read().expect("registry lock poisoned");
        set.contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // ==================== Basic contract tests ====================

    #[test]
    fn test_unknown_address_is_not_subscribed() {
        let registry = SubscriptionRegistry::new();
        assert!(!registry.is_subscribed("0xaaaa"));
    }

    #[test]
    fn test_subscribe_always_returns_true() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.subscribe("0xaaaa"));
        assert!(registry.subscribe("0xaaaa")); // duplicate is fine
    }

    #[test]
    fn test_subscription_is_permanent() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("0xaaaa");
        for _ in 0..100 {
            assert!(registry.is_subscribed("0xaaaa"));
        }
    }

    #[test]
    fn test_addresses_are_case_sensitive() {
        let registry = SubscriptionRegistry::new();
        registry.subscribe("0xAbCd");

        assert!(registry.is_subscribed("0xAbCd"));
        assert!(!registry.is_subscribed("0xabcd"));
    }

    // ==================== Concurrency tests ====================

    #[test]
    fn test_concurrent_subscribe_and_lookup() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let mut handles = Vec::new();

        for w in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let address = format!("0x{w:02}{i:04}");
                    assert!(registry.subscribe(&address));
                    assert!(registry.is_subscribed(&address));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for w in 0..8 {
            for i in 0..100 {
                assert!(registry.is_subscribed(&format!("0x{w:02}{i:04}")));
            }
        }
    }
}
