//! In-process session storage for carts.
//!
//! Carts are keyed by an opaque session id supplied by the client. Storage is
//! per-key atomic replace; there is no cross-request read/modify/write lock,
//! so two concurrent requests for the same session can race. Acceptable for
//! the at-most-one-active-writer-per-session workload this service targets.

use dashmap::DashMap;
use uuid::Uuid;

use crate::cart::Cart;

#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<String, Cart>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh session id for clients that do not have one yet.
    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The cart for this session, or an empty cart if none exists yet. The
    /// cart is only created in storage on the first write.
    pub fn load(&self, session_id: &str) -> Cart {
        self.carts
            .get(session_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    pub fn save(&self, session_id: &str, cart: Cart) {
        self.carts.insert(session_id.to_string(), cart);
    }

    /// Drops the session's cart entirely. Used after a successful checkout.
    pub fn clear(&self, session_id: &str) {
        self.carts.remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_of_unknown_session_is_an_empty_cart() {
        let store = CartStore::new();
        let cart = store.load("nope");
        assert!(cart.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn save_and_load_round_trip_per_session() {
        let store = CartStore::new();

        let mut a = Cart::new();
        a.insert(1, 500);
        store.save("session-a", a.clone());

        let mut b = Cart::new();
        b.insert(2, 300);
        store.save("session-b", b.clone());

        assert_eq!(store.load("session-a"), a);
        assert_eq!(store.load("session-b"), b);
    }

    #[test]
    fn clear_removes_only_the_target_session() {
        let store = CartStore::new();
        let mut cart = Cart::new();
        cart.insert(1, 500);
        store.save("a", cart.clone());
        store.save("b", cart);

        store.clear("a");
        assert!(store.load("a").is_empty());
        assert!(!store.load("b").is_empty());
        assert_eq!(store.len(), 1);
    }
}
