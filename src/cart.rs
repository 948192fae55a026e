//! Session-scoped shopping cart value type.
//!
//! A cart is a mapping from dish id to the unit price captured when the dish
//! was added, plus a running total. It has no database identity; it lives in
//! session storage until checkout reconciles it into an order. The serialized
//! form is the contract between requests within one session: a mapping with
//! exactly the keys `items` and `total`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    /// Dish id -> unit price (minor units) captured at add time.
    #[serde(default)]
    pub items: BTreeMap<i32, i64>,
    /// Sum of all captured unit prices.
    #[serde(default)]
    pub total: i64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Dish ids currently in the cart, in ascending order.
    pub fn dish_ids(&self) -> Vec<i32> {
        self.items.keys().copied().collect()
    }

    /// Records a dish at the given unit price. Idempotent: a dish already in
    /// the cart keeps its captured price and the call returns `false`.
    pub fn insert(&mut self, dish_id: i32, unit_price: i64) -> bool {
        if self.items.contains_key(&dish_id) {
            return false;
        }
        self.items.insert(dish_id, unit_price);
        self.recompute_total();
        true
    }

    /// Removes a dish, returning its captured unit price if it was present.
    pub fn remove(&mut self, dish_id: i32) -> Option<i64> {
        let removed = self.items.remove(&dish_id);
        if removed.is_some() {
            self.recompute_total();
        }
        removed
    }

    /// Recomputes `total` from the item mapping. Always recomputed rather
    /// than incrementally adjusted so the invariant cannot drift.
    fn recompute_total(&mut self) {
        self.total = self.items.values().sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tracks_item_prices_across_mutations() {
        let mut cart = Cart::new();
        assert_eq!(cart.total, 0);

        cart.insert(1, 500);
        cart.insert(2, 300);
        cart.insert(3, 250);
        assert_eq!(cart.total, 1050);

        cart.remove(2);
        assert_eq!(cart.total, 750);

        cart.remove(1);
        cart.remove(3);
        assert_eq!(cart.total, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_is_idempotent_and_keeps_captured_price() {
        let mut cart = Cart::new();
        assert!(cart.insert(7, 500));
        // Same dish at a different live price: no-op, frozen-at-add-time.
        assert!(!cart.insert(7, 999));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items.get(&7), Some(&500));
        assert_eq!(cart.total, 500);
    }

    #[test]
    fn remove_of_absent_dish_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.insert(1, 500);

        assert_eq!(cart.remove(42), None);
        assert_eq!(cart.total, 500);
        assert_eq!(cart.dish_ids(), vec![1]);
    }

    #[test]
    fn wire_format_uses_items_and_total_keys() {
        let mut cart = Cart::new();
        cart.insert(1, 500);
        cart.insert(2, 300);

        let value = serde_json::to_value(&cart).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("items"));
        assert!(object.contains_key("total"));
        assert_eq!(value["items"]["1"], 500);
        assert_eq!(value["items"]["2"], 300);
        assert_eq!(value["total"], 800);
    }

    #[test]
    fn wire_format_round_trips_exactly() {
        let mut cart = Cart::new();
        cart.insert(5, 1200);
        cart.insert(9, 450);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn missing_fields_deserialize_to_an_empty_cart() {
        let cart: Cart = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total, 0);
    }
}
