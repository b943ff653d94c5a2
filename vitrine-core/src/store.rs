//! The cart store: the only code path that reads or writes the persisted cart.
use crate::aggregate::item_count;
use crate::cart::{AddOutcome, Cart, CartItem, ProductId, ProductSnapshot, parse_quantity};
use crate::checkout::SubmissionReport;
use crate::storage::KeyValueStore;
use std::rc::Rc;

/// Default storage key for the serialized cart.
pub const CART_KEY: &str = "vitrine.cart";

type BadgeListener = Rc<dyn Fn(u64)>;

/// Load-modify-save access to the persisted cart.
///
/// Every mutation reads the full cart, applies one change and writes the full
/// cart back. Nothing here returns an error: unreadable data loads as an empty
/// cart and failed writes are logged and dropped.
#[derive(Clone)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    badge: Option<BadgeListener>,
}

impl<S: KeyValueStore> CartStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            badge: None,
        }
    }

    /// Register the item-count badge refresh run after every save.
    #[must_use]
    pub fn on_badge(mut self, listener: impl Fn(u64) + 'static) -> Self {
        self.badge = Some(Rc::new(listener));
        self
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted cart.
    pub fn load(&self) -> Cart {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(err) => {
                log::warn!("cart storage unreadable, starting empty: {err}");
                return Cart::new();
            }
        };
        match serde_json::from_str::<Vec<CartItem>>(&raw) {
            Ok(items) => Cart::from_items(items),
            Err(err) => {
                log::warn!("discarding malformed cart under {}: {err}", self.key);
                Cart::new()
            }
        }
    }

    /// Persist the full cart and refresh the badge.
    pub fn save(&self, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(json) => {
                if let Err(err) = self.storage.set_item(&self.key, &json) {
                    log::error!("failed to persist cart: {err}");
                }
            }
            Err(err) => log::error!("failed to serialize cart: {err}"),
        }
        self.refresh_badge(cart);
    }

    /// Recompute the badge from an already loaded cart.
    pub fn refresh_badge(&self, cart: &Cart) {
        if let Some(badge) = &self.badge {
            badge(item_count(cart));
        }
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut Cart) -> T) -> T {
        let mut cart = self.load();
        let result = apply(&mut cart);
        self.save(&cart);
        result
    }

    /// Add a product or bump its quantity. `None` means nothing was stored.
    pub fn add_or_increment(&self, product: &ProductSnapshot) -> Option<AddOutcome> {
        let mut cart = self.load();
        let outcome = cart.add_or_increment(product);
        if outcome.is_some() {
            self.save(&cart);
        } else {
            log::debug!("ignoring product without a usable id or price: {product:?}");
        }
        outcome
    }

    pub fn change_quantity(&self, id: &ProductId, delta: i64) {
        self.mutate(|cart| cart.change_quantity(id, delta));
    }

    /// Set a line's quantity from raw user input.
    pub fn set_quantity(&self, id: &ProductId, raw: &str) {
        let quantity = parse_quantity(raw);
        self.mutate(|cart| cart.set_quantity(id, quantity));
    }

    pub fn remove(&self, id: &ProductId) {
        self.mutate(|cart| cart.remove(id));
    }

    pub fn clear(&self) {
        self.save(&Cart::new());
    }

    /// Apply the end-of-checkout reset.
    ///
    /// By default the whole cart is cleared. With `retain_failed` set, lines
    /// whose order submission failed are kept so the customer can retry.
    pub fn settle_checkout(&self, report: &SubmissionReport, retain_failed: bool) {
        if retain_failed && !report.failures.is_empty() {
            self.mutate(|cart| {
                cart.retain(|item| report.failed(&item.id));
            });
        } else {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::total;
    use crate::checkout::SubmissionFailure;
    use crate::storage::MemoryStore;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    fn price(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    fn store() -> CartStore<MemoryStore> {
        CartStore::new(MemoryStore::new())
    }

    #[test]
    fn missing_malformed_and_non_sequence_data_load_empty() {
        let store = store();
        assert!(store.load().is_empty());
        for raw in ["not json", "{\"id\":1}", "42", "[{\"id\":1}]", "null"] {
            store.storage().insert_raw(CART_KEY, raw);
            assert!(store.load().is_empty(), "{raw} should load empty");
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = store();
        let mut cart = Cart::new();
        cart.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")));
        cart.add_or_increment(&ProductSnapshot::new(2, "Gadget", price("5")));
        cart.set_quantity(&2.into(), 4);
        store.save(&cart);
        assert_eq!(store.load(), cart);
    }

    #[test]
    fn persisted_layout_is_a_plain_sequence() {
        let store = store();
        store.add_or_increment(&ProductSnapshot::new(5, "Caneca", price("19.90")));
        let raw = store.storage().raw(CART_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first["id"], 5);
        assert_eq!(first["name"], "Caneca");
        assert_eq!(first["unitPrice"], "19.90");
        assert_eq!(first["quantity"], 1);
    }

    #[test]
    fn legacy_numeric_prices_are_accepted() {
        let store = store();
        store.storage().insert_raw(
            CART_KEY,
            r#"[{"id":"A","name":"Widget","price":9.99,"quantity":2}]"#,
        );
        let cart = store.load();
        assert_eq!(total(&cart), price("19.98"));
    }

    #[test]
    fn stored_prices_near_the_decimal_limit_still_total() {
        let store = store();
        store.storage().insert_raw(
            CART_KEY,
            r#"[{"id":"A","name":"Widget","unitPrice":"79228162514264337593543950335","quantity":2}]"#,
        );
        let cart = store.load();
        assert_eq!(cart.len(), 1);
        assert_eq!(total(&cart), Decimal::MAX);
        assert_eq!(cart.items()[0].subtotal(), Decimal::MAX);
    }

    #[test]
    fn mutations_persist_and_refresh_badge() {
        let seen = Rc::new(Cell::new(u64::MAX));
        let badge = Rc::clone(&seen);
        let store = CartStore::new(MemoryStore::new()).on_badge(move |n| badge.set(n));

        let widget = ProductSnapshot::new("A", "Widget", price("9.99"));
        assert_eq!(store.add_or_increment(&widget), Some(AddOutcome::Added));
        assert_eq!(seen.get(), 1);
        store.change_quantity(&"A".into(), 4);
        assert_eq!(seen.get(), 5);
        store.set_quantity(&"A".into(), "nope");
        assert_eq!(seen.get(), 1);
        store.remove(&"A".into());
        assert_eq!(seen.get(), 0);
        assert!(store.load().is_empty());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let store = store();
        store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("1")));
        store.storage().set_fail_writes(true);
        store.add_or_increment(&ProductSnapshot::new("B", "Other", price("1")));
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn settle_checkout_can_keep_failed_lines() {
        let store = store();
        store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("1")));
        store.add_or_increment(&ProductSnapshot::new("B", "Other", price("2")));
        let report = SubmissionReport {
            attempted: 2,
            failures: vec![SubmissionFailure {
                product_id: "B".into(),
                reason: "offline".into(),
            }],
        };

        store.settle_checkout(&report, true);
        let cart = store.load();
        assert_eq!(cart.len(), 1);
        assert!(cart.find(&"B".into()).is_some());

        store.settle_checkout(&report, false);
        assert!(store.load().is_empty());
    }
}
