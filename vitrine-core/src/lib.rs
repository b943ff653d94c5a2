//! Vitrine Storefront Engine
//!
//! Platform-agnostic core logic for the Vitrine storefront: the persisted
//! shopping cart, its totals, the checkout state machine and PIX payloads.
//! This crate has no UI or browser dependencies; storage and the order
//! endpoint are supplied by the platform through [`KeyValueStore`] and
//! [`OrderSubmitter`].

pub mod account;
pub mod aggregate;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod pix;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use account::{
    Field, LoginForm, LoginRequest, RegistrationForm, RegistrationRequest, ValidationError,
};
pub use aggregate::{format_price, item_count, round_for_display, total};
pub use cart::{AddOutcome, Cart, CartItem, ProductId, ProductSnapshot, parse_quantity};
pub use catalog::{CatalogError, CatalogProduct, parse_catalog, parse_catalog_str};
pub use checkout::{
    CheckoutError, CheckoutFlow, CheckoutStage, OrderRequest, OrderSubmitter, PaymentMethod,
    SubmissionFailure, SubmissionReport, SubmitError, run_checkout, submit_orders,
};
pub use config::{CheckoutConfig, ConfigError, StorageKeys, StorefrontConfig};
pub use pix::{BrCodeEncoder, PixCharge, PixConfig, QrPayloadEncoder, crc16_ccitt};
pub use session::{LoginResponse, Profile, Session};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use store::{CART_KEY, CartStore};

/// Wires a storage backend to the configured cart and session keys.
pub struct Storefront<S>
where
    S: KeyValueStore + Clone,
{
    storage: S,
    config: StorefrontConfig,
}

impl<S> Storefront<S>
where
    S: KeyValueStore + Clone,
{
    /// Create a storefront over the provided storage
    pub const fn new(storage: S, config: StorefrontConfig) -> Self {
        Self { storage, config }
    }

    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Cart store bound to the configured cart key.
    pub fn cart_store(&self) -> CartStore<S> {
        CartStore::with_key(self.storage.clone(), self.config.storage_keys.cart.clone())
    }

    pub const fn session(&self) -> Session<'_, S> {
        Session::new(&self.storage, &self.config.storage_keys)
    }

    /// Start a checkout from the current cart and session.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` or `LoginRequired` without touching the cart.
    pub fn begin_checkout(&self) -> Result<CheckoutFlow, CheckoutError> {
        let mut flow = CheckoutFlow::new();
        let identity = self.session().identity();
        flow.open_payment(&self.cart_store().load(), identity.as_deref())?;
        Ok(flow)
    }

    /// Confirm `flow`, submit its orders and reset the cart per configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not ready to be confirmed.
    pub async fn complete_checkout<O>(
        &self,
        flow: &mut CheckoutFlow,
        submitter: &O,
    ) -> Result<SubmissionReport, CheckoutError>
    where
        O: OrderSubmitter + ?Sized,
    {
        run_checkout(
            flow,
            &self.cart_store(),
            submitter,
            self.config.checkout.retain_failed_lines,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingEndpoint {
        orders: RefCell<Vec<OrderRequest>>,
    }

    #[async_trait(?Send)]
    impl OrderSubmitter for RecordingEndpoint {
        async fn submit_order(&self, order: &OrderRequest) -> Result<(), SubmitError> {
            self.orders.borrow_mut().push(order.clone());
            Ok(())
        }
    }

    fn signed_in(storefront: &Storefront<MemoryStore>) {
        storefront.session().record_login(
            "ana@loja.com",
            &LoginResponse {
                token: Some("jwt".into()),
                usuario: None,
            },
        );
    }

    #[test]
    fn storefront_checkout_submits_and_clears() {
        let storefront = Storefront::new(MemoryStore::new(), StorefrontConfig::default());
        signed_in(&storefront);
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new(1, "Caneca", "19.90".parse().unwrap()));

        let mut flow = storefront.begin_checkout().unwrap();
        flow.select_method(PaymentMethod::DebitCard).unwrap();
        let endpoint = RecordingEndpoint::default();
        let report = block_on(storefront.complete_checkout(&mut flow, &endpoint)).unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(endpoint.orders.borrow()[0].customer_identity, "ana@loja.com");
        assert!(store.load().is_empty());
    }

    #[test]
    fn checkout_without_identity_leaves_cart_alone() {
        let storefront = Storefront::new(MemoryStore::new(), StorefrontConfig::default());
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new(1, "Caneca", "19.90".parse().unwrap()));

        assert_eq!(
            storefront.begin_checkout().unwrap_err(),
            CheckoutError::LoginRequired
        );
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn guest_with_empty_cart_is_sent_to_login() {
        let storefront = Storefront::new(MemoryStore::new(), StorefrontConfig::default());
        assert_eq!(
            storefront.begin_checkout().unwrap_err(),
            CheckoutError::LoginRequired
        );
    }

    #[test]
    fn cart_store_uses_configured_key() {
        let mut config = StorefrontConfig::default();
        config.storage_keys.cart = "outra.chave".into();
        let storage = MemoryStore::new();
        let storefront = Storefront::new(storage.clone(), config);
        storefront
            .cart_store()
            .add_or_increment(&ProductSnapshot::new("A", "Widget", "1".parse().unwrap()));
        assert!(storage.raw("outra.chave").is_some());
        assert!(storage.raw(CART_KEY).is_none());
    }
}
