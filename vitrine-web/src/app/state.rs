use crate::a11y;
use crate::components::catalog::CatalogState;
use crate::components::notice::Notice;
use crate::storage::BrowserStorage;
use std::cell::Cell;
use std::rc::Rc;
use vitrine_core::{Cart, CartStore, CheckoutFlow, CheckoutStage, Storefront, StorefrontConfig};
use yew::prelude::*;

/// The single popup slot. Opening one popup replaces whatever was open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Cart,
    Checkout(CheckoutFlow),
}

impl Overlay {
    /// The checkout popup is sending orders.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Checkout(flow) if flow.stage() == CheckoutStage::Submitting)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Rc<StorefrontConfig>,
    /// Last cart read from storage; refreshed after every mutation.
    pub cart: UseStateHandle<Cart>,
    pub badge: UseStateHandle<u64>,
    pub overlay: UseStateHandle<Overlay>,
    pub notice: UseStateHandle<Option<Notice>>,
    pub catalog: UseStateHandle<CatalogState>,
    pub logged_in: UseStateHandle<bool>,
    /// A login or registration request is in flight.
    pub busy: UseStateHandle<bool>,
    /// Set from confirm until the order loop settles the cart.
    pub submitting: Rc<Cell<bool>>,
}

#[hook]
pub fn use_app_state() -> AppState {
    AppState {
        config: (*use_memo((), |_| crate::config::shared())).clone(),
        cart: use_state(Cart::new),
        badge: use_state(|| 0_u64),
        overlay: use_state(Overlay::default),
        notice: use_state(|| None::<Notice>),
        catalog: use_state(|| CatalogState::Loading),
        logged_in: use_state(|| false),
        busy: use_state(|| false),
        submitting: use_memo((), |_| Cell::new(false)),
    }
}

impl AppState {
    #[must_use]
    pub fn storefront(&self) -> Storefront<BrowserStorage> {
        Storefront::new(BrowserStorage, (*self.config).clone())
    }

    /// Cart store wired to the header badge.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<BrowserStorage> {
        let badge = self.badge.clone();
        self.storefront()
            .cart_store()
            .on_badge(move |count| badge.set(count))
    }

    /// Re-read the persisted cart into the view state.
    pub fn refresh_cart(&self) {
        let store = self.cart_store();
        let cart = store.load();
        store.refresh_badge(&cart);
        self.cart.set(cart);
    }

    /// An order loop is running or the overlay still shows one.
    #[must_use]
    pub fn checkout_in_flight(&self) -> bool {
        self.submitting.get() || self.overlay.is_submitting()
    }

    pub fn refresh_session(&self) {
        self.logged_in.set(self.storefront().session().is_logged_in());
    }

    pub fn notify(&self, notice: Notice) {
        a11y::set_status(&notice.message);
        self.notice.set(Some(notice));
    }
}
