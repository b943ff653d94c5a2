//! Checkout flow: payment method selection, sequential order submission and
//! the final cart reset.
//!
//! The flow is a small state machine driven by the checkout popup:
//!
//! ```text
//! CartView -> PaymentMethodSelect -> Submitting -> Cleared
//!      \______________/
//!             `-> Cancelled
//! ```
//!
//! Choosing PIX while in `PaymentMethodSelect` exposes a charge to render as a
//! QR code; it never changes what gets submitted.
use crate::aggregate::total;
use crate::cart::{Cart, ProductId};
use crate::pix::{PixCharge, PixConfig, QrPayloadEncoder};
use crate::storage::KeyValueStore;
use crate::store::CartStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [Self::CreditCard, Self::DebitCard, Self::Pix, Self::Boleto];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::DebitCard => "debit-card",
            Self::Pix => "pix",
            Self::Boleto => "boleto",
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditCard => "Cartão de crédito",
            Self::DebitCard => "Cartão de débito",
            Self::Pix => "PIX",
            Self::Boleto => "Boleto",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| CheckoutError::UnknownMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    CartView,
    PaymentMethodSelect,
    Submitting,
    Cleared,
    Cancelled,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("login required before checkout")]
    LoginRequired,
    #[error("choose a payment method first")]
    NoPaymentMethod,
    #[error("unknown payment method: {0}")]
    UnknownMethod(String),
    #[error("orders are already being submitted")]
    SubmissionInProgress,
    #[error("cannot {action} while in {stage:?}")]
    InvalidTransition {
        action: &'static str,
        stage: CheckoutStage,
    },
}

/// One order request, sent per cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    #[serde(rename = "clienteEmail")]
    pub customer_identity: String,
    #[serde(rename = "produtoId")]
    pub product_id: ProductId,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
    #[error("order rejected with status {status}")]
    Rejected { status: u16 },
    #[error("could not encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Order endpoint seam. Submissions are awaited one at a time.
#[async_trait(?Send)]
pub trait OrderSubmitter {
    /// Send one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order could not be delivered or was rejected.
    async fn submit_order(&self, order: &OrderRequest) -> Result<(), SubmitError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub product_id: ProductId,
    pub reason: String,
}

/// What happened during the submission loop. Never shown to the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub attempted: usize,
    pub failures: Vec<SubmissionFailure>,
}

impl SubmissionReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }

    /// Whether the order for `id` failed.
    #[must_use]
    pub fn failed(&self, id: &ProductId) -> bool {
        self.failures.iter().any(|f| f.product_id == *id)
    }
}

/// Submit every order in sequence, swallowing individual failures.
pub async fn submit_orders<O>(orders: &[OrderRequest], submitter: &O) -> SubmissionReport
where
    O: OrderSubmitter + ?Sized,
{
    let mut report = SubmissionReport::default();
    for order in orders {
        report.attempted += 1;
        if let Err(err) = submitter.submit_order(order).await {
            log::warn!("order for product {} failed: {err}", order.product_id);
            report.failures.push(SubmissionFailure {
                product_id: order.product_id.clone(),
                reason: err.to_string(),
            });
        }
    }
    report
}

/// In-progress checkout for one popup session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFlow {
    stage: CheckoutStage,
    method: Option<PaymentMethod>,
    identity: Option<String>,
    snapshot: Cart,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: CheckoutStage::CartView,
            method: None,
            identity: None,
            snapshot: Cart::new(),
        }
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    #[must_use]
    pub const fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    /// Cart contents captured when payment selection opened.
    #[must_use]
    pub const fn snapshot(&self) -> &Cart {
        &self.snapshot
    }

    /// Move from the cart view to payment selection.
    ///
    /// # Errors
    ///
    /// `LoginRequired` when no customer is signed in, even for an empty cart.
    /// `EmptyCart` when there is nothing to buy. The cart is never touched.
    pub fn open_payment(&mut self, cart: &Cart, identity: Option<&str>) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::CartView, "open payment")?;
        let identity = identity
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(CheckoutError::LoginRequired)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.identity = Some(identity.to_string());
        self.snapshot = cart.clone();
        self.method = None;
        self.stage = CheckoutStage::PaymentMethodSelect;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails unless payment selection is open.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::PaymentMethodSelect, "select a method")?;
        self.method = Some(method);
        Ok(())
    }

    /// The PIX charge to display, present only while PIX is selected.
    #[must_use]
    pub fn pix_charge(
        &self,
        config: &PixConfig,
        encoder: &impl QrPayloadEncoder,
    ) -> Option<PixCharge> {
        (self.stage == CheckoutStage::PaymentMethodSelect && self.method == Some(PaymentMethod::Pix))
            .then(|| PixCharge::new(total(&self.snapshot), config, encoder))
    }

    /// Abandon the flow. No effect on the cart.
    ///
    /// # Errors
    ///
    /// `SubmissionInProgress` once orders are being sent; finished flows
    /// cannot be cancelled either.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        match self.stage {
            CheckoutStage::CartView | CheckoutStage::PaymentMethodSelect => {
                self.stage = CheckoutStage::Cancelled;
                Ok(())
            }
            CheckoutStage::Submitting => Err(CheckoutError::SubmissionInProgress),
            stage => Err(CheckoutError::InvalidTransition {
                action: "cancel",
                stage,
            }),
        }
    }

    /// Lock in the chosen method and produce one order per cart line, in cart order.
    ///
    /// # Errors
    ///
    /// Fails outside payment selection or when no method was chosen.
    pub fn confirm(&mut self) -> Result<Vec<OrderRequest>, CheckoutError> {
        self.expect_stage(CheckoutStage::PaymentMethodSelect, "confirm")?;
        let method = self.method.ok_or(CheckoutError::NoPaymentMethod)?;
        let identity = self.identity.clone().ok_or(CheckoutError::LoginRequired)?;
        let orders = self
            .snapshot
            .items()
            .iter()
            .map(|item| OrderRequest {
                customer_identity: identity.clone(),
                product_id: item.id.clone(),
                quantity: item.quantity,
                payment_method: method,
            })
            .collect();
        self.stage = CheckoutStage::Submitting;
        Ok(orders)
    }

    /// Mark the submission loop as done.
    ///
    /// # Errors
    ///
    /// Fails unless orders were being submitted.
    pub fn finish(&mut self) -> Result<(), CheckoutError> {
        self.expect_stage(CheckoutStage::Submitting, "finish")?;
        self.stage = CheckoutStage::Cleared;
        Ok(())
    }

    fn expect_stage(&self, wanted: CheckoutStage, action: &'static str) -> Result<(), CheckoutError> {
        if self.stage == wanted {
            Ok(())
        } else if self.stage == CheckoutStage::Submitting {
            Err(CheckoutError::SubmissionInProgress)
        } else {
            Err(CheckoutError::InvalidTransition {
                action,
                stage: self.stage,
            })
        }
    }
}

/// Confirm the flow, send every order and reset the cart.
///
/// The cart is reset once the loop ends no matter how many orders failed;
/// `retain_failed` keeps the failed lines instead of clearing everything.
///
/// # Errors
///
/// Only the confirmation preconditions can fail; submission errors end up in
/// the returned report.
pub async fn run_checkout<S, O>(
    flow: &mut CheckoutFlow,
    store: &CartStore<S>,
    submitter: &O,
    retain_failed: bool,
) -> Result<SubmissionReport, CheckoutError>
where
    S: KeyValueStore,
    O: OrderSubmitter + ?Sized,
{
    let orders = flow.confirm()?;
    let report = submit_orders(&orders, submitter).await;
    store.settle_checkout(&report, retain_failed);
    flow.finish()?;
    log::info!(
        "checkout finished: {} of {} orders accepted",
        report.succeeded(),
        report.attempted
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ProductSnapshot;
    use crate::pix::BrCodeEncoder;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct ScriptedEndpoint {
        fail_for: HashSet<ProductId>,
        received: RefCell<Vec<OrderRequest>>,
    }

    #[async_trait(?Send)]
    impl OrderSubmitter for ScriptedEndpoint {
        async fn submit_order(&self, order: &OrderRequest) -> Result<(), SubmitError> {
            self.received.borrow_mut().push(order.clone());
            if self.fail_for.contains(&order.product_id) {
                Err(SubmitError::Network("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn price(text: &str) -> rust_decimal::Decimal {
        text.parse().unwrap()
    }

    fn two_item_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")));
        cart.add_or_increment(&ProductSnapshot::new("B", "Gadget", price("5.00")));
        cart.change_quantity(&"B".into(), 1);
        cart
    }

    #[test]
    fn payment_requires_items_and_identity() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(
            flow.open_payment(&Cart::new(), Some("a@b.c")),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            flow.open_payment(&two_item_cart(), None),
            Err(CheckoutError::LoginRequired)
        );
        assert_eq!(
            flow.open_payment(&two_item_cart(), Some("  ")),
            Err(CheckoutError::LoginRequired)
        );
        assert_eq!(
            flow.open_payment(&Cart::new(), None),
            Err(CheckoutError::LoginRequired)
        );
        assert_eq!(flow.stage(), CheckoutStage::CartView);
        flow.open_payment(&two_item_cart(), Some("ana@loja.com")).unwrap();
        assert_eq!(flow.stage(), CheckoutStage::PaymentMethodSelect);
    }

    #[test]
    fn pix_charge_follows_selected_method() {
        let mut flow = CheckoutFlow::new();
        flow.open_payment(&two_item_cart(), Some("ana@loja.com")).unwrap();
        let config = PixConfig::default();
        assert!(flow.pix_charge(&config, &BrCodeEncoder).is_none());

        flow.select_method(PaymentMethod::Pix).unwrap();
        let charge = flow.pix_charge(&config, &BrCodeEncoder).expect("pix shown");
        assert_eq!(charge.amount, price("19.99"));
        assert!(charge.payload.contains(&config.key));

        flow.select_method(PaymentMethod::Boleto).unwrap();
        assert!(flow.pix_charge(&config, &BrCodeEncoder).is_none());
    }

    #[test]
    fn confirm_builds_one_order_per_line_in_cart_order() {
        let mut flow = CheckoutFlow::new();
        flow.open_payment(&two_item_cart(), Some("ana@loja.com")).unwrap();
        assert_eq!(flow.confirm(), Err(CheckoutError::NoPaymentMethod));
        flow.select_method(PaymentMethod::CreditCard).unwrap();
        let orders = flow.confirm().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].product_id, ProductId::from("A"));
        assert_eq!(orders[1].quantity, 2);
        assert!(orders.iter().all(|o| o.customer_identity == "ana@loja.com"));
        assert_eq!(flow.stage(), CheckoutStage::Submitting);
        assert_eq!(flow.cancel(), Err(CheckoutError::SubmissionInProgress));
    }

    #[test]
    fn cancel_is_allowed_before_submission_only() {
        let mut flow = CheckoutFlow::new();
        flow.cancel().unwrap();
        assert_eq!(flow.stage(), CheckoutStage::Cancelled);
        assert!(flow.cancel().is_err());

        let mut flow = CheckoutFlow::new();
        flow.open_payment(&two_item_cart(), Some("ana@loja.com")).unwrap();
        flow.select_method(PaymentMethod::Pix).unwrap();
        flow.cancel().unwrap();
        assert_eq!(flow.stage(), CheckoutStage::Cancelled);
        assert!(flow.select_method(PaymentMethod::Boleto).is_err());
    }

    #[test]
    fn failed_submission_still_clears_cart_and_badge() {
        let badge = Rc::new(Cell::new(u64::MAX));
        let seen = Rc::clone(&badge);
        let store = CartStore::new(MemoryStore::new()).on_badge(move |n| seen.set(n));
        store.save(&two_item_cart());
        assert_eq!(badge.get(), 3);

        let endpoint = ScriptedEndpoint {
            fail_for: HashSet::from([ProductId::from("A")]),
            ..ScriptedEndpoint::default()
        };
        let mut flow = CheckoutFlow::new();
        flow.open_payment(&store.load(), Some("ana@loja.com")).unwrap();
        flow.select_method(PaymentMethod::Pix).unwrap();

        let report = block_on(run_checkout(&mut flow, &store, &endpoint, false)).unwrap();
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded(), 1);
        assert!(report.failed(&"A".into()));
        assert_eq!(endpoint.received.borrow().len(), 2);
        assert!(store.load().is_empty());
        assert_eq!(badge.get(), 0);
        assert_eq!(flow.stage(), CheckoutStage::Cleared);
    }

    #[test]
    fn payment_method_round_trips_through_strings() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>(), Ok(method));
        }
        assert!("cash".parse::<PaymentMethod>().is_err());
        let json = serde_json::to_string(&PaymentMethod::DebitCard).unwrap();
        assert_eq!(json, "\"debit-card\"");
    }

    #[test]
    fn order_request_uses_api_field_names() {
        let order = OrderRequest {
            customer_identity: "ana@loja.com".into(),
            product_id: ProductId::Int(3),
            quantity: 2,
            payment_method: PaymentMethod::Boleto,
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "clienteEmail": "ana@loja.com",
                "produtoId": 3,
                "quantidade": 2,
                "formaPagamento": "boleto"
            })
        );
    }
}
