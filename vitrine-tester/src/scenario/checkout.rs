//! Checkout flow scripts driven against a scripted order endpoint.
use super::{CUSTOMER, Scenario, ScenarioCtx, expect_eq, price};
use crate::fixtures::ScriptedEndpoint;
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use std::cell::Cell;
use std::rc::Rc;
use vitrine_core::{
    BrCodeEncoder, CheckoutError, CheckoutStage, PaymentMethod, ProductId, ProductSnapshot,
    crc16_ccitt,
};

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(CheckoutSuccess),
        Box::new(PartialFailure),
        Box::new(LoginRequired),
        Box::new(EmptyCart),
        Box::new(CancelKeepsCart),
        Box::new(PixPayload),
    ]
}

struct CheckoutSuccess;

#[async_trait(?Send)]
impl Scenario for CheckoutSuccess {
    fn key(&self) -> &'static str {
        "checkout-success"
    }

    fn description(&self) -> &'static str {
        "One order per line, in cart order, then an empty cart"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.signed_in_storefront();
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new(7_i64, "Caneca", price("19.90")?));
        store.add_or_increment(&ProductSnapshot::new("B", "Camiseta", price("49.50")?));
        store.add_or_increment(&ProductSnapshot::new(7_i64, "Caneca", price("19.90")?));

        let mut flow = storefront.begin_checkout()?;
        flow.select_method(PaymentMethod::CreditCard)?;
        let endpoint = ScriptedEndpoint::accepting();
        let report = storefront.complete_checkout(&mut flow, &endpoint).await?;

        expect_eq("accepted", report.succeeded(), 2)?;
        expect_eq("stage", flow.stage(), CheckoutStage::Cleared)?;
        let received = endpoint.received();
        expect_eq(
            "order ids",
            received.iter().map(|o| o.product_id.clone()).collect::<Vec<_>>(),
            vec![ProductId::from(7_i64), ProductId::from("B")],
        )?;
        expect_eq("first quantity", received[0].quantity, 2)?;
        ensure!(
            received
                .iter()
                .all(|o| o.customer_identity == CUSTOMER && o.payment_method == PaymentMethod::CreditCard),
            "orders carry the wrong customer or method"
        );
        ensure!(store.load().is_empty(), "cart not cleared");
        Ok(())
    }
}

struct PartialFailure;

#[async_trait(?Send)]
impl Scenario for PartialFailure {
    fn key(&self) -> &'static str {
        "checkout-partial-failure"
    }

    fn description(&self) -> &'static str {
        "A failed first order still completes checkout and resets the badge"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.signed_in_storefront();
        let badge = Rc::new(Cell::new(u64::MAX));
        let seen = badge.clone();
        let store = storefront.cart_store().on_badge(move |n| seen.set(n));
        store.add_or_increment(&ProductSnapshot::new(1_i64, "Caneca", price("19.90")?));
        store.add_or_increment(&ProductSnapshot::new(2_i64, "Camiseta", price("49.50")?));

        let mut flow = storefront.begin_checkout()?;
        flow.select_method(PaymentMethod::Boleto)?;
        let endpoint = ScriptedEndpoint::rejecting([ProductId::from(1_i64)]);
        let orders = flow.confirm()?;
        let report = vitrine_core::submit_orders(&orders, &endpoint).await;
        store.settle_checkout(&report, ctx.retain_failed);
        flow.finish()?;

        expect_eq("attempted", report.attempted, 2)?;
        expect_eq("failures", report.failures.len(), 1)?;
        expect_eq("orders sent", endpoint.received().len(), 2)?;
        let cart = store.load();
        if ctx.retain_failed {
            expect_eq("lines kept", cart.len(), 1)?;
            ensure!(cart.find(&ProductId::from(1_i64)).is_some(), "failed line dropped");
            expect_eq("badge", badge.get(), 1)?;
        } else {
            ensure!(cart.is_empty(), "cart not cleared after partial failure");
            expect_eq("badge", badge.get(), 0)?;
        }
        Ok(())
    }
}

struct LoginRequired;

#[async_trait(?Send)]
impl Scenario for LoginRequired {
    fn key(&self) -> &'static str {
        "checkout-login-required"
    }

    fn description(&self) -> &'static str {
        "Checkout without a signed-in customer is refused and the cart survives"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.storefront();
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new(1_i64, "Caneca", price("19.90")?));
        let before = store.load();

        match storefront.begin_checkout() {
            Err(CheckoutError::LoginRequired) => {}
            other => anyhow::bail!("expected LoginRequired, got {other:?}"),
        }
        expect_eq("cart", store.load(), before)?;
        Ok(())
    }
}

struct EmptyCart;

#[async_trait(?Send)]
impl Scenario for EmptyCart {
    fn key(&self) -> &'static str {
        "checkout-empty-cart"
    }

    fn description(&self) -> &'static str {
        "An empty cart never reaches payment selection"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.signed_in_storefront();
        expect_eq(
            "begin",
            storefront.begin_checkout().err(),
            Some(CheckoutError::EmptyCart),
        )?;
        Ok(())
    }
}

struct CancelKeepsCart;

#[async_trait(?Send)]
impl Scenario for CancelKeepsCart {
    fn key(&self) -> &'static str {
        "checkout-cancel"
    }

    fn description(&self) -> &'static str {
        "Cancelling before confirmation has no side effects; cancelling mid-submission is refused"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.signed_in_storefront();
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")?));
        let before = store.load();

        let mut flow = storefront.begin_checkout()?;
        flow.select_method(PaymentMethod::Pix)?;
        flow.cancel()?;
        expect_eq("stage", flow.stage(), CheckoutStage::Cancelled)?;
        expect_eq("cart", store.load(), before)?;

        let mut flow = storefront.begin_checkout()?;
        flow.select_method(PaymentMethod::DebitCard)?;
        flow.confirm()?;
        expect_eq(
            "cancel while submitting",
            flow.cancel().err(),
            Some(CheckoutError::SubmissionInProgress),
        )?;
        Ok(())
    }
}

struct PixPayload;

#[async_trait(?Send)]
impl Scenario for PixPayload {
    fn key(&self) -> &'static str {
        "pix-payload"
    }

    fn description(&self) -> &'static str {
        "PIX shows a BR Code for the cart total with a valid checksum"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.signed_in_storefront();
        let store = storefront.cart_store();
        for _ in 0..3 {
            store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")?));
        }
        let mut flow = storefront.begin_checkout()?;
        let pix = &storefront.config().pix;

        flow.select_method(PaymentMethod::CreditCard)?;
        ensure!(
            flow.pix_charge(pix, &BrCodeEncoder).is_none(),
            "card payment must not show a PIX code"
        );

        flow.select_method(PaymentMethod::Pix)?;
        let charge = flow
            .pix_charge(pix, &BrCodeEncoder)
            .context("PIX selected but no charge")?;
        ensure!(charge.payload.contains("540529.97"), "amount field missing: {}", charge.payload);
        ensure!(charge.payload.contains(&pix.key), "payee key missing");
        let (body, crc) = charge.payload.split_at(charge.payload.len() - 4);
        expect_eq("crc", format!("{:04X}", crc16_ccitt(body.as_bytes())), crc.to_string())?;
        Ok(())
    }
}
