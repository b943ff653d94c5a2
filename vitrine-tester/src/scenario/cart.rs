//! Cart store and aggregation scripts.
use super::{Scenario, ScenarioCtx, expect_eq, price};
use anyhow::{Result, ensure};
use async_trait::async_trait;
use vitrine_core::{
    AddOutcome, CART_KEY, ProductId, ProductSnapshot, format_price, item_count, total,
};

pub fn scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(Smoke),
        Box::new(DistinctAdds),
        Box::new(QuantityClamping),
        Box::new(PersistenceRoundTrip),
        Box::new(MalformedStorage),
        Box::new(StorageWriteFailure),
    ]
}

struct Smoke;

#[async_trait(?Send)]
impl Scenario for Smoke {
    fn key(&self) -> &'static str {
        "smoke"
    }

    fn description(&self) -> &'static str {
        "Add one product to an empty cart and check count and total"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let store = ctx.storefront().cart_store();
        let outcome = store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")?));
        expect_eq("outcome", outcome, Some(AddOutcome::Added))?;
        let cart = store.load();
        expect_eq("item count", item_count(&cart), 1)?;
        expect_eq("total", format_price(total(&cart)), "R$ 9.99".to_string())?;

        let outcome = store.add_or_increment(&ProductSnapshot::new("A", "Widget", price("9.99")?));
        expect_eq("outcome", outcome, Some(AddOutcome::QuantityUpdated(2)))?;
        Ok(())
    }
}

struct DistinctAdds;

#[async_trait(?Send)]
impl Scenario for DistinctAdds {
    fn key(&self) -> &'static str {
        "distinct-adds"
    }

    fn description(&self) -> &'static str {
        "Repeated adds keep one line per id and the badge equals the quantity sum"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let badge = std::rc::Rc::new(std::cell::Cell::new(0_u64));
        let seen = badge.clone();
        let store = ctx.storefront().cart_store().on_badge(move |n| seen.set(n));
        let script: [(i64, &str); 6] = [
            (1, "1.00"),
            (2, "2.50"),
            (1, "1.00"),
            (3, "0.10"),
            (2, "2.50"),
            (1, "1.00"),
        ];
        for (id, unit) in script {
            store.add_or_increment(&ProductSnapshot::new(id, format!("Item {id}"), price(unit)?));
        }
        let cart = store.load();
        expect_eq("lines", cart.len(), 3)?;
        expect_eq("item count", item_count(&cart), 6)?;
        expect_eq("badge", badge.get(), 6)?;
        expect_eq("total", format_price(total(&cart)), "R$ 8.10".to_string())?;
        let order: Vec<ProductId> = cart.items().iter().map(|i| i.id.clone()).collect();
        expect_eq(
            "insertion order",
            order,
            vec![ProductId::from(1_i64), ProductId::from(2_i64), ProductId::from(3_i64)],
        )?;
        Ok(())
    }
}

struct QuantityClamping;

#[async_trait(?Send)]
impl Scenario for QuantityClamping {
    fn key(&self) -> &'static str {
        "quantity-clamping"
    }

    fn description(&self) -> &'static str {
        "Decrements and typed quantities never drop a line below one"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let store = ctx.storefront().cart_store();
        let id = ProductId::from("A");
        for _ in 0..3 {
            store.add_or_increment(&ProductSnapshot::new(id.clone(), "Widget", price("9.99")?));
        }
        store.change_quantity(&id, -1000);
        expect_eq("after -1000", store.load().items()[0].quantity, 1)?;

        for (raw, expected) in [("5", 5), ("abc", 1), ("0", 1), ("-4", 1), ("7 unidades", 7)] {
            store.set_quantity(&id, raw);
            expect_eq(&format!("set {raw:?}"), store.load().items()[0].quantity, expected)?;
        }

        store.remove(&id);
        ensure!(store.load().find(&id).is_none(), "removed id came back");
        Ok(())
    }
}

struct PersistenceRoundTrip;

#[async_trait(?Send)]
impl Scenario for PersistenceRoundTrip {
    fn key(&self) -> &'static str {
        "persistence-round-trip"
    }

    fn description(&self) -> &'static str {
        "Saving then loading keeps items, quantities and order"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let storefront = ctx.storefront();
        let store = storefront.cart_store();
        store.add_or_increment(&ProductSnapshot::new(10_i64, "Caneca", price("19.90")?));
        store.add_or_increment(&ProductSnapshot::new("X-1", "Camiseta", price("49.50")?));
        store.change_quantity(&ProductId::from(10_i64), 2);
        let before = store.load();
        store.save(&before);

        let reopened = ctx.storefront();
        reopened.cart_store().storage().insert_raw(
            CART_KEY,
            &store.storage().raw(CART_KEY).unwrap_or_default(),
        );
        expect_eq("reloaded cart", reopened.cart_store().load(), before)?;
        Ok(())
    }
}

struct MalformedStorage;

#[async_trait(?Send)]
impl Scenario for MalformedStorage {
    fn key(&self) -> &'static str {
        "malformed-storage"
    }

    fn description(&self) -> &'static str {
        "Corrupt or non-sequence cart data loads as an empty cart"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        for raw in ["{not json", "{\"id\":1}", "42", "null", "[{\"id\":1}]"] {
            let store = ctx.storefront().cart_store();
            store.storage().insert_raw(CART_KEY, raw);
            ensure!(store.load().is_empty(), "{raw:?} should load as empty");
        }
        Ok(())
    }
}

struct StorageWriteFailure;

#[async_trait(?Send)]
impl Scenario for StorageWriteFailure {
    fn key(&self) -> &'static str {
        "storage-write-failure"
    }

    fn description(&self) -> &'static str {
        "Rejected writes are swallowed and leave the previous cart in place"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let store = ctx.storefront().cart_store();
        store.add_or_increment(&ProductSnapshot::new(1_i64, "Caneca", price("19.90")?));
        store.storage().set_fail_writes(true);
        store.add_or_increment(&ProductSnapshot::new(2_i64, "Camiseta", price("49.50")?));
        expect_eq("lines after failed write", store.load().len(), 1)?;
        Ok(())
    }
}
