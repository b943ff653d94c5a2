use anyhow::{Result, ensure};
use async_trait::async_trait;
use rust_decimal::Decimal;
use vitrine_core::{LoginResponse, MemoryStore, Storefront, StorefrontConfig};

pub mod cart;
pub mod checkout;

pub const CUSTOMER: &str = "qa@vitrine.test";

/// Settings shared by every scenario run.
#[derive(Debug, Clone, Default)]
pub struct ScenarioCtx {
    pub retain_failed: bool,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// Fresh in-memory storefront honouring the run's checkout settings.
    #[must_use]
    pub fn storefront(&self) -> Storefront<MemoryStore> {
        let mut config = StorefrontConfig::default();
        config.checkout.retain_failed_lines = self.retain_failed;
        Storefront::new(MemoryStore::new(), config)
    }

    /// Storefront with `CUSTOMER` signed in.
    #[must_use]
    pub fn signed_in_storefront(&self) -> Storefront<MemoryStore> {
        let storefront = self.storefront();
        storefront.session().record_login(
            CUSTOMER,
            &LoginResponse {
                token: Some("qa-token".to_string()),
                usuario: None,
            },
        );
        storefront
    }
}

/// A scripted cart or checkout run.
#[async_trait(?Send)]
pub trait Scenario {
    fn key(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn run(&self, ctx: &ScenarioCtx) -> Result<()>;
}

/// Parse a decimal literal used in scenario scripts.
pub fn price(raw: &str) -> Result<Decimal> {
    Ok(raw.parse::<Decimal>()?)
}

pub fn expect_eq<T>(label: &str, actual: T, expected: T) -> Result<()>
where
    T: PartialEq + std::fmt::Debug,
{
    ensure!(
        actual == expected,
        "{label}: expected {expected:?}, got {actual:?}"
    );
    Ok(())
}

fn registry() -> Vec<Box<dyn Scenario>> {
    let mut all: Vec<Box<dyn Scenario>> = Vec::new();
    all.extend(cart::scenarios());
    all.extend(checkout::scenarios());
    all
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Box<dyn Scenario>> {
    registry().into_iter().find(|s| s.key() == key)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    registry()
        .iter()
        .map(|s| (s.key(), s.description()))
        .collect()
}

/// Keys run for `all`.
#[must_use]
pub fn all_keys() -> Vec<String> {
    registry().iter().map(|s| s.key().to_string()).collect()
}
