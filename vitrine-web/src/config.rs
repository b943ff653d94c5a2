//! Embedded storefront configuration.
use std::rc::Rc;
use std::sync::OnceLock;
use vitrine_core::StorefrontConfig;

const EMBEDDED: &str = include_str!("../static/config.json");

/// Parse the embedded config, falling back to defaults when it is broken.
#[must_use]
pub fn load() -> StorefrontConfig {
    parse_or_default(EMBEDDED)
}

fn parse_or_default(text: &str) -> StorefrontConfig {
    StorefrontConfig::from_json(text).unwrap_or_else(|err| {
        log::warn!("invalid storefront config, using defaults: {err}");
        StorefrontConfig::default()
    })
}

/// Shared copy of the embedded config.
#[must_use]
pub fn shared() -> Rc<StorefrontConfig> {
    static CONFIG: OnceLock<StorefrontConfig> = OnceLock::new();
    Rc::new(CONFIG.get_or_init(load).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = StorefrontConfig::from_json(EMBEDDED).expect("embedded config");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.storage_keys.cart, vitrine_core::CART_KEY);
    }

    #[test]
    fn broken_config_falls_back_to_defaults() {
        assert_eq!(parse_or_default("{"), StorefrontConfig::default());
    }
}
