//! Storefront configuration.
use crate::pix::PixConfig;
use crate::store::CART_KEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("api_base_url must be an absolute http(s) URL, got {0:?}")]
    BaseUrl(String),
    #[error("pix.key must be 1 to {max} bytes, got {0}", max = crate::pix::MAX_KEY_LEN)]
    PixKey(usize),
}

/// Browser storage keys for the cart and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub cart: String,
    pub user_email: String,
    pub auth_token: String,
    pub user_data: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: CART_KEY.to_string(),
            user_email: "vitrine.userEmail".to_string(),
            auth_token: "vitrine.authToken".to_string(),
            user_data: "vitrine.userData".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Keep lines whose order failed instead of clearing the whole cart.
    pub retain_failed_lines: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub api_base_url: String,
    pub login_path: String,
    pub storage_keys: StorageKeys,
    pub pix: PixConfig,
    pub checkout: CheckoutConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://localhost:7223/api".to_string(),
            login_path: "/login".to_string(),
            storage_keys: StorageKeys::default(),
            pix: PixConfig::default(),
            checkout: CheckoutConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Parse a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON, a relative API URL or a PIX key that
    /// does not fit in a BR Code.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        let base = config.api_base_url.as_str();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(config.api_base_url));
        }
        config.pix.validate().map_err(ConfigError::PixKey)?;
        Ok(config)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn products_url(&self) -> String {
        self.endpoint("Produto")
    }

    #[must_use]
    pub fn orders_url(&self) -> String {
        self.endpoint("Pedido")
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        self.endpoint("Auth/login")
    }

    #[must_use]
    pub fn customers_url(&self) -> String {
        self.endpoint("Cliente")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = StorefrontConfig::from_json(
            r#"{ "api_base_url": "https://api.loja.com/api/", "pix": { "key": "123" } }"#,
        )
        .unwrap();
        assert_eq!(config.products_url(), "https://api.loja.com/api/Produto");
        assert_eq!(config.login_url(), "https://api.loja.com/api/Auth/login");
        assert_eq!(config.pix.key, "123");
        assert_eq!(config.pix.merchant_city, PixConfig::default().merchant_city);
        assert_eq!(config.storage_keys.cart, CART_KEY);
        assert!(!config.checkout.retain_failed_lines);
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = StorefrontConfig::from_json(r#"{ "api_base_url": "/api" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl(_)));
        assert!(StorefrontConfig::from_json("nope").is_err());
    }

    #[test]
    fn rejects_pix_key_longer_than_the_br_code_allows() {
        let key = "x".repeat(crate::pix::MAX_KEY_LEN + 1);
        let err = StorefrontConfig::from_json(&format!(r#"{{ "pix": {{ "key": "{key}" }} }}"#))
            .unwrap_err();
        assert!(matches!(err, ConfigError::PixKey(78)));
        assert!(StorefrontConfig::default().pix.validate().is_ok());
    }

    #[test]
    fn defaults_point_at_local_api() {
        let config = StorefrontConfig::default();
        assert_eq!(config.orders_url(), "https://localhost:7223/api/Pedido");
        assert_eq!(config.customers_url(), "https://localhost:7223/api/Cliente");
    }
}
