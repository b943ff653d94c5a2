//! HTTP client for the storefront API.
use crate::dom;
use async_trait::async_trait;
use serde::Deserialize;
use vitrine_core::{
    CatalogProduct, LoginRequest, LoginResponse, OrderRequest, OrderSubmitter,
    RegistrationRequest, StorefrontConfig, SubmitError, parse_catalog_str,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Erro de rede: {0}")]
    Network(String),
    #[error("{0}")]
    Http(String),
    #[error("Resposta inválida: {0}")]
    Decode(String),
}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        Self::Network(dom::js_error_message(&value))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turn a non-2xx response into an error message.
///
/// A JSON body yields its `message` or `Erro <status>: <statusText>`; any
/// other body yields `fallback`.
#[allow(clippy::future_not_send)]
async fn http_error(response: &Response, fallback: &str) -> ApiError {
    let body = dom::response_text(response).await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => format!("Erro {}: {}", response.status(), response.status_text()),
        Err(_) => fallback.to_string(),
    };
    ApiError::Http(message)
}

/// Fetch and normalize the product catalog.
///
/// # Errors
/// Returns an error on network failure, a non-2xx status or a non-JSON body.
#[allow(clippy::future_not_send)]
pub async fn fetch_catalog(config: &StorefrontConfig) -> Result<Vec<CatalogProduct>, ApiError> {
    let response = dom::fetch_response(&config.products_url()).await?;
    if !response.ok() {
        return Err(ApiError::Http(format!(
            "Erro ao buscar produtos: {}",
            response.status()
        )));
    }
    let body = dom::response_text(&response).await?;
    let products = parse_catalog_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
    log::debug!("catalog loaded with {} products", products.len());
    Ok(products)
}

/// # Errors
/// Returns the API's message when the credentials are refused.
#[allow(clippy::future_not_send)]
pub async fn login(
    config: &StorefrontConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let response = dom::post_json(&config.login_url(), request).await?;
    if !response.ok() {
        return Err(http_error(&response, "Erro ao fazer login").await);
    }
    let value = JsFuture::from(response.json()?).await?;
    serde_wasm_bindgen::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// # Errors
/// Returns the API's message when the registration is refused.
#[allow(clippy::future_not_send)]
pub async fn register(
    config: &StorefrontConfig,
    request: &RegistrationRequest,
) -> Result<(), ApiError> {
    let response = dom::post_json(&config.customers_url(), request).await?;
    if !response.ok() {
        return Err(http_error(&response, "Erro ao fazer cadastro").await);
    }
    Ok(())
}

/// Order endpoint backed by `fetch`.
#[derive(Debug, Clone)]
pub struct HttpOrderSubmitter {
    url: String,
}

impl HttpOrderSubmitter {
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            url: config.orders_url(),
        }
    }
}

#[async_trait(?Send)]
impl OrderSubmitter for HttpOrderSubmitter {
    async fn submit_order(&self, order: &OrderRequest) -> Result<(), SubmitError> {
        let response = dom::post_json(&self.url, order)
            .await
            .map_err(|e| SubmitError::Network(dom::js_error_message(&e)))?;
        if response.ok() {
            Ok(())
        } else {
            Err(SubmitError::Rejected {
                status: response.status(),
            })
        }
    }
}
