//! Catalog payload parsing.
//!
//! The product API has shipped several field spellings over time; products are
//! read leniently and normalized into [`CatalogProduct`].
use crate::cart::{ProductId, ProductSnapshot};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

const ID_FIELDS: [&str; 4] = ["Id", "id", "produtoId", "ProdutoId"];
const NAME_FIELDS: [&str; 4] = ["Nome", "nome", "nomeProduto", "NomeProduto"];
const PRICE_FIELDS: [&str; 4] = ["Preco", "preco", "valor", "Valor"];
const LIST_FIELDS: [&str; 2] = ["produtos", "data"];

pub const UNNAMED_PRODUCT: &str = "Produto sem nome";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A product as displayed in the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Option<Decimal>,
}

impl CatalogProduct {
    /// Snapshot for the cart. Products without a price cannot be bought.
    #[must_use]
    pub fn snapshot(&self) -> Option<ProductSnapshot> {
        Some(ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price?,
        })
    }

    fn from_object(fields: &Map<String, Value>) -> Self {
        let id = first_present(fields, &ID_FIELDS).and_then(parse_id);
        let name = first_present(fields, &NAME_FIELDS)
            .and_then(Value::as_str)
            .map_or_else(|| UNNAMED_PRODUCT.to_string(), str::to_string);
        let price = first_present(fields, &PRICE_FIELDS).and_then(parse_price);
        Self { id, name, price }
    }
}

/// Parse the raw body returned by the product endpoint.
///
/// # Errors
///
/// Returns an error if the body is not JSON at all.
pub fn parse_catalog_str(body: &str) -> Result<Vec<CatalogProduct>, CatalogError> {
    let value: Value = serde_json::from_str(body)?;
    Ok(parse_catalog(&value))
}

/// Accepts a bare array or an object wrapping one under `produtos` or `data`.
/// Any other shape is an empty catalog.
#[must_use]
pub fn parse_catalog(value: &Value) -> Vec<CatalogProduct> {
    let list = match value {
        Value::Array(items) => Some(items),
        Value::Object(fields) => LIST_FIELDS
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_array)),
        _ => None,
    };
    list.map(|items| {
        items
            .iter()
            .filter_map(Value::as_object)
            .map(CatalogProduct::from_object)
            .collect()
    })
    .unwrap_or_default()
}

/// First field that holds a truthy value, mirroring how the API clients read it.
fn first_present<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| match value {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        })
}

fn parse_id(value: &Value) -> Option<ProductId> {
    let id = match value {
        Value::Number(n) => ProductId::Int(n.as_i64()?),
        Value::String(s) => ProductId::Text(s.clone()),
        _ => return None,
    };
    id.present()
}

fn parse_price(value: &Value) -> Option<Decimal> {
    let price = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64))?
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok()?,
        _ => return None,
    };
    (!price.is_sign_negative()).then_some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_bare_arrays_and_wrapped_lists() {
        let bare = json!([{ "id": 1, "nome": "Caneca", "preco": 19.9 }]);
        let wrapped = json!({ "produtos": [{ "Id": 2, "Nome": "Camiseta", "Preco": "49.90" }] });
        let data = json!({ "data": [{ "produtoId": "x-3", "nomeProduto": "Boné", "valor": 30 }] });

        assert_eq!(parse_catalog(&bare)[0].price, Some("19.9".parse().unwrap()));
        assert_eq!(parse_catalog(&wrapped)[0].id, Some(ProductId::Int(2)));
        assert_eq!(parse_catalog(&wrapped)[0].price, Some("49.90".parse().unwrap()));
        let cap = &parse_catalog(&data)[0];
        assert_eq!(cap.id, Some(ProductId::Text("x-3".into())));
        assert_eq!(cap.name, "Boné");
    }

    #[test]
    fn unexpected_shapes_are_empty() {
        assert!(parse_catalog(&json!({ "items": [] })).is_empty());
        assert!(parse_catalog(&json!("nope")).is_empty());
        assert!(parse_catalog(&json!([1, 2, 3])).is_empty());
        assert!(parse_catalog_str("<html>").is_err());
    }

    #[test]
    fn missing_fields_fall_back() {
        let products = parse_catalog(&json!([{ "id": 0, "nome": "", "Nome": null }]));
        let product = &products[0];
        assert_eq!(product.id, None);
        assert_eq!(product.name, UNNAMED_PRODUCT);
        assert_eq!(product.price, None);
        assert!(product.snapshot().is_none());
    }

    #[test]
    fn falls_through_falsy_spellings() {
        let products = parse_catalog(&json!([{ "Id": 0, "id": 9, "Preco": "", "valor": 4.5 }]));
        assert_eq!(products[0].id, Some(ProductId::Int(9)));
        assert_eq!(products[0].price, Some("4.5".parse().unwrap()));
        let snapshot = products[0].snapshot().unwrap();
        assert_eq!(snapshot.id, Some(ProductId::Int(9)));
    }

    #[test]
    fn negative_or_garbage_prices_are_dropped() {
        let products = parse_catalog(&json!([{ "id": 1, "preco": -2 }, { "id": 2, "preco": "abc" }]));
        assert!(products.iter().all(|p| p.price.is_none()));
    }
}
