//! Shopping cart contents and the pure mutations applied to them.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier as handed out by the catalog API.
///
/// The API is not consistent about identifier types, so both integers and
/// strings are accepted. `1` and `"1"` are different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Int(i64),
    Text(String),
}

impl ProductId {
    /// Returns `None` for identifiers the storefront treats as absent (`0`, blank strings).
    #[must_use]
    pub fn present(self) -> Option<Self> {
        match &self {
            Self::Int(0) => None,
            Self::Text(text) if text.trim().is_empty() => None,
            _ => Some(self),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Product data captured at the moment it is put in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
}

impl ProductSnapshot {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            price,
        }
    }
}

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Price of the whole line, unrounded. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// What `add_or_increment` did, so the UI can pick a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line was bumped to the contained quantity.
    QuantityUpdated(u32),
}

/// Ordered cart contents, at most one line per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create a new empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines, restoring the cart invariants.
    ///
    /// Quantities below 1 are raised to 1 and duplicate ids are merged into the
    /// first occurrence by summing their quantities.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            item.quantity = item.quantity.max(1);
            if let Some(existing) = cart.find_mut(&item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line by product id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }

    /// Append the product or bump its quantity by one.
    ///
    /// Returns `None` when the snapshot cannot be added: it has no id, or its
    /// price is negative.
    pub fn add_or_increment(&mut self, product: &ProductSnapshot) -> Option<AddOutcome> {
        let id = product.id.clone()?.present()?;
        if product.price.is_sign_negative() && !product.price.is_zero() {
            return None;
        }

        if let Some(line) = self.find_mut(&id) {
            line.quantity = line.quantity.saturating_add(1);
            return Some(AddOutcome::QuantityUpdated(line.quantity));
        }

        self.items.push(CartItem {
            id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        });
        Some(AddOutcome::Added)
    }

    /// Shift a line's quantity by `delta`, never going below 1.
    ///
    /// Returns `false` when the id is not in the cart.
    pub fn change_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let Some(line) = self.find_mut(id) else {
            return false;
        };
        let next = i64::from(line.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    /// Set a line's quantity outright, clamped to at least 1.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        let Some(line) = self.find_mut(id) else {
            return false;
        };
        line.quantity = quantity.max(1);
        true
    }

    /// Drop a line entirely, whatever its quantity.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != *id);
        self.items.len() != before
    }

    /// Keep only the lines matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&CartItem) -> bool) {
        self.items.retain(keep);
    }

    /// Clear the entire cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Interpret free-form quantity input the way a browser number field would.
///
/// Leading whitespace and an optional sign are accepted, digits are read up to
/// the first non-digit (`"3abc"` is 3, `"2.7"` is 2). Anything unreadable or
/// below 1 becomes 1.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 1;
    }
    digits[..end].parse::<u32>().map_or(u32::MAX, |n| n.max(1))
}
