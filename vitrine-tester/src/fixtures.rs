//! In-memory stand-ins for the order endpoint.
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashSet;
use vitrine_core::{OrderRequest, OrderSubmitter, ProductId, SubmitError};

/// Order endpoint that records every call and rejects a chosen set of products.
#[derive(Debug, Default)]
pub struct ScriptedEndpoint {
    reject: HashSet<ProductId>,
    received: RefCell<Vec<OrderRequest>>,
}

impl ScriptedEndpoint {
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rejecting(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            reject: ids.into_iter().collect(),
            received: RefCell::default(),
        }
    }

    /// Orders in the order they arrived.
    #[must_use]
    pub fn received(&self) -> Vec<OrderRequest> {
        self.received.borrow().clone()
    }
}

#[async_trait(?Send)]
impl OrderSubmitter for ScriptedEndpoint {
    async fn submit_order(&self, order: &OrderRequest) -> Result<(), SubmitError> {
        self.received.borrow_mut().push(order.clone());
        if self.reject.contains(&order.product_id) {
            log::debug!("scripted rejection for product {}", order.product_id);
            return Err(SubmitError::Rejected { status: 500 });
        }
        Ok(())
    }
}
