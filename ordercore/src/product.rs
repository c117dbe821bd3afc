//! Product entity: a priced item with a stock count

use crate::types::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A sellable product with its current stock level
///
/// Stock is a non-negative count. Every decrement performed by the order
/// workflow is eventually paired with fulfillment or a matching increment on
/// cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Current unit price
    pub price: Money,
    /// Units available for reservation
    pub stock: u32,
}

impl Product {
    /// Create a new product
    pub fn new(id: ProductId, name: String, price: Money, stock: u32) -> Self {
        Self {
            id,
            name,
            price,
            stock,
        }
    }

    /// Whether the requested number of units can be reserved
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }
}
