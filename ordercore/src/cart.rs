//! Cart entity: the active unpurchased item set per user

use crate::types::{ProductId, Quantity, UserId};
use serde::{Deserialize, Serialize};

/// A (product, quantity) pair in a cart; no price snapshot is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product the customer intends to buy
    pub product_id: ProductId,
    /// How many units
    pub quantity: Quantity,
}

/// A user's active cart
///
/// Each user has at most one active cart. Add/remove operations belong to the
/// cart API elsewhere; the order workflow only reads entries and empties the
/// cart after a successful cart-based order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Owning user
    pub user: UserId,
    /// Ordered item entries
    pub entries: Vec<CartEntry>,
}

impl Cart {
    /// Create a cart with the given entries
    pub fn new(user: UserId, entries: Vec<CartEntry>) -> Self {
        Self { user, entries }
    }

    /// Whether the cart has nothing to order
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        let user = UserId::generate();
        assert!(Cart::new(user.clone(), vec![]).is_empty());

        let entry = CartEntry {
            product_id: ProductId::generate(),
            quantity: Quantity::new(2).unwrap(),
        };
        assert!(!Cart::new(user, vec![entry]).is_empty());
    }
}
