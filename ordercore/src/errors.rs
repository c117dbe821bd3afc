//! Error types for the order lifecycle
//!
//! Two layers, converted with `#[from]` at the seam:
//!
//! - **`OrderError`**: domain failures surfaced to the request-handling
//!   layer. All of these are recoverable and reported, none are fatal to the
//!   process. Messages carry enough context to act (which product, which
//!   order) but never reveal whether a resource exists for another user.
//! - **`StoreError`**: persistence layer failures raised by store adapters.

use crate::order::OrderStatus;
use crate::types::{CouponCode, OrderId, ProductId, ValidationError};
use thiserror::Error;

/// Result alias for lifecycle operations
pub type OrderResult<T> = Result<T, OrderError>;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the order lifecycle operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// The supplied coupon code is unknown, expired, or already redeemed by
    /// this user. The three cases are deliberately indistinguishable.
    #[error("Invalid coupon code '{code}': expired, already used, or unknown")]
    InvalidCoupon {
        /// The code the customer entered (lowercased)
        code: CouponCode,
    },

    /// Cart-mode order requested against an empty cart.
    #[error("Cart is empty, select a product to order")]
    EmptyCart,

    /// The product does not exist or has insufficient stock.
    #[error("Product '{product}' not found or out of stock")]
    ProductUnavailable {
        /// The product that could not be reserved
        product: ProductId,
    },

    /// The order does not exist for the requesting user. Returned for both
    /// missing orders and orders owned by someone else.
    #[error("Order '{order}' not found")]
    OrderNotFound {
        /// The order id that was requested
        order: OrderId,
    },

    /// The order is not in a cancellable state for its payment method.
    #[error("Order '{order}' cannot be cancelled from status '{status}'")]
    NotCancellable {
        /// The order the caller tried to cancel
        order: OrderId,
        /// Its current status
        status: OrderStatus,
    },

    /// A domain value failed validation during the workflow.
    /// This should be rare as validation happens at type construction.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An error occurred in a store while executing the operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by store adapters
///
/// The in-memory adapter never fails; durable adapters map their backend
/// errors onto these variants.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the operation.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// A stored document could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}
