//! Store contracts the lifecycle depends on
//!
//! The workflow treats products, coupons, carts, and orders as owned-elsewhere
//! resources reached through these narrow traits. Adapters must honor three
//! atomicity obligations that the lifecycle builds on:
//!
//! - [`ProductStore::try_reserve`] is an atomic check-and-decrement per
//!   product: concurrent reservations against the same product must never
//!   jointly drive stock below zero.
//! - [`CouponStore::mark_redeemed`] is atomic per (coupon, user): two racing
//!   redemptions by the same user must yield exactly one `true`.
//! - [`OrderStore::transition_to_cancelled`] is an atomic compare-and-set per
//!   order: two racing cancellations must yield exactly one `true`.

use crate::cart::Cart;
use crate::coupon::Coupon;
use crate::errors::StoreResult;
use crate::order::{Cancellation, Order};
use crate::product::Product;
use crate::types::{CouponCode, CouponId, OrderId, ProductId, Quantity, UserId};
use async_trait::async_trait;

/// Product catalog and inventory ledger
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Look up a product by id
    async fn find(&self, id: &ProductId) -> StoreResult<Option<Product>>;

    /// Atomically check stock and decrement it by `quantity`
    ///
    /// Returns `false` (and changes nothing) when the product is missing or
    /// has insufficient stock. Fails closed: stock never goes negative, even
    /// under concurrent reservations for the same product.
    async fn try_reserve(&self, id: &ProductId, quantity: Quantity) -> StoreResult<bool>;

    /// Unconditionally increment stock by `quantity`
    ///
    /// Used by cancellation and by compensation after a partial reservation.
    async fn release(&self, id: &ProductId, quantity: Quantity) -> StoreResult<()>;
}

/// Coupon registry with per-user redemption state
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Look up a coupon by its (lowercased) code
    async fn find_by_code(&self, code: &CouponCode) -> StoreResult<Option<Coupon>>;

    /// Atomically record that `user` redeemed the coupon
    ///
    /// Returns `false` when the user is already in the redeemed set, so a
    /// racing second redemption loses cleanly.
    async fn mark_redeemed(&self, id: &CouponId, user: &UserId) -> StoreResult<bool>;

    /// Remove `user` from the redeemed set, restoring eligibility
    ///
    /// Releasing a non-member is a no-op, not an error.
    async fn release_redemption(&self, id: &CouponId, user: &UserId) -> StoreResult<()>;
}

/// Reader/writer for the per-user active cart
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetch the user's active cart, if one exists
    async fn find(&self, user: &UserId) -> StoreResult<Option<Cart>>;

    /// Empty the user's cart after a successful cart-based order
    async fn clear(&self, user: &UserId) -> StoreResult<()>;
}

/// Persistence for committed orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a freshly committed order
    async fn insert(&self, order: Order) -> StoreResult<()>;

    /// Fetch an order scoped to its owner
    ///
    /// Returns `None` both when the order does not exist and when it belongs
    /// to a different user, so callers cannot probe for foreign orders.
    async fn find_for_user(&self, id: &OrderId, user: &UserId) -> StoreResult<Option<Order>>;

    /// Atomically move the order to `cancelled`, recording the metadata
    ///
    /// The check against the cancellable matrix and the status write happen
    /// as one step: returns `false` (and changes nothing) when the order is
    /// missing, owned by someone else, or no longer cancellable, so a racing
    /// second cancellation loses cleanly and a cancelled order's metadata is
    /// written exactly once.
    async fn transition_to_cancelled(
        &self,
        id: &OrderId,
        user: &UserId,
        cancellation: Cancellation,
    ) -> StoreResult<bool>;
}
