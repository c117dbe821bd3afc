//! In-memory store adapters for the `ordercore` order lifecycle
//!
//! This crate provides thread-safe in-memory implementations of the store
//! traits from the ordercore crate, plus test doubles for the notification
//! dispatcher, useful for testing and development scenarios where persistence
//! is not required.
//!
//! The atomicity obligations of the store contracts are met with a single
//! writer lock per map: a reservation's check and decrement happen under one
//! write guard, as do a redemption's membership test and insert and a
//! cancellation's cancellable check and status write.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use ordercore::errors::StoreResult;
use ordercore::notification::{DispatchError, EmailMessage, NotificationDispatcher};
use ordercore::store::{CartStore, CouponStore, OrderStore, ProductStore};
use ordercore::{
    Cancellation, Cart, Coupon, CouponCode, CouponId, Order, OrderId, Product, ProductId,
    Quantity, UserId,
};

/// Thread-safe in-memory product catalog and inventory ledger
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductStore {
    /// Create a new empty product store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product (test/setup helper)
    pub fn insert(&self, product: Product) {
        let mut products = self.products.write().expect("RwLock poisoned");
        products.insert(product.id.clone(), product);
    }

    /// Current stock of a product, if it exists
    pub fn stock_of(&self, id: &ProductId) -> Option<u32> {
        let products = self.products.read().expect("RwLock poisoned");
        products.get(id).map(|product| product.stock)
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find(&self, id: &ProductId) -> StoreResult<Option<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        Ok(products.get(id).cloned())
    }

    async fn try_reserve(&self, id: &ProductId, quantity: Quantity) -> StoreResult<bool> {
        let mut products = self.products.write().expect("RwLock poisoned");

        // Check and decrement under one write guard
        match products.get_mut(id) {
            Some(product) if product.stock >= quantity.value() => {
                product.stock -= quantity.value();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, id: &ProductId, quantity: Quantity) -> StoreResult<()> {
        let mut products = self.products.write().expect("RwLock poisoned");

        if let Some(product) = products.get_mut(id) {
            product.stock = product.stock.saturating_add(quantity.value());
        }
        Ok(())
    }
}

/// Thread-safe in-memory coupon registry
#[derive(Clone, Default)]
pub struct InMemoryCouponStore {
    coupons: Arc<RwLock<HashMap<CouponId, Coupon>>>,
}

impl InMemoryCouponStore {
    /// Create a new empty coupon store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a coupon (test/setup helper)
    pub fn insert(&self, coupon: Coupon) {
        let mut coupons = self.coupons.write().expect("RwLock poisoned");
        coupons.insert(coupon.id.clone(), coupon);
    }

    /// Fetch a coupon snapshot by id
    pub fn get(&self, id: &CouponId) -> Option<Coupon> {
        let coupons = self.coupons.read().expect("RwLock poisoned");
        coupons.get(id).cloned()
    }
}

#[async_trait]
impl CouponStore for InMemoryCouponStore {
    async fn find_by_code(&self, code: &CouponCode) -> StoreResult<Option<Coupon>> {
        let coupons = self.coupons.read().expect("RwLock poisoned");
        Ok(coupons.values().find(|coupon| &coupon.code == code).cloned())
    }

    async fn mark_redeemed(&self, id: &CouponId, user: &UserId) -> StoreResult<bool> {
        let mut coupons = self.coupons.write().expect("RwLock poisoned");

        // Membership test and insert under one write guard
        match coupons.get_mut(id) {
            Some(coupon) => Ok(coupon.redeemed_by.insert(user.clone())),
            None => Ok(false),
        }
    }

    async fn release_redemption(&self, id: &CouponId, user: &UserId) -> StoreResult<()> {
        let mut coupons = self.coupons.write().expect("RwLock poisoned");

        if let Some(coupon) = coupons.get_mut(id) {
            // Removing a non-member is a no-op
            coupon.redeemed_by.remove(user);
        }
        Ok(())
    }
}

/// Thread-safe in-memory cart store
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl InMemoryCartStore {
    /// Create a new empty cart store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's cart (test/setup helper)
    pub fn put(&self, cart: Cart) {
        let mut carts = self.carts.write().expect("RwLock poisoned");
        carts.insert(cart.user.clone(), cart);
    }

    /// Fetch a cart snapshot for a user
    pub fn get(&self, user: &UserId) -> Option<Cart> {
        let carts = self.carts.read().expect("RwLock poisoned");
        carts.get(user).cloned()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find(&self, user: &UserId) -> StoreResult<Option<Cart>> {
        let carts = self.carts.read().expect("RwLock poisoned");
        Ok(carts.get(user).cloned())
    }

    async fn clear(&self, user: &UserId) -> StoreResult<()> {
        let mut carts = self.carts.write().expect("RwLock poisoned");

        if let Some(cart) = carts.get_mut(user) {
            cart.entries.clear();
        }
        Ok(())
    }
}

/// Thread-safe in-memory order store
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new empty order store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an order snapshot by id regardless of owner (test helper)
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        let orders = self.orders.read().expect("RwLock poisoned");
        orders.get(id).cloned()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> StoreResult<()> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn find_for_user(&self, id: &OrderId, user: &UserId) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        Ok(orders
            .get(id)
            .filter(|order| &order.user == user)
            .cloned())
    }

    async fn transition_to_cancelled(
        &self,
        id: &OrderId,
        user: &UserId,
        cancellation: Cancellation,
    ) -> StoreResult<bool> {
        let mut orders = self.orders.write().expect("RwLock poisoned");

        // Cancellable check and status write under one write guard
        match orders.get_mut(id) {
            Some(order) if &order.user == user && order.is_cancellable() => {
                order.cancel(cancellation.cancelled_by, cancellation.reason);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Dispatcher that records every message it is asked to send
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    sent: Arc<RwLock<Vec<EmailMessage>>>,
}

impl RecordingDispatcher {
    /// Create a new dispatcher with an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every message sent so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        let sent = self.sent.read().expect("RwLock poisoned");
        sent.clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, message: EmailMessage) -> Result<(), DispatchError> {
        let mut sent = self.sent.write().expect("RwLock poisoned");
        sent.push(message);
        Ok(())
    }
}

/// Dispatcher that fails every send, for exercising best-effort paths
#[derive(Clone, Copy, Default)]
pub struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn send(&self, _message: EmailMessage) -> Result<(), DispatchError> {
        Err(DispatchError::Failed("transport unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordercore::Money;

    fn product(stock: u32) -> Product {
        Product::new(
            ProductId::generate(),
            "Gaming Laptop".to_string(),
            Money::from_cents(99999).unwrap(),
            stock,
        )
    }

    #[tokio::test]
    async fn test_clone_shares_storage() {
        let store1 = InMemoryProductStore::new();
        #[allow(clippy::redundant_clone)]
        let store2 = store1.clone();

        assert!(Arc::ptr_eq(&store1.products, &store2.products));
    }

    #[tokio::test]
    async fn test_try_reserve_decrements_stock() {
        let store = InMemoryProductStore::new();
        let product = product(5);
        let id = product.id.clone();
        store.insert(product);

        assert!(store.try_reserve(&id, Quantity::new(3).unwrap()).await.unwrap());
        assert_eq!(store.stock_of(&id), Some(2));
    }

    #[tokio::test]
    async fn test_try_reserve_fails_closed() {
        let store = InMemoryProductStore::new();
        let product = product(2);
        let id = product.id.clone();
        store.insert(product);

        assert!(!store.try_reserve(&id, Quantity::new(3).unwrap()).await.unwrap());
        // Stock unchanged on refusal
        assert_eq!(store.stock_of(&id), Some(2));

        let missing = ProductId::generate();
        assert!(!store.try_reserve(&missing, Quantity::new(1).unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_then_release_is_a_net_noop() {
        let store = InMemoryProductStore::new();
        let product = product(7);
        let id = product.id.clone();
        store.insert(product);

        let quantity = Quantity::new(4).unwrap();
        assert!(store.try_reserve(&id, quantity).await.unwrap());
        store.release(&id, quantity).await.unwrap();
        assert_eq!(store.stock_of(&id), Some(7));
    }

    #[tokio::test]
    async fn test_mark_redeemed_is_single_use_per_user() {
        let store = InMemoryCouponStore::new();
        let coupon = Coupon::new(
            CouponCode::try_new("WELCOME5".to_string()).unwrap(),
            ordercore::DiscountPercent::try_new(5).unwrap(),
            chrono::Utc::now() + chrono::Duration::days(30),
        );
        let id = coupon.id.clone();
        store.insert(coupon);

        let user = UserId::generate();
        assert!(store.mark_redeemed(&id, &user).await.unwrap());
        assert!(!store.mark_redeemed(&id, &user).await.unwrap());

        // Another user is unaffected
        let other = UserId::generate();
        assert!(store.mark_redeemed(&id, &other).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_redemption_restores_eligibility() {
        let store = InMemoryCouponStore::new();
        let coupon = Coupon::new(
            CouponCode::try_new("WELCOME5".to_string()).unwrap(),
            ordercore::DiscountPercent::try_new(5).unwrap(),
            chrono::Utc::now() + chrono::Duration::days(30),
        );
        let id = coupon.id.clone();
        store.insert(coupon);

        let user = UserId::generate();
        assert!(store.mark_redeemed(&id, &user).await.unwrap());
        store.release_redemption(&id, &user).await.unwrap();
        assert!(store.mark_redeemed(&id, &user).await.unwrap());

        // Releasing a non-member is a no-op, not an error
        store.release_redemption(&id, &UserId::generate()).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_code_matches_lowercased_code() {
        let store = InMemoryCouponStore::new();
        let coupon = Coupon::new(
            CouponCode::try_new("SUMMER10".to_string()).unwrap(),
            ordercore::DiscountPercent::try_new(10).unwrap(),
            chrono::Utc::now() + chrono::Duration::days(30),
        );
        store.insert(coupon);

        let entered = CouponCode::try_new("Summer10".to_string()).unwrap();
        assert!(store.find_by_code(&entered).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cart_clear_empties_entries() {
        let store = InMemoryCartStore::new();
        let user = UserId::generate();
        let cart = Cart::new(
            user.clone(),
            vec![ordercore::CartEntry {
                product_id: ProductId::generate(),
                quantity: Quantity::new(1).unwrap(),
            }],
        );
        store.put(cart);

        store.clear(&user).await.unwrap();
        let cart = store.get(&user).expect("cart still exists");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_find_for_user_scopes_by_owner() {
        let store = InMemoryOrderStore::new();
        let owner = UserId::generate();
        let order = Order::new(
            owner.clone(),
            vec![],
            Money::zero(),
            Money::zero(),
            ordercore::PaymentMethod::Cash,
            None,
            "12 Nile St".to_string(),
            "+201000000000".to_string(),
        );
        let id = order.id.clone();
        store.insert(order).await.unwrap();

        assert!(store.find_for_user(&id, &owner).await.unwrap().is_some());
        // A foreign user cannot observe the order at all
        let stranger = UserId::generate();
        assert!(store.find_for_user(&id, &stranger).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transition_to_cancelled_wins_at_most_once() {
        let store = InMemoryOrderStore::new();
        let owner = UserId::generate();
        let order = Order::new(
            owner.clone(),
            vec![],
            Money::zero(),
            Money::zero(),
            ordercore::PaymentMethod::Cash,
            None,
            "12 Nile St".to_string(),
            "+201000000000".to_string(),
        );
        let id = order.id.clone();
        store.insert(order).await.unwrap();

        let cancellation = |reason: &str| Cancellation {
            cancelled_by: owner.clone(),
            reason: reason.to_string(),
        };

        // A stranger's attempt changes nothing
        let stranger = UserId::generate();
        assert!(!store
            .transition_to_cancelled(&id, &stranger, cancellation("not mine"))
            .await
            .unwrap());

        assert!(store
            .transition_to_cancelled(&id, &owner, cancellation("first"))
            .await
            .unwrap());
        // A second attempt loses and the recorded metadata stays the winner's
        assert!(!store
            .transition_to_cancelled(&id, &owner, cancellation("second"))
            .await
            .unwrap());

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.status, ordercore::OrderStatus::Cancelled);
        assert_eq!(stored.cancellation.unwrap().reason, "first");
    }
}
