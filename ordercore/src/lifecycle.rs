//! Order lifecycle manager
//!
//! Orchestrates the create and cancel transactions across the product,
//! coupon, cart, and order stores. Each invocation is a request-scoped unit
//! of work: validation reads fresh state, the commit sequence reserves stock
//! and coupon redemption atomically through the store contracts, and partial
//! failures are compensated so callers observe all of the mutations or none
//! of them. Invoice rendering and notification dispatch run as an
//! independent task after commit and can never fail the order.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::coupon::Coupon;
use crate::errors::{OrderError, OrderResult};
use crate::invoice::Invoice;
use crate::notification::{EmailMessage, NotificationDispatcher};
use crate::order::{Cancellation, LineItem, Order, PaymentMethod};
use crate::pricing;
use crate::store::{CartStore, CouponStore, OrderStore, ProductStore};
use crate::types::{CouponCode, Customer, DiscountPercent, OrderId, ProductId, Quantity, UserId};

/// Where the line items of a new order come from
///
/// Resolved to a uniform list of priced line items before any pricing or
/// reservation logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemSource {
    /// A single (product, quantity) pair named in the request
    Explicit {
        /// Product to order
        product_id: ProductId,
        /// How many units
        quantity: Quantity,
    },
    /// Every entry of the requesting user's cart
    FromCart,
}

/// Input to [`OrderLifecycle::create_order`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// The authenticated customer placing the order
    pub customer: Customer,
    /// Single product or cart mode
    pub source: LineItemSource,
    /// Coupon code entered at checkout, if any
    pub coupon_code: Option<CouponCode>,
    /// How the order is paid
    pub payment_method: PaymentMethod,
    /// Delivery address
    pub address: String,
    /// Contact phone number
    pub phone: String,
}

/// Orchestrator for order creation and cancellation
///
/// Generic over the store and dispatcher implementations so the same workflow
/// runs against the in-memory adapters in tests and durable adapters in
/// production.
pub struct OrderLifecycle<P, C, K, O, D>
where
    P: ProductStore + 'static,
    C: CouponStore + 'static,
    K: CartStore + 'static,
    O: OrderStore + 'static,
    D: NotificationDispatcher + 'static,
{
    products: Arc<P>,
    coupons: Arc<C>,
    carts: Arc<K>,
    orders: Arc<O>,
    dispatcher: Arc<D>,
}

impl<P, C, K, O, D> OrderLifecycle<P, C, K, O, D>
where
    P: ProductStore + 'static,
    C: CouponStore + 'static,
    K: CartStore + 'static,
    O: OrderStore + 'static,
    D: NotificationDispatcher + 'static,
{
    /// Create a lifecycle manager over the given collaborators
    pub fn new(
        products: Arc<P>,
        coupons: Arc<C>,
        carts: Arc<K>,
        orders: Arc<O>,
        dispatcher: Arc<D>,
    ) -> Self {
        Self {
            products,
            coupons,
            carts,
            orders,
            dispatcher,
        }
    }

    /// Turn a cart or single-item request into a priced, committed order
    ///
    /// Validation order: coupon, line-item resolution, price snapshotting,
    /// quote. Commit order: stock reservation, coupon redemption, order
    /// persistence. A failure inside the commit sequence releases everything
    /// reserved so far before returning. Once the order is persisted the call
    /// succeeds: cart clearing is best-effort, so a stale cart never prompts
    /// a retry against an already committed order.
    #[instrument(skip(self, request), fields(
        user = %request.customer.id,
        payment = %request.payment_method
    ))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> OrderResult<Order> {
        let now = Utc::now();
        let customer = request.customer.clone();

        let coupon = match &request.coupon_code {
            Some(code) => Some(self.resolve_coupon(code, &customer.id, now).await?),
            None => None,
        };
        let discount = coupon.as_ref().map(|c| c.amount);

        let (items, from_cart) = self.resolve_line_items(&request).await?;
        let quote = pricing::quote(&items, discount)?;

        // Commit sequence. try_reserve is the authoritative check-and-
        // decrement; the stock read during resolution was only a fast-fail.
        let mut reserved: Vec<(ProductId, Quantity)> = Vec::with_capacity(items.len());
        for item in &items {
            match self.products.try_reserve(&item.product_id, item.quantity).await {
                Ok(true) => reserved.push((item.product_id.clone(), item.quantity)),
                Ok(false) => {
                    self.release_reserved(&reserved).await;
                    return Err(OrderError::ProductUnavailable {
                        product: item.product_id.clone(),
                    });
                }
                Err(error) => {
                    self.release_reserved(&reserved).await;
                    return Err(error.into());
                }
            }
        }

        if let Some(coupon) = &coupon {
            match self.coupons.mark_redeemed(&coupon.id, &customer.id).await {
                Ok(true) => {}
                Ok(false) => {
                    // Lost a redemption race since validation
                    self.release_reserved(&reserved).await;
                    return Err(OrderError::InvalidCoupon {
                        code: coupon.code.clone(),
                    });
                }
                Err(error) => {
                    self.release_reserved(&reserved).await;
                    return Err(error.into());
                }
            }
        }

        let order = Order::new(
            customer.id.clone(),
            items,
            quote.subtotal,
            quote.total,
            request.payment_method,
            coupon.as_ref().map(|c| c.id.clone()),
            request.address,
            request.phone,
        );

        if let Err(error) = self.orders.insert(order.clone()).await {
            if let Some(coupon) = &coupon {
                if let Err(release_error) =
                    self.coupons.release_redemption(&coupon.id, &customer.id).await
                {
                    warn!(coupon = %coupon.id, error = %release_error,
                        "failed to release coupon redemption during compensation");
                }
            }
            self.release_reserved(&reserved).await;
            return Err(error.into());
        }

        if from_cart {
            // The order is durably committed at this point; a stale cart is
            // advisory and must not surface as a retryable failure.
            if let Err(error) = self.carts.clear(&customer.id).await {
                warn!(user = %customer.id, error = %error,
                    "failed to clear cart after commit");
            }
        }

        info!(
            order = %order.id,
            status = %order.status,
            subtotal = %order.subtotal,
            total = %order.total,
            "order committed"
        );

        self.dispatch_confirmation(order.clone(), customer, discount);

        Ok(order)
    }

    /// Cancel an order, restoring stock and coupon eligibility
    ///
    /// Only the order's owner may cancel it; for anyone else the order does
    /// not exist. Cash orders cancel from `placed`, card orders from
    /// `waitPayment`, nothing else. The status transition is a compare-and-set
    /// at the store, so of two racing cancellations exactly one wins and the
    /// releases run exactly once.
    #[instrument(skip(self, reason), fields(user = %user, order = %order_id))]
    pub async fn cancel_order(
        &self,
        user: &UserId,
        order_id: &OrderId,
        reason: String,
    ) -> OrderResult<()> {
        let order = self
            .orders
            .find_for_user(order_id, user)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound {
                order: order_id.clone(),
            })?;

        if !order.is_cancellable() {
            return Err(OrderError::NotCancellable {
                order: order.id,
                status: order.status,
            });
        }

        let cancellation = Cancellation {
            cancelled_by: user.clone(),
            reason,
        };
        let won = self
            .orders
            .transition_to_cancelled(order_id, user, cancellation)
            .await?;
        if !won {
            // Lost a cancellation race since the check; report the status the
            // winner left behind. The releases belong to the winner alone.
            let current = self
                .orders
                .find_for_user(order_id, user)
                .await?
                .ok_or_else(|| OrderError::OrderNotFound {
                    order: order_id.clone(),
                })?;
            return Err(OrderError::NotCancellable {
                order: current.id,
                status: current.status,
            });
        }

        // Line items and the applied coupon are immutable after commit, so
        // the pre-transition snapshot is authoritative for the releases.
        if let Some(coupon_id) = &order.coupon_id {
            // A cancelled order does not permanently consume a one-time coupon
            self.coupons.release_redemption(coupon_id, user).await?;
        }

        for item in &order.items {
            self.products.release(&item.product_id, item.quantity).await?;
        }

        info!(order = %order.id, "order cancelled");
        Ok(())
    }

    /// Resolve and validate the coupon code against expiry and redemption
    async fn resolve_coupon(
        &self,
        code: &CouponCode,
        user: &UserId,
        now: chrono::DateTime<Utc>,
    ) -> OrderResult<Coupon> {
        let coupon = self.coupons.find_by_code(code).await?;
        match coupon {
            Some(coupon) if coupon.usable_by(user, now) => Ok(coupon),
            _ => Err(OrderError::InvalidCoupon { code: code.clone() }),
        }
    }

    /// Resolve the request's source into priced line items
    ///
    /// Returns the items plus whether they came from the cart. Prices are
    /// snapshotted here; stock is only pre-checked, the reservation happens
    /// during commit.
    async fn resolve_line_items(
        &self,
        request: &CreateOrderRequest,
    ) -> OrderResult<(Vec<LineItem>, bool)> {
        let (entries, from_cart) = match &request.source {
            LineItemSource::Explicit {
                product_id,
                quantity,
            } => (vec![(product_id.clone(), *quantity)], false),
            LineItemSource::FromCart => {
                let cart = self.carts.find(&request.customer.id).await?;
                let entries: Vec<_> = cart
                    .map(|cart| {
                        cart.entries
                            .into_iter()
                            .map(|entry| (entry.product_id, entry.quantity))
                            .collect()
                    })
                    .unwrap_or_default();
                if entries.is_empty() {
                    return Err(OrderError::EmptyCart);
                }
                (entries, true)
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for (product_id, quantity) in entries {
            let product = self
                .products
                .find(&product_id)
                .await?
                .filter(|product| product.has_stock(quantity.value()))
                .ok_or_else(|| OrderError::ProductUnavailable {
                    product: product_id.clone(),
                })?;
            items.push(LineItem::new(product_id, quantity, product.price)?);
        }

        Ok((items, from_cart))
    }

    /// Undo partial stock reservations after a failed commit
    async fn release_reserved(&self, reserved: &[(ProductId, Quantity)]) {
        for (product_id, quantity) in reserved {
            if let Err(error) = self.products.release(product_id, *quantity).await {
                warn!(product = %product_id, error = %error,
                    "failed to release reserved stock during compensation");
            }
        }
    }

    /// Fire-and-forget invoice rendering and confirmation dispatch
    ///
    /// Runs outside the transaction boundary: failures are logged for
    /// operational visibility, never surfaced to the caller, and never roll
    /// back the committed order.
    fn dispatch_confirmation(
        &self,
        order: Order,
        customer: Customer,
        discount: Option<DiscountPercent>,
    ) {
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            let invoice = Invoice::from_order(&order, &customer, discount);
            let document = match invoice.render() {
                Ok(document) => document,
                Err(error) => {
                    warn!(order = %order.id, error = %error, "invoice rendering failed");
                    return;
                }
            };

            let message = EmailMessage::order_confirmation(&customer, &order, document);
            if let Err(error) = dispatcher.send(message).await {
                warn!(order = %order.id, error = %error, "order confirmation dispatch failed");
            }
        });
    }
}
