//! Order entity and its state machine
//!
//! An order is created atomically with its line items and final pricing.
//! Line item prices are snapshots taken at creation time and are never
//! recomputed from live product prices. Status moves only through the
//! lifecycle operations; a cancelled or delivered order is immutable.

use crate::types::{CouponId, Money, OrderId, ProductId, Quantity, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How the customer pays for the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    Cash,
    /// Card payment collected after placement
    Card,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
        }
    }
}

/// Order status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    /// Order has been placed (cash orders start here)
    Placed,
    /// Order is awaiting payment (card orders start here)
    WaitPayment,
    /// Order has left the warehouse
    OnWay,
    /// Order has been delivered
    Delivered,
    /// Order has been cancelled
    Cancelled,
}

impl OrderStatus {
    /// Initial status for a freshly committed order
    pub fn initial_for(payment_method: PaymentMethod) -> Self {
        match payment_method {
            PaymentMethod::Cash => Self::Placed,
            PaymentMethod::Card => Self::WaitPayment,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placed => write!(f, "placed"),
            Self::WaitPayment => write!(f, "waitPayment"),
            Self::OnWay => write!(f, "onWay"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A priced (product, quantity) pair attached to an order
///
/// The unit price is snapshotted from the product at order-creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product being ordered
    pub product_id: ProductId,
    /// Quantity of the product
    pub quantity: Quantity,
    /// Unit price at time of order
    pub unit_price: Money,
    /// Unit price times quantity, computed once at creation
    pub line_total: Money,
}

impl LineItem {
    /// Create a line item, computing its total from the price snapshot
    pub fn new(
        product_id: ProductId,
        quantity: Quantity,
        unit_price: Money,
    ) -> Result<Self, ValidationError> {
        let line_total = unit_price.multiply_by_quantity(quantity)?;
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            line_total,
        })
    }
}

/// Who cancelled an order, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    /// User that requested the cancellation
    pub cancelled_by: UserId,
    /// Free-text reason supplied with the request
    pub reason: String,
}

/// A committed order with its pricing snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,
    /// Owning user
    pub user: UserId,
    /// Ordered sequence of priced line items
    pub items: Vec<LineItem>,
    /// Sum of line totals before discount
    pub subtotal: Money,
    /// Price after discount; never exceeds the subtotal
    pub total: Money,
    /// How the order is paid
    pub payment_method: PaymentMethod,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Coupon applied at creation, if any
    pub coupon_id: Option<CouponId>,
    /// Shipping address
    pub address: String,
    /// Contact phone number
    pub phone: String,
    /// Cancellation metadata, set when the order is cancelled
    pub cancellation: Option<Cancellation>,
    /// When the order was committed
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a new order in its initial status for the payment method
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user: UserId,
        items: Vec<LineItem>,
        subtotal: Money,
        total: Money,
        payment_method: PaymentMethod,
        coupon_id: Option<CouponId>,
        address: String,
        phone: String,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            user,
            items,
            subtotal,
            total,
            payment_method,
            status: OrderStatus::initial_for(payment_method),
            coupon_id,
            address,
            phone,
            cancellation: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the order may still be cancelled
    ///
    /// Cash orders are cancellable only from `placed`; card orders only from
    /// `waitPayment`. Everything else is in flight or terminal.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            (self.payment_method, self.status),
            (PaymentMethod::Cash, OrderStatus::Placed)
                | (PaymentMethod::Card, OrderStatus::WaitPayment)
        )
    }

    /// Transition to `cancelled`, recording who asked and why
    pub fn cancel(&mut self, cancelled_by: UserId, reason: String) {
        self.status = OrderStatus::Cancelled;
        self.cancellation = Some(Cancellation {
            cancelled_by,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with(payment_method: PaymentMethod, status: OrderStatus) -> Order {
        let mut order = Order::new(
            UserId::generate(),
            vec![],
            Money::zero(),
            Money::zero(),
            payment_method,
            None,
            "12 Nile St".to_string(),
            "+201000000000".to_string(),
        );
        order.status = status;
        order
    }

    #[test]
    fn test_initial_status_follows_payment_method() {
        assert_eq!(
            OrderStatus::initial_for(PaymentMethod::Cash),
            OrderStatus::Placed
        );
        assert_eq!(
            OrderStatus::initial_for(PaymentMethod::Card),
            OrderStatus::WaitPayment
        );
    }

    #[test]
    fn test_cancellable_matrix() {
        assert!(order_with(PaymentMethod::Cash, OrderStatus::Placed).is_cancellable());
        assert!(order_with(PaymentMethod::Card, OrderStatus::WaitPayment).is_cancellable());

        assert!(!order_with(PaymentMethod::Cash, OrderStatus::WaitPayment).is_cancellable());
        assert!(!order_with(PaymentMethod::Card, OrderStatus::Placed).is_cancellable());
        assert!(!order_with(PaymentMethod::Cash, OrderStatus::OnWay).is_cancellable());
        assert!(!order_with(PaymentMethod::Cash, OrderStatus::Delivered).is_cancellable());
        assert!(!order_with(PaymentMethod::Cash, OrderStatus::Cancelled).is_cancellable());
        assert!(!order_with(PaymentMethod::Card, OrderStatus::Cancelled).is_cancellable());
    }

    #[test]
    fn test_cancel_records_metadata() {
        let mut order = order_with(PaymentMethod::Cash, OrderStatus::Placed);
        let canceller = order.user.clone();
        order.cancel(canceller.clone(), "changed my mind".to_string());

        assert_eq!(order.status, OrderStatus::Cancelled);
        let cancellation = order.cancellation.expect("cancellation metadata");
        assert_eq!(cancellation.cancelled_by, canceller);
        assert_eq!(cancellation.reason, "changed my mind");
    }

    #[test]
    fn test_line_item_total_price() {
        let product_id = ProductId::try_new("PRD-LAPTOP01".to_string()).unwrap();
        let quantity = Quantity::new(2).unwrap();
        let unit_price = Money::from_cents(99999).unwrap(); // $999.99

        let item = LineItem::new(product_id, quantity, unit_price).unwrap();
        assert_eq!(item.line_total.to_cents(), 199_998); // $1999.98
    }

    #[test]
    fn test_status_serde_shape() {
        let json = serde_json::to_string(&OrderStatus::WaitPayment).unwrap();
        assert_eq!(json, "\"waitPayment\"");
        let json = serde_json::to_string(&PaymentMethod::Cash).unwrap();
        assert_eq!(json, "\"cash\"");
    }
}
