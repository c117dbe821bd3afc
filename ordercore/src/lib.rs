//! `Ordercore` - order lifecycle core for an e-commerce backend
//!
//! This library implements the workflow that turns a cart or single-item
//! request into a priced, inventory-committed order, and the symmetric
//! cancellation path that reverses those commitments. Storage, transport,
//! and authentication are collaborators behind narrow traits; the workflow
//! owns the multi-step state transitions and the compensating actions on
//! failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ordercore::{CreateOrderRequest, LineItemSource, OrderLifecycle, PaymentMethod};
//!
//! let lifecycle = OrderLifecycle::new(products, coupons, carts, orders, dispatcher);
//! let order = lifecycle
//!     .create_order(CreateOrderRequest {
//!         customer,
//!         source: LineItemSource::FromCart,
//!         coupon_code: None,
//!         payment_method: PaymentMethod::Cash,
//!         address: "12 Nile St, Cairo".to_string(),
//!         phone: "+201000000000".to_string(),
//!     })
//!     .await?;
//! lifecycle.cancel_order(&order.user, &order.id, "changed my mind".into()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cart;
pub mod coupon;
pub mod errors;
pub mod invoice;
pub mod lifecycle;
pub mod notification;
pub mod order;
pub mod pricing;
pub mod product;
pub mod store;
pub mod types;

pub use cart::{Cart, CartEntry};
pub use coupon::Coupon;
pub use errors::{OrderError, OrderResult, StoreError, StoreResult};
pub use invoice::{Invoice, InvoiceDocument, RenderError};
pub use lifecycle::{CreateOrderRequest, LineItemSource, OrderLifecycle};
pub use notification::{Attachment, DispatchError, EmailMessage, NotificationDispatcher};
pub use order::{Cancellation, LineItem, Order, OrderStatus, PaymentMethod};
pub use pricing::Quote;
pub use product::Product;
pub use store::{CartStore, CouponStore, OrderStore, ProductStore};
pub use types::{
    CouponCode, CouponId, Customer, CustomerEmail, DiscountPercent, Money, OrderId, ProductId,
    Quantity, UserId, ValidationError,
};
