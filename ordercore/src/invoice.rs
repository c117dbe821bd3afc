//! Invoice rendering from an order snapshot
//!
//! The invoice is built entirely from the committed order and the customer's
//! contact details, so it can be rendered after the fact without touching any
//! store. Rendering produces a self-contained document suitable as an email
//! attachment; the concrete format is a JSON document here, with PDF or HTML
//! rendering belonging to the document service behind the same shape.

use crate::order::{LineItem, Order};
use crate::types::{Customer, DiscountPercent, Money, OrderId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    /// The invoice could not be serialized into a document.
    #[error("Failed to serialize invoice: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shipping block printed at the top of the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingBlock {
    /// Recipient name
    pub name: String,
    /// Delivery address
    pub address: String,
    /// Contact phone number
    pub phone: String,
}

/// An invoice snapshot for a committed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    /// Invoice number; reuses the order id
    pub invoice_nr: OrderId,
    /// When the order was committed
    pub date: DateTime<Utc>,
    /// Where the order ships
    pub shipping: ShippingBlock,
    /// Priced line items as committed
    pub items: Vec<LineItem>,
    /// Subtotal before discount
    pub subtotal: Money,
    /// Amount actually charged
    pub paid: Money,
    /// Discount percentage applied, zero when no coupon was used
    pub discount_percent: u8,
}

/// A rendered invoice ready to attach to a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    /// Suggested file name
    pub filename: String,
    /// MIME type of the rendered bytes
    pub content_type: String,
    /// Document contents
    pub bytes: Vec<u8>,
}

impl Invoice {
    /// Build an invoice from an order snapshot
    pub fn from_order(order: &Order, customer: &Customer, discount: Option<DiscountPercent>) -> Self {
        Self {
            invoice_nr: order.id.clone(),
            date: order.created_at,
            shipping: ShippingBlock {
                name: customer.name.clone(),
                address: order.address.clone(),
                phone: order.phone.clone(),
            },
            items: order.items.clone(),
            subtotal: order.subtotal,
            paid: order.total,
            discount_percent: discount.map_or(0, DiscountPercent::into_inner),
        }
    }

    /// Render the invoice into an attachable document
    pub fn render(&self) -> Result<InvoiceDocument, RenderError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        Ok(InvoiceDocument {
            filename: format!("invoice-{}.json", self.invoice_nr),
            content_type: "application/json".to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::PaymentMethod;
    use crate::types::{CustomerEmail, Money, ProductId, Quantity, UserId};

    fn sample_order(customer: &Customer) -> Order {
        let item = LineItem::new(
            ProductId::try_new("PRD-LAPTOP01".to_string()).unwrap(),
            Quantity::new(2).unwrap(),
            Money::from_cents(1000).unwrap(),
        )
        .unwrap();
        Order::new(
            customer.id.clone(),
            vec![item],
            Money::from_cents(2000).unwrap(),
            Money::from_cents(1800).unwrap(),
            PaymentMethod::Cash,
            None,
            "12 Nile St, Cairo".to_string(),
            "+201000000000".to_string(),
        )
    }

    fn sample_customer() -> Customer {
        Customer::new(
            UserId::generate(),
            "Mona Hassan".to_string(),
            CustomerEmail::try_new("mona@example.com".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_invoice_mirrors_order_snapshot() {
        let customer = sample_customer();
        let order = sample_order(&customer);
        let discount = DiscountPercent::try_new(10).unwrap();

        let invoice = Invoice::from_order(&order, &customer, Some(discount));
        assert_eq!(invoice.invoice_nr, order.id);
        assert_eq!(invoice.subtotal, order.subtotal);
        assert_eq!(invoice.paid, order.total);
        assert_eq!(invoice.discount_percent, 10);
        assert_eq!(invoice.shipping.name, "Mona Hassan");
        assert_eq!(invoice.shipping.address, order.address);
    }

    #[test]
    fn test_no_coupon_renders_zero_discount() {
        let customer = sample_customer();
        let order = sample_order(&customer);
        let invoice = Invoice::from_order(&order, &customer, None);
        assert_eq!(invoice.discount_percent, 0);
    }

    #[test]
    fn test_render_produces_json_document() {
        let customer = sample_customer();
        let order = sample_order(&customer);
        let invoice = Invoice::from_order(&order, &customer, None);

        let document = invoice.render().unwrap();
        assert_eq!(document.content_type, "application/json");
        assert!(document.filename.starts_with("invoice-ORD-"));

        let value: serde_json::Value = serde_json::from_slice(&document.bytes).unwrap();
        assert_eq!(value["shipping"]["name"], "Mona Hassan");
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
    }
}
