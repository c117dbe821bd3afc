//! Notification dispatch contract
//!
//! An email-like message dispatch service: recipient, subject, body, and
//! file-like attachments. The lifecycle uses it fire-and-forget after commit;
//! dispatch failure never fails an order.

use crate::invoice::InvoiceDocument;
use crate::order::Order;
use crate::types::{Customer, CustomerEmail};
use async_trait::async_trait;
use thiserror::Error;

/// Dispatch failures, logged by the caller and otherwise swallowed
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The message could not be handed to the transport.
    #[error("Dispatch failed: {0}")]
    Failed(String),
}

/// A file-like attachment on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Suggested file name
    pub filename: String,
    /// MIME type of the attachment bytes
    pub content_type: String,
    /// Attachment contents
    pub bytes: Vec<u8>,
}

impl From<InvoiceDocument> for Attachment {
    fn from(document: InvoiceDocument) -> Self {
        Self {
            filename: document.filename,
            content_type: document.content_type,
            bytes: document.bytes,
        }
    }
}

/// An email-like message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address
    pub to: CustomerEmail,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Attached documents
    pub attachments: Vec<Attachment>,
}

impl EmailMessage {
    /// Build the order confirmation message with the rendered invoice attached
    pub fn order_confirmation(
        customer: &Customer,
        order: &Order,
        invoice: InvoiceDocument,
    ) -> Self {
        Self {
            to: customer.email.clone(),
            subject: "Order Details".to_string(),
            body: format!(
                "Hi {}, your order {} for {} has been received.",
                customer.name, order.id, order.total
            ),
            attachments: vec![invoice.into()],
        }
    }
}

/// Message-dispatch service the lifecycle notifies customers through
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send one message; implementations own their retry policy
    async fn send(&self, message: EmailMessage) -> Result<(), DispatchError>;
}
