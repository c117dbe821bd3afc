//! Validated value types for the order domain
//!
//! Every identifier, amount, and quantity that crosses the workflow boundary
//! is a validated newtype, following type-driven development principles to
//! make illegal states unrepresentable.

use nutype::nutype;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Validation errors raised when constructing domain value types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Invalid user identifier format
    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),
    /// Invalid order identifier format
    #[error("Invalid order ID: {0}")]
    InvalidOrderId(String),
    /// Invalid product identifier format
    #[error("Invalid product ID: {0}")]
    InvalidProductId(String),
    /// Invalid coupon identifier format
    #[error("Invalid coupon ID: {0}")]
    InvalidCouponId(String),
    /// Coupon code validation error
    #[error("Invalid coupon code: {0}")]
    InvalidCouponCode(String),
    /// Customer email validation error
    #[error("Invalid customer email: {0}")]
    InvalidCustomerEmail(String),
    /// Invalid money amount
    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),
    /// Invalid quantity value
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    /// Invalid discount percentage
    #[error("Invalid discount: {0}")]
    InvalidDiscount(String),
}

// From trait implementations for nutype errors
impl From<UserIdError> for ValidationError {
    fn from(err: UserIdError) -> Self {
        Self::InvalidUserId(err.to_string())
    }
}

impl From<OrderIdError> for ValidationError {
    fn from(err: OrderIdError) -> Self {
        Self::InvalidOrderId(err.to_string())
    }
}

impl From<ProductIdError> for ValidationError {
    fn from(err: ProductIdError) -> Self {
        Self::InvalidProductId(err.to_string())
    }
}

impl From<CouponIdError> for ValidationError {
    fn from(err: CouponIdError) -> Self {
        Self::InvalidCouponId(err.to_string())
    }
}

impl From<CouponCodeError> for ValidationError {
    fn from(err: CouponCodeError) -> Self {
        Self::InvalidCouponCode(err.to_string())
    }
}

impl From<CustomerEmailError> for ValidationError {
    fn from(err: CustomerEmailError) -> Self {
        Self::InvalidCustomerEmail(err.to_string())
    }
}

impl From<DiscountPercentError> for ValidationError {
    fn from(err: DiscountPercentError) -> Self {
        Self::InvalidDiscount(err.to_string())
    }
}

/// User identifier with validation
///
/// Format: USR-{UPPERCASE_ALPHANUMERIC}
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, regex = r"^USR-[A-Z0-9]+$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct UserId(String);

impl UserId {
    /// Generate a new user ID with a random UUID suffix
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7().simple().to_string().to_uppercase();
        Self::try_new(format!("USR-{}", &uuid[..8])).expect("Generated UserId should be valid")
    }
}

/// Order identifier with validation
///
/// Format: ORD-{UPPERCASE_ALPHANUMERIC}
/// Example: ORD-A1B2C3D4
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, regex = r"^ORD-[A-Z0-9]+$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct OrderId(String);

impl OrderId {
    /// Generate a new order ID with a random UUID suffix
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7().simple().to_string().to_uppercase();
        Self::try_new(format!("ORD-{}", &uuid[..8])).expect("Generated OrderId should be valid")
    }
}

/// Product identifier with validation
///
/// Format: PRD-{UPPERCASE_ALPHANUMERIC}
/// Example: PRD-LAPTOP01
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, regex = r"^PRD-[A-Z0-9]+$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductId(String);

impl ProductId {
    /// Generate a new product ID with a random UUID suffix
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7().simple().to_string().to_uppercase();
        Self::try_new(format!("PRD-{}", &uuid[..8])).expect("Generated ProductId should be valid")
    }
}

/// Coupon identifier with validation
///
/// Format: CPN-{UPPERCASE_ALPHANUMERIC}
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 50, regex = r"^CPN-[A-Z0-9]+$"),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CouponId(String);

impl CouponId {
    /// Generate a new coupon ID with a random UUID suffix
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7().simple().to_string().to_uppercase();
        Self::try_new(format!("CPN-{}", &uuid[..8])).expect("Generated CouponId should be valid")
    }
}

/// Coupon code entered by a customer
///
/// Codes match case-insensitively: construction lowercases the input, so two
/// codes that differ only in case compare equal.
#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 30),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CouponCode(String);

/// Customer email address with validation
///
/// Basic email format validation
#[nutype(
    sanitize(trim),
    validate(
        not_empty,
        len_char_max = 255,
        regex = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CustomerEmail(String);

/// Discount percentage carried by a coupon
///
/// Whole percentage points in [0, 100].
#[nutype(
    validate(less_or_equal = 100),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct DiscountPercent(u8);

/// Ordered quantity with validation
///
/// Must be positive, maximum 1000 per line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Maximum quantity per line item
    pub const MAX_QUANTITY: u32 = 1000;

    /// Create a new quantity
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidQuantity(
                "Quantity must be greater than 0".to_string(),
            ));
        }
        if value > Self::MAX_QUANTITY {
            return Err(ValidationError::InvalidQuantity(format!(
                "Quantity {} exceeds maximum {}",
                value,
                Self::MAX_QUANTITY
            )));
        }
        Ok(Self(value))
    }

    /// Get the underlying value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Add quantities, checking for overflow
    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        let new_value = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| ValidationError::InvalidQuantity("Quantity overflow".to_string()))?;
        Self::new(new_value)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount with validation
///
/// Uses Decimal for precise financial calculations.
/// Must be non-negative with max 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Maximum money amount (100 million)
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Create money from cents (avoids floating point issues)
    pub fn from_cents(cents: u64) -> Result<Self, ValidationError> {
        let decimal = Decimal::new(cents as i64, 2);
        Self::new(decimal)
    }

    /// Create money from decimal amount
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() {
            return Err(ValidationError::InvalidMoney(format!(
                "Money amount cannot be negative: {}",
                amount
            )));
        }
        if amount.scale() > 2 {
            return Err(ValidationError::InvalidMoney(format!(
                "Money amount cannot have more than 2 decimal places: {}",
                amount
            )));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(ValidationError::InvalidMoney(format!(
                "Money amount {} exceeds maximum {}",
                amount,
                Self::MAX_AMOUNT
            )));
        }
        Ok(Self(amount))
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self::default()
    }

    /// Get the underlying decimal value
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Convert to cents for storage
    pub fn to_cents(&self) -> u64 {
        (self.0 * Decimal::from(100)).to_u64().unwrap_or(0)
    }

    /// Add money amounts
    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        let new_amount = self.0 + other.0;
        Self::new(new_amount)
    }

    /// Multiply by quantity
    pub fn multiply_by_quantity(self, quantity: Quantity) -> Result<Self, ValidationError> {
        let new_amount = self.0 * Decimal::from(quantity.value());
        Self::new(new_amount)
    }

    /// Apply a percentage discount, rounding toward zero at 2 decimal places
    ///
    /// For any percentage in [0, 100] the result is never greater than the
    /// undiscounted amount.
    pub fn apply_discount(self, percent: DiscountPercent) -> Result<Self, ValidationError> {
        let remaining = Decimal::from(100 - percent.into_inner()) / Decimal::from(100);
        let discounted =
            (self.0 * remaining).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        Self::new(discounted)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self(Decimal::new(0, 0))
    }
}

/// The authenticated customer acting on the order
///
/// Supplied by the identity provider at the request boundary; carries the
/// contact details the invoice and confirmation email need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier
    pub id: UserId,
    /// Customer full name
    pub name: String,
    /// Customer email address
    pub email: CustomerEmail,
}

impl Customer {
    /// Create a new customer
    pub fn new(id: UserId, name: String, email: CustomerEmail) -> Self {
        Self { id, name, email }
    }
}
