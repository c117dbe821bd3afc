//! Coupon entity and redemption rules
//!
//! A coupon is shared by code across many users, but each user redeems it at
//! most once. Redemption is tracked as set membership per user, not a flag on
//! the coupon, so one user's redemption never blocks another's.

use crate::types::{CouponCode, CouponId, DiscountPercent, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A percentage-off coupon with an expiry date and redemption set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique coupon identifier
    pub id: CouponId,
    /// Customer-facing code, matched case-insensitively
    pub code: CouponCode,
    /// Discount applied to the order subtotal
    pub amount: DiscountPercent,
    /// Instant after which the coupon is no longer valid
    pub expires_at: DateTime<Utc>,
    /// Users that have already redeemed this coupon
    pub redeemed_by: HashSet<UserId>,
}

impl Coupon {
    /// Create a new coupon with an empty redemption set
    pub fn new(code: CouponCode, amount: DiscountPercent, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: CouponId::generate(),
            code,
            amount,
            expires_at,
            redeemed_by: HashSet::new(),
        }
    }

    /// Whether the coupon has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether this user has already redeemed the coupon
    pub fn has_redeemed(&self, user: &UserId) -> bool {
        self.redeemed_by.contains(user)
    }

    /// Whether this user may redeem the coupon as of `now`
    pub fn usable_by(&self, user: &UserId, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && !self.has_redeemed(user)
    }
}
