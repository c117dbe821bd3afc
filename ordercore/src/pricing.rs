//! Pricing engine
//!
//! The single place business-facing numeric rules live. Pure and
//! deterministic: no I/O, no storage, fully replayable from its inputs, so it
//! is unit-testable in isolation.

use crate::order::LineItem;
use crate::types::{DiscountPercent, Money, ValidationError};

/// Subtotal and discounted total for a set of line items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Sum of line totals before discount
    pub subtotal: Money,
    /// Subtotal with the discount applied; never exceeds the subtotal
    pub total: Money,
}

/// Price a set of line items with an optional percentage discount
///
/// `subtotal = Σ line totals`; `total = subtotal × (1 − amount/100)` when a
/// discount is present, else the subtotal. For any discount in [0, 100] the
/// total is guaranteed not to exceed the subtotal.
pub fn quote(
    items: &[LineItem],
    discount: Option<DiscountPercent>,
) -> Result<Quote, ValidationError> {
    let mut subtotal = Money::zero();
    for item in items {
        subtotal = subtotal.checked_add(item.line_total)?;
    }

    let total = match discount {
        Some(percent) => subtotal.apply_discount(percent)?,
        None => subtotal,
    };

    Ok(Quote { subtotal, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Quantity};
    use proptest::prelude::*;

    fn item(cents: u64, quantity: u32) -> LineItem {
        LineItem::new(
            ProductId::generate(),
            Quantity::new(quantity).unwrap(),
            Money::from_cents(cents).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_quote_without_discount() {
        let items = vec![item(1000, 2), item(500, 1)]; // $20.00 + $5.00
        let quote = quote(&items, None).unwrap();
        assert_eq!(quote.subtotal.to_cents(), 2500);
        assert_eq!(quote.total.to_cents(), 2500);
    }

    #[test]
    fn test_quote_applies_percentage_discount() {
        let items = vec![item(5000, 1)]; // $50.00
        let ten = DiscountPercent::try_new(10).unwrap();
        let quote = quote(&items, Some(ten)).unwrap();
        assert_eq!(quote.subtotal.to_cents(), 5000);
        assert_eq!(quote.total.to_cents(), 4500); // $45.00
    }

    #[test]
    fn test_quote_of_nothing_is_zero() {
        let quote = quote(&[], None).unwrap();
        assert_eq!(quote.subtotal, Money::zero());
        assert_eq!(quote.total, Money::zero());
    }

    #[test]
    fn test_full_discount_zeroes_total() {
        let items = vec![item(1234, 3)];
        let full = DiscountPercent::try_new(100).unwrap();
        let quote = quote(&items, Some(full)).unwrap();
        assert_eq!(quote.total.to_cents(), 0);
        assert_eq!(quote.subtotal.to_cents(), 3702);
    }

    proptest! {
        #[test]
        fn prop_total_never_exceeds_subtotal(
            prices in proptest::collection::vec((1u64..100_000, 1u32..=20), 1..6),
            percent in 0u8..=100
        ) {
            let items: Vec<LineItem> = prices
                .into_iter()
                .map(|(cents, qty)| item(cents, qty))
                .collect();
            let discount = DiscountPercent::try_new(percent).unwrap();

            let quote = quote(&items, Some(discount)).unwrap();
            assert!(quote.total <= quote.subtotal);
        }

        #[test]
        fn prop_subtotal_is_sum_of_line_totals(
            prices in proptest::collection::vec((1u64..100_000, 1u32..=20), 1..6)
        ) {
            let items: Vec<LineItem> = prices
                .into_iter()
                .map(|(cents, qty)| item(cents, qty))
                .collect();

            let expected: u64 = items.iter().map(|i| i.line_total.to_cents()).sum();
            let quote = quote(&items, None).unwrap();
            assert_eq!(quote.subtotal.to_cents(), expected);
        }

        #[test]
        fn prop_exact_formula_on_whole_dollars(
            dollars in 1u64..10_000,
            percent in 0u8..=100
        ) {
            // Whole-dollar subtotals at whole percentages never need rounding
            let items = vec![item(dollars * 100, 1)];
            let discount = DiscountPercent::try_new(percent).unwrap();
            let quote = quote(&items, Some(discount)).unwrap();

            let expected = dollars * 100 * u64::from(100 - percent) / 100;
            assert_eq!(quote.total.to_cents(), expected);
        }
    }
}
