//! # Order Draft Aggregate
//!
//! In-memory representation of an order under construction: the customer,
//! the priced lines reserved so far, and the running total.
//!
//! ## Why an aggregate instead of a loose counter?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Data Flow                            │
//! │                                                                     │
//! │   for each requested line (strictly in input order):                │
//! │        │                                                            │
//! │        ▼                                                            │
//! │   reserve stock ──► unit price at time of sale                      │
//! │        │                                                            │
//! │        ▼                                                            │
//! │   draft.add_line(product, qty, price)   ← line total computed HERE  │
//! │        │          (checked arithmetic, running total accumulated)   │
//! │        ▼                                                            │
//! │   insert order_lines row from the draft line                        │
//! │                                                                     │
//! │   finally: header total = draft.total()                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The running total lives on the draft, owned by one checkout invocation.
//! It is never shared state between requests, so two concurrent checkouts
//! cannot see each other's partial sums.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// One priced line inside a draft.
///
/// The unit price is the catalog price observed at reservation time; the
/// line total is frozen here and written to storage as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// An order being assembled during checkout.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer_id: String,
    lines: Vec<DraftLine>,
    total: Money,
}

impl OrderDraft {
    /// Starts an empty draft for a customer.
    pub fn new(customer_id: impl Into<String>) -> Self {
        OrderDraft {
            customer_id: customer_id.into(),
            lines: Vec::new(),
            total: Money::zero(),
        }
    }

    /// Prices a line and adds it to the draft.
    ///
    /// Computes `line_total = unit_price × quantity` with checked
    /// arithmetic and folds it into the running total. Returns the frozen
    /// line total.
    ///
    /// ## Errors
    /// [`CoreError::AmountOverflow`] if either the line total or the
    /// running total would overflow i64 cents.
    pub fn add_line(
        &mut self,
        product_id: &str,
        quantity: i64,
        unit_price: Money,
    ) -> CoreResult<Money> {
        let line_total = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| CoreError::AmountOverflow {
                product_id: product_id.to_string(),
            })?;

        self.total = self
            .total
            .checked_add(line_total)
            .ok_or_else(|| CoreError::AmountOverflow {
                product_id: product_id.to_string(),
            })?;

        self.lines.push(DraftLine {
            product_id: product_id.to_string(),
            quantity,
            unit_price,
            line_total,
        });

        Ok(line_total)
    }

    /// The customer this draft belongs to.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Lines added so far, in input order.
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Number of lines added so far.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The running total: sum of all frozen line totals.
    pub fn total(&self) -> Money {
        self.total
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_draft() {
        let draft = OrderDraft::new("cust-1");
        assert_eq!(draft.customer_id(), "cust-1");
        assert_eq!(draft.line_count(), 0);
        assert!(draft.total().is_zero());
    }

    #[test]
    fn test_add_line_accumulates_total() {
        let mut draft = OrderDraft::new("cust-1");

        let first = draft.add_line("p-1", 4, Money::from_cents(5)).unwrap();
        assert_eq!(first.cents(), 20);
        assert_eq!(draft.total().cents(), 20);

        let second = draft.add_line("p-2", 2, Money::from_cents(150)).unwrap();
        assert_eq!(second.cents(), 300);
        assert_eq!(draft.total().cents(), 320);

        assert_eq!(draft.line_count(), 2);
    }

    #[test]
    fn test_total_equals_sum_of_line_totals() {
        let mut draft = OrderDraft::new("cust-1");
        draft.add_line("p-1", 3, Money::from_cents(199)).unwrap();
        draft.add_line("p-2", 1, Money::from_cents(1000)).unwrap();
        draft.add_line("p-1", 2, Money::from_cents(199)).unwrap();

        let sum: i64 = draft.lines().iter().map(|l| l.line_total.cents()).sum();
        assert_eq!(draft.total().cents(), sum);
    }

    #[test]
    fn test_lines_preserve_input_order() {
        let mut draft = OrderDraft::new("cust-1");
        draft.add_line("p-b", 1, Money::from_cents(1)).unwrap();
        draft.add_line("p-a", 1, Money::from_cents(1)).unwrap();

        let ids: Vec<&str> = draft.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p-b", "p-a"]);
    }

    #[test]
    fn test_line_total_overflow() {
        let mut draft = OrderDraft::new("cust-1");
        let err = draft
            .add_line("p-1", 2, Money::from_cents(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
        // Nothing was recorded
        assert_eq!(draft.line_count(), 0);
        assert!(draft.total().is_zero());
    }

    #[test]
    fn test_running_total_overflow() {
        let mut draft = OrderDraft::new("cust-1");
        draft.add_line("p-1", 1, Money::from_cents(i64::MAX)).unwrap();
        let err = draft.add_line("p-2", 1, Money::from_cents(1)).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
        assert_eq!(draft.line_count(), 1);
    }
}
