use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of the cart total taken when the host recalculates the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEstimate {
    /// Total as displayed to the client, with currency decoration (e.g. `$100.00 USD`).
    pub display_total: String,
    pub numeric_total: Decimal,
}

impl CartEstimate {
    pub fn new(display_total: impl Into<String>, numeric_total: Decimal) -> Self {
        Self {
            display_total: display_total.into(),
            numeric_total,
        }
    }
}

/// Per-session checkout state.
///
/// Written by the cart-totals binding and read by the footer binding. Each
/// recalculation replaces the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutSession {
    cart: Option<CartEstimate>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cart_totals(&mut self, estimate: CartEstimate) {
        self.cart = Some(estimate);
    }

    pub fn cart_totals(&self) -> Option<&CartEstimate> {
        self.cart.as_ref()
    }

    pub fn clear(&mut self) {
        self.cart = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_is_replaced() {
        let mut session = CheckoutSession::new();
        assert!(session.cart_totals().is_none());

        session.record_cart_totals(CartEstimate::new("$10.00", dec!(10)));
        session.record_cart_totals(CartEstimate::new("$20.00", dec!(20)));

        let cart = session.cart_totals().unwrap();
        assert_eq!(cart.numeric_total, dec!(20));
        assert_eq!(cart.display_total, "$20.00");

        session.clear();
        assert!(session.cart_totals().is_none());
    }
}
