//! Monetary amounts using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with its ISO 4217 currency code.
///
/// Saleor reports amounts as floating point numbers; they are converted to
/// `Decimal` once, at the mapping boundary, so arithmetic on cart totals does
/// not accumulate float error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Multiply the amount by a quantity, keeping the currency.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_keeps_currency() {
        let unit = Money::new(Decimal::new(1999, 2), "EUR");
        let line = unit.times(3);
        assert_eq!(line.amount, Decimal::new(5997, 2));
        assert_eq!(line.currency_code, "EUR");
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let money = Money::new(Decimal::new(1050, 2), "USD");
        let json = serde_json::to_value(&money).unwrap_or_default();
        assert_eq!(json["amount"], "10.50");
        assert_eq!(json["currency_code"], "USD");
    }
}
