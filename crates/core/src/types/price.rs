//! Money formatting for Brazilian Real amounts.
//!
//! The backend exchanges monetary values as plain JSON numbers, so wire types
//! hold them as [`rust_decimal::Decimal`] fields annotated with
//! `rust_decimal::serde::float`. Display formatting lives here so every
//! surface renders the same `R$ 89,90` shape.

use rust_decimal::Decimal;

/// Format a decimal amount as Brazilian Real for display.
///
/// Two decimal places, comma as the decimal separator:
///
/// ```
/// use rust_decimal::Decimal;
/// use doceria_core::format_brl;
///
/// assert_eq!(format_brl(Decimal::new(8990, 2)), "R$ 89,90");
/// assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
/// ```
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {amount:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(7500, 2)), "R$ 75,00");
        assert_eq!(format_brl(Decimal::new(999, 1)), "R$ 99,90");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        // 10.005 -> banker's display rounding via {:.2}
        assert_eq!(format_brl(Decimal::new(10, 0)), "R$ 10,00");
    }

    #[test]
    fn test_format_brl_zero() {
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }
}
