//! Precondition helpers shared by the controllers.

use crate::error::{DashboardError, Result};

/// Require that a form quantity is at least one.
pub fn require_quantity(quantity: u32, error_msg: &str) -> Result<()> {
    if quantity < 1 {
        return Err(DashboardError::Validation(error_msg.to_string()));
    }
    Ok(())
}

/// Require that a price is a positive finite number.
pub fn require_positive_price(price: f64, error_msg: &str) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DashboardError::Validation(error_msg.to_string()));
    }
    Ok(())
}

/// Require that a lifecycle status matches the expected value.
pub fn require_status<S: PartialEq>(actual: S, expected: S, error_msg: &str) -> Result<()> {
    if actual != expected {
        return Err(DashboardError::Rejected(error_msg.to_string()));
    }
    Ok(())
}

/// Trimmed input, or the fallback when the input is blank.
pub fn or_default(input: Option<&str>, fallback: &str) -> String {
    match input.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decorhub_client::BookingStatus;

    #[test]
    fn test_require_quantity() {
        assert!(require_quantity(1, "q").is_ok());
        assert!(matches!(
            require_quantity(0, "q"),
            Err(DashboardError::Validation(msg)) if msg == "q"
        ));
    }

    #[test]
    fn test_require_positive_price() {
        assert!(require_positive_price(500.0, "p").is_ok());
        assert!(require_positive_price(0.0, "p").is_err());
        assert!(require_positive_price(f64::NAN, "p").is_err());
    }

    #[test]
    fn test_require_status() {
        assert!(require_status(BookingStatus::Unpaid, BookingStatus::Unpaid, "s").is_ok());
        assert!(matches!(
            require_status(BookingStatus::Paid, BookingStatus::Unpaid, "s"),
            Err(DashboardError::Rejected(_))
        ));
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(Some(" Chittagong "), "Dhaka"), "Chittagong");
        assert_eq!(or_default(Some("   "), "Dhaka"), "Dhaka");
        assert_eq!(or_default(None, "Dhaka"), "Dhaka");
    }
}
