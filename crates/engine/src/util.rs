//! Internal helpers for model validation.
//!
//! These utilities are **not** part of the public API.

use chrono::{Local, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Reject blank descriptions. The text is stored as given.
pub(crate) fn validate_description(value: &str) -> ResultEngine<String> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidExpense(
            "description must not be empty".to_string(),
        ));
    }
    Ok(value.to_string())
}

pub(crate) fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() {
        return Err(EngineError::InvalidExpense(
            "amount must be a finite number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err(EngineError::InvalidExpense(format!(
            "amount must be >= 0, got {amount}"
        )));
    }
    Ok(amount)
}

/// Date assigned to expenses created without one.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_kept_verbatim() {
        assert_eq!(validate_description("  Coffee \n").unwrap(), "  Coffee \n");
    }

    #[test]
    fn blank_description_is_rejected() {
        assert!(matches!(
            validate_description("   "),
            Err(EngineError::InvalidExpense(_))
        ));
    }

    #[test]
    fn zero_amount_is_valid() {
        assert_eq!(validate_amount(0.0).unwrap(), 0.0);
    }

    #[test]
    fn negative_and_nan_amounts_are_rejected() {
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }
}
