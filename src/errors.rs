use thiserror::Error;

use crate::decimal::{Money, Rate};

/// input rejected before any arithmetic, listed in the order rules are checked
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("All parameters are required: {field} is missing")]
    MissingField {
        field: &'static str,
    },

    #[error("Invalid data type provided for {field}")]
    InvalidType {
        field: &'static str,
    },

    #[error("Loan amount, interest rate, and tenure must be valid numbers")]
    NotANumber,

    #[error("Tenure must be a whole number of months")]
    FractionalTenure,

    #[error("Loan amount, interest rate, and tenure must be greater than 0")]
    NotPositive,

    #[error("Repayment days must be a non-empty array")]
    EmptyRepaymentDays,

    #[error("Disbursement date must be in YYYY-MM-DD format")]
    InvalidDateFormat,

    #[error("Tenure cannot exceed {max} months")]
    TenureTooLong {
        max: u32,
    },

    #[error("Loan amount cannot exceed {max}")]
    PrincipalTooLarge {
        max: Money,
    },

    #[error("Interest rate cannot exceed {max}")]
    RateTooHigh {
        max: Rate,
    },

    #[error("At least one valid repayment day required")]
    NoValidRepaymentDays,

    #[error("Invalid disbursement date: {date}")]
    InvalidDate {
        date: String,
    },

    #[error("Disbursement date must be within {past_years} year(s) past and {future_years} year(s) future")]
    DisbursementOutOfRange {
        past_years: u32,
        future_years: u32,
    },
}

#[derive(Error, Debug)]
pub enum EmiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("schedule error: {message}")]
    Schedule {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("export failed: {message}")]
    Export {
        message: String,
    },
}

impl EmiError {
    /// true when the caller can fix the input and retry; anything else is a defect
    pub fn is_validation(&self) -> bool {
        matches!(self, EmiError::Validation(_))
    }

    pub(crate) fn schedule(message: impl Into<String>) -> Self {
        EmiError::Schedule {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EmiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::TenureTooLong { max: 360 }.to_string(),
            "Tenure cannot exceed 360 months"
        );
        assert_eq!(
            ValidationError::RateTooHigh { max: Rate::from_percentage(dec!(100)) }.to_string(),
            "Interest rate cannot exceed 100%"
        );
        assert_eq!(
            ValidationError::NoValidRepaymentDays.to_string(),
            "At least one valid repayment day required"
        );
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: EmiError = ValidationError::NotPositive.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), ValidationError::NotPositive.to_string());

        assert!(!EmiError::schedule("no installments").is_validation());
    }
}
