use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{EmiError, Result};

/// upper bounds and the disbursement window applied by the validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleLimits {
    pub max_tenure_months: u32,
    pub max_principal: Money,
    /// annual rate cap in percent, `100` for 100%
    pub max_rate_percent: Decimal,
    /// how far before "now" a disbursement may be dated
    pub disbursement_past_years: u32,
    /// how far after "now" a disbursement may be dated
    pub disbursement_future_years: u32,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            max_tenure_months: 360,
            max_principal: Money::from_major(1_000_000_000),
            max_rate_percent: dec!(100),
            disbursement_past_years: 1,
            disbursement_future_years: 6,
        }
    }
}

impl ScheduleLimits {
    /// load limits from json, missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let limits: ScheduleLimits =
            serde_json::from_str(json).map_err(|e| EmiError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        limits.validate()?;
        Ok(limits)
    }

    pub fn max_rate(&self) -> Rate {
        Rate::from_percentage(self.max_rate_percent)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tenure_months == 0 {
            return Err(EmiError::InvalidConfiguration {
                message: "max_tenure_months must be at least 1".to_string(),
            });
        }

        if !self.max_principal.is_positive() {
            return Err(EmiError::InvalidConfiguration {
                message: format!("max_principal must be positive, got {}", self.max_principal),
            });
        }

        if self.max_rate_percent <= Decimal::ZERO {
            return Err(EmiError::InvalidConfiguration {
                message: format!("max_rate_percent must be positive, got {}", self.max_rate_percent),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ScheduleLimits::default();
        assert_eq!(limits.max_tenure_months, 360);
        assert_eq!(limits.max_principal, Money::from_major(1_000_000_000));
        assert_eq!(limits.max_rate_percent, dec!(100));
        assert_eq!(limits.max_rate().to_string(), "100%");
        assert_eq!(limits.disbursement_past_years, 1);
        assert_eq!(limits.disbursement_future_years, 6);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let limits = ScheduleLimits::from_json(r#"{ "max_tenure_months": 120 }"#).unwrap();
        assert_eq!(limits.max_tenure_months, 120);
        assert_eq!(limits.max_principal, Money::from_major(1_000_000_000));
    }

    #[test]
    fn test_rejects_zero_tenure_limit() {
        let result = ScheduleLimits::from_json(r#"{ "max_tenure_months": 0 }"#);
        assert!(matches!(result, Err(EmiError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(ScheduleLimits::from_json("{ not json").is_err());
    }

    #[test]
    fn test_json_overrides_every_bound() {
        let limits = ScheduleLimits::from_json(
            r#"{
                "max_tenure_months": 60,
                "max_principal": 500000,
                "max_rate_percent": 50,
                "disbursement_past_years": 2,
                "disbursement_future_years": 3
            }"#,
        )
        .unwrap();

        assert_eq!(limits.max_tenure_months, 60);
        assert_eq!(limits.max_principal, Money::from_major(500_000));
        assert_eq!(limits.max_rate_percent, dec!(50));
        assert_eq!(limits.max_rate().as_decimal(), dec!(0.5));
        assert_eq!(limits.disbursement_past_years, 2);
        assert_eq!(limits.disbursement_future_years, 3);
    }

    #[test]
    fn test_rejects_non_positive_caps() {
        let result = ScheduleLimits::from_json(r#"{ "max_rate_percent": 0 }"#);
        assert!(matches!(result, Err(EmiError::InvalidConfiguration { .. })));

        let result = ScheduleLimits::from_json(r#"{ "max_principal": -1 }"#);
        assert!(matches!(result, Err(EmiError::InvalidConfiguration { .. })));
    }
}
