use chrono::{DateTime, Months, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::config::ScheduleLimits;
use crate::decimal::{Money, Rate};
use crate::errors::ValidationError;
use crate::types::{repayment_day_candidate, LoanParameters, LoanRequest, RepaymentDays};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// turns raw or builder input into [`LoanParameters`], reporting the first broken rule
#[derive(Debug, Clone, Default)]
pub struct ParameterValidator {
    limits: ScheduleLimits,
}

impl ParameterValidator {
    pub fn new(limits: ScheduleLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ScheduleLimits {
        &self.limits
    }

    /// validate against the provider's current time, read exactly once
    pub fn validate(
        &self,
        request: &LoanRequest,
        time: &SafeTimeProvider,
    ) -> Result<LoanParameters, ValidationError> {
        self.validate_at(request, time.now())
    }

    pub fn validate_at(
        &self,
        request: &LoanRequest,
        now: DateTime<Utc>,
    ) -> Result<LoanParameters, ValidationError> {
        let loan_amount = request
            .loan_amount
            .ok_or(ValidationError::MissingField { field: "loanAmount" })?;
        let interest_rate = request
            .interest_rate
            .ok_or(ValidationError::MissingField { field: "interestRate" })?;
        let tenure = request
            .tenure_in_months
            .ok_or(ValidationError::MissingField { field: "tenureInMonths" })?;
        let date_text = request
            .disbursement_date
            .as_deref()
            .ok_or(ValidationError::MissingField { field: "disbursementDate" })?;
        let raw_days = request
            .repayment_days_in_month
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "repaymentDaysInMonth" })?;

        if !loan_amount.is_finite() || !interest_rate.is_finite() || !tenure.is_finite() {
            return Err(ValidationError::NotANumber);
        }
        if tenure.fract() != 0.0 {
            return Err(ValidationError::FractionalTenure);
        }

        let principal = saturating_decimal(loan_amount);
        let rate_percent = saturating_decimal(interest_rate);
        let tenure = saturating_decimal(tenure);

        check_positive(principal, rate_percent, tenure)?;

        if raw_days.is_empty() {
            return Err(ValidationError::EmptyRepaymentDays);
        }

        if !has_date_shape(date_text) {
            return Err(ValidationError::InvalidDateFormat);
        }

        let tenure_months = self.check_limits(principal, rate_percent, tenure)?;

        let repayment_days =
            RepaymentDays::from_candidates(raw_days.iter().map(repayment_day_candidate))?;

        let disbursement_date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidDate {
                date: date_text.to_string(),
            }
        })?;

        self.check_window(disbursement_date, now)?;

        Ok(LoanParameters::new(
            Money::from_decimal(principal),
            Rate::from_percentage(rate_percent),
            tenure_months,
            disbursement_date,
            repayment_days,
        ))
    }

    /// range checks in rule order: tenure, principal, rate; returns the tenure in months
    fn check_limits(
        &self,
        principal: Decimal,
        rate_percent: Decimal,
        tenure: Decimal,
    ) -> Result<u32, ValidationError> {
        if tenure > Decimal::from(self.limits.max_tenure_months) {
            return Err(ValidationError::TenureTooLong {
                max: self.limits.max_tenure_months,
            });
        }
        if principal > self.limits.max_principal.as_decimal() {
            return Err(ValidationError::PrincipalTooLarge {
                max: self.limits.max_principal,
            });
        }
        if rate_percent > self.limits.max_rate_percent {
            return Err(ValidationError::RateTooHigh {
                max: self.limits.max_rate(),
            });
        }

        tenure.to_u32().ok_or(ValidationError::NotANumber)
    }

    /// both bounds are offsets of the same snapshot
    fn check_window(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let today = now.date_naive();
        let earliest = today
            .checked_sub_months(Months::new(self.limits.disbursement_past_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN);
        let latest = today
            .checked_add_months(Months::new(self.limits.disbursement_future_years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MAX);

        if date < earliest || date > latest {
            return Err(ValidationError::DisbursementOutOfRange {
                past_years: self.limits.disbursement_past_years,
                future_years: self.limits.disbursement_future_years,
            });
        }
        Ok(())
    }
}

fn check_positive(principal: Decimal, rate_percent: Decimal, tenure: Decimal) -> Result<(), ValidationError> {
    if principal <= Decimal::ZERO || rate_percent <= Decimal::ZERO || tenure <= Decimal::ZERO {
        return Err(ValidationError::NotPositive);
    }
    Ok(())
}

/// `YYYY-MM-DD`, digits and dashes only
fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// finite floats beyond decimal range clamp to the decimal extremes so range checks still fire
fn saturating_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// typed construction path, same rules as the raw path minus the wire checks
#[derive(Debug, Clone, Default)]
pub struct LoanParametersBuilder {
    principal: Option<Money>,
    annual_rate: Option<Rate>,
    tenure_months: Option<u32>,
    disbursement_date: Option<NaiveDate>,
    repayment_days: Option<Vec<i64>>,
    limits: Option<ScheduleLimits>,
}

impl LoanParameters {
    pub fn builder() -> LoanParametersBuilder {
        LoanParametersBuilder::new()
    }
}

impl LoanParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn tenure_months(mut self, months: u32) -> Self {
        self.tenure_months = Some(months);
        self
    }

    pub fn disbursement_date(mut self, date: NaiveDate) -> Self {
        self.disbursement_date = Some(date);
        self
    }

    pub fn repayment_days<I>(mut self, days: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        self.repayment_days = Some(days.into_iter().map(Into::into).collect());
        self
    }

    pub fn limits(mut self, limits: ScheduleLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Build with system time
    pub fn build(self) -> Result<LoanParameters, ValidationError> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    pub fn build_with_time(self, time: &SafeTimeProvider) -> Result<LoanParameters, ValidationError> {
        self.build_at(time.now())
    }

    pub fn build_at(self, now: DateTime<Utc>) -> Result<LoanParameters, ValidationError> {
        let principal = self
            .principal
            .ok_or(ValidationError::MissingField { field: "principal" })?;
        let annual_rate = self
            .annual_rate
            .ok_or(ValidationError::MissingField { field: "annualRate" })?;
        let tenure_months = self
            .tenure_months
            .ok_or(ValidationError::MissingField { field: "tenureMonths" })?;
        let disbursement_date = self
            .disbursement_date
            .ok_or(ValidationError::MissingField { field: "disbursementDate" })?;
        let days = self
            .repayment_days
            .ok_or(ValidationError::MissingField { field: "repaymentDays" })?;

        check_positive(
            principal.as_decimal(),
            annual_rate.as_percentage(),
            Decimal::from(tenure_months),
        )?;

        if days.is_empty() {
            return Err(ValidationError::EmptyRepaymentDays);
        }

        let validator = ParameterValidator::new(self.limits.unwrap_or_default());
        let tenure_months = validator.check_limits(
            principal.as_decimal(),
            annual_rate.as_percentage(),
            Decimal::from(tenure_months),
        )?;

        let repayment_days = RepaymentDays::from_candidates(days.into_iter().map(Some))?;

        validator.check_window(disbursement_date, now)?;

        Ok(LoanParameters::new(
            principal,
            annual_rate,
            tenure_months,
            disbursement_date,
            repayment_days,
        ))
    }
}
