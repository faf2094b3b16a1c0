use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decimal::{Money, Rate};
use crate::errors::ValidationError;

/// repayment days of month, sorted ascending, deduplicated, each in 1..=31, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepaymentDays(BTreeSet<u8>);

impl RepaymentDays {
    pub const FIRST_DAY: i64 = 1;
    pub const LAST_DAY: i64 = 31;

    /// dedupe and keep only whole days in 1..=31
    pub fn from_candidates<I>(days: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        let set: BTreeSet<u8> = days
            .into_iter()
            .flatten()
            .filter(|day| (Self::FIRST_DAY..=Self::LAST_DAY).contains(day))
            .filter_map(|day| u8::try_from(day).ok())
            .collect();

        if set.is_empty() {
            return Err(ValidationError::NoValidRepaymentDays);
        }
        Ok(RepaymentDays(set))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.iter().copied().collect()
    }
}

/// validated loan description; only the validator can build one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanParameters {
    principal: Money,
    annual_rate: Rate,
    tenure_months: u32,
    disbursement_date: NaiveDate,
    repayment_days: RepaymentDays,
}

impl LoanParameters {
    pub(crate) fn new(
        principal: Money,
        annual_rate: Rate,
        tenure_months: u32,
        disbursement_date: NaiveDate,
        repayment_days: RepaymentDays,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            tenure_months,
            disbursement_date,
            repayment_days,
        }
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    pub fn disbursement_date(&self) -> NaiveDate {
        self.disbursement_date
    }

    pub fn repayment_days(&self) -> &RepaymentDays {
        &self.repayment_days
    }

    /// tenure × number of repayment days
    pub fn total_installments(&self) -> u32 {
        self.tenure_months * self.repayment_days.len() as u32
    }
}

/// raw loan request as a caller submits it, nothing checked yet
///
/// Numbers are floats so NaN and infinities can reach the validator. Repayment
/// days stay as raw json values; anything that is not a whole number (or a
/// string holding one) is dropped during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub loan_amount: Option<f64>,
    pub interest_rate: Option<f64>,
    pub tenure_in_months: Option<f64>,
    pub disbursement_date: Option<String>,
    pub repayment_days_in_month: Option<Vec<Value>>,
}

impl LoanRequest {
    pub fn new(
        loan_amount: f64,
        interest_rate: f64,
        tenure_in_months: f64,
        disbursement_date: &str,
        repayment_days: &[i64],
    ) -> Self {
        Self {
            loan_amount: Some(loan_amount),
            interest_rate: Some(interest_rate),
            tenure_in_months: Some(tenure_in_months),
            disbursement_date: Some(disbursement_date.to_string()),
            repayment_days_in_month: Some(repayment_days.iter().map(|d| Value::from(*d)).collect()),
        }
    }

    /// decode a json request body, checking presence and types of every field
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(body).map_err(|_| ValidationError::InvalidType { field: "body" })?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, ValidationError> {
        let map = value
            .as_object()
            .ok_or(ValidationError::InvalidType { field: "body" })?;

        let loan_amount = number_field(map, "loanAmount")?;
        let interest_rate = number_field(map, "interestRate")?;
        let tenure_in_months = number_field(map, "tenureInMonths")?;

        let disbursement_date = match present(map, "disbursementDate")? {
            Value::String(s) => s.clone(),
            _ => return Err(ValidationError::InvalidType { field: "disbursementDate" }),
        };

        let repayment_days = match present(map, "repaymentDaysInMonth")? {
            Value::Array(days) => days.clone(),
            _ => return Err(ValidationError::InvalidType { field: "repaymentDaysInMonth" }),
        };

        Ok(Self {
            loan_amount: Some(loan_amount),
            interest_rate: Some(interest_rate),
            tenure_in_months: Some(tenure_in_months),
            disbursement_date: Some(disbursement_date),
            repayment_days_in_month: Some(repayment_days),
        })
    }
}

fn present<'a>(map: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField { field }),
        Some(value) => Ok(value),
    }
}

fn number_field(map: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    present(map, field)?
        .as_f64()
        .ok_or(ValidationError::InvalidType { field })
}

/// interpret one raw repayment day: whole numbers and numeric strings only
///
/// A fractional day such as `5.5` is dropped rather than truncated to `5`,
/// so `[5.5]` alone fails with no valid repayment day.
pub(crate) fn repayment_day_candidate(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
