use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;

use crate::config::ScheduleLimits;
use crate::decimal::Money;
use crate::errors::{EmiError, Result};
use crate::schedule::{Installment, ScheduleAggregates, ScheduleBuilder, ScheduleSummary};
use crate::types::{LoanParameters, LoanRequest};
use crate::validation::ParameterValidator;

/// validated parameters, summary totals and the ordered installments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmiSchedule {
    pub parameters: LoanParameters,
    pub summary: ScheduleSummary,
    pub installments: Vec<Installment>,
}

/// the figures a ledger view shows above the schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub interest: Money,
    pub total_amount: Money,
    pub disbursement_date: NaiveDate,
    pub next_payment_date: Option<NaiveDate>,
    pub emi_per_payment: Money,
}

impl EmiSchedule {
    /// get installment by 1-based number
    pub fn get_installment(&self, installment_number: u32) -> Option<&Installment> {
        let index = installment_number.checked_sub(1)?;
        self.installments.get(index as usize)
    }

    /// get remaining principal after an installment, the full principal before the first
    pub fn balance_after_installment(&self, installment_number: u32) -> Money {
        self.get_installment(installment_number)
            .map(|i| i.outstanding_principal)
            .unwrap_or_else(|| self.parameters.principal())
    }

    pub fn total_principal_paid(&self) -> Money {
        self.installments.iter().map(|i| i.principal_component).sum()
    }

    pub fn total_interest_paid(&self) -> Money {
        self.installments.iter().map(|i| i.interest_component).sum()
    }

    pub fn first_installment_date(&self) -> Option<NaiveDate> {
        self.installments.first().map(|i| i.date)
    }

    pub fn loan_summary(&self) -> LoanSummary {
        LoanSummary {
            principal: self.parameters.principal(),
            interest: self.summary.total_interest,
            total_amount: self.summary.total_repayable,
            disbursement_date: self.parameters.disbursement_date(),
            next_payment_date: self.first_installment_date(),
            emi_per_payment: self.summary.per_installment_amount,
        }
    }

    /// re-check every schedule invariant
    pub fn verify(&self) -> Result<()> {
        if self.installments.is_empty() {
            return Err(EmiError::schedule("No valid repayment dates could be generated"));
        }

        if self.installments.len() != self.summary.total_installments as usize {
            return Err(EmiError::schedule(format!(
                "expected {} installments, generated {}",
                self.summary.total_installments,
                self.installments.len()
            )));
        }

        for pair in self.installments.windows(2) {
            if pair[1].date < pair[0].date {
                return Err(EmiError::schedule(format!(
                    "installment dated {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
            if pair[1].outstanding_principal > pair[0].outstanding_principal {
                return Err(EmiError::schedule(format!(
                    "outstanding principal rose after installment {}",
                    pair[0].installment_number
                )));
            }
        }

        if let Some(last) = self.installments.last() {
            if !last.outstanding_principal.is_zero() {
                return Err(EmiError::schedule(format!(
                    "outstanding principal {} left after the last installment",
                    last.outstanding_principal
                )));
            }
        }

        // components are whole units, so a fractional principal reconciles to its ceiling
        let expected_principal = self.parameters.principal().ceil();
        if self.total_principal_paid() != expected_principal {
            return Err(EmiError::schedule(format!(
                "principal components sum to {}, expected {}",
                self.total_principal_paid(),
                expected_principal
            )));
        }

        if self.total_interest_paid() != self.summary.total_interest {
            return Err(EmiError::schedule(format!(
                "interest components sum to {}, expected {}",
                self.total_interest_paid(),
                self.summary.total_interest
            )));
        }

        Ok(())
    }
}

/// pure, stateless schedule computation: validator, aggregates, calendar, builder
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    validator: ParameterValidator,
}

impl AmortizationEngine {
    pub fn new(limits: ScheduleLimits) -> Self {
        Self {
            validator: ParameterValidator::new(limits),
        }
    }

    pub fn compute_schedule(&self, params: &LoanParameters) -> Result<EmiSchedule> {
        compute_schedule(params)
    }

    /// validate a raw request then compute its schedule
    pub fn calculate(&self, request: &LoanRequest, time: &SafeTimeProvider) -> Result<EmiSchedule> {
        let params = self.validator.validate(request, time)?;
        compute_schedule(&params)
    }

    /// decode and calculate a json request body
    pub fn calculate_json(&self, body: &str, time: &SafeTimeProvider) -> Result<EmiSchedule> {
        let request = LoanRequest::from_json(body)?;
        self.calculate(&request, time)
    }
}

pub fn compute_schedule(params: &LoanParameters) -> Result<EmiSchedule> {
    let aggregates = ScheduleAggregates::compute(params);
    let installments = ScheduleBuilder::new(params, aggregates).build()?;

    let schedule = EmiSchedule {
        parameters: params.clone(),
        summary: ScheduleSummary::from(&aggregates),
        installments,
    };
    schedule.verify()?;

    Ok(schedule)
}
