//! wire views of a computed schedule, shaped like the calculate-emi response body
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::engine::EmiSchedule;
use crate::errors::{EmiError, Result};
use crate::schedule::Installment;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// serializable view of a schedule with whole-number amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub loan_amount: f64,
    pub interest: u64,
    pub total_repayable: u64,
    pub total_installments: u32,
    pub per_installment_amount: u64,
    pub schedule: Vec<InstallmentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView {
    pub date: String,
    pub total_installment: u64,
    pub principal_component: u64,
    pub interest_component: u64,
    pub outstanding_principal: u64,
}

/// error body returned in place of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorView {
    pub error: String,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &EmiSchedule) -> Result<Self> {
        let loan_amount = schedule.parameters.principal();

        Ok(ScheduleView {
            loan_amount: loan_amount
                .to_f64()
                .ok_or_else(|| EmiError::schedule(format!("loan amount {loan_amount} has no float form")))?,
            interest: whole(schedule.summary.total_interest, "interest")?,
            total_repayable: whole(schedule.summary.total_repayable, "totalRepayable")?,
            total_installments: schedule.summary.total_installments,
            per_installment_amount: whole(schedule.summary.per_installment_amount, "perInstallmentAmount")?,
            schedule: schedule
                .installments
                .iter()
                .map(InstallmentView::from_installment)
                .collect::<Result<_>>()?,
        })
    }
}

impl InstallmentView {
    pub fn from_installment(installment: &Installment) -> Result<Self> {
        Ok(InstallmentView {
            date: installment.date.format(DATE_FORMAT).to_string(),
            total_installment: whole(installment.total_installment, "totalInstallment")?,
            principal_component: whole(installment.principal_component, "principalComponent")?,
            interest_component: whole(installment.interest_component, "interestComponent")?,
            outstanding_principal: whole(installment.outstanding_principal, "outstandingPrincipal")?,
        })
    }
}

impl ErrorView {
    pub fn from_error(error: &EmiError) -> Self {
        ErrorView {
            error: error.to_string(),
        }
    }
}

impl EmiSchedule {
    pub fn to_view(&self) -> Result<ScheduleView> {
        ScheduleView::from_schedule(self)
    }

    /// response body as pretty json
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_view()?).map_err(|e| EmiError::Export {
            message: e.to_string(),
        })
    }

    /// response body as compact json
    pub fn json(&self) -> Result<String> {
        serde_json::to_string(&self.to_view()?).map_err(|e| EmiError::Export {
            message: e.to_string(),
        })
    }
}

fn whole(amount: Money, field: &str) -> Result<u64> {
    amount
        .to_whole_units()
        .ok_or_else(|| EmiError::schedule(format!("{field} is not a whole amount: {amount}")))
}
