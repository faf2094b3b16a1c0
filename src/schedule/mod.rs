pub mod aggregate;
pub mod builder;
pub mod calendar;

use chrono::NaiveDate;
use serde::Serialize;

use crate::decimal::Money;

pub use aggregate::ScheduleAggregates;
pub use builder::ScheduleBuilder;
pub use calendar::{clamped_date, days_in_month, is_leap_year, InstallmentCalendar, RepaymentSlots};

/// one row of the schedule, all amounts in whole units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Installment {
    pub installment_number: u32,
    pub date: NaiveDate,
    pub total_installment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub outstanding_principal: Money,
}

/// loan-level totals reported alongside the installments
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub total_interest: Money,
    pub total_repayable: Money,
    pub total_installments: u32,
    /// nominal figure; the last installment may differ
    pub per_installment_amount: Money,
}

impl From<&ScheduleAggregates> for ScheduleSummary {
    fn from(aggregates: &ScheduleAggregates) -> Self {
        Self {
            total_interest: aggregates.total_interest,
            total_repayable: aggregates.total_repayable,
            total_installments: aggregates.total_installments,
            per_installment_amount: aggregates.per_installment_amount,
        }
    }
}
