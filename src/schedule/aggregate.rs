use serde::Serialize;

use crate::decimal::Money;
use crate::types::LoanParameters;

/// loan-level figures every installment is derived from
///
/// Every installment except the last carries the nominal split; the last one
/// carries the final split, which absorbs whatever flooring left behind so the
/// components add back to the totals exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleAggregates {
    pub total_interest: Money,
    pub total_repayable: Money,
    pub total_installments: u32,
    pub nominal_principal: Money,
    pub nominal_interest: Money,
    pub final_principal: Money,
    pub final_interest: Money,
    pub per_installment_amount: Money,
}

impl ScheduleAggregates {
    pub fn compute(params: &LoanParameters) -> Self {
        let principal = params.principal();
        let total_installments = params.total_installments();

        let total_interest = principal.simple_interest(params.annual_rate(), params.tenure_months());
        let total_repayable = (principal + total_interest).ceil();

        let nominal_principal = principal.floor_share(total_installments);
        let nominal_interest = total_interest.floor_share(total_installments);

        let preceding = total_installments.saturating_sub(1);
        let final_principal = (principal - nominal_principal * preceding).ceil();
        let final_interest = (total_interest - nominal_interest * preceding).ceil();

        Self {
            total_interest,
            total_repayable,
            total_installments,
            nominal_principal,
            nominal_interest,
            final_principal,
            final_interest,
            per_installment_amount: (nominal_principal + nominal_interest).ceil(),
        }
    }
}
