use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{EmiError, Result};
use crate::schedule::aggregate::ScheduleAggregates;
use crate::schedule::calendar::{InstallmentCalendar, RepaymentSlots};
use crate::schedule::Installment;
use crate::types::LoanParameters;

/// assembles the installment sequence in two phases: nominal rows, then the reconciling last row
pub struct ScheduleBuilder<'a> {
    params: &'a LoanParameters,
    aggregates: ScheduleAggregates,
    calendar: InstallmentCalendar,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(params: &'a LoanParameters, aggregates: ScheduleAggregates) -> Self {
        Self {
            params,
            aggregates,
            calendar: InstallmentCalendar::after_disbursement(params.disbursement_date()),
        }
    }

    /// repayment dates in generation order
    fn slots(&self) -> RepaymentSlots {
        self.calendar
            .slots(self.params.tenure_months(), self.params.repayment_days())
    }

    pub fn build(&self) -> Result<Vec<Installment>> {
        let total = self.aggregates.total_installments as usize;
        let mut slots = self.slots();
        let mut schedule = Vec::with_capacity(total);
        let mut outstanding = self.params.principal();

        // phase one: every slot but the last gets the nominal split
        for date in slots.by_ref().take(total.saturating_sub(1)) {
            schedule.push(self.installment(
                schedule.len(),
                date?,
                self.aggregates.nominal_principal,
                self.aggregates.nominal_interest,
                &mut outstanding,
            ));
        }

        // phase two: the last slot settles what flooring left over
        let last_date = slots
            .next()
            .ok_or_else(|| EmiError::schedule("No valid repayment dates could be generated"))??;
        schedule.push(self.installment(
            schedule.len(),
            last_date,
            self.aggregates.final_principal,
            self.aggregates.final_interest,
            &mut outstanding,
        ));

        schedule.sort_by_key(|installment| installment.date);
        Ok(schedule)
    }

    fn installment(
        &self,
        position: usize,
        date: NaiveDate,
        principal_component: Money,
        interest_component: Money,
        outstanding: &mut Money,
    ) -> Installment {
        *outstanding = (*outstanding - principal_component).max(Money::ZERO);

        Installment {
            installment_number: position as u32 + 1,
            date,
            total_installment: (principal_component + interest_component).ceil(),
            principal_component: principal_component.ceil(),
            interest_component: interest_component.ceil(),
            outstanding_principal: outstanding.ceil(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(principal: Money, tenure: u32, disbursed: NaiveDate, days: &[u8]) -> LoanParameters {
        LoanParameters::builder()
            .principal(principal)
            .annual_rate(Rate::from_percentage(dec!(12)))
            .tenure_months(tenure)
            .disbursement_date(disbursed)
            .repayment_days(days.iter().copied())
            .build_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .unwrap()
    }

    fn build(params: &LoanParameters) -> Vec<Installment> {
        ScheduleBuilder::new(params, ScheduleAggregates::compute(params))
            .build()
            .unwrap()
    }

    #[test]
    fn test_outstanding_runs_down_to_zero() {
        let p = params(Money::from_major(100_000), 3, date(2024, 1, 10), &[1]);
        let schedule = build(&p);

        let outstanding: Vec<Money> = schedule.iter().map(|i| i.outstanding_principal).collect();
        assert_eq!(
            outstanding,
            vec![Money::from_major(66_667), Money::from_major(33_334), Money::ZERO]
        );
        assert_eq!(schedule[2].principal_component, Money::from_major(33_334));
    }

    #[test]
    fn test_numbers_and_dates() {
        let p = params(Money::from_major(60_000), 2, date(2024, 11, 5), &[30, 10]);
        let schedule = build(&p);

        let rows: Vec<(u32, NaiveDate)> = schedule
            .iter()
            .map(|i| (i.installment_number, i.date))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, date(2024, 12, 10)),
                (2, date(2024, 12, 30)),
                (3, date(2025, 1, 10)),
                (4, date(2025, 1, 30)),
            ]
        );
    }

    #[test]
    fn test_zero_nominal_principal_still_reconciles() {
        let p = params(Money::from_major(5), 12, date(2024, 1, 10), &[1, 15]);
        let schedule = build(&p);

        assert_eq!(schedule.len(), 24);
        assert!(schedule[..23].iter().all(|i| i.principal_component.is_zero()));
        assert!(schedule[..23]
            .iter()
            .all(|i| i.outstanding_principal == Money::from_major(5)));
        assert_eq!(schedule[23].principal_component, Money::from_major(5));
        assert_eq!(schedule[23].outstanding_principal, Money::ZERO);
    }

    #[test]
    fn test_fractional_principal_rounds_outstanding_up() {
        let principal = Money::from_decimal(dec!(1000.5));
        let p = params(principal, 1, date(2024, 1, 10), &[1, 15]);
        let schedule = build(&p);

        // nominal floor(1000.5 / 2) = 500, last ceil(500.5) = 501
        assert_eq!(schedule[0].principal_component, Money::from_major(500));
        assert_eq!(schedule[0].outstanding_principal, Money::from_major(501));
        assert_eq!(schedule[1].principal_component, Money::from_major(501));
        assert_eq!(schedule[1].outstanding_principal, Money::ZERO);
    }
}
