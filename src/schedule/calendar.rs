use chrono::{Datelike, NaiveDate};

use crate::errors::{EmiError, Result};
use crate::types::RepaymentDays;

/// maps installment month indices to concrete calendar dates
///
/// Month 0 is the month after disbursement; the disbursement month itself never
/// carries an installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentCalendar {
    first_year: i32,
    /// zero based
    first_month0: u32,
}

impl InstallmentCalendar {
    pub fn after_disbursement(disbursement_date: NaiveDate) -> Self {
        let next = disbursement_date.month0() + 1;
        Self {
            first_year: disbursement_date.year() + (next / 12) as i32,
            first_month0: next % 12,
        }
    }

    /// (year, 1-based month) of the `index`-th installment month
    pub fn month_at(&self, index: u32) -> (i32, u32) {
        let offset = self.first_month0 + index;
        (self.first_year + (offset / 12) as i32, offset % 12 + 1)
    }

    /// date for `day` in the `index`-th installment month, clamped to the month end
    pub fn resolve(&self, index: u32, day: u8) -> Result<NaiveDate> {
        let (year, month) = self.month_at(index);
        clamped_date(year, month, day)
    }

    /// lazily walk every (month, day) slot: months outer, days ascending inner
    pub fn slots(&self, tenure_months: u32, days: &RepaymentDays) -> RepaymentSlots {
        RepaymentSlots {
            calendar: *self,
            days: days.to_vec(),
            tenure_months,
            month_index: 0,
            day_index: 0,
        }
    }
}

/// iterator over repayment dates in chronological order
#[derive(Debug, Clone)]
pub struct RepaymentSlots {
    calendar: InstallmentCalendar,
    days: Vec<u8>,
    tenure_months: u32,
    month_index: u32,
    day_index: usize,
}

impl Iterator for RepaymentSlots {
    type Item = Result<NaiveDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month_index >= self.tenure_months || self.days.is_empty() {
            return None;
        }

        let day = self.days[self.day_index];
        let date = self.calendar.resolve(self.month_index, day);

        self.day_index += 1;
        if self.day_index == self.days.len() {
            self.day_index = 0;
            self.month_index += 1;
        }

        Some(date)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.month_index >= self.tenure_months || self.days.is_empty() {
            0
        } else {
            (self.tenure_months - self.month_index) as usize * self.days.len() - self.day_index
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RepaymentSlots {}

/// `min(day, last day of month)` as a real date
pub fn clamped_date(year: i32, month: u32, day: u8) -> Result<NaiveDate> {
    let actual_day = u32::from(day).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, actual_day).ok_or_else(|| {
        EmiError::schedule(format!(
            "no calendar date for {year}-{month:02}-{actual_day:02}"
        ))
    })
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
