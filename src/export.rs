use std::io::Write;

use crate::engine::EmiSchedule;
use crate::errors::{EmiError, Result};

const HEADERS: [&str; 6] = [
    "Payment No.",
    "Payment Date",
    "EMI Amount",
    "Principal Component",
    "Interest Component",
    "Outstanding Principal",
];

/// write the schedule as csv: one row per installment, then a loan summary block
pub fn write_csv<W: Write>(schedule: &EmiSchedule, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(HEADERS).map_err(export_error)?;
    for installment in &schedule.installments {
        wtr.write_record([
            installment.installment_number.to_string(),
            installment.date.to_string(),
            installment.total_installment.to_string(),
            installment.principal_component.to_string(),
            installment.interest_component.to_string(),
            installment.outstanding_principal.to_string(),
        ])
        .map_err(export_error)?;
    }

    // blank separator lines are not csv records, write them to the raw writer
    let mut raw = wtr.into_inner().map_err(|e| EmiError::Export {
        message: e.to_string(),
    })?;
    raw.write_all(b"\n\n").map_err(io_error)?;

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(raw);
    let summary = schedule.loan_summary();
    wtr.write_record(["Loan Summary"]).map_err(export_error)?;
    let rows = [
        ("Principal Amount", summary.principal.to_string()),
        ("Total Interest", summary.interest.to_string()),
        ("Total Amount", summary.total_amount.to_string()),
        ("Disbursement Date", summary.disbursement_date.to_string()),
        ("EMI Per Payment", summary.emi_per_payment.to_string()),
    ];
    for (label, value) in rows {
        wtr.write_record([label, value.as_str()]).map_err(export_error)?;
    }

    wtr.flush().map_err(io_error)
}

pub fn to_csv_string(schedule: &EmiSchedule) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(schedule, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| EmiError::Export {
        message: e.to_string(),
    })
}

fn export_error(err: csv::Error) -> EmiError {
    EmiError::Export {
        message: err.to_string(),
    }
}

fn io_error(err: std::io::Error) -> EmiError {
    EmiError::Export {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AmortizationEngine;
    use crate::types::LoanRequest;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    fn schedule() -> EmiSchedule {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        ));
        AmortizationEngine::default()
            .calculate(&LoanRequest::new(100_000.0, 10.0, 3.0, "2024-01-10", &[1]), &time)
            .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_string(&schedule()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Payment No.,Payment Date,EMI Amount,Principal Component,Interest Component,Outstanding Principal",
                "1,2024-02-01,34166,33333,833,66667",
                "2,2024-03-01,34166,33333,833,33334",
                "3,2024-04-01,34168,33334,834,0",
                "",
                "",
                "Loan Summary",
                "Principal Amount,100000",
                "Total Interest,2500",
                "Total Amount,102500",
                "Disbursement Date,2024-01-10",
                "EMI Per Payment,34166",
            ]
        );
    }

    #[test]
    fn test_write_to_any_writer() {
        let mut out = Vec::new();
        write_csv(&schedule(), &mut out).unwrap();
        assert!(out.starts_with(b"Payment No.,"));
    }
}
