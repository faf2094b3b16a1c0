//! EMI schedule CLI
//!
//! Reads a calculate-emi request (file, flags or stdin) and prints the schedule

use std::fs;
use std::io::{self, Read};
use std::process;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, ValueEnum};
use log::{debug, error, info};

use emi_schedule_rs::{
    to_csv_string, AmortizationEngine, EmiError, EmiSchedule, ErrorView, LoanRequest,
    SafeTimeProvider, ScheduleLimits, TimeSource,
};

/// Simple-interest EMI schedules with custom repayment days
#[derive(Parser)]
#[command(name = "emi", version, about = "Generate a simple-interest EMI schedule")]
struct Cli {
    /// JSON request body (loanAmount, interestRate, tenureInMonths, disbursementDate, repaymentDaysInMonth)
    #[arg(long, short)]
    input: Option<String>,

    /// Loan principal
    #[arg(long)]
    principal: Option<f64>,

    /// Annual interest rate in percent
    #[arg(long)]
    rate: Option<f64>,

    /// Tenure in months
    #[arg(long)]
    tenure: Option<f64>,

    /// Disbursement date, YYYY-MM-DD
    #[arg(long)]
    disbursement_date: Option<String>,

    /// Repayment days of month, comma separated
    #[arg(long, value_delimiter = ',')]
    days: Vec<i64>,

    /// JSON file overriding the validation limits
    #[arg(long)]
    limits: Option<String>,

    /// Evaluate the disbursement window as of this date instead of today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output format
    #[arg(long, default_value = "json")]
    output: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let schedule = match run(&cli) {
        Ok(schedule) => schedule,
        Err(err) => exit_with(&err),
    };

    let rendered = match cli.output {
        OutputFormat::Json => schedule.to_json_pretty(),
        OutputFormat::Csv => to_csv_string(&schedule),
        OutputFormat::Table => Ok(render_table(&schedule)),
    };

    match rendered {
        Ok(text) => println!("{}", text.trim_end()),
        Err(err) => exit_with(&err),
    }
}

fn run(cli: &Cli) -> Result<EmiSchedule, EmiError> {
    let limits = match &cli.limits {
        Some(path) => {
            debug!("loading limits from {path}");
            ScheduleLimits::from_json(&read_file(path)?)?
        }
        None => ScheduleLimits::default(),
    };

    let time = match cli.as_of {
        Some(date) => SafeTimeProvider::new(TimeSource::Test(
            Utc.from_utc_datetime(&date.and_time(NaiveTime::default())),
        )),
        None => SafeTimeProvider::new(TimeSource::System),
    };

    let request = read_request(cli)?;
    debug!("request: {request:?}");

    let engine = AmortizationEngine::new(limits);
    let schedule = engine.calculate(&request, &time)?;
    info!(
        "generated {} installments, total repayable {}",
        schedule.installments.len(),
        schedule.summary.total_repayable
    );
    Ok(schedule)
}

/// flags win over --input, --input wins over stdin
fn read_request(cli: &Cli) -> Result<LoanRequest, EmiError> {
    let has_flags = cli.principal.is_some()
        || cli.rate.is_some()
        || cli.tenure.is_some()
        || cli.disbursement_date.is_some()
        || !cli.days.is_empty();

    if has_flags {
        return Ok(LoanRequest {
            loan_amount: cli.principal,
            interest_rate: cli.rate,
            tenure_in_months: cli.tenure,
            disbursement_date: cli.disbursement_date.clone(),
            repayment_days_in_month: Some(cli.days.iter().map(|d| (*d).into()).collect()),
        });
    }

    let body = match &cli.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|e| EmiError::InvalidConfiguration {
                message: format!("Failed to read stdin: {e}"),
            })?;
            buffer
        }
    };

    Ok(LoanRequest::from_json(body.trim())?)
}

fn read_file(path: &str) -> Result<String, EmiError> {
    fs::read_to_string(path).map_err(|e| EmiError::InvalidConfiguration {
        message: format!("Failed to read '{path}': {e}"),
    })
}

fn render_table(schedule: &EmiSchedule) -> String {
    let summary = schedule.loan_summary();
    let mut out = String::new();

    out.push_str(&format!("Principal Amount:  {}\n", summary.principal));
    out.push_str(&format!("Interest Amount:   {}\n", summary.interest));
    out.push_str(&format!("Total Amount:      {}\n", summary.total_amount));
    out.push_str(&format!("Disbursement Date: {}\n", summary.disbursement_date));
    if let Some(next) = summary.next_payment_date {
        out.push_str(&format!("Next Payment Date: {next}\n"));
    }
    out.push_str(&format!("EMI Per Payment:   {}\n\n", summary.emi_per_payment));

    out.push_str(&format!(
        "{:>5} {:>10} {:>14} {:>14} {:>14} {:>16}\n",
        "No.", "Date", "EMI", "Principal", "Interest", "Outstanding"
    ));
    out.push_str(&"-".repeat(78));
    out.push('\n');

    for row in &schedule.installments {
        out.push_str(&format!(
            "{:>5} {:>10} {:>14} {:>14} {:>14} {:>16}\n",
            row.installment_number,
            row.date.to_string(),
            row.total_installment.to_string(),
            row.principal_component.to_string(),
            row.interest_component.to_string(),
            row.outstanding_principal.to_string()
        ));
    }
    out
}

fn exit_with(err: &EmiError) -> ! {
    error!("{err}");
    let body = serde_json::to_string(&ErrorView::from_error(err))
        .unwrap_or_else(|_| format!("{{\"error\":\"{err}\"}}"));
    eprintln!("{body}");
    process::exit(if err.is_validation() { 2 } else { 1 });
}
