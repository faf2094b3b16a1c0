pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod export;
pub mod schedule;
pub mod serialization;
pub mod types;
pub mod validation;

// re-export key types
pub use config::ScheduleLimits;
pub use decimal::{Money, Rate};
pub use engine::{compute_schedule, AmortizationEngine, EmiSchedule, LoanSummary};
pub use errors::{EmiError, Result, ValidationError};
pub use export::{to_csv_string, write_csv};
pub use schedule::{Installment, InstallmentCalendar, ScheduleAggregates, ScheduleBuilder, ScheduleSummary};
pub use serialization::{ErrorView, InstallmentView, ScheduleView};
pub use types::{LoanParameters, LoanRequest, RepaymentDays};
pub use validation::{LoanParametersBuilder, ParameterValidator};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
