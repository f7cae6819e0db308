use clap::Args;
use serde_json::Value;

use rental_calc_core::rental::{mortgage_summary, AmortizationSchedule};
use rental_calc_core::RentalCalcError;

/// Loan parameters shared by the mortgage commands
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: f64,
    /// Annual interest rate, percent (e.g. 6.5)
    #[arg(long)]
    pub rate: f64,
    /// Term in whole years
    #[arg(long, default_value_t = 30)]
    pub term_years: u32,
}

/// Arguments for the mortgage summary
#[derive(Args)]
pub struct MortgageArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
    /// Only emit the first N months
    #[arg(long)]
    pub months: Option<usize>,
}

impl LoanArgs {
    fn validate(&self) -> Result<(), RentalCalcError> {
        if !self.loan_amount.is_finite() || self.loan_amount < 0.0 {
            return Err(RentalCalcError::InvalidInput {
                field: "loan_amount".into(),
                reason: "Loan amount must be a finite, non-negative number".into(),
            });
        }
        if !self.rate.is_finite() {
            return Err(RentalCalcError::InvalidInput {
                field: "rate".into(),
                reason: "Interest rate must be finite".into(),
            });
        }
        if self.term_years == 0 {
            return Err(RentalCalcError::InvalidInput {
                field: "term_years".into(),
                reason: "Loan term must be at least 1 year".into(),
            });
        }
        Ok(())
    }
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = &args.loan;
    loan.validate()?;
    let summary = mortgage_summary(loan.loan_amount, loan.rate, loan.term_years);
    Ok(serde_json::to_value(summary)?)
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = &args.loan;
    loan.validate()?;
    let schedule = AmortizationSchedule::new(loan.loan_amount, loan.rate, loan.term_years);
    let limit = args.months.unwrap_or(schedule.len());
    log::debug!(
        "amortization: payment={} months={}",
        schedule.payment(),
        limit.min(schedule.len())
    );
    let rows: Vec<_> = schedule.take(limit).collect();
    Ok(serde_json::to_value(rows)?)
}
