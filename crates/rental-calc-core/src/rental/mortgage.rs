use serde::{Deserialize, Serialize};

use crate::rental::amortization::AmortizationSchedule;
use crate::types::{Money, Percent};

pub const MONTHS_PER_YEAR: u32 = 12;

/// A closing balance at or below half a cent counts as paid off.
const PAID_OFF_TOLERANCE: Money = 0.005;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline figures for a fixed-rate, fully amortizing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageSummary {
    /// Amount borrowed
    pub loan_amount: Money,
    /// Nominal annual rate, 0-100
    pub annual_rate_percent: Percent,
    /// Loan term in whole years
    pub term_years: u32,
    /// Level monthly payment
    pub monthly_payment: Money,
    /// Principal plus interest actually scheduled over the term
    pub total_paid: Money,
    /// Interest portion of `total_paid`
    pub total_interest: Money,
    /// First month whose closing balance is effectively zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_month: Option<u32>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly periodic rate from an annual percentage: 6.5 -> 0.065 / 12.
pub fn monthly_rate(annual_rate_percent: Percent) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Number of monthly payments in a term.
pub fn total_periods(term_years: u32) -> u32 {
    term_years.saturating_mul(MONTHS_PER_YEAR)
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// A zero rate falls back to straight-line repayment. A zero-length term has
/// no payments and yields 0 rather than dividing by zero.
pub fn monthly_mortgage_payment(
    loan_amount: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> Money {
    let n = total_periods(term_years);
    if n == 0 {
        return 0.0;
    }

    let r = monthly_rate(annual_rate_percent);
    if r == 0.0 {
        return loan_amount / f64::from(n);
    }

    // (1+r)^n - 1 via exp_m1/ln_1p: the direct form cancels when r is tiny
    let growth = (f64::from(n) * r.ln_1p()).exp_m1();
    loan_amount * r * (growth + 1.0) / growth
}

/// Payment, lifetime cost and payoff month for a loan.
pub fn mortgage_summary(
    loan_amount: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> MortgageSummary {
    let schedule = AmortizationSchedule::new(loan_amount, annual_rate_percent, term_years);
    let monthly_payment = schedule.payment();

    let mut total_principal = 0.0;
    let mut total_interest = 0.0;
    let mut payoff_month = None;
    for row in schedule {
        total_principal += row.principal;
        total_interest += row.interest;
        if payoff_month.is_none() && row.balance <= PAID_OFF_TOLERANCE {
            payoff_month = Some(row.month);
        }
    }

    MortgageSummary {
        loan_amount,
        annual_rate_percent,
        term_years,
        monthly_payment,
        total_paid: total_principal + total_interest,
        total_interest,
        payoff_month,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
