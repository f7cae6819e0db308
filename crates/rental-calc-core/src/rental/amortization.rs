use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::rental::mortgage::{monthly_mortgage_payment, monthly_rate, total_periods};
use crate::types::{floor_at_zero, Money, Percent};

/// One month of a loan schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number
    pub month: u32,
    /// Portion of the payment that reduces the balance (never negative)
    pub principal: Money,
    /// Interest accrued on the opening balance
    pub interest: Money,
    /// Closing balance after the payment (never negative)
    pub balance: Money,
}

/// Lazily generated month-by-month amortization schedule.
///
/// The payment is fixed up front; each step carries only the running balance
/// forward. Principal is clamped at zero when the payment does not cover the
/// interest, so the balance never grows. Cloning the schedule before
/// iterating gives an independent replay.
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    payment: Money,
    rate: f64,
    balance: Money,
    month: u32,
    total_months: u32,
}

impl AmortizationSchedule {
    pub fn new(loan_amount: Money, annual_rate_percent: Percent, term_years: u32) -> Self {
        Self {
            payment: monthly_mortgage_payment(loan_amount, annual_rate_percent, term_years),
            rate: monthly_rate(annual_rate_percent),
            balance: loan_amount,
            month: 0,
            total_months: total_periods(term_years),
        }
    }

    /// The level monthly payment driving the schedule.
    pub fn payment(&self) -> Money {
        self.payment
    }

    /// Balance carried into the next period.
    pub fn balance(&self) -> Money {
        self.balance
    }
}

impl Iterator for AmortizationSchedule {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<AmortizationRow> {
        if self.month >= self.total_months {
            return None;
        }
        self.month += 1;

        let interest = self.balance * self.rate;
        let principal = floor_at_zero(self.payment - interest);
        self.balance = floor_at_zero(self.balance - principal);

        Some(AmortizationRow {
            month: self.month,
            principal,
            interest,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total_months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationSchedule {}

impl FusedIterator for AmortizationSchedule {}

/// Materialise the full schedule for a loan.
pub fn build_amortization(
    loan_amount: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> Vec<AmortizationRow> {
    AmortizationSchedule::new(loan_amount, annual_rate_percent, term_years).collect()
}
