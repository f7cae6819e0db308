use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentalCalcError;
use crate::rental::amortization::{build_amortization, AmortizationRow};
use crate::rental::mortgage::monthly_mortgage_payment;
use crate::types::{floor_at_zero, with_metadata, ComputationOutput, Money, Percent};
use crate::RentalCalcResult;

/// Months summed for the principal-paydown component of the 5-year return.
const FIVE_YEAR_MONTHS: usize = 60;
const HOLDING_YEARS: f64 = 5.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Property, financing and operating inputs for one rental scenario.
///
/// Missing fields deserialize as zero, like a blank form field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorInputs {
    /// Acquisition price
    pub purchase_price: Money,
    /// Down payment as a share of the price, 0-100
    pub down_payment_percent: Percent,
    /// Nominal annual mortgage rate, 0-100
    pub interest_rate_annual_percent: Percent,
    /// Mortgage term in whole years
    pub loan_term_years: u32,
    /// Gross scheduled rent per month
    pub monthly_rent: Money,
    /// Vacancy allowance as a share of rent, 0-100
    pub vacancy_percent: Percent,
    /// Maintenance allowance as a share of rent, 0-100
    pub maintenance_percent: Percent,
    /// Property management fee as a share of rent, 0-100
    pub management_percent: Percent,
    pub taxes_monthly: Money,
    pub insurance_monthly: Money,
    /// HOA dues, utilities and anything else fixed per month
    pub other_fixed_monthly: Money,
    pub closing_costs: Money,
    pub rehab_budget: Money,
}

/// Monthly expense split. `fixed` includes the mortgage payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub fixed: Money,
    pub variable: Money,
    pub total: Money,
}

/// Investment metrics derived from a [`CalculatorInputs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorOutputs {
    pub loan_amount: Money,
    pub monthly_mortgage: Money,
    /// Net operating income before debt service
    pub noi_monthly: Money,
    pub noi_annual: Money,
    /// Cash left after every expense including the mortgage
    pub cash_flow_monthly: Money,
    pub cash_on_cash_return_percent: Percent,
    pub cap_rate_percent: Percent,
    pub annualized_five_year_return_percent: Percent,
    pub expense_breakdown_monthly: ExpenseBreakdown,
    pub amortization: Vec<AmortizationRow>,
}

impl CalculatorInputs {
    /// Parse inputs from a JSON document.
    pub fn from_json(json: &str) -> RentalCalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace every non-finite field with zero.
    ///
    /// The engine itself never does this; it is the coercion a form layer
    /// applies before calling [`calculate_all`].
    pub fn sanitized(self) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            purchase_price: finite(self.purchase_price),
            down_payment_percent: finite(self.down_payment_percent),
            interest_rate_annual_percent: finite(self.interest_rate_annual_percent),
            loan_term_years: self.loan_term_years,
            monthly_rent: finite(self.monthly_rent),
            vacancy_percent: finite(self.vacancy_percent),
            maintenance_percent: finite(self.maintenance_percent),
            management_percent: finite(self.management_percent),
            taxes_monthly: finite(self.taxes_monthly),
            insurance_monthly: finite(self.insurance_monthly),
            other_fixed_monthly: finite(self.other_fixed_monthly),
            closing_costs: finite(self.closing_costs),
            rehab_budget: finite(self.rehab_budget),
        }
    }

    pub fn down_payment(&self) -> Money {
        self.purchase_price * self.down_payment_percent / 100.0
    }

    pub fn loan_amount(&self) -> Money {
        floor_at_zero(self.purchase_price - self.down_payment())
    }

    /// Down payment plus closing costs plus rehab budget.
    pub fn total_cash_invested(&self) -> Money {
        self.down_payment() + self.closing_costs + self.rehab_budget
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute every metric for a scenario, recomputing the schedule from scratch.
///
/// Never fails: divisions by a non-positive price or cash investment yield 0,
/// and non-finite inputs propagate into the outputs.
pub fn calculate_all(inputs: &CalculatorInputs) -> CalculatorOutputs {
    let loan_amount = inputs.loan_amount();
    let monthly_mortgage = monthly_mortgage_payment(
        loan_amount,
        inputs.interest_rate_annual_percent,
        inputs.loan_term_years,
    );
    let amortization = build_amortization(
        loan_amount,
        inputs.interest_rate_annual_percent,
        inputs.loan_term_years,
    );

    aggregate_metrics(inputs, loan_amount, monthly_mortgage, amortization)
}

/// Run [`calculate_all`] inside the standard result envelope, with validation
/// and warnings for unusual scenarios.
pub fn analyze_property(
    inputs: &CalculatorInputs,
) -> RentalCalcResult<ComputationOutput<CalculatorOutputs>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(inputs, &mut warnings)?;

    let output = calculate_all(inputs);
    log::debug!(
        "analyzed property: loan={} payment={} schedule_months={}",
        output.loan_amount,
        output.monthly_mortgage,
        output.amortization.len()
    );

    collect_result_warnings(inputs, &output, &mut warnings);
    for w in &warnings {
        log::warn!("{w}");
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Property Investment Analysis",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn aggregate_metrics(
    inputs: &CalculatorInputs,
    loan_amount: Money,
    monthly_mortgage: Money,
    amortization: Vec<AmortizationRow>,
) -> CalculatorOutputs {
    let rent = inputs.monthly_rent;

    let vacancy = rent * inputs.vacancy_percent / 100.0;
    let maintenance = rent * inputs.maintenance_percent / 100.0;
    let management = rent * inputs.management_percent / 100.0;

    let fixed = inputs.taxes_monthly
        + inputs.insurance_monthly
        + inputs.other_fixed_monthly
        + monthly_mortgage;
    let variable = vacancy + maintenance + management;
    let total = fixed + variable;

    // NOI is unlevered: operating costs only, no debt service
    let noi_monthly = rent
        - (inputs.taxes_monthly
            + inputs.insurance_monthly
            + inputs.other_fixed_monthly
            + vacancy
            + maintenance
            + management);
    let noi_annual = noi_monthly * 12.0;

    let cash_flow_monthly = rent - total;

    let total_cash_invested = inputs.total_cash_invested();

    let cash_on_cash_return_percent = if total_cash_invested > 0.0 {
        (cash_flow_monthly * 12.0 / total_cash_invested) * 100.0
    } else {
        0.0
    };

    let cap_rate_percent = if inputs.purchase_price > 0.0 {
        (noi_annual / inputs.purchase_price) * 100.0
    } else {
        0.0
    };

    let principal_paid_5_years: Money = amortization
        .iter()
        .take(FIVE_YEAR_MONTHS)
        .map(|row| row.principal)
        .sum();
    let five_year_profit = cash_flow_monthly * 12.0 * HOLDING_YEARS + principal_paid_5_years;

    let annualized_five_year_return_percent = if total_cash_invested > 0.0 {
        ((1.0 + five_year_profit / total_cash_invested).powf(1.0 / HOLDING_YEARS) - 1.0) * 100.0
    } else {
        0.0
    };

    CalculatorOutputs {
        loan_amount,
        monthly_mortgage,
        noi_monthly,
        noi_annual,
        cash_flow_monthly,
        cash_on_cash_return_percent,
        cap_rate_percent,
        annualized_five_year_return_percent,
        expense_breakdown_monthly: ExpenseBreakdown {
            fixed,
            variable,
            total,
        },
        amortization,
    }
}

// ---------------------------------------------------------------------------
// Validation & warnings
// ---------------------------------------------------------------------------

fn validate_input(inputs: &CalculatorInputs, warnings: &mut Vec<String>) -> RentalCalcResult<()> {
    if inputs.loan_term_years == 0 {
        return Err(RentalCalcError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }

    let percentages = [
        ("down_payment_percent", inputs.down_payment_percent),
        ("interest_rate_annual_percent", inputs.interest_rate_annual_percent),
        ("vacancy_percent", inputs.vacancy_percent),
        ("maintenance_percent", inputs.maintenance_percent),
        ("management_percent", inputs.management_percent),
    ];
    for (field, value) in percentages {
        if !(0.0..=100.0).contains(&value) {
            warnings.push(format!("{field} of {value} is outside the 0-100 range"));
        }
    }

    let amounts = [
        ("purchase_price", inputs.purchase_price),
        ("monthly_rent", inputs.monthly_rent),
        ("taxes_monthly", inputs.taxes_monthly),
        ("insurance_monthly", inputs.insurance_monthly),
        ("other_fixed_monthly", inputs.other_fixed_monthly),
        ("closing_costs", inputs.closing_costs),
        ("rehab_budget", inputs.rehab_budget),
    ];
    for (field, value) in amounts {
        if value < 0.0 {
            warnings.push(format!("{field} is negative ({value})"));
        }
    }

    if inputs.vacancy_percent > 15.0 {
        warnings.push(format!(
            "Vacancy of {:.1}% exceeds 15%, above typical market norms",
            inputs.vacancy_percent
        ));
    }

    Ok(())
}

fn collect_result_warnings(
    inputs: &CalculatorInputs,
    output: &CalculatorOutputs,
    warnings: &mut Vec<String>,
) {
    if !output.annualized_five_year_return_percent.is_finite() {
        warnings.push(
            "Five-year losses exceed the cash invested; annualized return is undefined".into(),
        );
    }

    if output.cash_flow_monthly < 0.0 {
        warnings.push(format!(
            "Negative monthly cash flow of {:.2}",
            output.cash_flow_monthly
        ));
    }

    if inputs.purchase_price > 0.0 {
        let cap = output.cap_rate_percent;
        if cap < 3.0 {
            warnings.push(format!(
                "Cap rate {cap:.2}% is below 3%, unusually low for the price"
            ));
        }
        if cap > 12.0 {
            warnings.push(format!(
                "Cap rate {cap:.2}% exceeds 12%, may indicate elevated risk"
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-family rental: $300k, 20% down, 6.5% over 30 years
    fn sample_input() -> CalculatorInputs {
        CalculatorInputs {
            purchase_price: 300_000.0,
            down_payment_percent: 20.0,
            interest_rate_annual_percent: 6.5,
            loan_term_years: 30,
            monthly_rent: 2400.0,
            vacancy_percent: 5.0,
            maintenance_percent: 5.0,
            management_percent: 8.0,
            taxes_monthly: 300.0,
            insurance_monthly: 120.0,
            other_fixed_monthly: 0.0,
            closing_costs: 6000.0,
            rehab_budget: 0.0,
        }
    }

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual} (tolerance {tol})"
        );
    }

    #[test]
    fn test_loan_amount_from_down_payment() {
        let out = calculate_all(&sample_input());
        assert_eq!(out.loan_amount, 240_000.0);
        assert_close(out.monthly_mortgage, 1516.96, 0.01);
    }

    #[test]
    fn test_noi_excludes_mortgage() {
        let out = calculate_all(&sample_input());
        // 2400 - (300 + 120 + 0 + 120 + 120 + 192) = 1548
        assert_close(out.noi_monthly, 1548.0, 1e-9);
        assert_close(out.noi_annual, 18_576.0, 1e-9);
    }

    #[test]
    fn test_expense_breakdown_includes_mortgage_in_fixed() {
        let out = calculate_all(&sample_input());
        let e = out.expense_breakdown_monthly;
        assert_close(e.fixed, 420.0 + out.monthly_mortgage, 1e-9);
        assert_close(e.variable, 432.0, 1e-9);
        assert_close(e.total, e.fixed + e.variable, 1e-9);
    }

    #[test]
    fn test_cash_flow_after_debt_service() {
        let out = calculate_all(&sample_input());
        // 2400 - (420 + 1516.96 + 432) = 31.04
        assert_close(out.cash_flow_monthly, 31.04, 0.01);
        assert_close(
            out.cash_flow_monthly,
            out.noi_monthly - out.monthly_mortgage,
            1e-9,
        );
    }

    #[test]
    fn test_cap_rate() {
        let out = calculate_all(&sample_input());
        // 18576 / 300000 = 6.192%
        assert_close(out.cap_rate_percent, 6.192, 1e-9);
    }

    #[test]
    fn test_cash_on_cash_return() {
        let out = calculate_all(&sample_input());
        // invested = 60000 + 6000
        let expected = out.cash_flow_monthly * 12.0 / 66_000.0 * 100.0;
        assert_close(out.cash_on_cash_return_percent, expected, 1e-12);
    }

    #[test]
    fn test_annualized_five_year_return() {
        let input = sample_input();
        let out = calculate_all(&input);
        let principal_5y: f64 = out.amortization[..60].iter().map(|r| r.principal).sum();
        let profit = out.cash_flow_monthly * 60.0 + principal_5y;
        let expected = ((1.0 + profit / 66_000.0).powf(0.2) - 1.0) * 100.0;
        assert_close(out.annualized_five_year_return_percent, expected, 1e-9);
        assert!(
            out.annualized_five_year_return_percent > 4.5
                && out.annualized_five_year_return_percent < 5.0,
            "got {}",
            out.annualized_five_year_return_percent
        );
    }

    #[test]
    fn test_short_term_uses_whole_schedule() {
        let mut input = sample_input();
        input.loan_term_years = 3;
        // Enough rent that five years of losses stay below the cash invested
        input.monthly_rent = 9000.0;
        let out = calculate_all(&input);
        assert_eq!(out.amortization.len(), 36);
        let principal: f64 = out.amortization.iter().map(|r| r.principal).sum();
        let profit = out.cash_flow_monthly * 60.0 + principal;
        let expected = ((1.0 + profit / 66_000.0).powf(0.2) - 1.0) * 100.0;
        assert!(expected.is_finite());
        assert_close(out.annualized_five_year_return_percent, expected, 1e-9);
    }

    #[test]
    fn test_loss_beyond_cash_invested_gives_nan_return() {
        let mut input = sample_input();
        // ~7356/month payment against 2400 rent: five-year loss exceeds 66k
        input.loan_term_years = 3;
        let out = calculate_all(&input);
        assert!(out.cash_flow_monthly < 0.0);
        assert!(out.annualized_five_year_return_percent.is_nan());
        assert!(out.cash_on_cash_return_percent.is_finite());
    }

    #[test]
    fn test_zero_purchase_price_guards_cap_rate() {
        let mut input = sample_input();
        input.purchase_price = 0.0;
        let out = calculate_all(&input);
        assert_eq!(out.cap_rate_percent, 0.0);
        assert_eq!(out.loan_amount, 0.0);
    }

    #[test]
    fn test_zero_cash_invested_guards_returns() {
        let mut input = sample_input();
        input.down_payment_percent = 0.0;
        input.closing_costs = 0.0;
        let out = calculate_all(&input);
        assert_eq!(out.cash_on_cash_return_percent, 0.0);
        assert_eq!(out.annualized_five_year_return_percent, 0.0);
    }

    #[test]
    fn test_full_down_payment_has_no_loan() {
        let mut input = sample_input();
        input.down_payment_percent = 100.0;
        let out = calculate_all(&input);
        assert_eq!(out.loan_amount, 0.0);
        assert_eq!(out.monthly_mortgage, 0.0);
        assert_close(out.cash_flow_monthly, out.noi_monthly, 1e-9);
    }

    #[test]
    fn test_over_100_percent_down_floors_loan() {
        let mut input = sample_input();
        input.down_payment_percent = 120.0;
        let out = calculate_all(&input);
        assert_eq!(out.loan_amount, 0.0);
    }

    #[test]
    fn test_zero_term_yields_empty_schedule() {
        let mut input = sample_input();
        input.loan_term_years = 0;
        let out = calculate_all(&input);
        assert!(out.amortization.is_empty());
        assert_eq!(out.monthly_mortgage, 0.0);
    }

    #[test]
    fn test_nan_input_propagates() {
        let mut input = sample_input();
        input.monthly_rent = f64::NAN;
        let out = calculate_all(&input);
        assert!(out.noi_monthly.is_nan());
        assert!(out.cash_flow_monthly.is_nan());
    }

    #[test]
    fn test_sanitized_zeroes_non_finite() {
        let mut input = sample_input();
        input.monthly_rent = f64::NAN;
        input.taxes_monthly = f64::INFINITY;
        input.closing_costs = f64::NEG_INFINITY;
        let clean = input.sanitized();
        assert_eq!(clean.monthly_rent, 0.0);
        assert_eq!(clean.taxes_monthly, 0.0);
        assert_eq!(clean.closing_costs, 0.0);
        assert_eq!(clean.purchase_price, 300_000.0);
        assert_eq!(clean.loan_term_years, 30);
    }

    #[test]
    fn test_from_json() {
        let input = CalculatorInputs::from_json(
            r#"{"purchase_price": 100000, "down_payment_percent": 25,
                "interest_rate_annual_percent": 5, "loan_term_years": 15,
                "monthly_rent": 1000, "vacancy_percent": 0, "maintenance_percent": 0,
                "management_percent": 0, "taxes_monthly": 0, "insurance_monthly": 0,
                "other_fixed_monthly": 0, "closing_costs": 0, "rehab_budget": 0}"#,
        )
        .unwrap();
        assert_eq!(input.loan_amount(), 75_000.0);
        assert_eq!(input.loan_term_years, 15);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = CalculatorInputs::from_json("{not json").unwrap_err();
        assert!(matches!(err, RentalCalcError::Serialization(_)));
    }

    #[test]
    fn test_analyze_methodology_string() {
        let result = analyze_property(&sample_input()).unwrap();
        assert_eq!(result.methodology, "Rental Property Investment Analysis");
        assert_eq!(result.metadata.precision, "ieee754_f64");
        assert_eq!(result.assumptions["purchase_price"], 300_000.0);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_analyze_rejects_zero_term() {
        let mut input = sample_input();
        input.loan_term_years = 0;
        let err = analyze_property(&input).unwrap_err();
        match err {
            RentalCalcError::InvalidInput { field, .. } => assert_eq!(field, "loan_term_years"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_negative_cash_flow_warning() {
        let mut input = sample_input();
        input.monthly_rent = 1500.0;
        let result = analyze_property(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("Negative monthly cash flow")));
    }

    #[test]
    fn test_high_vacancy_warning() {
        let mut input = sample_input();
        input.vacancy_percent = 20.0;
        let result = analyze_property(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("exceeds 15%")));
    }

    #[test]
    fn test_percent_out_of_range_warning() {
        let mut input = sample_input();
        input.management_percent = 140.0;
        let result = analyze_property(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("management_percent")));
    }

    #[test]
    fn test_low_cap_rate_warning() {
        let mut input = sample_input();
        input.monthly_rent = 1200.0;
        let result = analyze_property(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("below 3%")));
    }

    #[test]
    fn test_high_cap_rate_warning() {
        let mut input = sample_input();
        input.monthly_rent = 5000.0;
        let result = analyze_property(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("exceeds 12%")));
    }

    #[test]
    fn test_undefined_annualized_return_warning() {
        let mut input = sample_input();
        input.down_payment_percent = 10.0;
        input.monthly_rent = 0.0;
        let result = analyze_property(&input).unwrap();
        assert!(result.result.annualized_five_year_return_percent.is_nan());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("annualized return is undefined")));
    }

    #[test]
    fn test_no_cap_rate_warning_without_price() {
        let mut input = sample_input();
        input.purchase_price = 0.0;
        let result = analyze_property(&input).unwrap();
        assert!(!result.warnings.iter().any(|w| w.contains("Cap rate")));
    }
}
