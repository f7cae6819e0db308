use napi::Result as NapiResult;
use napi_derive::napi;

use rental_calc_core::rental::{self, AmortizationSchedule, CalculatorInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse form inputs and coerce non-finite fields to zero.
fn parse_inputs(input_json: &str) -> NapiResult<CalculatorInputs> {
    let inputs = CalculatorInputs::from_json(input_json).map_err(to_napi_error)?;
    Ok(inputs.sanitized())
}

// ---------------------------------------------------------------------------
// Property analysis
// ---------------------------------------------------------------------------

/// Bare metrics, recomputed from scratch on every call.
#[napi]
pub fn calculate_all(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let output = rental::calculate_all(&inputs);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Metrics inside the envelope with warnings and metadata.
#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let inputs = parse_inputs(&input_json)?;
    let output = rental::analyze_property(&inputs).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_mortgage_payment(
    loan_amount: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> f64 {
    rental::monthly_mortgage_payment(loan_amount, annual_rate_percent, term_years)
}

#[napi]
pub fn mortgage_summary(
    loan_amount: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> NapiResult<String> {
    let summary = rental::mortgage_summary(loan_amount, annual_rate_percent, term_years);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(
    loan_amount: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> NapiResult<String> {
    let rows: Vec<_> =
        AmortizationSchedule::new(loan_amount, annual_rate_percent, term_years).collect();
    serde_json::to_string(&rows).map_err(to_napi_error)
}
