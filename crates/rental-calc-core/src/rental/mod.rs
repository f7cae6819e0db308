pub mod amortization;
pub mod metrics;
pub mod mortgage;

pub use amortization::{build_amortization, AmortizationRow, AmortizationSchedule};
pub use metrics::{
    analyze_property, calculate_all, CalculatorInputs, CalculatorOutputs, ExpenseBreakdown,
};
pub use mortgage::{monthly_mortgage_payment, mortgage_summary, MortgageSummary};
