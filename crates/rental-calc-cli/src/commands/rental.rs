use clap::Args;
use serde_json::Value;

use rental_calc_core::rental::{analyze_property, CalculatorInputs};

use crate::input;

/// Arguments for a full property analysis.
///
/// Each field flag overrides the value loaded from `--input` or stdin.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub purchase_price: Option<f64>,
    /// Down payment, percent of price (0-100)
    #[arg(long)]
    pub down_payment_percent: Option<f64>,
    /// Annual interest rate, percent (0-100)
    #[arg(long)]
    pub interest_rate_annual_percent: Option<f64>,
    #[arg(long)]
    pub loan_term_years: Option<u32>,
    #[arg(long)]
    pub monthly_rent: Option<f64>,
    #[arg(long)]
    pub vacancy_percent: Option<f64>,
    #[arg(long)]
    pub maintenance_percent: Option<f64>,
    #[arg(long)]
    pub management_percent: Option<f64>,
    #[arg(long)]
    pub taxes_monthly: Option<f64>,
    #[arg(long)]
    pub insurance_monthly: Option<f64>,
    #[arg(long)]
    pub other_fixed_monthly: Option<f64>,
    #[arg(long)]
    pub closing_costs: Option<f64>,
    #[arg(long)]
    pub rehab_budget: Option<f64>,

    /// Leave the month-by-month schedule out of the output
    #[arg(long)]
    pub no_schedule: bool,
}

impl AnalyzeArgs {
    fn apply_overrides(&self, inputs: &mut CalculatorInputs) {
        let fields = [
            (self.purchase_price, &mut inputs.purchase_price),
            (self.down_payment_percent, &mut inputs.down_payment_percent),
            (
                self.interest_rate_annual_percent,
                &mut inputs.interest_rate_annual_percent,
            ),
            (self.monthly_rent, &mut inputs.monthly_rent),
            (self.vacancy_percent, &mut inputs.vacancy_percent),
            (self.maintenance_percent, &mut inputs.maintenance_percent),
            (self.management_percent, &mut inputs.management_percent),
            (self.taxes_monthly, &mut inputs.taxes_monthly),
            (self.insurance_monthly, &mut inputs.insurance_monthly),
            (self.other_fixed_monthly, &mut inputs.other_fixed_monthly),
            (self.closing_costs, &mut inputs.closing_costs),
            (self.rehab_budget, &mut inputs.rehab_budget),
        ];
        for (flag, field) in fields {
            if let Some(v) = flag {
                *field = v;
            }
        }
        if let Some(years) = self.loan_term_years {
            inputs.loan_term_years = years;
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: CalculatorInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        CalculatorInputs::default()
    };
    args.apply_overrides(&mut inputs);

    let result = analyze_property(&inputs.sanitized())?;
    let mut value = serde_json::to_value(result)?;

    if args.no_schedule {
        if let Some(Value::Object(res)) = value.get_mut("result") {
            res.remove("amortization");
        }
    }
    Ok(value)
}
