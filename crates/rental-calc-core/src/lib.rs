pub mod error;
pub mod rental;
pub mod types;

pub use error::RentalCalcError;
pub use rental::{analyze_property, calculate_all, CalculatorInputs, CalculatorOutputs};
pub use types::*;

/// Standard result type for all rental-calc operations
pub type RentalCalcResult<T> = Result<T, RentalCalcError>;
