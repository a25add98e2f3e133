mod engine;
mod types;

pub use engine::{compute, compute_with_window, months_between};
pub use types::{
    CalculatorError, Category, MAX_YEAR, MIN_YEAR, MONTHS_PER_YEAR, PolicyWindow,
    RetirementResult, YearMonth,
};
