use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Accepted birth-year range. Retirement dates derived from it stay far
/// inside `i32`.
pub const MIN_YEAR: i32 = -1_000_000;
pub const MAX_YEAR: i32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculatorError {
    #[error("invalid category: {0:?} (expected male, workerMale or female)")]
    InvalidCategory(String),
    #[error("invalid month: {0} (must be 1-12)")]
    InvalidMonth(u32),
    #[error("invalid year: {0} (must be {MIN_YEAR}..={MAX_YEAR})")]
    InvalidYear(i32),
}

/// Worker classification fixing the statutory retirement ages before and
/// after the reform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Male,
    WorkerMale,
    Female,
}

impl Category {
    /// Selection order used by the web form.
    pub const ALL: [Category; 3] = [Category::Female, Category::WorkerMale, Category::Male];

    pub const fn original_age(self) -> u32 {
        match self {
            Category::Male => 55,
            Category::WorkerMale => 50,
            Category::Female => 60,
        }
    }

    pub const fn target_age(self) -> u32 {
        match self {
            Category::Male => 58,
            Category::WorkerMale => 55,
            Category::Female => 63,
        }
    }

    /// Delay applied to cohorts retiring at or after the end of the window.
    pub const fn full_delay_months(self) -> u32 {
        (self.target_age() - self.original_age()) * MONTHS_PER_YEAR
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Male => "male",
            Category::WorkerMale => "workerMale",
            Category::Female => "female",
        }
    }

    /// Label shown next to the category in the selection form. These do not
    /// line up with the variant names or their ages; kept as published
    /// pending product clarification.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Female => "男职工",
            Category::WorkerMale => "原定50周岁退休女职工",
            Category::Male => "原定55周岁退休女职工",
        }
    }
}

impl FromStr for Category {
    type Err = CalculatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" => Ok(Category::Male),
            "workerMale" | "worker-male" | "worker_male" => Ok(Category::WorkerMale),
            "female" => Ok(Category::Female),
            other => Err(CalculatorError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar month. Day-of-month plays no part in the policy, so it is not
/// represented; every value stands for the first day of its month.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CalculatorError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CalculatorError::InvalidYear(year));
        }
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(CalculatorError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    /// Zero-based month count since year 0, used for calendar arithmetic.
    pub(crate) const fn ordinal(self) -> i64 {
        self.year as i64 * MONTHS_PER_YEAR as i64 + (self.month as i64 - 1)
    }

    pub(crate) const fn from_ordinal(ordinal: i64) -> Self {
        let months = MONTHS_PER_YEAR as i64;
        Self {
            year: ordinal.div_euclid(months) as i32,
            month: ordinal.rem_euclid(months) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The interval over which the target ages are phased in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PolicyWindow {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl PolicyWindow {
    pub const STANDARD: PolicyWindow = PolicyWindow {
        start: YearMonth {
            year: 2025,
            month: 1,
        },
        end: YearMonth {
            year: 2040,
            month: 1,
        },
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub category: Category,
    pub original_retirement_age: u32,
    pub target_retirement_age: u32,
    pub original_retirement_date: YearMonth,
    pub delay_months: u32,
    pub actual_retirement_date: YearMonth,
    pub actual_retirement_age: f64,
}
