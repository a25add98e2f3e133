use super::types::{Category, MONTHS_PER_YEAR, PolicyWindow, RetirementResult, YearMonth};

// Callers shift by at most a category's target age plus its full delay, so a
// date built through `YearMonth::new` cannot leave the `i32` year range.
impl YearMonth {
    pub(crate) fn add_years(self, years: u32) -> Self {
        self.add_months(years * MONTHS_PER_YEAR)
    }

    pub(crate) fn add_months(self, months: u32) -> Self {
        Self::from_ordinal(self.ordinal() + i64::from(months))
    }
}

/// Whole calendar months from `from` to `to` (year × 12 + month difference).
/// Negative when `to` precedes `from`.
pub fn months_between(from: YearMonth, to: YearMonth) -> i64 {
    (i64::from(to.year()) - i64::from(from.year())) * i64::from(MONTHS_PER_YEAR)
        + (i64::from(to.month()) - i64::from(from.month()))
}

pub fn compute(birth: YearMonth, category: Category) -> RetirementResult {
    compute_with_window(birth, category, PolicyWindow::STANDARD)
}

pub fn compute_with_window(
    birth: YearMonth,
    category: Category,
    window: PolicyWindow,
) -> RetirementResult {
    let original_age = category.original_age();
    let original_date = birth.add_years(original_age);
    let delay_months = delay_months(original_date, category, window);
    let actual_date = original_date.add_months(delay_months);

    log::debug!(
        "birth={birth} category={category} original={original_date} delay={delay_months} actual={actual_date}"
    );

    RetirementResult {
        category,
        original_retirement_age: original_age,
        target_retirement_age: category.target_age(),
        original_retirement_date: original_date,
        delay_months,
        actual_retirement_date: actual_date,
        actual_retirement_age: f64::from(original_age)
            + f64::from(delay_months) / f64::from(MONTHS_PER_YEAR),
    }
}

fn delay_months(original_date: YearMonth, category: Category, window: PolicyWindow) -> u32 {
    if original_date < window.start {
        return 0;
    }

    let full_delay = category.full_delay_months();
    if original_date >= window.end {
        return full_delay;
    }

    let total_months = months_between(window.start, window.end);
    let elapsed = months_between(window.start, original_date);
    // 0 <= elapsed < total_months here; integer division of non-negative
    // operands is the exact floor of elapsed / total_months * full_delay.
    (elapsed * i64::from(full_delay) / total_months) as u32
}
