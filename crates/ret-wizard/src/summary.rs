//! Derived result figures shown on the terminal step.

use ret_api_types::{IncomeResponse, PlanResponse};

/// Country-average monthly pension used for the comparison line, in PLN.
pub const AVERAGE_PENSION_PLN: f64 = 2500.0;

/// Figures rendered after a forward calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardSummary {
    pub actual: f64,
    pub realistic: f64,
    /// Whole percent: round(realistic / gross salary × 100).
    pub replacement_rate: f64,
    pub above_average: bool,
}

impl ForwardSummary {
    pub fn build(response: &IncomeResponse, gross_salary: f64) -> ForwardSummary {
        let salary = if gross_salary > 0.0 { gross_salary } else { 1.0 };
        ForwardSummary {
            actual: response.actual_retirement_income,
            realistic: response.realistic_retirement_income,
            replacement_rate: (response.realistic_retirement_income / salary * 100.0).round(),
            above_average: response.realistic_retirement_income > AVERAGE_PENSION_PLN,
        }
    }

    pub fn comparison_label(&self) -> &'static str {
        if self.above_average {
            "Powyżej średniej krajowej"
        } else {
            "Poniżej średniej krajowej"
        }
    }
}

/// Figures rendered after a reverse (plan) calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseSummary {
    pub expected_total_funds: f64,
    pub funds_left_to_collect: f64,
    pub monthly_needed: f64,
}

impl ReverseSummary {
    pub fn build(response: &PlanResponse, age: u32, retirement_age: u32) -> ReverseSummary {
        // At least one year of saving, even for inputs at or past retirement.
        let years_left = retirement_age.saturating_sub(age).max(1);
        ReverseSummary {
            expected_total_funds: response.expected_total_funds,
            funds_left_to_collect: response.funds_left_to_collect,
            monthly_needed: response.funds_left_to_collect / (years_left as f64 * 12.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_rate_rounds_to_whole_percent() {
        let response = IncomeResponse {
            actual_retirement_income: 2800.0,
            realistic_retirement_income: 2400.0,
        };
        let summary = ForwardSummary::build(&response, 5000.0);
        assert_eq!(summary.replacement_rate, 48.0);
        assert!(!summary.above_average);
        assert_eq!(summary.comparison_label(), "Poniżej średniej krajowej");
    }

    #[test]
    fn zero_salary_does_not_divide_by_zero() {
        let response = IncomeResponse {
            actual_retirement_income: 2800.0,
            realistic_retirement_income: 2600.0,
        };
        let summary = ForwardSummary::build(&response, 0.0);
        assert!(summary.replacement_rate.is_finite());
        assert!(summary.above_average);
    }

    #[test]
    fn monthly_needed_spreads_over_remaining_years() {
        let response = PlanResponse {
            expected_total_funds: 600_000.0,
            funds_left_to_collect: 444_000.0,
        };
        let summary = ReverseSummary::build(&response, 30, 67);
        assert_eq!(summary.monthly_needed, 444_000.0 / (37.0 * 12.0));

        // Already at retirement age: clamp to a single year.
        let summary = ReverseSummary::build(&response, 70, 67);
        assert_eq!(summary.monthly_needed, 444_000.0 / 12.0);
    }
}
