//! Normalization Scorers: rescale a lower-is-better attribute across the cohort to 0–10.

use thiserror::Error;

use crate::screening::similarity::round2;

/// Guards the division when every value in the cohort is equal.
pub const NORMALIZATION_EPSILON: f64 = 1e-5;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Cannot normalize an empty cohort")]
    EmptyInput,
}

/// `(max - v) / (max - min + ε) * 10`, rounded to 2 decimals, same order as the input.
///
/// The epsilon is always added, so an all-equal cohort (including a cohort of one)
/// scores 0.0 everywhere rather than 10.0.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    if values.is_empty() {
        return Err(NormalizeError::EmptyInput);
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let span = max - min + NORMALIZATION_EPSILON;

    Ok(values
        .iter()
        .map(|v| round2((max - v) / span * 10.0))
        .collect())
}

/// Salary expectations: the cheapest candidate scores highest.
pub fn score_salaries(salaries: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    normalize(salaries)
}

/// Notice periods in days: the soonest available candidate scores highest.
pub fn score_notice_periods(days: &[f64]) -> Result<Vec<f64>, NormalizeError> {
    normalize(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(normalize(&[]), Err(NormalizeError::EmptyInput));
    }

    #[test]
    fn test_single_value_uses_epsilon_formula() {
        // (100 - 100) / (0 + 1e-5) * 10 = 0.0
        assert_eq!(normalize(&[100.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_all_equal_values_score_zero() {
        assert_eq!(normalize(&[30.0, 30.0, 30.0]).unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_lower_is_better_and_order_preserved() {
        let scores = normalize(&[12000.0, 8000.0, 10000.0]).unwrap();
        assert_eq!(scores, vec![0.0, 10.0, 5.0]);
    }

    #[test]
    fn test_epsilon_shaves_the_top_score_for_tiny_spans() {
        // span 0.0001: 0.0001 / 0.00011 * 10 = 9.0909...
        let scores = normalize(&[1.0, 1.0001]).unwrap();
        assert_eq!(scores, vec![9.09, 0.0]);
    }

    #[test]
    fn test_results_within_band() {
        let scores = score_notice_periods(&[0.0, 15.0, 30.0, 60.0, 90.0]).unwrap();
        assert!(scores.iter().all(|s| (0.0..=10.0).contains(s)));
        assert_eq!(scores.first(), Some(&10.0));
        assert_eq!(scores.last(), Some(&0.0));
    }

    #[test]
    fn test_salary_scorer_is_normalize() {
        let salaries = [5000.0, 7000.0];
        assert_eq!(score_salaries(&salaries), normalize(&salaries));
    }
}
