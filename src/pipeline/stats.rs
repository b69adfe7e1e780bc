//! Numeric building blocks: moments, median, rounding and Welch's t-test

use serde::{Serialize, Serializer};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from the mean (two-pass for numerical stability)
fn sum_squared_deviations(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|x| (x - mean).powi(2)).sum()
}

/// Population variance (divides by N), `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(sum_squared_deviations(values, m) / values.len() as f64)
}

/// Sample variance (divides by N - 1), `None` with fewer than 2 values
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    Some(sum_squared_deviations(values, m) / (values.len() - 1) as f64)
}

/// Sample standard deviation (N - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Median of the values; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // Values too large to scale keep their original representation
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Serialize a float that may be infinite.
///
/// JSON has no infinity, so `±inf` is written as the strings `"inf"` and
/// `"-inf"` (and NaN as `"nan"`) instead of collapsing to `null`.
pub fn serialize_non_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

/// Result of a two-sample Welch t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchTest {
    /// (mean_b - mean_a) / standard error; ±inf when both samples are constant and differ
    #[serde(serialize_with = "serialize_non_finite")]
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom, `None` when both samples are constant
    pub degrees_of_freedom: Option<f64>,
    /// Two-sided p-value in [0, 1]
    pub p_value: f64,
}

/// Welch's unequal-variance t-test of `b` against `a`.
///
/// The statistic is oriented as `b - a`, so a positive value means `b` has the
/// larger mean. Returns `None` when either sample has fewer than 2 values.
///
/// When both samples have zero variance the statistic is undefined and the
/// result uses sentinels instead: identical means give `t = 0, p = 1`,
/// different means give `t = ±inf, p = 0`.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<WelchTest> {
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;

    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let var_a = sample_variance(a)?;
    let var_b = sample_variance(b)?;

    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se_sq = se_a + se_b;
    let diff = mean_b - mean_a;

    if se_sq <= 0.0 {
        let (statistic, p_value) = if diff == 0.0 {
            (0.0, 1.0)
        } else {
            (diff.signum() * f64::INFINITY, 0.0)
        };
        return Some(WelchTest {
            statistic,
            degrees_of_freedom: None,
            p_value,
        });
    }

    let statistic = diff / se_sq.sqrt();
    let dof = se_sq.powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));

    Some(WelchTest {
        statistic,
        degrees_of_freedom: Some(dof),
        p_value: two_sided_p_value(statistic, dof),
    })
}

/// Two-sided p-value `2 * P(T > |t|)` for Student's t with `dof` degrees of freedom
pub fn two_sided_p_value(t: f64, dof: f64) -> f64 {
    if t.is_nan() {
        return 1.0;
    }
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        // Invalid degrees of freedom only arise from non-finite inputs
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean_and_variances() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data).unwrap() - 5.0).abs() < EPS);
        assert!((population_variance(&data).unwrap() - 4.0).abs() < EPS);
        assert!((sample_variance(&data).unwrap() - 32.0 / 7.0).abs() < EPS);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mean(&[]).is_none());
        assert!(population_variance(&[]).is_none());
        assert!(sample_variance(&[1.0]).is_none());
        assert!(median(&[]).is_none());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(-1.23455, 2), -1.23);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert!(round_to(f64::INFINITY, 4).is_infinite());
    }

    #[test]
    fn test_welch_known_values() {
        // Reference: scipy.stats.ttest_ind(a, b, equal_var=False)
        let a = [19.8, 20.4, 19.6, 17.8, 18.5, 18.9, 18.3, 18.9, 19.5, 22.0];
        let b = [28.2, 26.6, 20.1, 23.3, 25.2, 22.1, 17.7, 27.6, 20.6, 13.7];
        let result = welch_t_test(&a, &b).unwrap();

        assert!((result.statistic - 2.074).abs() < 0.01, "t = {}", result.statistic);
        let dof = result.degrees_of_freedom.unwrap();
        assert!((dof - 10.21).abs() < 0.05, "dof = {}", dof);
        assert!(result.p_value > 0.05 && result.p_value < 0.08, "p = {}", result.p_value);
    }

    #[test]
    fn test_welch_identical_samples() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = welch_t_test(&a, &a).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_welch_sign_follows_second_sample() {
        let low = [1.0, 2.0, 3.0, 2.0];
        let high = [10.0, 11.0, 12.0, 11.0];
        assert!(welch_t_test(&low, &high).unwrap().statistic > 0.0);
        assert!(welch_t_test(&high, &low).unwrap().statistic < 0.0);
    }

    #[test]
    fn test_welch_constant_different_samples() {
        let result = welch_t_test(&[1.0; 5], &[5.0; 5]).unwrap();
        assert_eq!(result.statistic, f64::INFINITY);
        assert_eq!(result.p_value, 0.0);
        assert!(result.degrees_of_freedom.is_none());
    }

    #[test]
    fn test_welch_constant_equal_samples() {
        let result = welch_t_test(&[3.0; 4], &[3.0; 6]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_welch_one_constant_sample() {
        let result = welch_t_test(&[2.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(result.statistic.is_finite());
        // All variance comes from the second sample: dof = n_b - 1
        assert!((result.degrees_of_freedom.unwrap() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_welch_requires_two_values() {
        assert!(welch_t_test(&[1.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_two_sided_p_value_symmetry() {
        let p_pos = two_sided_p_value(2.0, 10.0);
        let p_neg = two_sided_p_value(-2.0, 10.0);
        assert!((p_pos - p_neg).abs() < 1e-12);
        assert!((two_sided_p_value(0.0, 10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_samples_serialize_signed_infinity() {
        let up = welch_t_test(&[1.0, 1.0, 1.0], &[5.0, 5.0, 5.0]).unwrap();
        let down = welch_t_test(&[5.0, 5.0, 5.0], &[1.0, 1.0, 1.0]).unwrap();

        let up_json = serde_json::to_value(up).unwrap();
        let down_json = serde_json::to_value(down).unwrap();
        assert_eq!(up_json["statistic"], "inf");
        assert_eq!(down_json["statistic"], "-inf");
        assert!(up_json["degrees_of_freedom"].is_null());

        let finite = welch_t_test(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!(serde_json::to_value(finite).unwrap()["statistic"].is_f64());
    }
}
