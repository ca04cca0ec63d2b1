/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N), `None` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_statistics() {
        assert_eq!(mean(&[]), None);
        assert_eq!(population_std_dev(&[]), None);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[2.0, 4.0, 9.0]), Some(5.0));
    }

    #[test]
    fn std_dev_divides_by_count() {
        // Population std dev of this classic sample is exactly 2, the sample std dev is not.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values), Some(2.0));
    }

    #[test]
    fn single_value_has_zero_spread() {
        assert_eq!(population_std_dev(&[13.5]), Some(0.0));
    }
}
