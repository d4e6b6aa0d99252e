/// Small statistics helpers over slices of readings.
use statrs::statistics::Statistics;

/// Arithmetic mean, or None for an empty slice (statrs would give NaN).
pub fn mean(numbers: &[f64]) -> Option<f64> {
    if numbers.is_empty() {
        return None;
    }

    Some(numbers.iter().mean())
}
