/// Positional quartile bounds used by the outlier filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Inclusive `[q1 - 1.5 * iqr, q3 + 1.5 * iqr]`.
    pub fn fences(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - 1.5 * iqr, self.q3 + 1.5 * iqr)
    }
}

/// Estimate `(q1, q3)` by position in a sorted copy of `values`.
///
/// With `mid = n / 2`, `q1 = sorted[mid / 2]` and `q3 = sorted[mid + mid / 2]`.
/// No interpolation; for `n <= 3` both bounds land on the first one or two
/// values. Returns `None` for an empty input.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    let q1 = *sorted.get(mid / 2)?;
    let q3 = *sorted.get(mid + mid / 2)?;
    Some(Quartiles { q1, q3 })
}
