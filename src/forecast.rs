//! Predicts the next expense from the trend of the previous ones.

/// A straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// The change in `y` per unit of `x`.
    pub slope: f64,
    /// The value of `y` at `x = 0`.
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line to the points `(x, y)` with ordinary least squares.
    ///
    /// Returns `None` if there are fewer than two points, or if every `x` is
    /// the same, since no single line fits best in either case.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (covariance, variance) =
            points
                .iter()
                .fold((0.0, 0.0), |(covariance, variance), (x, y)| {
                    let dx = x - mean_x;
                    (covariance + dx * (y - mean_y), variance + dx * dx)
                });

        if variance == 0.0 {
            return None;
        }

        let slope = covariance / variance;

        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// The value of the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Predict the amount that follows `amounts`.
///
/// The amounts are treated as a series indexed from 1, and the prediction is
/// the linear trend evaluated at the next index.
///
/// Returns `None` for fewer than two amounts.
pub fn forecast_next(amounts: &[u64]) -> Option<f64> {
    let points: Vec<(f64, f64)> = amounts
        .iter()
        .enumerate()
        .map(|(index, &amount)| ((index + 1) as f64, amount as f64))
        .collect();

    let fit = LinearFit::fit(&points)?;

    Some(fit.predict((amounts.len() + 1) as f64))
}

#[cfg(test)]
mod tests {
    use super::{LinearFit, forecast_next};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn linear_series_continues_exactly() {
        let prediction = forecast_next(&[100, 200, 300]).unwrap();

        assert_close(prediction, 400.0);
    }

    #[test]
    fn constant_series_predicts_same_value() {
        let prediction = forecast_next(&[250, 250, 250, 250]).unwrap();

        assert_close(prediction, 250.0);
    }

    #[test]
    fn decreasing_series_can_predict_negative() {
        let prediction = forecast_next(&[300, 100]).unwrap();

        assert_close(prediction, -100.0);
    }

    #[test]
    fn noisy_series_follows_least_squares_line() {
        // x = 1..=4, y = [1, 3, 2, 4]: slope 0.8, intercept 0.5.
        let prediction = forecast_next(&[1, 3, 2, 4]).unwrap();

        assert_close(prediction, 4.5);
    }

    #[test]
    fn needs_at_least_two_amounts() {
        assert_eq!(forecast_next(&[]), None);
        assert_eq!(forecast_next(&[450]), None);
    }

    #[test]
    fn fit_recovers_slope_and_intercept() {
        let fit = LinearFit::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();

        assert_close(fit.slope, 2.0);
        assert_close(fit.intercept, 1.0);
        assert_close(fit.predict(10.0), 21.0);
    }

    #[test]
    fn fit_rejects_vertical_points() {
        assert_eq!(LinearFit::fit(&[(1.0, 1.0), (1.0, 5.0)]), None);
    }
}
