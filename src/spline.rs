//! Natural cubic spline interpolation.
//!
//! Used by the loss model to invert the cumulative rainfall-depth curve
//! (depth → time). Knot abscissae must be strictly increasing; evaluation
//! outside the knot range extrapolates the boundary polynomial.
use crate::error::ModelError;

/// Cubic spline through a set of knots with natural (zero second
/// derivative) end conditions.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative of the spline at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline. Requires at least two knots and strictly
    /// increasing abscissae; two knots degrade to a straight line.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, ModelError> {
        if x.len() != y.len() {
            return Err(ModelError::DataShape(format!(
                "spline abscissae length {} does not match ordinate length {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(ModelError::DataShape(
                "spline needs at least two knots".to_string(),
            ));
        }
        if !x.windows(2).all(|w| w[0] < w[1]) {
            return Err(ModelError::DataShape(
                "spline abscissae are not strictly increasing".to_string(),
            ));
        }
        let m = second_derivatives(x, y);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline at `t`, extrapolating with the boundary cubic
    /// outside the knot range.
    pub fn evaluate(&self, t: f64) -> f64 {
        let n = self.x.len();
        // Interval index, clamped so out-of-range t uses the end polynomial.
        let i = match self
            .x
            .binary_search_by(|v| v.partial_cmp(&t).expect("spline knots are finite"))
        {
            Ok(i) => i.min(n - 2),
            Err(i) => i.saturating_sub(1).min(n - 2),
        };
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a.powi(3) - a) * self.m[i] + (b.powi(3) - b) * self.m[i + 1]) * h * h / 6.0
    }
}

/// Solve the tridiagonal system for the natural-spline second derivatives.
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        // Two knots: linear segment, zero curvature.
        return m;
    }

    // Thomas algorithm on the n-2 interior equations:
    // h[i-1]·m[i-1] + 2(h[i-1]+h[i])·m[i] + h[i]·m[i+1] = rhs[i]
    let mut diag = vec![0.0; n - 2];
    let mut upper = vec![0.0; n - 2];
    let mut rhs = vec![0.0; n - 2];
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        diag[i - 1] = 2.0 * (h0 + h1);
        upper[i - 1] = h1;
        rhs[i - 1] = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
    }
    // Forward elimination; the sub-diagonal entry for row i is h[i] = x[i+1]-x[i].
    for i in 1..n - 2 {
        let lower = x[i + 1] - x[i];
        let w = lower / diag[i - 1];
        diag[i] -= w * upper[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }
    // Back substitution into the interior of m.
    m[n - 2] = rhs[n - 3] / diag[n - 3];
    for i in (1..n - 2).rev() {
        m[i] = (rhs[i - 1] - upper[i - 1] * m[i + 1]) / diag[i - 1];
    }
    m
}
