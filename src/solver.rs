//! Scalar root finding for the implicit routing step.
//!
//! Secant iteration seeded with two initial guesses, with an iteration cap.
//! Non-convergence is an expected outcome during routing, so it is reported
//! through the returned [`RootResult`] rather than an error: the caller
//! branches on `converged` and falls back to its explicit estimate.

/// Tunable limits for the secant search.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Hard cap on secant iterations.
    pub max_iterations: usize,
    /// Convergence threshold on |f(x)|. The routing residual is a
    /// percentage, so the default 1e-3 is the 0.001 % relative tolerance on
    /// the two storage estimates.
    pub residual_tol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            residual_tol: 1e-3,
        }
    }
}

/// Outcome of a root search.
#[derive(Debug, Clone, Copy)]
pub struct RootResult {
    /// Best iterate found (meaningful only when `converged`).
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether |f(value)| dropped below the residual tolerance.
    pub converged: bool,
}

/// Find a root of `f` by secant iteration from the two seeds `x0`, `x1`.
///
/// Reports `converged: false` when the residual stays above tolerance after
/// `max_iterations`, or when the iteration degenerates (equal or non-finite
/// function values, non-finite iterate).
pub fn find_root<F>(f: F, x0: f64, x1: f64, options: &SolverOptions) -> RootResult
where
    F: Fn(f64) -> f64,
{
    let mut a = x0;
    let mut b = x1;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa.abs() <= options.residual_tol && fa.is_finite() {
        return RootResult {
            value: a,
            iterations: 0,
            converged: true,
        };
    }
    if fb.abs() <= options.residual_tol && fb.is_finite() {
        return RootResult {
            value: b,
            iterations: 0,
            converged: true,
        };
    }

    for iterations in 1..=options.max_iterations {
        if !fa.is_finite() || !fb.is_finite() {
            return RootResult {
                value: b,
                iterations,
                converged: false,
            };
        }
        let denom = fb - fa;
        if denom == 0.0 {
            return RootResult {
                value: b,
                iterations,
                converged: false,
            };
        }
        let next = b - fb * (b - a) / denom;
        if !next.is_finite() {
            return RootResult {
                value: b,
                iterations,
                converged: false,
            };
        }
        a = b;
        fa = fb;
        b = next;
        fb = f(b);
        if fb.is_finite() && fb.abs() <= options.residual_tol {
            return RootResult {
                value: b,
                iterations,
                converged: true,
            };
        }
    }

    RootResult {
        value: b,
        iterations: options.max_iterations,
        converged: false,
    }
}
