//! Error taxonomy for configuration and input-data problems.
//!
//! Only fatal conditions live here. Solver non-convergence is expected
//! during routing and is reported through [`crate::solver::RootResult`] and
//! the diagnostics sink instead of an error.
use thiserror::Error;

/// Fatal error raised while configuring or running a model element.
///
/// Configuration and data-shape problems abort the affected element only;
/// independent elements are unaffected.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Routing method name not recognised.
    #[error("unsupported routing method `{0}`")]
    UnsupportedRoutingMethod(String),

    /// A required coefficient is missing from a method's coefficient table.
    #[error("routing method `{method}` requires coefficient `{key}`")]
    MissingCoefficient {
        method: &'static str,
        key: &'static str,
    },

    /// A parameter value is outside its physical range.
    #[error("{name} = {value} is out of range ({constraint})")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        constraint: &'static str,
    },

    /// A prerequisite has not been attached or computed yet.
    #[error("{what} is not available; call `{fix}` first")]
    NotReady {
        what: &'static str,
        fix: &'static str,
    },

    /// Input series is structurally unusable (empty, non-monotonic time,
    /// non-finite values, degenerate cumulative curve).
    #[error("data shape error: {0}")]
    DataShape(String),
}

impl ModelError {
    /// Returns `true` for configuration problems (as opposed to data-shape
    /// problems in the series themselves).
    pub fn is_configuration(&self) -> bool {
        !matches!(self, ModelError::DataShape(_))
    }
}
