/// floodroute — catchment flood routing in Rust.
///
/// Converts event rainfall into subarea runoff through an initial-loss /
/// continuing-loss abstraction, and routes inflow hydrographs through
/// storage elements using a nonlinear Muskingum-type storage-discharge
/// law with a per-timestep implicit solve.
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod rainfall;
pub mod routing;
pub mod solver;
pub mod spline;
pub mod timeseries;

pub use diagnostics::{DiagnosticsSink, NullSink, RecordingSink, StepDiagnostics, StepOutcome};
pub use element::{RunoffSource, StorageElement};
pub use error::ModelError;
pub use rainfall::hyetograph::Hyetograph;
pub use rainfall::losses::LossParameters;
pub use routing::outputs::RoutingTable;
pub use routing::params::{RoutingMethod, RoutingParameters};
pub use solver::{RootResult, SolverOptions};
pub use timeseries::TimeSeries;
