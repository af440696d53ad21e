/// Nonlinear Muskingum-type storage routing.
///
/// Advances a storage element's outflow/storage state through an inflow
/// hydrograph using the storage-discharge law S = K·(X·I + (1−X)·O)^m,
/// enforcing mass-balance consistency with a per-step root search.
pub mod outputs;
pub mod params;
pub mod processes;
pub mod run;
