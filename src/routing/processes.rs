/// Storage-balance relations for a single routing step.
///
/// Two independent storage estimates drive the implicit step: the flow
/// balance (trapezoidal continuity) and the routing law (storage-discharge
/// relation). The solver drives their percentage difference to zero.
use super::params::RoutingParameters;

/// Storage from the flow balance: S₀ + Δt·(Ī − ½(O + O₀)).
pub fn storage_from_flows(
    outflow: f64,
    initial_outflow: f64,
    average_inflow: f64,
    delta_time: f64,
    initial_storage: f64,
) -> f64 {
    let delta_storage = delta_time * (average_inflow - 0.5 * (outflow + initial_outflow));
    initial_storage + delta_storage
}

/// Storage from the routing law: K·(X·Ī + (1−X)·O)^exponent.
pub fn storage_from_routing(params: &RoutingParameters, outflow: f64, inflow: f64) -> f64 {
    params.k * (params.x * inflow + (1.0 - params.x) * outflow).powf(params.exponent)
}

/// Percentage difference between the two storage estimates at a trial
/// outflow. This is the residual the root search drives to zero.
pub fn storage_residual(
    params: &RoutingParameters,
    outflow: f64,
    initial_outflow: f64,
    average_inflow: f64,
    delta_time: f64,
    initial_storage: f64,
) -> f64 {
    let from_flows = storage_from_flows(
        outflow,
        initial_outflow,
        average_inflow,
        delta_time,
        initial_storage,
    );
    let from_routing = storage_from_routing(params, outflow, average_inflow);
    (from_routing - from_flows) / from_routing * 100.0
}

/// Explicit first estimate of the step: kinematic storage update inverted
/// through the routing law.
///
/// Returns (ΔS, O_guess). Storage cannot go negative, so the update is
/// clamped at zero before the fractional power.
pub fn explicit_estimate(
    params: &RoutingParameters,
    average_inflow: f64,
    initial_outflow: f64,
    initial_storage: f64,
    delta_time: f64,
) -> (f64, f64) {
    let delta_storage = delta_time * (average_inflow - initial_outflow);
    let storage = (delta_storage + initial_storage).max(0.0);
    let outflow = (storage / params.k).powf(1.0 / params.exponent);
    (delta_storage, outflow)
}
