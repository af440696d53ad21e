/// Routing loop: advance a storage element's outflow/storage state through
/// an inflow hydrograph.
///
/// Each step takes an explicit kinematic estimate first, then refines it
/// with a secant root search on the percentage difference between the
/// flow-balance and routing-law storage estimates. Non-convergence falls
/// back to the explicit estimate and is recorded, never fatal.
use tracing::{debug, warn};

use super::outputs::{RoutingStep, RoutingTable};
use super::params::{RoutingParameters, SECONDS_PER_HOUR};
use super::processes;
use crate::diagnostics::{DiagnosticsSink, NullSink, StepDiagnostics, StepOutcome};
use crate::solver::{find_root, SolverOptions};
use crate::timeseries::TimeSeries;

/// Threshold on ΔS² [m⁶] below which the step is degenerate and the
/// explicit estimate is accepted without refinement.
pub const DEGENERATE_STEP_THRESHOLD: f64 = 1e-3;

/// Route an inflow series with default solver options, discarding
/// diagnostics.
pub fn compute_outflow(params: &RoutingParameters, inflows: &TimeSeries) -> RoutingTable {
    compute_outflow_with(params, inflows, &SolverOptions::default(), &mut NullSink)
}

/// Route an inflow series, reporting per-step solver behaviour to `sink`.
///
/// The first inflow sample becomes the initial state (outflow and storage
/// zero); every subsequent sample produces one accepted row. State advances
/// on the routing-law storage.
pub fn compute_outflow_with(
    params: &RoutingParameters,
    inflows: &TimeSeries,
    options: &SolverOptions,
    sink: &mut dyn DiagnosticsSink,
) -> RoutingTable {
    let mut table = RoutingTable::with_capacity(inflows.len());

    let (mut prev_time, mut prev_inflow) = inflows.first();
    let mut prev_outflow = 0.0;
    let mut prev_storage = 0.0;
    table.push(&RoutingStep {
        time: prev_time,
        inflow: prev_inflow,
        outflow: prev_outflow,
        storage_flows: prev_storage,
        storage_routing: prev_storage,
    });

    for (step, (time, inflow)) in inflows.iter().enumerate().skip(1) {
        let delta_time = (time - prev_time) * SECONDS_PER_HOUR;
        let average_inflow = 0.5 * (prev_inflow + inflow);

        let (delta_storage, guess) = processes::explicit_estimate(
            params,
            average_inflow,
            prev_outflow,
            prev_storage,
            delta_time,
        );

        let (outflow, outcome, iterations) = if delta_storage.powi(2) <= DEGENERATE_STEP_THRESHOLD
        {
            (guess, StepOutcome::Explicit, 0)
        } else {
            let residual = |o: f64| {
                processes::storage_residual(
                    params,
                    o,
                    prev_outflow,
                    average_inflow,
                    delta_time,
                    prev_storage,
                )
            };
            let root = find_root(residual, 0.5 * guess, 2.0 * guess, options);
            if root.converged && root.value.is_finite() && root.value >= 0.0 {
                (root.value, StepOutcome::Converged, root.iterations)
            } else {
                warn!(
                    step,
                    time,
                    iterations = root.iterations,
                    "root search failed to converge; keeping explicit estimate"
                );
                (guess, StepOutcome::Fallback, root.iterations)
            }
        };

        let storage_flows = processes::storage_from_flows(
            outflow,
            prev_outflow,
            average_inflow,
            delta_time,
            prev_storage,
        );
        let storage_routing = processes::storage_from_routing(params, outflow, average_inflow);

        debug!(time, inflow, outflow, "routed timestep");
        table.push(&RoutingStep {
            time,
            inflow,
            outflow,
            storage_flows,
            storage_routing,
        });
        sink.record(StepDiagnostics {
            step,
            time,
            outcome,
            iterations,
            outflow,
        });

        prev_time = time;
        prev_inflow = inflow;
        prev_outflow = outflow;
        prev_storage = storage_routing;
    }

    table
}
