/// Routing computation table, one row per inflow sample.
///
/// Two levels, matching the crate convention: `RoutingStep` holds a single
/// timestep, `RoutingTable` holds the full run as parallel vectors. The two
/// storage columns are independent estimates kept for diagnostics; they are
/// not reconciled beyond the solver tolerance.

/// Column names of the routing table, in output order. Stable contract for
/// downstream persistence and golden-file comparisons.
pub const COLUMNS: [&str; 5] = ["Time", "Inflow", "Outflow", "Storage_1", "Storage_2"];

/// Single-timestep routing row.
#[derive(Debug, Clone, Copy)]
pub struct RoutingStep {
    /// Sample time [hr].
    pub time: f64,
    /// Inflow [m³/s].
    pub inflow: f64,
    /// Accepted outflow [m³/s].
    pub outflow: f64,
    /// Flow-balance storage estimate [m³] (Storage_1).
    pub storage_flows: f64,
    /// Routing-law storage estimate [m³] (Storage_2).
    pub storage_routing: f64,
}

/// Full routing table — returned by `compute_outflow()`.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    pub time: Vec<f64>,
    pub inflow: Vec<f64>,
    pub outflow: Vec<f64>,
    pub storage_flows: Vec<f64>,
    pub storage_routing: Vec<f64>,
}

impl RoutingTable {
    /// Pre-allocate all columns for `n` timesteps.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            inflow: Vec::with_capacity(n),
            outflow: Vec::with_capacity(n),
            storage_flows: Vec::with_capacity(n),
            storage_routing: Vec::with_capacity(n),
        }
    }

    /// Push a single timestep's row into the table.
    pub fn push(&mut self, step: &RoutingStep) {
        self.time.push(step.time);
        self.inflow.push(step.inflow);
        self.outflow.push(step.outflow);
        self.storage_flows.push(step.storage_flows);
        self.storage_routing.push(step.storage_routing);
    }

    /// Row at index `i`.
    pub fn row(&self, i: usize) -> RoutingStep {
        RoutingStep {
            time: self.time[i],
            inflow: self.inflow[i],
            outflow: self.outflow[i],
            storage_flows: self.storage_flows[i],
            storage_routing: self.storage_routing[i],
        }
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
