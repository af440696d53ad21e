//! Convergence observability for the routing loop.
//!
//! The router reports per-timestep solver behaviour through an injected
//! sink, so callers and tests can audit convergence without parsing log
//! output. Fallback steps also emit a `tracing` warning from the loop
//! itself.

/// How the outflow for a single routing timestep was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Explicit estimate accepted without refinement (ΔS² at or below the
    /// degenerate-step threshold).
    Explicit,
    /// Root search converged; the root was accepted.
    Converged,
    /// Root search failed; the explicit estimate was used as a fallback.
    Fallback,
}

/// Solver record for one routing timestep.
#[derive(Debug, Clone, Copy)]
pub struct StepDiagnostics {
    /// Index of the inflow sample (the initial state is step 0).
    pub step: usize,
    /// Sample time [hr].
    pub time: f64,
    pub outcome: StepOutcome,
    /// Secant iterations spent on this step (0 for explicit acceptance).
    pub iterations: usize,
    /// Accepted outflow [m³/s].
    pub outflow: f64,
}

/// Receives one record per routed timestep after the first.
pub trait DiagnosticsSink {
    fn record(&mut self, step: StepDiagnostics);
}

/// Sink that discards every record.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _step: StepDiagnostics) {}
}

/// Sink that keeps every record. Intended for tests and convergence audits.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub steps: Vec<StepDiagnostics>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps that fell back to the explicit estimate.
    pub fn fallback_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Fallback)
            .count()
    }

    /// Steps with a given outcome.
    pub fn with_outcome(&self, outcome: StepOutcome) -> impl Iterator<Item = &StepDiagnostics> {
        self.steps.iter().filter(move |s| s.outcome == outcome)
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&mut self, step: StepDiagnostics) {
        self.steps.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: StepOutcome) -> StepDiagnostics {
        StepDiagnostics {
            step: 1,
            time: 1.0,
            outcome,
            iterations: 2,
            outflow: 3.0,
        }
    }

    #[test]
    fn recording_sink_keeps_everything() {
        let mut sink = RecordingSink::new();
        sink.record(record(StepOutcome::Converged));
        sink.record(record(StepOutcome::Fallback));
        sink.record(record(StepOutcome::Explicit));
        assert_eq!(sink.steps.len(), 3);
        assert_eq!(sink.fallback_count(), 1);
        assert_eq!(sink.with_outcome(StepOutcome::Explicit).count(), 1);
    }

    #[test]
    fn null_sink_discards() {
        let mut sink = NullSink;
        sink.record(record(StepOutcome::Converged));
    }
}
