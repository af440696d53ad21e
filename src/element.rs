//! Storage elements of the catchment model.
//!
//! A `StorageElement` is the routed unit: a stream reach or a junction
//! with an inflow hydrograph, routing parameters, and a computed result.
//! Subareas are the same element with a `RunoffSource` capability attached
//! (catchment area, loss parameters, rainfall), composed rather than
//! subclassed so runoff generation stays orthogonal to routing.
//!
//! Elements are independent: each owns its own series, and a failure in
//! one element never touches another.
use crate::diagnostics::{DiagnosticsSink, NullSink};
use crate::error::ModelError;
use crate::rainfall::hyetograph::Hyetograph;
use crate::rainfall::losses::LossParameters;
use crate::routing::outputs::RoutingTable;
use crate::routing::params::{RoutingMethod, RoutingParameters};
use crate::routing::run;
use crate::solver::SolverOptions;
use crate::timeseries::TimeSeries;

/// Runoff-producing capability attached to subarea elements.
#[derive(Debug, Clone)]
pub struct RunoffSource {
    area_km2: f64,
    losses: LossParameters,
    rainfall: Hyetograph,
}

impl RunoffSource {
    pub fn new(
        area_km2: f64,
        losses: LossParameters,
        rainfall: Hyetograph,
    ) -> Result<Self, ModelError> {
        if !(area_km2 > 0.0) || !area_km2.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "area_km2",
                value: area_km2,
                constraint: "must be finite and > 0",
            });
        }
        Ok(Self {
            area_km2,
            losses,
            rainfall,
        })
    }

    pub fn area_km2(&self) -> f64 {
        self.area_km2
    }

    pub fn rainfall(&self) -> &Hyetograph {
        &self.rainfall
    }

    /// Replace the loss parameters; downstream series must be recomputed.
    pub fn set_losses(&mut self, losses: LossParameters) {
        self.losses = losses;
    }

    /// Run the loss model and unit conversion, returning the runoff-rate
    /// series [m³/s].
    pub fn compute_runoff(&mut self) -> Result<&TimeSeries, ModelError> {
        self.rainfall.apply_loss_model(&self.losses)?;
        self.rainfall.compute_runoff(self.area_km2)
    }
}

/// A single storage element in the catchment.
#[derive(Debug, Clone)]
pub struct StorageElement {
    name: String,
    stream_length_km: f64,
    params: Option<RoutingParameters>,
    inflows: Option<TimeSeries>,
    result: Option<RoutingTable>,
    runoff_source: Option<RunoffSource>,
}

impl StorageElement {
    /// A routed stream reach of a given length [km].
    pub fn stream(name: impl Into<String>, stream_length_km: f64) -> Self {
        Self {
            name: name.into(),
            stream_length_km,
            params: None,
            inflows: None,
            result: None,
            runoff_source: None,
        }
    }

    /// A junction: zero-length element used for assembling inflows.
    pub fn junction(name: impl Into<String>) -> Self {
        Self::stream(name, 0.0)
    }

    /// A subarea: a stream-like element that generates its own inflow from
    /// rainfall.
    pub fn subarea(
        name: impl Into<String>,
        stream_length_km: f64,
        source: RunoffSource,
    ) -> Self {
        Self {
            runoff_source: Some(source),
            ..Self::stream(name, stream_length_km)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stream_length_km(&self) -> f64 {
        self.stream_length_km
    }

    pub fn is_subarea(&self) -> bool {
        self.runoff_source.is_some()
    }

    pub fn runoff_source(&self) -> Option<&RunoffSource> {
        self.runoff_source.as_ref()
    }

    pub fn runoff_source_mut(&mut self) -> Option<&mut RunoffSource> {
        self.runoff_source.as_mut()
    }

    pub fn parameters(&self) -> Option<&RoutingParameters> {
        self.params.as_ref()
    }

    /// Derive and attach routing parameters from a method and this
    /// element's reach length.
    pub fn set_routing_method(&mut self, method: &RoutingMethod) -> Result<(), ModelError> {
        self.params = Some(RoutingParameters::from_method(method, self.stream_length_km)?);
        Ok(())
    }

    /// Attach pre-derived routing parameters.
    pub fn set_routing_parameters(&mut self, params: RoutingParameters) {
        self.params = Some(params);
    }

    /// Attach an inflow hydrograph (time in hours, flow in m³/s, already
    /// resampled onto the simulation grid).
    pub fn set_inflows(&mut self, inflows: TimeSeries) {
        self.inflows = Some(inflows);
    }

    pub fn inflows(&self) -> Option<&TimeSeries> {
        self.inflows.as_ref()
    }

    /// For a subarea: generate runoff from rainfall and use it as this
    /// element's inflow.
    pub fn inflows_from_runoff(&mut self) -> Result<(), ModelError> {
        let source = self.runoff_source.as_mut().ok_or(ModelError::NotReady {
            what: "a runoff source",
            fix: "StorageElement::subarea",
        })?;
        let runoff = source.compute_runoff()?.clone();
        self.inflows = Some(runoff);
        Ok(())
    }

    /// Multiply the inflow hydrograph by a scaling factor (event scaling
    /// sweeps).
    pub fn scale_inflow(&mut self, factor: f64) -> Result<(), ModelError> {
        let inflows = self.inflows.as_mut().ok_or(ModelError::NotReady {
            what: "inflows",
            fix: "set_inflows",
        })?;
        inflows.scale(factor);
        Ok(())
    }

    /// Route the attached inflows with default solver options.
    pub fn compute_outflow(&mut self) -> Result<&RoutingTable, ModelError> {
        self.compute_outflow_with(&SolverOptions::default(), &mut NullSink)
    }

    /// Route the attached inflows, reporting solver behaviour to `sink`.
    /// A fresh run overwrites the previous result.
    pub fn compute_outflow_with(
        &mut self,
        options: &SolverOptions,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<&RoutingTable, ModelError> {
        let params = self.params.ok_or(ModelError::NotReady {
            what: "routing parameters",
            fix: "set_routing_method",
        })?;
        let inflows = self.inflows.as_ref().ok_or(ModelError::NotReady {
            what: "inflows",
            fix: "set_inflows",
        })?;
        let table = run::compute_outflow_with(&params, inflows, options, sink);
        Ok(&*self.result.insert(table))
    }

    /// Result of the last `compute_outflow` run.
    pub fn result(&self) -> Option<&RoutingTable> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> RoutingMethod {
        RoutingMethod::Rorb {
            k_c: 20.0,
            d_ave: 40.0,
            exponent: 0.8,
        }
    }

    fn inflows() -> TimeSeries {
        TimeSeries::new(
            (0..6).map(|i| i as f64).collect(),
            vec![0.0, 20.0, 60.0, 40.0, 15.0, 5.0],
        )
        .unwrap()
    }

    fn rainfall() -> Hyetograph {
        let pattern =
            TimeSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.2, 0.4, 0.3, 0.1]).unwrap();
        Hyetograph::new("suba_1", 40.0, pattern).unwrap()
    }

    #[test]
    fn routing_requires_parameters() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        element.set_inflows(inflows());
        let err = element.compute_outflow().unwrap_err();
        assert!(matches!(err, ModelError::NotReady { .. }));
    }

    #[test]
    fn routing_requires_inflows() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        element.set_routing_method(&method()).unwrap();
        let err = element.compute_outflow().unwrap_err();
        assert!(matches!(err, ModelError::NotReady { .. }));
    }

    #[test]
    fn stream_routes_and_stores_the_result() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        element.set_routing_method(&method()).unwrap();
        element.set_inflows(inflows());
        element.compute_outflow().unwrap();
        let table = element.result().unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.outflow[0], 0.0);
    }

    #[test]
    fn fresh_run_overwrites_the_result() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        element.set_routing_method(&method()).unwrap();
        element.set_inflows(inflows());
        let first_peak = {
            element.compute_outflow().unwrap();
            element.result().unwrap().outflow.iter().cloned().fold(f64::MIN, f64::max)
        };
        element.scale_inflow(2.0).unwrap();
        element.compute_outflow().unwrap();
        let second_peak = element
            .result()
            .unwrap()
            .outflow
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max);
        assert!(second_peak > first_peak);
    }

    #[test]
    fn scale_inflow_needs_inflows() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        assert!(element.scale_inflow(2.0).is_err());
    }

    #[test]
    fn junction_has_zero_length() {
        let j = StorageElement::junction("node_3");
        assert_eq!(j.stream_length_km(), 0.0);
        assert!(!j.is_subarea());
    }

    #[test]
    fn subarea_generates_its_own_inflow() {
        let losses = LossParameters::new(5.0, 1.0).unwrap();
        let source = RunoffSource::new(30.0, losses, rainfall()).unwrap();
        let mut element = StorageElement::subarea("suba_1", 4.0, source);
        assert!(element.is_subarea());

        element.inflows_from_runoff().unwrap();
        let inflow = element.inflows().unwrap();
        assert!(inflow.values().iter().all(|v| *v >= 0.0));
        assert!(inflow.total() > 0.0);

        element.set_routing_method(&method()).unwrap();
        element.compute_outflow().unwrap();
        assert!(element.result().is_some());
    }

    #[test]
    fn non_subarea_cannot_generate_runoff() {
        let mut element = StorageElement::stream("reach_1", 12.0);
        assert!(element.inflows_from_runoff().is_err());
    }

    #[test]
    fn runoff_source_rejects_zero_area() {
        let losses = LossParameters::none();
        assert!(RunoffSource::new(0.0, losses, rainfall()).is_err());
    }
}
