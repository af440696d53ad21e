/// Event rainfall for one subarea.
///
/// A hyetograph owns the total event depth and a temporal pattern
/// (fraction of the total per sample), derives the depth series once, and
/// carries the downstream excess-depth and runoff series. The derived
/// series may be recomputed when loss parameters change; a fresh
/// computation overwrites the previous result.
use crate::error::ModelError;
use crate::rainfall::losses::{self, LossParameters};
use crate::rainfall::runoff;
use crate::timeseries::TimeSeries;

#[derive(Debug, Clone)]
pub struct Hyetograph {
    name: String,
    total_depth_mm: f64,
    temporal_pattern: Option<TimeSeries>,
    depths: TimeSeries,
    excess_depths: Option<TimeSeries>,
    runoff: Option<TimeSeries>,
}

impl Hyetograph {
    /// Build a hyetograph from a total event depth [mm] and a temporal
    /// pattern whose values are the fraction of that depth per sample.
    pub fn new(
        name: impl Into<String>,
        total_depth_mm: f64,
        temporal_pattern: TimeSeries,
    ) -> Result<Self, ModelError> {
        if !(total_depth_mm >= 0.0) || !total_depth_mm.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "total_depth",
                value: total_depth_mm,
                constraint: "must be finite and >= 0",
            });
        }
        if temporal_pattern.values().iter().any(|f| *f < 0.0) {
            return Err(ModelError::DataShape(
                "temporal pattern contains negative fractions".to_string(),
            ));
        }
        let depths = temporal_pattern.scaled(total_depth_mm);
        Ok(Self {
            name: name.into(),
            total_depth_mm,
            temporal_pattern: Some(temporal_pattern),
            depths,
            excess_depths: None,
            runoff: None,
        })
    }

    /// Build a hyetograph directly from a depth series [mm].
    pub fn from_depths(name: impl Into<String>, depths: TimeSeries) -> Result<Self, ModelError> {
        if depths.values().iter().any(|d| *d < 0.0) {
            return Err(ModelError::DataShape(
                "depth series contains negative depths".to_string(),
            ));
        }
        let total_depth_mm = depths.total();
        Ok(Self {
            name: name.into(),
            total_depth_mm,
            temporal_pattern: None,
            depths,
            excess_depths: None,
            runoff: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_depth_mm(&self) -> f64 {
        self.total_depth_mm
    }

    /// Fraction-of-total pattern, present only when the hyetograph was
    /// built from a total depth and pattern rather than raw depths.
    pub fn temporal_pattern(&self) -> Option<&TimeSeries> {
        self.temporal_pattern.as_ref()
    }

    /// Rainfall depths [mm] per sample.
    pub fn depths(&self) -> &TimeSeries {
        &self.depths
    }

    /// Excess depths, present after `apply_loss_model`.
    pub fn excess_depths(&self) -> Option<&TimeSeries> {
        self.excess_depths.as_ref()
    }

    /// Runoff rates [m³/s], present after `compute_runoff`.
    pub fn runoff(&self) -> Option<&TimeSeries> {
        self.runoff.as_ref()
    }

    /// Apply the IL/CL loss model, replacing any previous excess series.
    /// Invalidates a previously computed runoff series.
    pub fn apply_loss_model(&mut self, params: &LossParameters) -> Result<&TimeSeries, ModelError> {
        let excess = losses::apply_il_cl(&self.depths, params)?;
        self.runoff = None;
        Ok(&*self.excess_depths.insert(excess))
    }

    /// Convert the excess depths to a runoff-rate series for a catchment
    /// area [km²]. Requires `apply_loss_model` to have run.
    pub fn compute_runoff(&mut self, catchment_area_km2: f64) -> Result<&TimeSeries, ModelError> {
        let excess = self.excess_depths.as_ref().ok_or(ModelError::NotReady {
            what: "excess depths",
            fix: "apply_loss_model",
        })?;
        let runoff = runoff::excess_to_runoff(excess, catchment_area_km2)?;
        Ok(&*self.runoff.insert(runoff))
    }
}
