/// Excess rainfall depth to volumetric runoff rate.
///
/// Pure unit conversion: a depth [mm] spread over a catchment area [km²]
/// in one hour, expressed as a flow rate [m³/s]. The factor chain is exact
/// dimensional analysis (mm·km² → m³, per-hour → per-second).
use crate::error::ModelError;
use crate::timeseries::TimeSeries;

/// Convert an excess-depth series [mm] into a runoff-rate series [m³/s].
pub fn excess_to_runoff(
    excess_depths: &TimeSeries,
    catchment_area_km2: f64,
) -> Result<TimeSeries, ModelError> {
    if !(catchment_area_km2 > 0.0) || !catchment_area_km2.is_finite() {
        return Err(ModelError::ParameterOutOfRange {
            name: "catchment_area",
            value: catchment_area_km2,
            constraint: "must be finite and > 0",
        });
    }
    let values = excess_depths
        .values()
        .iter()
        .map(|depth| depth * catchment_area_km2 * 1_000_000.0 / 1000.0 / 3600.0)
        .collect();
    TimeSeries::new(excess_depths.times().to_vec(), values)
}
