/// Initial-loss / continuing-loss rainfall abstraction.
///
/// The initial loss is a one-time depth absorbed before runoff begins; the
/// continuing loss is an ongoing rate absorbed for the rest of the event.
/// Finding where the initial loss is exhausted requires inverting the
/// cumulative depth curve, which is where the numerical care lives:
/// zero-rain timesteps collapse to duplicate cumulative values and must be
/// dropped before the spline fit.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::spline::CubicSpline;
use crate::timeseries::TimeSeries;

/// Loss model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossParameters {
    /// One-time abstraction removed before runoff begins [mm].
    pub initial_loss_mm: f64,
    /// Ongoing abstraction rate [mm/hr].
    pub continuing_loss_mm_per_hr: f64,
}

impl LossParameters {
    /// Create loss parameters; both must be finite and non-negative.
    pub fn new(initial_loss_mm: f64, continuing_loss_mm_per_hr: f64) -> Result<Self, ModelError> {
        if !(initial_loss_mm >= 0.0) || !initial_loss_mm.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "initial_loss",
                value: initial_loss_mm,
                constraint: "must be finite and >= 0",
            });
        }
        if !(continuing_loss_mm_per_hr >= 0.0) || !continuing_loss_mm_per_hr.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "continuing_loss",
                value: continuing_loss_mm_per_hr,
                constraint: "must be finite and >= 0",
            });
        }
        Ok(Self {
            initial_loss_mm,
            continuing_loss_mm_per_hr,
        })
    }

    /// No abstraction at all; excess equals input.
    pub fn none() -> Self {
        Self {
            initial_loss_mm: 0.0,
            continuing_loss_mm_per_hr: 0.0,
        }
    }
}

/// Transform a rainfall-depth series [mm] into excess depths [mm].
pub fn apply_il_cl(depths: &TimeSeries, params: &LossParameters) -> Result<TimeSeries, ModelError> {
    let after_initial = if params.initial_loss_mm > 0.0 {
        let excess_start = excess_start_time(depths, params.initial_loss_mm)?;
        debug!(excess_start, "initial loss exhausted");
        zero_before(depths, excess_start)
    } else {
        depths.clone()
    };
    Ok(apply_continuing_loss(
        &after_initial,
        params.continuing_loss_mm_per_hr,
    ))
}

/// Time [hr] at which the initial abstraction is exhausted.
///
/// Inverts the cumulative-depth curve with a cubic spline fitted to
/// (cumulative depth, time) knots. Duplicate cumulative values (zero-rain
/// steps) are dropped to keep the abscissae strictly increasing; any other
/// monotonicity violation means the depths were negative somewhere and the
/// inverse is ill-defined.
pub fn excess_start_time(depths: &TimeSeries, initial_loss_mm: f64) -> Result<f64, ModelError> {
    let cumulative = depths.cumulative();

    let mut depth_knots: Vec<f64> = Vec::with_capacity(cumulative.len());
    let mut time_knots: Vec<f64> = Vec::with_capacity(cumulative.len());
    for (t, c) in cumulative.iter() {
        if depth_knots.last() != Some(&c) {
            depth_knots.push(c);
            time_knots.push(t);
        }
    }

    if depth_knots.len() < 2 {
        return Err(ModelError::DataShape(
            "cumulative depth curve is degenerate: fewer than two distinct values".to_string(),
        ));
    }
    if !depth_knots.windows(2).all(|w| w[0] < w[1]) {
        return Err(ModelError::DataShape(
            "cumulative rainfall depths are not strictly increasing; cannot invert the loss curve"
                .to_string(),
        ));
    }

    // An initial loss at or beyond the total event depth absorbs the whole
    // event; the spline must not extrapolate that far.
    let (last_time, total_depth) = cumulative.last();
    if initial_loss_mm >= total_depth {
        return Ok(round4(last_time));
    }

    let inverse = CubicSpline::new(&depth_knots, &time_knots)?;
    Ok(round4(inverse.evaluate(initial_loss_mm)))
}

/// Zero all depth strictly before `excess_start`, and pin a zero-depth
/// sample at exactly `excess_start` (inserted if the time is not already
/// sampled).
fn zero_before(depths: &TimeSeries, excess_start: f64) -> TimeSeries {
    let mut out = depths.clone();
    out.insert_or_overwrite(excess_start, 0.0);
    let values: Vec<f64> = out
        .iter()
        .map(|(t, v)| if t < excess_start { 0.0 } else { v })
        .collect();
    TimeSeries::new(out.times().to_vec(), values).expect("shape preserved from a validated series")
}

/// Subtract `rate·Δt` from each step, clamping below zero. The first step
/// has no preceding interval, so its loss is zero.
fn apply_continuing_loss(depths: &TimeSeries, rate_mm_per_hr: f64) -> TimeSeries {
    let mut prev_time = depths.first().0;
    let mut times = Vec::with_capacity(depths.len());
    let mut values = Vec::with_capacity(depths.len());
    for (i, (t, v)) in depths.iter().enumerate() {
        let loss = if i == 0 {
            0.0
        } else {
            rate_mm_per_hr * (t - prev_time)
        };
        times.push(t);
        values.push((v - loss).max(0.0));
        prev_time = t;
    }
    TimeSeries::new(times, values).expect("shape preserved from a validated series")
}

fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}
