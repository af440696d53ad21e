//! Ordered (time, value) series shared by the rainfall and routing
//! components.
//!
//! Time is in hours throughout the crate. Construction validates the shape
//! once so downstream computations can assume a strictly increasing,
//! finite, non-empty series.
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// An ordered sequence of (time, value) samples with strictly increasing
/// time. Insertion order is time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new series, validating its shape.
    ///
    /// Rejects empty or length-mismatched inputs, non-finite entries, and
    /// non-strictly-increasing time.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, ModelError> {
        if times.is_empty() {
            return Err(ModelError::DataShape("series is empty".to_string()));
        }
        if times.len() != values.len() {
            return Err(ModelError::DataShape(format!(
                "time length {} does not match value length {}",
                times.len(),
                values.len()
            )));
        }
        if times.iter().any(|t| !t.is_finite()) || values.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::DataShape(
                "series contains non-finite entries".to_string(),
            ));
        }
        if !times.windows(2).all(|w| w[0] < w[1]) {
            return Err(ModelError::DataShape(
                "time axis is not strictly increasing".to_string(),
            ));
        }
        Ok(Self { times, values })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if there are no samples. Unreachable for a validated
    /// series but required by convention.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First (time, value) sample.
    pub fn first(&self) -> (f64, f64) {
        (self.times[0], self.values[0])
    }

    /// Last (time, value) sample.
    pub fn last(&self) -> (f64, f64) {
        let i = self.len() - 1;
        (self.times[i], self.values[i])
    }

    /// Iterate over (time, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Multiply every value in place. Used for inflow scaling-factor sweeps.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.values {
            *v *= factor;
        }
    }

    /// Return a copy with every value multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> TimeSeries {
        let mut out = self.clone();
        out.scale(factor);
        out
    }

    /// Running sum of values on the same time axis.
    pub fn cumulative(&self) -> TimeSeries {
        let mut total = 0.0;
        let values = self
            .values
            .iter()
            .map(|v| {
                total += v;
                total
            })
            .collect();
        TimeSeries {
            times: self.times.clone(),
            values,
        }
    }

    /// Set the value at `time`, inserting a new sample if no sample exists
    /// at exactly that time.
    pub fn insert_or_overwrite(&mut self, time: f64, value: f64) {
        match self
            .times
            .binary_search_by(|t| t.partial_cmp(&time).expect("validated times are finite"))
        {
            Ok(i) => self.values[i] = value,
            Err(i) => {
                self.times.insert(i, time);
                self.values.insert(i, value);
            }
        }
    }

    /// Linearly interpolated value at `time`. Returns `None` outside the
    /// series span.
    pub fn value_at(&self, time: f64) -> Option<f64> {
        let (t_first, _) = self.first();
        let (t_last, _) = self.last();
        if time < t_first || time > t_last {
            return None;
        }
        match self
            .times
            .binary_search_by(|t| t.partial_cmp(&time).expect("validated times are finite"))
        {
            Ok(i) => Some(self.values[i]),
            Err(i) => {
                let (t0, v0) = (self.times[i - 1], self.values[i - 1]);
                let (t1, v1) = (self.times[i], self.values[i]);
                Some(v0 + (v1 - v0) * (time - t0) / (t1 - t0))
            }
        }
    }

    /// Resample onto a uniform grid by linear interpolation.
    ///
    /// `step_hours` is the grid spacing; the grid runs from `start` to the
    /// last multiple of the step that fits inside `stop`. The routing loop
    /// assumes a pre-resampled series, so irregular inputs go through here
    /// first. The grid must lie inside the series span.
    pub fn resample(&self, start: f64, stop: f64, step_hours: f64) -> Result<TimeSeries, ModelError> {
        if step_hours <= 0.0 || !step_hours.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "step_hours",
                value: step_hours,
                constraint: "must be finite and > 0",
            });
        }
        if stop <= start {
            return Err(ModelError::DataShape(format!(
                "resample window [{start}, {stop}] is empty"
            )));
        }
        let n = ((stop - start) / step_hours).floor() as usize;
        let mut times = Vec::with_capacity(n + 1);
        let mut values = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let t = start + i as f64 * step_hours;
            let v = self.value_at(t).ok_or_else(|| {
                ModelError::DataShape(format!(
                    "resample time {t} is outside the series span"
                ))
            })?;
            times.push(t);
            values.push(v);
        }
        TimeSeries::new(times, values)
    }
}
