/// Routing methods and the parameters derived from them.
///
/// A method carries the calibration coefficients read from simulation
/// configuration; `RoutingParameters` is the per-element derived form the
/// routing loop actually consumes. Derivation happens once per element,
/// never per step.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Hours → seconds; the time axis is hours, the storage balance is in
/// seconds.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// A supported routing method with its calibration coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum RoutingMethod {
    /// URBS: K = 3600·α·L, with an optional inflow weighting X.
    Urbs {
        alpha: f64,
        exponent: f64,
        x: Option<f64>,
    },
    /// RORB: K = 3600·(k_c / d_ave)·L, X fixed at zero.
    Rorb {
        k_c: f64,
        d_ave: f64,
        exponent: f64,
    },
}

impl RoutingMethod {
    /// Build a method from its configuration name and coefficient table.
    ///
    /// Unknown names and missing coefficients are configuration errors; the
    /// optional URBS `X` defaults to zero when absent.
    pub fn from_coefficients(
        name: &str,
        coefficients: &HashMap<String, f64>,
    ) -> Result<Self, ModelError> {
        let require = |method: &'static str, key: &'static str| {
            coefficients
                .get(key)
                .copied()
                .ok_or(ModelError::MissingCoefficient { method, key })
        };
        match name {
            "urbs" => Ok(RoutingMethod::Urbs {
                alpha: require("urbs", "alpha")?,
                exponent: require("urbs", "exponent")?,
                x: coefficients.get("X").copied(),
            }),
            "rorb" => Ok(RoutingMethod::Rorb {
                k_c: require("rorb", "k_c")?,
                d_ave: require("rorb", "d_ave")?,
                exponent: require("rorb", "exponent")?,
            }),
            other => Err(ModelError::UnsupportedRoutingMethod(other.to_string())),
        }
    }
}

/// Derived routing parameters for one storage element. Immutable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingParameters {
    /// Time-scaled storage coefficient K [s].
    pub k: f64,
    /// Weighting between inflow and outflow in the storage relation, in
    /// [0, 1].
    pub x: f64,
    /// Nonlinearity of the storage-discharge relation, > 0.
    pub exponent: f64,
}

impl RoutingParameters {
    /// Create parameters, validating physical ranges.
    pub fn new(k: f64, x: f64, exponent: f64) -> Result<Self, ModelError> {
        if !(k > 0.0) || !k.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "K",
                value: k,
                constraint: "must be finite and > 0",
            });
        }
        if !(0.0..=1.0).contains(&x) {
            return Err(ModelError::ParameterOutOfRange {
                name: "X",
                value: x,
                constraint: "must be in [0, 1]",
            });
        }
        if !(exponent > 0.0) || !exponent.is_finite() {
            return Err(ModelError::ParameterOutOfRange {
                name: "exponent",
                value: exponent,
                constraint: "must be finite and > 0",
            });
        }
        Ok(Self { k, x, exponent })
    }

    /// Derive parameters from a routing method and reach length [km].
    pub fn from_method(method: &RoutingMethod, stream_length_km: f64) -> Result<Self, ModelError> {
        match *method {
            RoutingMethod::Urbs { alpha, exponent, x } => Self::new(
                SECONDS_PER_HOUR * alpha * stream_length_km,
                x.unwrap_or(0.0),
                exponent,
            ),
            RoutingMethod::Rorb {
                k_c,
                d_ave,
                exponent,
            } => {
                if !(d_ave > 0.0) {
                    return Err(ModelError::ParameterOutOfRange {
                        name: "d_ave",
                        value: d_ave,
                        constraint: "must be > 0",
                    });
                }
                Self::new(
                    SECONDS_PER_HOUR * k_c / d_ave * stream_length_km,
                    0.0,
                    exponent,
                )
            }
        }
    }
}
