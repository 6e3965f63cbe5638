//! Continuous pipe description.

use crate::error::{NetworkError, NetworkResult};
use pn_core::units::{Length, Temperature};

/// Isothermal pipe segment as given by the parameter file.
#[derive(Debug, Clone)]
pub struct Pipe {
    name: String,
    /// Pipe length
    pub length: Length,
    /// Pipe inner diameter
    pub diameter: Length,
    /// Darcy friction factor (dimensionless)
    pub friction: f64,
    /// Gas temperature, constant along the pipe
    pub temperature: Temperature,
}

impl Pipe {
    pub fn new(
        name: impl Into<String>,
        length: Length,
        diameter: Length,
        friction: f64,
        temperature: Temperature,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            diameter,
            friction,
            temperature,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self) -> NetworkResult<()> {
        if !(self.length.value.is_finite() && self.length.value > 0.0) {
            return Err(NetworkError::InvalidArg {
                what: "pipe length must be positive",
            });
        }
        if !(self.diameter.value.is_finite() && self.diameter.value > 0.0) {
            return Err(NetworkError::InvalidArg {
                what: "pipe diameter must be positive",
            });
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(NetworkError::InvalidArg {
                what: "friction factor must be non-negative",
            });
        }
        if !(self.temperature.value.is_finite() && self.temperature.value > 0.0) {
            return Err(NetworkError::InvalidArg {
                what: "temperature must be positive",
            });
        }
        Ok(())
    }
}
