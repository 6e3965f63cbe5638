//! Parameter file schema.

use pn_core::DEFAULT_GAS_CONSTANT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
    pub discretization: DiscretizationDef,
    pub pipes: Vec<PipeDef>,
    #[serde(default)]
    pub compressors: Vec<CompressorDef>,
    pub boundary: BoundaryDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
}

fn default_gas_constant() -> f64 {
    DEFAULT_GAS_CONSTANT
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscretizationDef {
    /// Density nodes per pipe
    pub resolution: usize,
}

/// Pipe in SI units: metres and kelvin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipeDef {
    pub name: String,
    pub length: f64,
    pub diameter: f64,
    pub friction: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressorDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isentropic_exponent: Option<f64>,
    pub upstream: usize,
    pub downstream: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub inlet_pressure: f64,
    pub outlet_momentum: f64,
    /// One `[upstream outlet, downstream inlet]` pair per compressor
    #[serde(default)]
    pub compressor_boundaries: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JacobianDef {
    #[default]
    Dual,
    FiniteDifference,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialGuessDef {
    Zero,
    #[default]
    Uniform,
}

/// Optional solver overrides; unset fields keep the solver defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SolverDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs_tol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_tol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_tol: Option<f64>,
    #[serde(default)]
    pub jacobian: JacobianDef,
    #[serde(default)]
    pub initial_guess: InitialGuessDef,
}
