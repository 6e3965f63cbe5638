//! pn-config: parameter file format, validation and conversion into a network.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

use pn_core::{GasContext, PnError, k, m};
use pn_network::{
    Compressor, CompressorKind, DiscretizationParams, Network, NetworkBoundary, NetworkError, Pipe,
};
use pn_solver::{InitialGuess, JacobianMode, SolverConfig};
use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Gas properties error: {0}")]
    Gas(#[from] PnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a JSON or YAML parameter file, chosen by extension.
pub fn load(path: &Path) -> ConfigResult<NetworkConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml" | "yml") => load_yaml(path),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

pub fn load_yaml(path: &Path) -> ConfigResult<NetworkConfig> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn load_json(path: &Path) -> ConfigResult<NetworkConfig> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn from_yaml_str(content: &str) -> ConfigResult<NetworkConfig> {
    let config: NetworkConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn from_json_str(content: &str) -> ConfigResult<NetworkConfig> {
    let config: NetworkConfig = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &NetworkConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_json(path: &Path, config: &NetworkConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

impl NetworkConfig {
    pub fn gas_context(&self) -> ConfigResult<GasContext> {
        Ok(GasContext::new(self.gas_constant)?)
    }

    pub fn discretization_params(&self) -> DiscretizationParams {
        DiscretizationParams {
            resolution: self.discretization.resolution,
        }
    }

    pub fn to_network(&self) -> ConfigResult<Network> {
        let pipes = self
            .pipes
            .iter()
            .map(|p| {
                Pipe::new(
                    p.name.clone(),
                    m(p.length),
                    m(p.diameter),
                    p.friction,
                    k(p.temperature),
                )
            })
            .collect();
        let compressors = self
            .compressors
            .iter()
            .map(|c| {
                let kind = CompressorKind::from_tags(&c.kind, &c.model, c.isentropic_exponent)?;
                Ok(Compressor::new(c.name.clone(), kind, c.upstream, c.downstream))
            })
            .collect::<Result<Vec<_>, NetworkError>>()?;
        Ok(Network::new(pipes, compressors)?)
    }

    pub fn network_boundary(&self) -> NetworkBoundary {
        NetworkBoundary {
            inlet_pressure: self.boundary.inlet_pressure,
            outlet_momentum: self.boundary.outlet_momentum,
            compressor_boundaries: self.boundary.compressor_boundaries.clone(),
        }
    }

    /// Solver defaults with this file's overrides applied.
    pub fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::default();
        let Some(def) = &self.solver else {
            return config;
        };
        let gn = &mut config.gauss_newton;
        if let Some(v) = def.max_iterations {
            gn.max_iterations = v;
        }
        if let Some(v) = def.abs_tol {
            gn.abs_tol = v;
        }
        if let Some(v) = def.rel_tol {
            gn.rel_tol = v;
        }
        if let Some(v) = def.step_tol {
            gn.step_tol = v;
        }
        config.jacobian = match def.jacobian {
            JacobianDef::Dual => JacobianMode::Dual,
            JacobianDef::FiniteDifference => JacobianMode::FiniteDifference,
        };
        config.initial_guess = match def.initial_guess {
            InitialGuessDef::Zero => InitialGuess::Zero,
            InitialGuessDef::Uniform => InitialGuess::Uniform,
        };
        config
    }
}
