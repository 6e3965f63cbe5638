//! Parameter file validation.

use crate::schema::{CompressorDef, NetworkConfig, PipeDef, SolverDef};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: pipe {index} in {context}")]
    MissingReference { index: usize, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_config(config: &NetworkConfig) -> Result<(), ValidationError> {
    positive("gas_constant", config.gas_constant)?;

    let resolution = config.discretization.resolution;
    if resolution < 2 {
        return Err(ValidationError::InvalidValue {
            field: "discretization.resolution".to_string(),
            value: resolution.to_string(),
            reason: "at least two density nodes are required".to_string(),
        });
    }

    if config.pipes.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pipes".to_string(),
            value: "[]".to_string(),
            reason: "network needs at least one pipe".to_string(),
        });
    }

    let mut names = HashSet::new();
    for pipe in &config.pipes {
        if !names.insert(&pipe.name) {
            return Err(ValidationError::DuplicateName {
                name: pipe.name.clone(),
                context: "pipes".to_string(),
            });
        }
        validate_pipe(pipe)?;
    }

    let mut names = HashSet::new();
    for compressor in &config.compressors {
        if !names.insert(&compressor.name) {
            return Err(ValidationError::DuplicateName {
                name: compressor.name.clone(),
                context: "compressors".to_string(),
            });
        }
        validate_compressor(compressor, config.pipes.len())?;
    }

    finite("boundary.inlet_pressure", config.boundary.inlet_pressure)?;
    finite("boundary.outlet_momentum", config.boundary.outlet_momentum)?;
    let stations = &config.boundary.compressor_boundaries;
    if stations.len() != config.compressors.len() {
        return Err(ValidationError::InvalidValue {
            field: "boundary.compressor_boundaries".to_string(),
            value: stations.len().to_string(),
            reason: format!("expected one pair per compressor ({})", config.compressors.len()),
        });
    }
    for pair in stations {
        for v in pair {
            finite("boundary.compressor_boundaries", *v)?;
        }
    }

    if let Some(solver) = &config.solver {
        validate_solver(solver)?;
    }
    Ok(())
}

fn validate_pipe(pipe: &PipeDef) -> Result<(), ValidationError> {
    positive(&format!("pipes.{}.length", pipe.name), pipe.length)?;
    positive(&format!("pipes.{}.diameter", pipe.name), pipe.diameter)?;
    positive(&format!("pipes.{}.temperature", pipe.name), pipe.temperature)?;
    if !(pipe.friction.is_finite() && pipe.friction >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("pipes.{}.friction", pipe.name),
            value: pipe.friction.to_string(),
            reason: "must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_compressor(c: &CompressorDef, pipe_count: usize) -> Result<(), ValidationError> {
    for index in [c.upstream, c.downstream] {
        if index >= pipe_count {
            return Err(ValidationError::MissingReference {
                index,
                context: format!("compressor {}", c.name),
            });
        }
    }
    if c.upstream == c.downstream {
        return Err(ValidationError::InvalidValue {
            field: format!("compressors.{}.downstream", c.name),
            value: c.downstream.to_string(),
            reason: "must differ from upstream".to_string(),
        });
    }
    if c.kind == "FP" && c.model == "AV" {
        match c.isentropic_exponent {
            Some(kappa) => positive(&format!("compressors.{}.isentropic_exponent", c.name), kappa)?,
            None => {
                return Err(ValidationError::InvalidValue {
                    field: format!("compressors.{}.isentropic_exponent", c.name),
                    value: "missing".to_string(),
                    reason: "required for FP/AV compressors".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if solver.max_iterations == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "solver.max_iterations".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for (field, value) in [
        ("solver.abs_tol", solver.abs_tol),
        ("solver.rel_tol", solver.rel_tol),
        ("solver.step_tol", solver.step_tol),
    ] {
        if let Some(v) = value {
            positive(field, v)?;
        }
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}
