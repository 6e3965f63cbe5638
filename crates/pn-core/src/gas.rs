//! Gas properties threaded explicitly through discretization and assembly.

use crate::numeric::ensure_finite;
use crate::{PnError, PnResult};

/// Specific gas constant used when nothing else is configured (J/(kg K)).
pub const DEFAULT_GAS_CONSTANT: f64 = 530.0;

/// Gas context handed to every effort and compressor-coupling computation.
///
/// One value per solve: set it before discretizing, then leave it alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasContext {
    gas_constant: f64,
}

impl Default for GasContext {
    fn default() -> Self {
        Self {
            gas_constant: DEFAULT_GAS_CONSTANT,
        }
    }
}

impl GasContext {
    pub fn new(gas_constant: f64) -> PnResult<Self> {
        let mut ctx = Self::default();
        ctx.set_gas_constant(gas_constant)?;
        Ok(ctx)
    }

    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }

    pub fn set_gas_constant(&mut self, gas_constant: f64) -> PnResult<()> {
        ensure_finite(gas_constant, "gas constant")?;
        if gas_constant <= 0.0 {
            return Err(PnError::InvalidArg {
                what: "gas constant must be positive",
            });
        }
        self.gas_constant = gas_constant;
        Ok(())
    }
}
