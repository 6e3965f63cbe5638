//! pn-core: shared foundation for the port-Hamiltonian gas network crates.
//!
//! Contains:
//! - error (shared error type)
//! - numeric (Real + tolerances + float helpers)
//! - scalar (generic scalar for plain and dual-number evaluation)
//! - units (uom SI types + constructors)
//! - gas (explicit gas context replacing a process-wide constant)

pub mod error;
pub mod gas;
pub mod numeric;
pub mod scalar;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PnError, PnResult};
pub use gas::{DEFAULT_GAS_CONSTANT, GasContext};
pub use numeric::*;
pub use scalar::Scalar;
pub use units::*;
