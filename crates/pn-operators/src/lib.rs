//! pn-operators: sparse port-Hamiltonian operators for discretized pipes.
//!
//! Every operator is a [`SparseOperator`]: an explicit triplet list plus the
//! compiled CSR matrix it replays into. Provided operators:
//! - E / Et: energy storage ([`storage`], [`storage_extended`])
//! - J / Jt: skew-symmetric interconnection ([`interconnection`],
//!   [`interconnection_extended`]) built from [`derivative`]
//! - U: boundary port selector ([`port_selector`])
//! - R / Rt: friction dissipation ([`Dissipation`], [`ExtendedDissipation`])
//! - Y: port output selector ([`output_selector`])
//! - G: input coupling ([`input_coupling`])
//!
//! [`Effort`] turns a (density, momentum) state into the co-state the
//! operators act on. [`block_diagonal`] composes per-pipe operators into one
//! network operator.
//!
//! # Example
//!
//! ```
//! use pn_operators::{block_diagonal, interconnection};
//!
//! let a = interconnection(3, 2, 0.5).unwrap();
//! let b = interconnection(4, 3, 0.25).unwrap();
//! let net = block_diagonal(&[&a, &b]).unwrap();
//! assert_eq!(net.nrows(), 5 + 7);
//! ```

pub mod dissipation;
pub mod effort;
pub mod error;
pub mod interconnection;
pub mod ports;
pub mod sparse;
pub mod storage;

// Re-exports
pub use dissipation::{Dissipation, ExtendedDissipation};
pub use effort::Effort;
pub use error::{OperatorError, OperatorResult};
pub use interconnection::{derivative, interconnection, interconnection_extended, port_selector};
pub use ports::{input_coupling, output_selector};
pub use sparse::{SparseOperator, Triplet, block_diagonal};
pub use storage::{storage, storage_extended};

/// Number of boundary ports every pipe exposes (inlet and outlet).
pub const PORT_COUNT: usize = 2;
