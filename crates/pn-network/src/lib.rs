//! pn-network: pipes, compressors and their discretized network system.
//!
//! A continuous [`Network`] owns its [`Pipe`]s and [`Compressor`]s. Calling
//! [`Network::discretize`] turns every pipe into a [`DiscretePipe`] and
//! assembles the block-diagonal [`DiscreteNetwork`], whose `set_state` is
//! called once per candidate state during a solve.
//!
//! # Example
//!
//! ```
//! use pn_core::{GasContext, k, m};
//! use pn_network::{Network, Pipe, DiscretizationParams};
//!
//! let pipe = Pipe::new("main", m(100.0), m(0.5), 0.01, k(280.0));
//! let network = Network::new(vec![pipe], vec![]).unwrap();
//! let discrete = network
//!     .discretize::<f64>(&DiscretizationParams { resolution: 5 }, &GasContext::default())
//!     .unwrap();
//! assert_eq!(discrete.n_state(), 9);
//! assert_eq!(discrete.n_res(), 11);
//! ```

pub mod compressor;
pub mod discrete;
pub mod error;
pub mod network;
pub mod pipe;

// Re-exports
pub use compressor::{Compressor, CompressorKind};
pub use discrete::{DiscretePipe, discretize};
pub use error::{NetworkError, NetworkResult};
pub use network::{DiscreteNetwork, DiscretizationParams, Network, NetworkBoundary, network_input};
pub use pipe::Pipe;
