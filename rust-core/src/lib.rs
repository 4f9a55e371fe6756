//! Unit cell reduction library
//!
//! This library computes the Niggli-reduced cell of a crystallographic lattice with the
//! Křivý–Gruber (1976) algorithm, together with the unimodular change of basis that maps
//! the input basis onto the reduced one.

pub mod config;
pub mod error;
pub mod interfaces;
pub mod lattice;
pub mod reduction;

pub use error::ReductionError;
pub use lattice::{ChangeOfBasis, UnitCell};
pub use reduction::{
    is_buerger_cell, is_niggli_cell, minimum_reduction, niggli_reduction, ReductionResult,
};

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, ReductionError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
