//! Lattice module: unit cells and integer changes of basis.
//!
//! Quick reference
//! - Types: [`UnitCell`], [`ChangeOfBasis`]
//! - Construction: [`UnitCell::from_parameters`], [`UnitCell::from_metrical_matrix`], [`UnitCell::from_six`]
//! - Transforms: [`UnitCell::change_basis`], [`ChangeOfBasis::compose`], [`ChangeOfBasis::inverse`]

// ======================== MODULE DECLARATIONS ========================
pub mod change_of_basis;
pub mod unit_cell;

mod _tests_unit_cell;

// ======================== UNIT CELL ========================
#[doc(inline)]
pub use unit_cell::UnitCell;
// UnitCell impl methods:
//   from_parameters(parameters: [f64; 6]) -> Result<Self>        - (a, b, c, α, β, γ), angles in degrees
//   from_metrical_matrix(entries: [f64; 6]) -> Result<Self>      - (g11, g22, g33, g12, g13, g23)
//   from_six(values: [f64; 6], is_metrical_matrix: bool) -> Result<Self>
//   parameters(&self) -> [f64; 6]
//   metrical_matrix(&self) -> [f64; 6]
//   metric_tensor(&self) -> Matrix3<f64>                          - G = A^T * A
//   volume(&self) -> f64
//   change_basis(&self, cb: &ChangeOfBasis) -> Result<UnitCell>   - G' = M^T * G * M
//   is_similar_to(&self, other, rel_length_tol, abs_angle_tol) -> bool

// ======================== CHANGE OF BASIS ========================
#[doc(inline)]
pub use change_of_basis::ChangeOfBasis;
// ChangeOfBasis impl methods:
//   identity() -> Self
//   from_rows(rows: [[i32; 3]; 3]) -> Self
//   compose(&mut self, next: &ChangeOfBasis)                      - self <- self * next
//   determinant(&self) -> i32
//   inverse(&self) -> Option<ChangeOfBasis>                       - exact for unimodular matrices
