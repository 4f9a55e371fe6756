use crate::config::DEFAULT_RELATIVE_EPSILON;
use crate::lattice::UnitCell;

/// Three-way approximate comparison with a fixed absolute epsilon.
///
/// `lt`, `eq` and `gt` partition every pair of reals: exactly one of them holds.
#[derive(Debug, Clone, Copy)]
pub struct ToleranceComparator {
    epsilon: f64,
}

impl ToleranceComparator {
    pub fn with_epsilon(epsilon: f64) -> Self {
        ToleranceComparator {
            epsilon: epsilon.abs(),
        }
    }

    /// Scale `relative_epsilon` by the cube root of the cell volume.
    ///
    /// Derived once per reduction call and held fixed while iterating.
    pub fn for_cell(cell: &UnitCell, relative_epsilon: Option<f64>) -> Self {
        let relative_epsilon = relative_epsilon.unwrap_or(DEFAULT_RELATIVE_EPSILON);
        Self::with_epsilon(cell.volume().cbrt() * relative_epsilon)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn lt(&self, x: f64, y: f64) -> bool {
        x < y - self.epsilon
    }

    #[inline]
    pub fn gt(&self, x: f64, y: f64) -> bool {
        self.lt(y, x)
    }

    #[inline]
    pub fn eq(&self, x: f64, y: f64) -> bool {
        !(self.lt(x, y) || self.lt(y, x))
    }

    /// Count `(zero, positive)` entries among `values`.
    pub fn sign_counts(&self, values: [f64; 3]) -> (usize, usize) {
        values.iter().fold((0, 0), |(zero, positive), &v| {
            if self.lt(0.0, v) {
                (zero, positive + 1)
            } else if !self.lt(v, 0.0) {
                (zero + 1, positive)
            } else {
                (zero, positive)
            }
        })
    }

    /// Tolerance-aware "the product of the three values is strictly positive".
    pub fn product_is_positive(&self, values: [f64; 3]) -> bool {
        let (zero, positive) = self.sign_counts(values);
        positive == 3 || (zero == 0 && positive == 1)
    }
}
