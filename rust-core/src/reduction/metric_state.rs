use serde::{Deserialize, Serialize};

use crate::lattice::unit_cell::{is_positive_definite, metric_from_entries};
use crate::lattice::{ChangeOfBasis, UnitCell};
use crate::reduction::tolerance::ToleranceComparator;
use crate::Result;

/// The six Křivý–Gruber variables plus the accumulated change of basis.
///
/// `A, B, C` are the squared basis vector lengths and `D = 2 b·c`, `E = 2 a·c`,
/// `F = 2 a·b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    pub(crate) a: f64,
    pub(crate) b: f64,
    pub(crate) c: f64,
    pub(crate) d: f64,
    pub(crate) e: f64,
    pub(crate) f: f64,
    pub(crate) cb: ChangeOfBasis,
}

impl MetricState {
    pub fn from_unit_cell(cell: &UnitCell) -> Self {
        let [g11, g22, g33, g12, g13, g23] = cell.metrical_matrix();
        MetricState {
            a: g11,
            b: g22,
            c: g33,
            d: 2.0 * g23,
            e: 2.0 * g13,
            f: 2.0 * g12,
            cb: ChangeOfBasis::identity(),
        }
    }

    /// `(A, B, C, D, E, F)`
    pub fn values(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn change_of_basis(&self) -> &ChangeOfBasis {
        &self.cb
    }

    /// `(g11, g22, g33, g12, g13, g23)` of the current basis.
    pub fn metrical_matrix(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.f / 2.0, self.e / 2.0, self.d / 2.0]
    }

    pub fn is_positive_definite(&self) -> bool {
        is_positive_definite(&metric_from_entries(&self.metrical_matrix()))
    }

    pub fn to_unit_cell(&self) -> Result<UnitCell> {
        UnitCell::from_metrical_matrix(self.metrical_matrix())
    }

    /// All six values equal under `cmp`; the change of basis is ignored.
    pub fn approx_eq(&self, other: &MetricState, cmp: &ToleranceComparator) -> bool {
        self.values()
            .iter()
            .zip(other.values().iter())
            .all(|(&x, &y)| cmp.eq(x, y))
    }

    pub(crate) fn compose(&mut self, m: &ChangeOfBasis) {
        self.cb.compose(m);
    }

    // ======================== REDUCTION CONDITIONS ========================

    /// A ≤ B ≤ C, |D| ≤ B, |E| ≤ A, |F| ≤ A.
    pub fn meets_primary_conditions(&self, cmp: &ToleranceComparator) -> bool {
        let (a, b, c, d, e, f) = (self.a, self.b, self.c, self.d, self.e, self.f);
        !(cmp.gt(a, b)
            || cmp.gt(b, c)
            || cmp.gt(d.abs(), b)
            || cmp.gt(e.abs(), a)
            || cmp.gt(f.abs(), a))
    }

    /// Primary conditions plus a consistent sign pattern of D, E, F.
    pub fn meets_main_conditions(&self, cmp: &ToleranceComparator) -> bool {
        if !self.meets_primary_conditions(cmp) {
            return false;
        }
        let (_, positive) = cmp.sign_counts([self.d, self.e, self.f]);
        match positive {
            3 => true,
            // zeros only belong to the non-positive pattern
            0 => !cmp.lt(self.a + self.b + self.d + self.e + self.f, 0.0),
            _ => false,
        }
    }

    pub fn is_buerger(&self, cmp: &ToleranceComparator) -> bool {
        if !self.meets_main_conditions(cmp) {
            return false;
        }
        let (a, b, c, d, e, f) = (self.a, self.b, self.c, self.d, self.e, self.f);
        if cmp.eq(a, b) && cmp.gt(d.abs(), e.abs()) {
            return false;
        }
        if cmp.eq(b, c) && cmp.gt(e.abs(), f.abs()) {
            return false;
        }
        true
    }

    pub fn is_niggli(&self, cmp: &ToleranceComparator) -> bool {
        if !self.is_buerger(cmp) {
            return false;
        }
        let (a, b, d, e, f) = (self.a, self.b, self.d, self.e, self.f);
        let violated = (cmp.eq(d, b) && cmp.gt(f, e + e))
            || (cmp.eq(e, a) && cmp.gt(f, d + d))
            || (cmp.eq(f, a) && cmp.gt(e, d + d))
            || (cmp.eq(d, -b) && !cmp.eq(f, 0.0))
            || (cmp.eq(e, -a) && !cmp.eq(f, 0.0))
            || (cmp.eq(f, -a) && !cmp.eq(e, 0.0))
            || (cmp.eq(a + b + d + e + f, 0.0) && cmp.gt(a + a + e + e + f, 0.0));
        !violated
    }
}
