use crate::lattice::UnitCell;
use crate::reduction::metric_state::MetricState;
use crate::reduction::tolerance::ToleranceComparator;
use crate::Result;

/// Starting state for a reduction: `(A, B, C, D, E, F)` with an identity change of basis.
pub fn to_metric_state(cell: &UnitCell) -> MetricState {
    MetricState::from_unit_cell(cell)
}

pub fn to_unit_cell(state: &MetricState) -> Result<UnitCell> {
    state.to_unit_cell()
}

/// Whether `cell` already satisfies the Buerger conditions (no iteration is run).
pub fn is_buerger_cell(cell: &UnitCell, relative_epsilon: Option<f64>) -> bool {
    let cmp = ToleranceComparator::for_cell(cell, relative_epsilon);
    to_metric_state(cell).is_buerger(&cmp)
}

/// Whether `cell` already satisfies the full Niggli conditions (no iteration is run).
pub fn is_niggli_cell(cell: &UnitCell, relative_epsilon: Option<f64>) -> bool {
    let cmp = ToleranceComparator::for_cell(cell, relative_epsilon);
    to_metric_state(cell).is_niggli(&cmp)
}
