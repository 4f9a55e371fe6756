use serde::{Deserialize, Serialize};

use crate::config::ReductionConfig;
use crate::lattice::UnitCell;
use crate::reduction::krivy_gruber::niggli_reduction_with;
use crate::reduction::minimum_reduction::minimum_reduction_with;
use crate::reduction::reduction_result::ReductionResult;
use crate::Result;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which reduction routine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMode {
    #[default]
    Niggli,
    Minimum,
}

pub fn reduce(cell: &UnitCell, mode: ReductionMode, config: &ReductionConfig) -> Result<ReductionResult> {
    match mode {
        ReductionMode::Niggli => niggli_reduction_with(cell, config),
        ReductionMode::Minimum => minimum_reduction_with(cell, config),
    }
}

/// Reduce independent cells, in parallel when the `parallel` feature is enabled.
///
/// Results are returned in input order; one failing cell does not affect the others.
pub fn reduce_batch(
    cells: &[UnitCell],
    mode: ReductionMode,
    config: &ReductionConfig,
) -> Vec<Result<ReductionResult>> {
    #[cfg(feature = "parallel")]
    {
        cells.par_iter().map(|cell| reduce(cell, mode, config)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        cells.iter().map(|cell| reduce(cell, mode, config)).collect()
    }
}
