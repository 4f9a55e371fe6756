use std::cmp::Ordering;

use log::{debug, trace, warn};

use crate::config::{DEFAULT_EXPECTED_CYCLE_LIMIT, MINIMUM_REDUCTION_ITERATION_LIMIT, ReductionConfig};
use crate::error::ReductionError;
use crate::interfaces::{ReductionHook, SignBranch, Termination};
use crate::lattice::UnitCell;
use crate::reduction::krivy_gruber::ReductionEngine;
use crate::reduction::metric_state::MetricState;
use crate::reduction::reduction_result::ReductionResult;
use crate::reduction::tolerance::ToleranceComparator;
use crate::Result;

/// Cycle bookkeeping for boundary lattices on which the plain iteration oscillates.
///
/// Installed as the engine's [`ReductionHook`]: every A3/A4 branch is tagged, and the
/// states after the closing actions (the A4 branch and A8) are remembered. A closing
/// state that matches an earlier one under the call's comparator counts as one cycle.
#[derive(Debug, Clone)]
pub struct MinimalReductionTracker {
    cmp: ToleranceComparator,
    expected_cycle_limit: usize,
    branch_tags: Vec<SignBranch>,
    history: Vec<MetricState>,
    cycle_candidates: Vec<MetricState>,
    n_cycles: usize,
}

impl MinimalReductionTracker {
    pub fn new(cmp: ToleranceComparator, expected_cycle_limit: usize) -> Self {
        MinimalReductionTracker {
            cmp,
            expected_cycle_limit,
            branch_tags: Vec::new(),
            history: Vec::new(),
            cycle_candidates: Vec::new(),
            n_cycles: 0,
        }
    }

    /// A3/A4 branch taken by each step, in order.
    pub fn branch_tags(&self) -> &[SignBranch] {
        &self.branch_tags
    }

    pub fn n_cycles(&self) -> usize {
        self.n_cycles
    }

    pub fn cycle_limit_exceeded(&self) -> bool {
        self.n_cycles > self.expected_cycle_limit
    }

    /// Record a state reached by a closing action.
    pub fn observe_closing(&mut self, state: &MetricState) {
        // Same values and basis as the previous observation: nothing happened in between
        if let Some(last) = self.history.last() {
            if last.change_of_basis() == state.change_of_basis() && last.approx_eq(state, &self.cmp)
            {
                return;
            }
        }

        if let Some(first) = self
            .history
            .iter()
            .position(|seen| seen.approx_eq(state, &self.cmp))
        {
            self.n_cycles += 1;
            self.cycle_candidates = self.history[first..].to_vec();
            trace!(
                "Cycle {} of length {} returning to {:?}",
                self.n_cycles,
                self.cycle_candidates.len(),
                state.values()
            );
        }
        self.history.push(*state);
    }

    /// Deterministic pick among the states of the last detected cycle.
    ///
    /// Niggli-valid states win; ties are broken by ordering
    /// `(A, B, C, |D|, |E|, |F|, D, E, F)` lexicographically.
    pub fn canonical_representative(&self) -> Option<MetricState> {
        let cmp = self.cmp;
        self.cycle_candidates.iter().copied().min_by(|x, y| {
            y.is_niggli(&cmp)
                .cmp(&x.is_niggli(&cmp))
                .then_with(|| compare_keys(&canonical_key(x), &canonical_key(y)))
        })
    }
}

impl ReductionHook for MinimalReductionTracker {
    fn on_sign_branch(&mut self, branch: SignBranch, state: &MetricState) {
        self.branch_tags.push(branch);
        if branch == SignBranch::NonPositive {
            self.observe_closing(state);
        }
    }

    fn on_a8(&mut self, state: &MetricState) {
        self.observe_closing(state);
    }
}

fn canonical_key(state: &MetricState) -> [f64; 9] {
    let [a, b, c, d, e, f] = state.values();
    [a, b, c, d.abs(), e.abs(), f.abs(), d, e, f]
}

fn compare_keys(x: &[f64; 9], y: &[f64; 9]) -> Ordering {
    x.iter()
        .zip(y.iter())
        .map(|(p, q)| p.total_cmp(q))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Niggli reduction with bounded cycling.
///
/// `expected_cycle_limit` defaults to 2 and `iteration_limit` (`step()` calls) to 100.
pub fn minimum_reduction(
    cell: &UnitCell,
    expected_cycle_limit: Option<usize>,
    iteration_limit: Option<usize>,
) -> Result<ReductionResult> {
    let config = ReductionConfig {
        expected_cycle_limit: expected_cycle_limit.unwrap_or(DEFAULT_EXPECTED_CYCLE_LIMIT),
        iteration_limit: iteration_limit.unwrap_or(MINIMUM_REDUCTION_ITERATION_LIMIT),
        ..ReductionConfig::minimum()
    };
    minimum_reduction_with(cell, &config)
}

pub fn minimum_reduction_with(cell: &UnitCell, config: &ReductionConfig) -> Result<ReductionResult> {
    let mut engine = ReductionEngine::new(cell, Some(config.relative_epsilon));
    let mut tracker = MinimalReductionTracker::new(*engine.comparator(), config.expected_cycle_limit);
    debug!(
        "Minimum reduction of {:?} (cycle limit {}, step limit {})",
        cell.parameters(),
        config.expected_cycle_limit,
        config.iteration_limit
    );

    loop {
        if engine.n_steps() >= config.iteration_limit {
            return Err(ReductionError::IterationLimitExceeded {
                limit: config.iteration_limit,
            });
        }
        if !engine.step_with(&mut tracker)? {
            return Ok(engine.into_result(Termination::Converged));
        }
        if tracker.cycle_limit_exceeded() {
            let canonical = tracker.canonical_representative().ok_or_else(|| {
                ReductionError::InternalInconsistency {
                    action: "cycle",
                    detail: "cycle detected without candidates".to_string(),
                }
            })?;
            warn!(
                "Reduction of {:?} cycled {} times; using canonical representative {:?}",
                cell.parameters(),
                tracker.n_cycles(),
                canonical.values()
            );
            return Ok(ReductionResult::new(
                canonical,
                engine.n_actions(),
                engine.n_steps(),
                Termination::Canonicalized,
            ));
        }
    }
}
