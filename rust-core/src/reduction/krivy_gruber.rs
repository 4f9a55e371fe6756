use log::{debug, trace};

use crate::config::{DEFAULT_ITERATION_LIMIT, ReductionConfig};
use crate::error::ReductionError;
use crate::interfaces::{Action, NoHook, ReductionHook, SignBranch, Termination};
use crate::lattice::{ChangeOfBasis, UnitCell};
use crate::reduction::metric_state::MetricState;
use crate::reduction::reduction_result::ReductionResult;
use crate::reduction::tolerance::ToleranceComparator;
use crate::Result;

const N1_MATRIX: [[i32; 3]; 3] = [[0, -1, 0], [-1, 0, 0], [0, 0, -1]];
const N2_MATRIX: [[i32; 3]; 3] = [[-1, 0, 0], [0, 0, -1], [0, -1, 0]];
const A5_POSITIVE: [[i32; 3]; 3] = [[1, 0, 0], [0, 1, -1], [0, 0, 1]];
const A5_NEGATIVE: [[i32; 3]; 3] = [[1, 0, 0], [0, 1, 1], [0, 0, 1]];
const A6_POSITIVE: [[i32; 3]; 3] = [[1, 0, -1], [0, 1, 0], [0, 0, 1]];
const A6_NEGATIVE: [[i32; 3]; 3] = [[1, 0, 1], [0, 1, 0], [0, 0, 1]];
const A7_POSITIVE: [[i32; 3]; 3] = [[1, -1, 0], [0, 1, 0], [0, 0, 1]];
const A7_NEGATIVE: [[i32; 3]; 3] = [[1, 1, 0], [0, 1, 0], [0, 0, 1]];
const A8_MATRIX: [[i32; 3]; 3] = [[1, 0, 1], [0, 1, 1], [0, 0, 1]];

/// Křivý–Gruber (1976) Niggli reduction of a metric state.
///
/// Each [`step`](ReductionEngine::step) applies at most one structural change; the state
/// is Niggli-reduced once a step reports `false`.
#[derive(Debug, Clone)]
pub struct ReductionEngine {
    state: MetricState,
    cmp: ToleranceComparator,
    n_actions: usize,
    n_steps: usize,
}

impl ReductionEngine {
    pub fn new(cell: &UnitCell, relative_epsilon: Option<f64>) -> Self {
        Self::from_state(
            MetricState::from_unit_cell(cell),
            ToleranceComparator::for_cell(cell, relative_epsilon),
        )
    }

    pub fn from_state(state: MetricState, cmp: ToleranceComparator) -> Self {
        ReductionEngine {
            state,
            cmp,
            n_actions: 0,
            n_steps: 0,
        }
    }

    pub fn state(&self) -> &MetricState {
        &self.state
    }

    pub fn comparator(&self) -> &ToleranceComparator {
        &self.cmp
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn step(&mut self) -> Result<bool> {
        self.step_with(&mut NoHook)
    }

    /// One pass over A1..A8, reporting the A3/A4 branch and A8 to `hook`.
    pub fn step_with<H: ReductionHook + ?Sized>(&mut self, hook: &mut H) -> Result<bool> {
        self.n_steps += 1;
        let cmp = self.cmp;

        // A1
        let s = self.state;
        if cmp.gt(s.a, s.b) || (cmp.eq(s.a, s.b) && cmp.gt(s.d.abs(), s.e.abs())) {
            self.n1_action();
        }

        // A2
        let s = self.state;
        if cmp.gt(s.b, s.c) || (cmp.eq(s.b, s.c) && cmp.gt(s.e.abs(), s.f.abs())) {
            self.n2_action();
            return Ok(true);
        }

        // A3 / A4
        let s = self.state;
        if cmp.product_is_positive([s.d, s.e, s.f]) {
            self.n3_positive_action();
            hook.on_sign_branch(SignBranch::Positive, &self.state);
        } else {
            self.n3_non_positive_action()?;
            hook.on_sign_branch(SignBranch::NonPositive, &self.state);
        }

        // A5
        let s = self.state;
        if cmp.gt(s.d.abs(), s.b)
            || (cmp.eq(s.d, s.b) && cmp.lt(s.e + s.e, s.f))
            || (cmp.eq(s.d, -s.b) && cmp.lt(s.f, 0.0))
        {
            self.a5_action()?;
            return self.finish_step(Action::A5);
        }

        // A6
        if cmp.gt(s.e.abs(), s.a)
            || (cmp.eq(s.e, s.a) && cmp.lt(s.d + s.d, s.f))
            || (cmp.eq(s.e, -s.a) && cmp.lt(s.f, 0.0))
        {
            self.a6_action()?;
            return self.finish_step(Action::A6);
        }

        // A7
        if cmp.gt(s.f.abs(), s.a)
            || (cmp.eq(s.f, s.a) && cmp.lt(s.d + s.d, s.e))
            || (cmp.eq(s.f, -s.a) && cmp.lt(s.e, 0.0))
        {
            self.a7_action()?;
            return self.finish_step(Action::A7);
        }

        // A8
        let sum = s.d + s.e + s.f + s.a + s.b;
        if cmp.lt(sum, 0.0) || (cmp.eq(sum, 0.0) && cmp.gt(s.a + s.a + s.e + s.e + s.f, 0.0)) {
            self.a8_action();
            hook.on_a8(&self.state);
            return self.finish_step(Action::A8);
        }

        Ok(false)
    }

    /// Drive [`step`](Self::step) until it reports `false`, failing once more than
    /// `iteration_limit` elementary actions have been applied.
    pub fn run(mut self, iteration_limit: usize) -> Result<ReductionResult> {
        while self.step()? {
            if self.n_actions > iteration_limit {
                return Err(ReductionError::IterationLimitExceeded {
                    limit: iteration_limit,
                });
            }
        }
        Ok(self.into_result(Termination::Converged))
    }

    pub fn into_result(self, termination: Termination) -> ReductionResult {
        ReductionResult::new(self.state, self.n_actions, self.n_steps, termination)
    }

    // ======================== ELEMENTARY ACTIONS ========================

    fn apply(&mut self, action: Action, m: ChangeOfBasis) {
        if !m.is_identity() {
            self.state.compose(&m);
            self.n_actions += 1;
        }
        trace!(
            "{} -> {:?} cb={}",
            action.as_str(),
            self.state.values(),
            self.state.change_of_basis()
        );
    }

    fn finish_step(&self, action: Action) -> Result<bool> {
        if !self.state.is_positive_definite() {
            return Err(ReductionError::InternalInconsistency {
                action: action.as_str(),
                detail: format!("metric {:?} is no longer positive definite", self.state.values()),
            });
        }
        Ok(true)
    }

    fn require_positive(action: Action, name: &str, value: f64) -> Result<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(ReductionError::InternalInconsistency {
                action: action.as_str(),
                detail: format!("{} = {} is not positive", name, value),
            })
        }
    }

    fn n1_action(&mut self) {
        let s = &mut self.state;
        std::mem::swap(&mut s.a, &mut s.b);
        std::mem::swap(&mut s.d, &mut s.e);
        self.apply(Action::N1, ChangeOfBasis::from_rows(N1_MATRIX));
    }

    fn n2_action(&mut self) {
        let s = &mut self.state;
        std::mem::swap(&mut s.b, &mut s.c);
        std::mem::swap(&mut s.e, &mut s.f);
        self.apply(Action::N2, ChangeOfBasis::from_rows(N2_MATRIX));
    }

    /// Make D, E, F all non-negative.
    fn n3_positive_action(&mut self) {
        let cmp = self.cmp;
        let s = &mut self.state;
        let sign = |v: f64| if cmp.lt(v, 0.0) { -1 } else { 1 };
        let m = ChangeOfBasis::diagonal(sign(s.d), sign(s.e), sign(s.f));
        s.d = s.d.abs();
        s.e = s.e.abs();
        s.f = s.f.abs();
        self.apply(Action::N3Positive, m);
    }

    /// Make D, E, F all non-positive.
    ///
    /// Flipping slot `i` negates the value of D, E or F at that slot as long as the
    /// product of the three signs stays +1; a zero slot absorbs a leftover flip.
    fn n3_non_positive_action(&mut self) -> Result<()> {
        let cmp = self.cmp;
        let s = &mut self.state;
        let mut signs = [1, 1, 1];
        let mut zero_slot = None;
        for (i, &v) in [s.d, s.e, s.f].iter().enumerate() {
            if cmp.gt(v, 0.0) {
                signs[i] = -1;
            } else if !cmp.lt(v, 0.0) {
                zero_slot = Some(i);
            }
        }
        if signs.iter().product::<i32>() < 0 {
            match zero_slot {
                Some(z) => signs[z] = -1,
                None => {
                    return Err(ReductionError::InternalInconsistency {
                        action: Action::N3NonPositive.as_str(),
                        detail: format!("no zero slot to balance signs of {:?}", [s.d, s.e, s.f]),
                    })
                }
            }
        }
        s.d = -s.d.abs();
        s.e = -s.e.abs();
        s.f = -s.f.abs();
        self.apply(
            Action::N3NonPositive,
            ChangeOfBasis::diagonal(signs[0], signs[1], signs[2]),
        );
        Ok(())
    }

    fn a5_action(&mut self) -> Result<()> {
        let s = &mut self.state;
        let m = if s.d > 0.0 {
            s.c += s.b - s.d;
            s.d -= s.b + s.b;
            s.e -= s.f;
            A5_POSITIVE
        } else {
            s.c += s.b + s.d;
            s.d += s.b + s.b;
            s.e += s.f;
            A5_NEGATIVE
        };
        self.apply(Action::A5, ChangeOfBasis::from_rows(m));
        Self::require_positive(Action::A5, "c", self.state.c)
    }

    fn a6_action(&mut self) -> Result<()> {
        let s = &mut self.state;
        let m = if s.e > 0.0 {
            s.c += s.a - s.e;
            s.d -= s.f;
            s.e -= s.a + s.a;
            A6_POSITIVE
        } else {
            s.c += s.a + s.e;
            s.d += s.f;
            s.e += s.a + s.a;
            A6_NEGATIVE
        };
        self.apply(Action::A6, ChangeOfBasis::from_rows(m));
        Self::require_positive(Action::A6, "c", self.state.c)
    }

    fn a7_action(&mut self) -> Result<()> {
        let s = &mut self.state;
        let m = if s.f > 0.0 {
            s.b += s.a - s.f;
            s.d -= s.e;
            s.f -= s.a + s.a;
            A7_POSITIVE
        } else {
            s.b += s.a + s.f;
            s.d += s.e;
            s.f += s.a + s.a;
            A7_NEGATIVE
        };
        self.apply(Action::A7, ChangeOfBasis::from_rows(m));
        Self::require_positive(Action::A7, "b", self.state.b)
    }

    fn a8_action(&mut self) {
        let s = &mut self.state;
        s.c += s.a + s.b + s.d + s.e + s.f;
        s.d += s.b + s.b + s.f;
        s.e += s.a + s.a + s.f;
        self.apply(Action::A8, ChangeOfBasis::from_rows(A8_MATRIX));
    }
}

/// Niggli-reduce `cell`.
///
/// `relative_epsilon` defaults to [`DEFAULT_RELATIVE_EPSILON`](crate::config::DEFAULT_RELATIVE_EPSILON),
/// `iteration_limit` (elementary actions) to [`DEFAULT_ITERATION_LIMIT`].
pub fn niggli_reduction(
    cell: &UnitCell,
    relative_epsilon: Option<f64>,
    iteration_limit: Option<usize>,
) -> Result<ReductionResult> {
    let iteration_limit = iteration_limit.unwrap_or(DEFAULT_ITERATION_LIMIT);
    let engine = ReductionEngine::new(cell, relative_epsilon);
    debug!(
        "Niggli reduction of {:?} (epsilon {:e}, limit {})",
        cell.parameters(),
        engine.comparator().epsilon(),
        iteration_limit
    );
    let result = engine.run(iteration_limit)?;
    debug!(
        "Reduced to {:?} after {} actions in {} steps",
        result.values(),
        result.n_actions(),
        result.n_steps()
    );
    Ok(result)
}

pub fn niggli_reduction_with(cell: &UnitCell, config: &ReductionConfig) -> Result<ReductionResult> {
    niggli_reduction(
        cell,
        Some(config.relative_epsilon),
        Some(config.iteration_limit),
    )
}
