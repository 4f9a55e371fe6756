// Definitions that are used throughout all modules

use serde::{Deserialize, Serialize};

use crate::reduction::metric_state::MetricState;

// Enumeration for the elementary Křivý–Gruber actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    N1,
    N2,
    N3Positive,
    N3NonPositive,
    A5,
    A6,
    A7,
    A8,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::N1 => "N1",
            Action::N2 => "N2",
            Action::N3Positive => "N3+",
            Action::N3NonPositive => "N3-",
            Action::A5 => "A5",
            Action::A6 => "A6",
            Action::A7 => "A7",
            Action::A8 => "A8",
        }
    }
}

// Which A3/A4 branch a step took (1 = positive product, 2 = non-positive product)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignBranch {
    Positive = 1,
    NonPositive = 2,
}

// How a reduction run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No condition applied any more
    Converged,
    /// Cycling was detected and a canonical representative was chosen
    Canonicalized,
}

/// Observer injected into the reduction engine.
///
/// Called after the A3/A4 sign branch is evaluated and after every A8 action, with the
/// state as it stands after the action.
pub trait ReductionHook {
    fn on_sign_branch(&mut self, _branch: SignBranch, _state: &MetricState) {}
    fn on_a8(&mut self, _state: &MetricState) {}
}

/// Hook that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHook;

impl ReductionHook for NoHook {}
