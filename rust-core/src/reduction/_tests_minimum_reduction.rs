#[cfg(test)]
mod _tests_minimum_reduction {
    use super::super::krivy_gruber::{niggli_reduction, niggli_reduction_with};
    use super::super::metric_state::MetricState;
    use super::super::minimum_reduction::{minimum_reduction, minimum_reduction_with, MinimalReductionTracker};
    use super::super::tolerance::ToleranceComparator;
    use crate::config::ReductionConfig;
    use crate::error::ReductionError;
    use crate::interfaces::{ReductionHook, SignBranch, Termination};
    use crate::lattice::{ChangeOfBasis, UnitCell};

    fn state(values: [f64; 6], cb: [[i32; 3]; 3]) -> MetricState {
        let [a, b, c, d, e, f] = values;
        MetricState {
            a,
            b,
            c,
            d,
            e,
            f,
            cb: ChangeOfBasis::from_rows(cb),
        }
    }

    fn tracker(limit: usize) -> MinimalReductionTracker {
        MinimalReductionTracker::new(ToleranceComparator::with_epsilon(1e-6), limit)
    }

    const IDENTITY: [[i32; 3]; 3] = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

    // Niggli-reduced
    fn niggli_state() -> MetricState {
        state([3.0, 4.0, 4.0, 4.0, 1.5, 2.5], [[-1, 0, 0], [0, -1, -1], [0, 0, 1]])
    }

    // Same lengths, mixed signs
    fn mixed_state() -> MetricState {
        state([3.0, 4.0, 4.0, -4.0, -1.5, 2.5], [[1, 0, 0], [0, 1, -1], [0, 0, 1]])
    }

    // ==================== Tracker ====================

    #[test]
    fn test_alternating_states_count_cycles() {
        let mut t = tracker(2);
        let (x, y) = (mixed_state(), niggli_state());

        t.observe_closing(&x);
        t.observe_closing(&y);
        assert_eq!(t.n_cycles(), 0);
        assert!(t.canonical_representative().is_none());

        t.observe_closing(&x);
        assert_eq!(t.n_cycles(), 1);
        t.observe_closing(&y);
        assert_eq!(t.n_cycles(), 2);
        assert!(!t.cycle_limit_exceeded());

        t.observe_closing(&x);
        assert_eq!(t.n_cycles(), 3);
        assert!(t.cycle_limit_exceeded());
    }

    #[test]
    fn test_canonical_prefers_niggli_state() {
        let mut t = tracker(0);
        t.observe_closing(&mixed_state());
        t.observe_closing(&niggli_state());
        t.observe_closing(&mixed_state());
        assert!(t.cycle_limit_exceeded());

        let canonical = t.canonical_representative().unwrap();
        assert_eq!(canonical.values(), niggli_state().values());
        assert_eq!(canonical.change_of_basis(), niggli_state().change_of_basis());
    }

    #[test]
    fn test_canonical_breaks_ties_lexicographically() {
        // Neither is Niggli-valid; |D|, |E|, |F| agree, so the signed D decides
        let x = state([1.0, 2.0, 3.0, -1.0, 0.5, 0.5], IDENTITY);
        let y = state([1.0, 2.0, 3.0, 1.0, -0.5, 0.5], [[1, 0, 0], [0, -1, 0], [0, 0, -1]]);
        let mut t = tracker(0);
        t.observe_closing(&y);
        t.observe_closing(&x);
        t.observe_closing(&y);

        let canonical = t.canonical_representative().unwrap();
        assert_eq!(canonical.values(), x.values());
    }

    #[test]
    fn test_consecutive_duplicate_is_not_a_cycle() {
        let mut t = tracker(2);
        let s = niggli_state();
        t.observe_closing(&s);
        t.observe_closing(&s);
        t.observe_closing(&s);
        assert_eq!(t.n_cycles(), 0);

        // Same values reached through a different basis is a genuine return
        let mut moved = s;
        moved.cb = ChangeOfBasis::identity();
        t.observe_closing(&moved);
        assert_eq!(t.n_cycles(), 1);
    }

    #[test]
    fn test_hook_tags_branches() {
        let mut t = tracker(2);
        let s = niggli_state();
        t.on_sign_branch(SignBranch::Positive, &s);
        t.on_sign_branch(SignBranch::NonPositive, &mixed_state());
        t.on_sign_branch(SignBranch::Positive, &s);
        assert_eq!(
            t.branch_tags(),
            &[SignBranch::Positive, SignBranch::NonPositive, SignBranch::Positive]
        );
        assert_eq!(t.n_cycles(), 0);

        // A8 closings are observed as well
        t.on_a8(&mixed_state());
        t.on_a8(&s);
        t.on_a8(&mixed_state());
        assert_eq!(t.n_cycles(), 1);
    }

    // ==================== Full reduction ====================

    #[test]
    fn test_converges_like_niggli_reduction() {
        let cell = UnitCell::from_parameters([4.2, 5.1, 6.3, 81.0, 97.5, 102.25])
            .unwrap()
            .change_basis(&ChangeOfBasis::from_rows([[1, 2, 0], [0, 1, 0], [1, 1, 1]]))
            .unwrap();
        let minimum = minimum_reduction(&cell, None, None).unwrap();
        let niggli = niggli_reduction(&cell, None, None).unwrap();
        assert_eq!(minimum.termination(), Termination::Converged);
        assert_eq!(minimum.values(), niggli.values());
        assert_eq!(minimum.change_of_basis(), niggli.change_of_basis());
    }

    #[test]
    fn test_cubic_converges_immediately() {
        let cell = UnitCell::from_parameters([10.0, 10.0, 10.0, 90.0, 90.0, 90.0]).unwrap();
        let result = minimum_reduction(&cell, None, None).unwrap();
        assert!(result.converged());
        assert!(result.change_of_basis().is_identity());
        assert_eq!(result.n_steps(), 1);
    }

    #[test]
    fn test_boundary_lattices_are_deterministic() {
        let cells = [
            // body-centred cubic primitive cell: A + B + D + E + F = 0
            UnitCell::from_metrical_matrix([1.0, 1.0, 1.0, -1.0 / 3.0, -1.0 / 3.0, -1.0 / 3.0]).unwrap(),
            // face-centred cubic primitive cell: D = B and F = 2E
            UnitCell::from_metrical_matrix([1.0, 1.0, 1.0, 0.5, 0.5, 0.5]).unwrap(),
        ];
        for cell in &cells {
            let first = minimum_reduction(cell, None, None).unwrap();
            let second = minimum_reduction(cell, None, None).unwrap();
            assert_eq!(first, second);
            assert!(first.converged());
            assert!(first.change_of_basis().is_identity());
            let cmp = ToleranceComparator::for_cell(cell, None);
            assert!(first.state().is_niggli(&cmp));
        }
    }

    // With a coarse epsilon the A4 branch and A8 keep returning to the same states
    fn cycling_cell() -> UnitCell {
        UnitCell::from_metrical_matrix([4.5, 4.0, 5.0, -1.0, 1.5, 1.5]).unwrap()
    }

    fn coarse_config() -> ReductionConfig {
        ReductionConfig {
            relative_epsilon: 0.3,
            ..ReductionConfig::minimum()
        }
    }

    #[test]
    fn test_cycling_cell_is_canonicalized() {
        let cell = cycling_cell();
        let result = minimum_reduction_with(&cell, &coarse_config()).unwrap();

        assert_eq!(result.termination(), Termination::Canonicalized);
        assert!(!result.converged());
        assert_eq!(result.n_steps(), 5);
        assert_eq!(result.values(), [4.5, 4.0, 5.0, -3.0, -3.0, -2.0]);
        assert_eq!(result.change_of_basis().rows(), [[-1, 0, 0], [0, -1, 0], [0, 0, 1]]);
        assert_eq!(result.change_of_basis().determinant().abs(), 1);

        // The reported matrix maps the input onto the canonical cell
        let mapped = cell.change_basis(result.change_of_basis()).unwrap();
        assert!(mapped.is_similar_to(&result.as_unit_cell().unwrap(), 1e-12, 1e-9));
    }

    #[test]
    fn test_canonicalization_is_deterministic() {
        let cell = cycling_cell();
        let first = minimum_reduction_with(&cell, &coarse_config()).unwrap();
        for _ in 0..3 {
            assert_eq!(minimum_reduction_with(&cell, &coarse_config()).unwrap(), first);
        }
    }

    #[test]
    fn test_plain_reduction_of_cycling_cell_hits_limit() {
        let config = ReductionConfig {
            relative_epsilon: 0.3,
            ..ReductionConfig::default()
        };
        let err = niggli_reduction_with(&cycling_cell(), &config).unwrap_err();
        assert_eq!(err, ReductionError::IterationLimitExceeded { limit: 1000 });
    }

    #[test]
    fn test_cycling_cell_within_step_budget() {
        let config = ReductionConfig {
            iteration_limit: 4,
            ..coarse_config()
        };
        let err = minimum_reduction_with(&cycling_cell(), &config).unwrap_err();
        assert_eq!(err, ReductionError::IterationLimitExceeded { limit: 4 });

        let config = ReductionConfig {
            iteration_limit: 5,
            ..coarse_config()
        };
        let result = minimum_reduction_with(&cycling_cell(), &config).unwrap();
        assert_eq!(result.termination(), Termination::Canonicalized);
    }

    #[test]
    fn test_step_limit_counts_steps() {
        let cell = UnitCell::from_metrical_matrix([3.0, 4.0, 4.0, 1.25, 0.5, 2.0]).unwrap();
        let err = minimum_reduction(&cell, None, Some(1)).unwrap_err();
        assert_eq!(err, ReductionError::IterationLimitExceeded { limit: 1 });

        let result = minimum_reduction(&cell, None, Some(2)).unwrap();
        assert_eq!(result.values(), [3.0, 4.0, 4.0, 4.0, 1.5, 2.5]);
        assert_eq!(result.n_steps(), 2);
    }

    #[test]
    fn test_config_entry_point() {
        let cell = UnitCell::from_parameters([5.0, 3.0, 4.0, 90.0, 90.0, 90.0]).unwrap();
        let result = minimum_reduction_with(&cell, &ReductionConfig::minimum()).unwrap();
        assert_eq!(result.change_of_basis().rows(), [[0, 0, 1], [1, 0, 0], [0, 1, 0]]);
    }
}
