#[cfg(test)]
mod _tests_unit_cell {
    use super::super::change_of_basis::ChangeOfBasis;
    use super::super::unit_cell::UnitCell;
    use crate::error::ReductionError;

    const TOL: f64 = 1e-10;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    // ==================== Construction from parameters ====================

    #[test]
    fn test_cubic_metrical_matrix() {
        let cell = UnitCell::from_parameters([10.0, 10.0, 10.0, 90.0, 90.0, 90.0]).unwrap();
        let g = cell.metrical_matrix();
        assert_close(g[0], 100.0, TOL);
        assert_close(g[1], 100.0, TOL);
        assert_close(g[2], 100.0, TOL);
        for off_diagonal in &g[3..] {
            assert_close(*off_diagonal, 0.0, 1e-12);
        }
        assert_close(cell.volume(), 1000.0, 1e-8);
    }

    #[test]
    fn test_hexagonal_metrical_matrix() {
        let cell = UnitCell::from_parameters([3.0, 3.0, 5.0, 90.0, 90.0, 120.0]).unwrap();
        let g = cell.metrical_matrix();
        // g12 = a * b * cos(120°)
        assert_close(g[3], -4.5, 1e-12);
        assert_close(cell.volume(), 9.0 * 3.0_f64.sqrt() / 2.0 * 5.0, 1e-9);
    }

    #[test]
    fn test_parameters_round_trip_through_metric() {
        let parameters = [4.2, 5.1, 6.3, 81.0, 97.5, 102.25];
        let cell = UnitCell::from_parameters(parameters).unwrap();
        let again = UnitCell::from_metrical_matrix(cell.metrical_matrix()).unwrap();
        for (expected, actual) in parameters.iter().zip(again.parameters().iter()) {
            assert_close(*actual, *expected, 1e-9);
        }
        assert!(cell.is_similar_to(&again, 1e-12, 1e-9));
    }

    #[test]
    fn test_from_six_dispatches_on_flag() {
        let from_parameters = UnitCell::from_six([2.0, 2.0, 2.0, 90.0, 90.0, 90.0], false).unwrap();
        let from_metric = UnitCell::from_six([4.0, 4.0, 4.0, 0.0, 0.0, 0.0], true).unwrap();
        assert!(from_parameters.is_similar_to(&from_metric, 1e-12, 1e-9));
    }

    // ==================== Invalid input ====================

    #[test]
    fn test_zero_angles_are_corrupt() {
        let err = UnitCell::from_parameters([1.0, 1.0, 1.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));
    }

    #[test]
    fn test_non_positive_lengths_are_corrupt() {
        for parameters in [
            [0.0, 1.0, 1.0, 90.0, 90.0, 90.0],
            [1.0, -2.0, 1.0, 90.0, 90.0, 90.0],
        ] {
            let err = UnitCell::from_parameters(parameters).unwrap_err();
            assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));
        }
    }

    #[test]
    fn test_impossible_angle_combination_is_corrupt() {
        // Angles that cannot close a parallelepiped
        let err = UnitCell::from_parameters([1.0, 1.0, 1.0, 10.0, 10.0, 170.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));
    }

    #[test]
    fn test_non_finite_parameters_are_corrupt() {
        let err = UnitCell::from_parameters([f64::NAN, 1.0, 1.0, 90.0, 90.0, 90.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));
    }

    #[test]
    fn test_indefinite_metric_is_corrupt() {
        let err = UnitCell::from_metrical_matrix([1.0, 1.0, 1.0, 2.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptMetricalMatrix { .. }));

        let err = UnitCell::from_six([-1.0, 1.0, 1.0, 0.0, 0.0, 0.0], true).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptMetricalMatrix { .. }));
    }

    #[test]
    fn test_coplanar_parameters_are_corrupt() {
        // cos(120°) rounding leaves det(G) around 1e-15 instead of 0
        let err = UnitCell::from_parameters([1.0, 1.0, 1.0, 120.0, 120.0, 120.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));

        // gamma = alpha + beta puts c in the ab plane
        let err = UnitCell::from_parameters([2.0, 3.0, 4.0, 50.0, 20.0, 70.0]).unwrap_err();
        assert!(matches!(err, ReductionError::CorruptUnitCell { .. }));
    }

    #[test]
    fn test_singular_metric_is_corrupt() {
        for entries in [
            [2.0, 3.0, 3.0, -1.0, 1.0, 2.0],
            [2.0, 2.0, 4.0, -2.0, 2.0, -2.0],
        ] {
            let err = UnitCell::from_metrical_matrix(entries).unwrap_err();
            assert!(matches!(err, ReductionError::CorruptMetricalMatrix { .. }));
        }
    }

    #[test]
    fn test_thin_but_valid_cell_is_accepted() {
        let cell = UnitCell::from_parameters([1.0, 1.0, 1.0, 119.0, 119.0, 119.0]).unwrap();
        assert!(cell.volume() > 0.0);
    }

    // ==================== Change of basis ====================

    #[test]
    fn test_change_basis_permutation() {
        let cell = UnitCell::from_parameters([3.0, 4.0, 5.0, 90.0, 90.0, 90.0]).unwrap();
        // new a = old c, new b = old a, new c = old b
        let cb = ChangeOfBasis::from_rows([[0, 1, 0], [0, 0, 1], [1, 0, 0]]);
        let permuted = cell.change_basis(&cb).unwrap();
        let (a, b, c) = permuted.lengths();
        assert_close(a, 5.0, TOL);
        assert_close(b, 3.0, TOL);
        assert_close(c, 4.0, TOL);
    }

    #[test]
    fn test_change_basis_preserves_volume() {
        let cell = UnitCell::from_parameters([4.2, 5.1, 6.3, 81.0, 97.5, 102.25]).unwrap();
        let cb = ChangeOfBasis::from_rows([[1, 2, 0], [0, 1, 0], [1, 1, 1]]);
        let skewed = cell.change_basis(&cb).unwrap();
        assert_close(skewed.volume(), cell.volume(), 1e-8);

        let back = skewed.change_basis(&cb.inverse().unwrap()).unwrap();
        assert!(back.is_similar_to(&cell, 1e-10, 1e-7));
    }

    #[test]
    fn test_change_basis_face_diagonal() {
        // new c = a + c on a cubic cell has length sqrt(2) * a
        let cell = UnitCell::from_parameters([2.0, 2.0, 2.0, 90.0, 90.0, 90.0]).unwrap();
        let cb = ChangeOfBasis::from_rows([[1, 0, 1], [0, 1, 0], [0, 0, 1]]);
        let sheared = cell.change_basis(&cb).unwrap();
        let (_, _, c) = sheared.lengths();
        let (_, beta, _) = sheared.angles();
        assert_close(c, 2.0 * 2.0_f64.sqrt(), TOL);
        assert_close(beta, 45.0, 1e-9);
    }
}
