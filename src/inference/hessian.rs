//! inference::hessian — covariance, errors and EDM from a Hessian.
//!
//! Purpose
//! -------
//! Turn the Hessian of the objective at a minimum into the quantities a fit
//! reports: the covariance matrix `2·up·H⁺`, per-parameter errors and the
//! estimated distance to the minimum `EDM = ½·gᵀH⁺g`. Conversion to
//! `nalgebra` happens here so the rest of the crate stays on `ndarray`.
//!
//! Key behaviors
//! -------------
//! - [`pseudo_inverse`]: Moore–Penrose pseudoinverse of a symmetric matrix
//!   via symmetric eigendecomposition with eigenvalue truncation, plus the
//!   rank and a positive-definiteness flag.
//! - [`covariance_from_hessian`]: scale `H⁺` by `2·error_def`.
//! - [`errors_from_covariance`]: square roots of the diagonal.
//! - [`estimated_distance_to_minimum`]: `½·gᵀH⁺g`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The Hessian is finite, square and symmetric (the finite-difference
//!   helpers guarantee this); it is not re-symmetrized here.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped, so flat or concave
//!   directions get no variance instead of a negative or infinite one.
//!
//! Conventions
//! -----------
//! - The objective follows the chi-square convention: a rise of
//!   `error_def` above the minimum defines a one-parameter error. For
//!   `f = χ²` and `error_def = 1`, errors equal `sqrt(diag(2·H⁻¹))`.
//! - No explicit matrix inverse is formed.
use crate::optimization::{
    errors::OptResult,
    minimizer::{types::Hessian, validation::validate_hessian},
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Pseudoinverse of a symmetric matrix with diagnostics.
///
/// Fields
/// ------
/// - `matrix`: `H⁺`.
/// - `rank`: number of eigenvalues kept.
/// - `positive_definite`: every eigenvalue was above [`EIGEN_EPS`].
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoInverse {
    pub matrix: Array2<f64>,
    pub rank: usize,
    pub positive_definite: bool,
}

/// pseudo_inverse — `H⁺ = Σ_{λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k`.
///
/// Errors
/// ------
/// - `OptError::HessianDimMismatch` / `InvalidHessian` when `hessian` is
///   not square or not finite.
pub fn pseudo_inverse(hessian: &Hessian) -> OptResult<PseudoInverse> {
    let n = hessian.nrows();
    validate_hessian(hessian, n)?;
    let mut h_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(hessian, &mut h_nalg);
    let eigen_decomp = h_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;

    let mut matrix = Array2::<f64>::zeros((n, n));
    let mut rank = 0;
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        rank += 1;
        for i in 0..n {
            let coeff = q[(i, k)] / lambda;
            for j in 0..n {
                matrix[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    Ok(PseudoInverse { matrix, rank, positive_definite: rank == n })
}

/// covariance_from_hessian — `2·error_def·H⁺` plus the decomposition used.
pub fn covariance_from_hessian(
    hessian: &Hessian, error_def: f64,
) -> OptResult<(Array2<f64>, PseudoInverse)> {
    let inverse = pseudo_inverse(hessian)?;
    let covariance = &inverse.matrix * (2.0 * error_def);
    Ok((covariance, inverse))
}

/// Square roots of the covariance diagonal; negative round-off maps to 0.
pub fn errors_from_covariance(covariance: &Array2<f64>) -> Array1<f64> {
    covariance.diag().mapv(|v| v.max(0.0).sqrt())
}

/// estimated_distance_to_minimum — `½·gᵀH⁺g`.
pub fn estimated_distance_to_minimum(gradient: &Array1<f64>, inverse: &PseudoInverse) -> f64 {
    0.5 * gradient.dot(&inverse.matrix.dot(gradient))
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into a pre-allocated `DMatrix`, column by column
/// to follow `DMatrix`'s column-major storage.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    let n = src.ncols();
    for j in 0..n {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Copying into `DMatrix` without modification.
    // - Covariance and errors for a chi-square bowl with known widths.
    // - Rank deficiency and indefiniteness flags.
    // - EDM for a known displacement.
    //
    // They intentionally DO NOT cover:
    // - Where the Hessian comes from (see `minimizer::finite_diff`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `fill_dmatrix` copies entries unchanged.
    //
    // Given
    // -----
    // - A 2×2 symmetric matrix with distinct entries.
    //
    // Expect
    // ------
    // - Identical entries in the `DMatrix`.
    fn fill_dmatrix_copies_without_modification() {
        let src: Array2<f64> = array![[2.0, 0.5], [0.5, 1.0]];
        let mut dst = DMatrix::<f64>::zeros(2, 2);

        fill_dmatrix(&src, &mut dst);

        assert_eq!(dst[(0, 0)], 2.0);
        assert_eq!(dst[(0, 1)], 0.5);
        assert_eq!(dst[(1, 0)], 0.5);
        assert_eq!(dst[(1, 1)], 1.0);
    }

    #[test]
    // Purpose
    // -------
    // For f = mu²/0.01 + (sigma − 1)²/0.04 and up = 1 the errors are the
    // bowl widths.
    //
    // Given
    // -----
    // - H = diag(200, 50), error_def = 1.
    //
    // Expect
    // ------
    // - errors ≈ (0.1, 0.2), positive definite, full rank.
    fn chi_square_bowl_errors_match_widths() {
        let h = array![[200.0, 0.0], [0.0, 50.0]];

        let (cov, inverse) = covariance_from_hessian(&h, 1.0).unwrap();
        let errors = errors_from_covariance(&cov);

        assert!(inverse.positive_definite);
        assert_eq!(inverse.rank, 2);
        assert_relative_eq!(errors[0], 0.1, max_relative = 1e-12);
        assert_relative_eq!(errors[1], 0.2, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Errors scale with sqrt(error_def).
    //
    // Given
    // -----
    // - The same Hessian with error_def = 4.
    //
    // Expect
    // ------
    // - errors ≈ (0.2, 0.4).
    fn errors_scale_with_sqrt_error_def() {
        let h = array![[200.0, 0.0], [0.0, 50.0]];

        let (cov, _) = covariance_from_hessian(&h, 4.0).unwrap();
        let errors = errors_from_covariance(&cov);

        assert_relative_eq!(errors[0], 0.2, max_relative = 1e-12);
        assert_relative_eq!(errors[1], 0.4, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Singular and indefinite Hessians are flagged and the bad directions
    // receive no variance.
    //
    // Given
    // -----
    // - diag(4, 0) and diag(4, −1).
    //
    // Expect
    // ------
    // - rank 1, not positive definite, zero variance on the second axis.
    fn singular_and_indefinite_hessians_are_flagged() {
        for h in [array![[4.0, 0.0], [0.0, 0.0]], array![[4.0, 0.0], [0.0, -1.0]]] {
            let inverse = pseudo_inverse(&h).unwrap();
            assert_eq!(inverse.rank, 1);
            assert!(!inverse.positive_definite);
            assert_relative_eq!(inverse.matrix[[0, 0]], 0.25, max_relative = 1e-12);
            assert!(inverse.matrix[[1, 1]].abs() < 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // EDM equals the quadratic rise for a displaced point.
    //
    // Given
    // -----
    // - f = ½·zᵀHz with H = diag(200, 50), at z = (0.01, 0.02): g = Hz.
    //
    // Expect
    // ------
    // - EDM = ½·zᵀHz = 0.02.
    fn edm_matches_quadratic_rise() {
        let h = array![[200.0, 0.0], [0.0, 50.0]];
        let z = array![0.01, 0.02];
        let g = h.dot(&z);

        let inverse = pseudo_inverse(&h).unwrap();

        assert_relative_eq!(estimated_distance_to_minimum(&g, &inverse), 0.02, max_relative = 1e-12);
    }
}
