//! minimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build the L-BFGS solvers a [`Strategy`](crate::session::Strategy) asks
//! for, hiding Argmin's generic wiring and applying the session's
//! convergence settings, so higher layers request a configured solver
//! without touching Argmin types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS with a Hager–Zhang or More–Thuente line search.
//! - Take the history size from the strategy.
//! - Apply `tolerance` as the gradient-norm tolerance and `precision` as the
//!   cost-change tolerance via [`configure_lbfgs`].
//!
//! Conventions
//! -----------
//! - Builders do not set the start point or the iteration cap; both are
//!   runtime concerns of [`run_lbfgs`](super::run::run_lbfgs).
//! - Argmin errors from `with_tolerance_*` surface as
//!   [`OptError`](crate::optimization::errors::OptError) through `From<Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::{
    optimization::{
        errors::OptResult,
        minimizer::types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
        },
    },
    session::SessionOptions,
};

pub fn build_optimizer_hager_zhang(opts: &SessionOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, opts.strategy.lbfgs_mem());
    configure_lbfgs(lbfgs, opts)
}

pub fn build_optimizer_more_thuente(opts: &SessionOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let lbfgs = LbfgsMoreThuente::new(more_thuente, opts.strategy.lbfgs_mem());
    configure_lbfgs(lbfgs, opts)
}

pub fn configure_lbfgs<L>(
    solver: LBFGS<L, Theta, Grad, Cost>, opts: &SessionOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let solver = solver.with_tolerance_grad(opts.tolerance)?.with_tolerance_cost(opts.precision)?;
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        optimization::{errors::OptError, minimizer::types::DEFAULT_LBFGS_MEM},
        session::Strategy,
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both solver flavors for every strategy.
    // - Rejection of invalid tolerances by `configure_lbfgs`.
    //
    // They intentionally DO NOT cover:
    // - Running the solvers (see `run` and `api`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders succeed for each strategy's default options.
    //
    // Given
    // -----
    // - Default options with the strategy set to Fast, Default, Thorough.
    //
    // Expect
    // ------
    // - `Ok(_)` from both builders every time.
    fn builders_succeed_for_every_strategy() {
        for strategy in [Strategy::Fast, Strategy::Default, Strategy::Thorough] {
            let opts = SessionOptions { strategy, ..SessionOptions::default() };
            assert!(build_optimizer_hager_zhang(&opts).is_ok());
            assert!(build_optimizer_more_thuente(&opts).is_ok());
        }
    }

    #[test]
    // Purpose
    // -------
    // A negative tolerance that slipped past validation is still rejected
    // by Argmin and surfaces as an `OptError`.
    //
    // Given
    // -----
    // - Options with `tolerance = -1.0` written directly into the field.
    //
    // Expect
    // ------
    // - `configure_lbfgs` returns `Err(OptError::InvalidParameter { .. })`.
    fn configure_lbfgs_surfaces_argmin_rejection() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let opts = SessionOptions { tolerance: -1.0, ..SessionOptions::default() };

        let result = configure_lbfgs(raw, &opts);

        assert!(matches!(result, Err(OptError::InvalidParameter { .. })));
    }
}
