//! Safeguarded Newton iteration with bisection fallback for scalar equations.
//!
//! The caller supplies a bracket `[lo, hi]` with a sign change and a function returning both the
//! residual and its derivative. Newton steps are taken while they stay inside the shrinking
//! bracket and shrink the residual fast enough; otherwise the iteration bisects. Each step
//! keeps the root bracketed, so the loop terminates within `max_iterations` regardless of how
//! badly the derivative behaves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from [`NewtonBisection::find_root`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RootFindError {
    #[error("root not bracketed: f({lo}) = {f_lo}, f({hi}) = {f_hi}")]
    NotBracketed { lo: f64, hi: f64, f_lo: f64, f_hi: f64 },
    #[error("no convergence after {iterations} iterations (best x = {current_best}, f = {f_value})")]
    MaxIterations {
        current_best: f64,
        f_value: f64,
        iterations: usize,
    },
    #[error("residual evaluated to a non-finite value at x = {0}")]
    NonFinite(f64),
}

/// Converged root estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootEstimate {
    pub x: f64,
    pub f_value: f64,
    pub iterations: usize,
}

/// Newton–bisection hybrid solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonBisection {
    /// Relative step tolerance on `x`.
    pub x_tolerance: f64,
    /// Absolute tolerance on the residual.
    pub f_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonBisection {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-14,
            f_tolerance: 1e-14,
            max_iterations: 200,
        }
    }
}

impl NewtonBisection {
    pub fn new(x_tolerance: f64, f_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            x_tolerance,
            f_tolerance,
            max_iterations,
        }
    }

    /// Find a root of `f` inside `[lo, hi]`.
    ///
    /// `f` returns `(value, derivative)`. The endpoint residuals must differ in sign (or one of
    /// them must be exactly zero).
    pub fn find_root<F>(&self, mut f: F, lo: f64, hi: f64) -> Result<RootEstimate, RootFindError>
    where
        F: FnMut(f64) -> (f64, f64),
    {
        let (f_lo, _) = f(lo);
        let (f_hi, _) = f(hi);
        if !f_lo.is_finite() {
            return Err(RootFindError::NonFinite(lo));
        }
        if !f_hi.is_finite() {
            return Err(RootFindError::NonFinite(hi));
        }
        if f_lo == 0.0 {
            return Ok(RootEstimate {
                x: lo,
                f_value: 0.0,
                iterations: 0,
            });
        }
        if f_hi == 0.0 {
            return Ok(RootEstimate {
                x: hi,
                f_value: 0.0,
                iterations: 0,
            });
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(RootFindError::NotBracketed { lo, hi, f_lo, f_hi });
        }

        // Orient the bracket so that f(x_neg) < 0 < f(x_pos).
        let (mut x_neg, mut x_pos) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };
        let mut x = 0.5 * (lo + hi);
        let mut dx_old = (hi - lo).abs();
        let mut dx = dx_old;
        let (mut fx, mut dfx) = f(x);

        for iteration in 1..=self.max_iterations {
            if !fx.is_finite() {
                return Err(RootFindError::NonFinite(x));
            }
            if fx.abs() <= self.f_tolerance {
                return Ok(RootEstimate {
                    x,
                    f_value: fx,
                    iterations: iteration,
                });
            }

            let newton_leaves_bracket = ((x - x_pos) * dfx - fx) * ((x - x_neg) * dfx - fx) > 0.0;
            let newton_too_slow = (2.0 * fx).abs() > (dx_old * dfx).abs();
            if newton_leaves_bracket || newton_too_slow || !dfx.is_finite() {
                dx_old = dx;
                dx = 0.5 * (x_pos - x_neg);
                x = x_neg + dx;
            } else {
                dx_old = dx;
                dx = fx / dfx;
                x -= dx;
            }

            if dx.abs() <= self.x_tolerance * x.abs().max(f64::MIN_POSITIVE) {
                let (f_final, _) = f(x);
                return Ok(RootEstimate {
                    x,
                    f_value: f_final,
                    iterations: iteration,
                });
            }

            (fx, dfx) = f(x);
            if fx < 0.0 {
                x_neg = x;
            } else {
                x_pos = x;
            }
        }

        Err(RootFindError::MaxIterations {
            current_best: x,
            f_value: fx,
            iterations: self.max_iterations,
        })
    }
}
