//! Bounded scalar optimization.
//!
//! Every best response in the dynamics reduces to minimizing a smooth
//! one-dimensional objective over a closed interval. This module implements
//! the classic bounded Brent method (golden-section search with successive
//! parabolic interpolation), which needs no derivatives and converges
//! superlinearly on the smooth, unimodal-in-practice objectives here.
//!
//! Objectives are plain closures: every call site captures its fixed
//! parameters directly, so no state is shared between optimizations.

/// Result of a bounded scalar optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOptimum {
    /// Location of the optimum within the bounds.
    pub x: f64,
    /// Objective value at `x` (the original, un-negated objective for
    /// [`maximize_scalar`]).
    pub value: f64,
    /// Number of objective evaluations used.
    pub evaluations: u32,
}

/// Errors from bounded scalar optimization.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// Bounds are inverted, degenerate, or non-finite.
    InvalidBounds(f64, f64),
    /// The objective returned NaN, so ordering candidates is meaningless.
    NanObjective(f64),
}

impl std::fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizeError::InvalidBounds(lo, hi) => {
                write!(f, "({}, {}) is not a valid optimization interval", lo, hi)
            }
            OptimizeError::NanObjective(x) => {
                write!(f, "objective returned NaN at x = {}", x)
            }
        }
    }
}

impl std::error::Error for OptimizeError {}

/// Absolute tolerance on the location of the optimum.
const XATOL: f64 = 1e-8;

/// Safety cap on objective evaluations; the tolerance is normally reached
/// within a few dozen.
const MAX_EVALS: u32 = 500;

const GOLDEN: f64 = 0.381_966_011_250_105_2; // (3 - sqrt(5)) / 2
const TINY: f64 = 1e-11;

/// Minimize `f` over the closed interval `[lo, hi]`.
///
/// Returns the best point found once the bracket shrinks below the internal
/// tolerance or the evaluation cap is hit; like any local method, it returns
/// its best estimate rather than certifying a global minimum.
pub fn minimize_scalar<F>(mut f: F, bounds: (f64, f64)) -> Result<ScalarOptimum, OptimizeError>
where
    F: FnMut(f64) -> f64,
{
    let (lo, hi) = bounds;
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(OptimizeError::InvalidBounds(lo, hi));
    }

    let mut a = lo;
    let mut b = hi;

    let mut x = a + GOLDEN * (b - a);
    let mut w = x;
    let mut v = x;

    let mut fx = f(x);
    if fx.is_nan() {
        return Err(OptimizeError::NanObjective(x));
    }
    let mut fw = fx;
    let mut fv = fx;

    let mut evaluations = 1u32;

    // Step taken two iterations ago (`e`) and the step about to be taken
    // (`d`); a parabolic step is only trusted when it undercuts half of `e`.
    let mut d = 0.0f64;
    let mut e = 0.0f64;

    while evaluations < MAX_EVALS {
        let mid = 0.5 * (a + b);
        let tol1 = XATOL * x.abs() + TINY;
        let tol2 = 2.0 * tol1;

        if (x - mid).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        let mut use_golden = true;

        if e.abs() > tol1 {
            // Parabola through (v, fv), (w, fw), (x, fx).
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;

            if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if (u - a) < tol2 || (b - u) < tol2 {
                    d = if x < mid { tol1 } else { -tol1 };
                }
                use_golden = false;
            }
        }

        if use_golden {
            e = if x < mid { b - x } else { a - x };
            d = GOLDEN * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else if d > 0.0 {
            x + tol1
        } else {
            x - tol1
        };

        let fu = f(u);
        if fu.is_nan() {
            return Err(OptimizeError::NanObjective(u));
        }
        evaluations += 1;

        if fu <= fx {
            if u < x {
                b = x;
            } else {
                a = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Ok(ScalarOptimum {
        x,
        value: fx,
        evaluations,
    })
}

/// Maximize `f` over `[lo, hi]` by minimizing its negation.
///
/// The returned `value` is the maximum of `f` itself.
pub fn maximize_scalar<F>(mut f: F, bounds: (f64, f64)) -> Result<ScalarOptimum, OptimizeError>
where
    F: FnMut(f64) -> f64,
{
    let mut best = minimize_scalar(|x| -f(x), bounds)?;
    best.value = -best.value;
    Ok(best)
}
