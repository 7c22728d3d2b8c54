//! Best-response optimizers for each player, including level-k variants.
//!
//! Every function here builds a fresh closure over its fixed parameters and
//! hands it to the bounded scalar optimizer; no state is shared between
//! calls. The level-k variants nest one optimization inside another: a
//! player scores each candidate of its own parameter at the best response
//! the opponent would choose against it.

use crate::dynamics::accept::responder_utility;
use crate::dynamics::config::BargainConfig;
use crate::dynamics::optimize::{maximize_scalar, OptimizeError, ScalarOptimum};
use crate::dynamics::utility::{proposer_utility, responder_utility_horizon, SwitchRule};

/// Responder's myopic best response: the alpha maximizing its one-shot
/// utility against a fixed offer. Ignores all future rounds.
pub fn best_alpha(offer: f64, config: &BargainConfig) -> Result<ScalarOptimum, OptimizeError> {
    maximize_scalar(
        |alpha| responder_utility(offer, alpha, config.u_bad_responder),
        config.alpha_bounds,
    )
}

/// Proposer's best response: the offer maximizing its finite-horizon
/// utility against a fixed alpha, under the given switch rule.
pub fn best_offer(
    alpha: f64,
    rule: SwitchRule,
    config: &BargainConfig,
) -> Result<ScalarOptimum, OptimizeError> {
    maximize_scalar(
        |offer| proposer_utility(offer, alpha, config.depth, config, rule),
        config.offer_bounds,
    )
}

/// Responder's horizon-aware best response to a fixed offer, using its own
/// finite-horizon recursion but without anticipating any reaction from the
/// Proposer.
pub fn best_alpha_given_offer(
    offer: f64,
    config: &BargainConfig,
) -> Result<ScalarOptimum, OptimizeError> {
    maximize_scalar(
        |alpha| responder_utility_horizon(offer, alpha, config.depth, config.u_bad_responder),
        config.alpha_bounds,
    )
}

/// Responder's level-k best response: chooses alpha assuming the Proposer
/// will counter every candidate with its own best offer under `rule`.
///
/// The inner solve cannot fail once the config has been validated; if it
/// somehow does, that candidate scores as worst-possible rather than
/// aborting the outer search.
pub fn best_alpha_level_k(
    rule: SwitchRule,
    config: &BargainConfig,
) -> Result<ScalarOptimum, OptimizeError> {
    maximize_scalar(
        |alpha| match best_offer(alpha, rule, config) {
            Ok(reply) => {
                responder_utility_horizon(reply.x, alpha, config.depth, config.u_bad_responder)
            }
            Err(_) => f64::NEG_INFINITY,
        },
        config.alpha_bounds,
    )
}

/// Proposer's level-k best response: chooses the offer assuming the
/// Responder will counter every candidate with [`best_alpha_given_offer`].
pub fn best_offer_level_k(
    rule: SwitchRule,
    config: &BargainConfig,
) -> Result<ScalarOptimum, OptimizeError> {
    maximize_scalar(
        |offer| match best_alpha_given_offer(offer, config) {
            Ok(reply) => proposer_utility(offer, reply.x, config.depth, config, rule),
            Err(_) => f64::NEG_INFINITY,
        },
        config.offer_bounds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::accept::p_accept;

    fn config() -> BargainConfig {
        BargainConfig::default().with_p_bump(0.1)
    }

    #[test]
    fn test_best_alpha_saturates_for_acceptable_offer() {
        // At offer 50, accepting (-50) beats the bad outcome (-75), so the
        // responder wants maximal decisiveness: alpha pins to the top bound.
        let cfg = config();
        let opt = best_alpha(50.0, &cfg).unwrap();
        assert!((opt.x - cfg.alpha_bounds.1).abs() < 1e-3);
    }

    #[test]
    fn test_best_alpha_in_bounds_for_bad_offer() {
        // At offer 90, accepting (-90) is worse than -75, so decisive
        // rejection is optimal. Whatever the optimizer picks must stay in
        // bounds and beat an arbitrary midpoint candidate.
        let cfg = config();
        let opt = best_alpha(90.0, &cfg).unwrap();
        assert!(opt.x >= cfg.alpha_bounds.0 && opt.x <= cfg.alpha_bounds.1);
        let midpoint = responder_utility(90.0, 5.0, cfg.u_bad_responder);
        assert!(opt.value >= midpoint - 1e-12);
    }

    #[test]
    fn test_best_offer_interior_optimum() {
        // Against a noisy responder (alpha = 0.1) the optimal offer balances
        // acceptance probability against give-away; it lands strictly inside
        // the bounds.
        let cfg = config();
        let opt = best_offer(0.1, SwitchRule::Fixed, &cfg).unwrap();
        assert!(opt.x > cfg.offer_bounds.0 + 1.0);
        assert!(opt.x < cfg.offer_bounds.1 - 1.0);

        // The reported value matches a direct evaluation at the optimum.
        let direct = proposer_utility(opt.x, 0.1, cfg.depth, &cfg, SwitchRule::Fixed);
        assert!((opt.value - direct).abs() < 1e-9);
    }

    #[test]
    fn test_best_offer_beats_nearby_candidates() {
        let cfg = config();
        let rule = SwitchRule::RejectBump(cfg.p_bump);
        let opt = best_offer(0.1, rule, &cfg).unwrap();
        for delta in [-2.0, -0.5, 0.5, 2.0] {
            let candidate = (opt.x + delta).clamp(cfg.offer_bounds.0, cfg.offer_bounds.1);
            let v = proposer_utility(candidate, 0.1, cfg.depth, &cfg, rule);
            assert!(opt.value >= v - 1e-9, "beaten at offer {candidate}");
        }
    }

    #[test]
    fn test_longer_horizon_does_not_hurt_optimized_proposer() {
        // u_resp (-25) is above u_bad_proposer (-75): more rounds give the
        // optimizer at least as much value for representative alphas.
        for &alpha in &[0.05, 0.1, 1.0] {
            let mut prev = f64::NEG_INFINITY;
            for depth in 0..5u32 {
                let cfg = config().with_depth(depth);
                let opt = best_offer(alpha, SwitchRule::Fixed, &cfg).unwrap();
                assert!(
                    opt.value >= prev - 1e-9,
                    "alpha {alpha}, depth {depth}: {} < {prev}",
                    opt.value
                );
                prev = opt.value;
            }
        }
    }

    #[test]
    fn test_level_k_alpha_lands_low() {
        // Anticipating the proposer's counter-offer drives the responder to
        // the high-variance regime instead of saturating alpha.
        let cfg = config();
        let opt = best_alpha_level_k(SwitchRule::RejectBump(cfg.p_bump), &cfg).unwrap();
        assert!((opt.x - 0.050470).abs() < 1e-3, "alpha = {}", opt.x);
    }

    #[test]
    fn test_level_k_offer_anticipates_responder() {
        let cfg = config();
        let rule = SwitchRule::RejectBump(cfg.p_bump);
        let opt = best_offer_level_k(rule, &cfg).unwrap();
        assert!((opt.x - 74.2609).abs() < 1e-2, "offer = {}", opt.x);

        // Consistency: the reported value is the proposer utility at the
        // responder's counter-alpha.
        let reply = best_alpha_given_offer(opt.x, &cfg).unwrap();
        let direct = proposer_utility(opt.x, reply.x, cfg.depth, &cfg, rule);
        assert!((opt.value - direct).abs() < 1e-6);
    }

    #[test]
    fn test_myopic_ignores_horizon() {
        // best_alpha only sees the one-shot utility, so depth is irrelevant.
        let shallow = best_alpha(60.0, &config().with_depth(0)).unwrap();
        let deep = best_alpha(60.0, &config().with_depth(10)).unwrap();
        assert_eq!(shallow.x, deep.x);
    }

    #[test]
    fn test_acceptance_at_fixed_point_is_high() {
        // Sanity on the converged myopic regime: at offer ~74.27 and
        // saturated alpha, acceptance should be comfortably above half.
        let cfg = config();
        let p = p_accept(74.269, cfg.alpha_bounds.1, cfg.u_bad_responder);
        assert!(p > 0.95);
    }
}
