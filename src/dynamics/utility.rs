//! Finite-horizon expected-utility recursions.
//!
//! Both players value an offer over a `depth`-round horizon by backward
//! induction over the accept/reject decision tree. The Proposer's recursion
//! is parameterized by a [`SwitchRule`] deciding how the control-switch
//! probability responds to a rejection, which collapses the fixed- and
//! bumped-probability variants into one implementation.
//!
//! The Responder's recursion carries no role-switch weighting at all: the
//! Responder is modeled as remaining responder for the whole horizon.

use serde::{Deserialize, Serialize};

use crate::dynamics::accept::p_accept;
use crate::dynamics::config::BargainConfig;

/// How the control-switch probability reacts to the current round's outcome.
///
/// The accept branch always uses the base probability; the rule only decides
/// what the reject branch sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SwitchRule {
    /// Both branches weight the continuation with the base probability.
    Fixed,
    /// Rejection raises the switch probability by this bump, capped at 1.0.
    /// `RejectBump(0.0)` is exactly equivalent to `Fixed`.
    RejectBump(f64),
}

impl SwitchRule {
    /// Switch probability seen by the accept branch.
    pub fn accept_prob(&self, p_switch: f64) -> f64 {
        p_switch
    }

    /// Switch probability seen by the reject branch.
    pub fn reject_prob(&self, p_switch: f64) -> f64 {
        match self {
            SwitchRule::Fixed => p_switch,
            SwitchRule::RejectBump(bump) => (p_switch + bump).min(1.0),
        }
    }
}

/// Proposer's expected utility for `offer` against a Responder at `alpha`,
/// over a `depth`-round horizon.
///
/// Horizon 0 is the one-shot game: `offer` with the acceptance probability,
/// the bad outcome otherwise. Deeper horizons add a continuation term to
/// both branches: with the branch's switch probability control moves away
/// and the Proposer collects `u_resp`, otherwise the same subgame repeats
/// one round shorter. Continuation is independent of the current round's
/// outcome except through the switch probability chosen by `rule`.
///
/// The bump applies only to the current round's weighting; the `depth - 1`
/// subgame always recurses with the base probability.
pub fn proposer_utility(
    offer: f64,
    alpha: f64,
    depth: u32,
    config: &BargainConfig,
    rule: SwitchRule,
) -> f64 {
    let p_acc = p_accept(offer, alpha, config.u_bad_responder);

    if depth == 0 {
        return offer * p_acc + config.u_bad_proposer * (1.0 - p_acc);
    }

    // Both branches continue into the identical subgame; only the weight on
    // "control moves away" differs between them.
    let subgame = proposer_utility(offer, alpha, depth - 1, config, rule);

    let p_keep_accept = rule.accept_prob(config.p_switch);
    let p_keep_reject = rule.reject_prob(config.p_switch);

    let cont_accept = (1.0 - p_keep_accept) * subgame + p_keep_accept * config.u_resp;
    let cont_reject = (1.0 - p_keep_reject) * subgame + p_keep_reject * config.u_resp;

    p_acc * (offer + cont_accept) + (1.0 - p_acc) * (config.u_bad_proposer + cont_reject)
}

/// Responder's expected utility for a fixed `offer` at `alpha` over a
/// `depth`-round horizon.
///
/// Structurally parallel to [`proposer_utility`] from the other side of the
/// table (`-offer` on accept, the bad outcome on reject), but the
/// continuation is the bare subgame value: the Responder never gains
/// proposer control within the model.
pub fn responder_utility_horizon(offer: f64, alpha: f64, depth: u32, u_bad_responder: f64) -> f64 {
    let p_acc = p_accept(offer, alpha, u_bad_responder);

    if depth == 0 {
        return -offer * p_acc + u_bad_responder * (1.0 - p_acc);
    }

    let subgame = responder_utility_horizon(offer, alpha, depth - 1, u_bad_responder);

    p_acc * (-offer + subgame) + (1.0 - p_acc) * (u_bad_responder + subgame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::accept::responder_utility;

    fn config() -> BargainConfig {
        BargainConfig::default()
    }

    #[test]
    fn test_depth_zero_is_one_shot() {
        let cfg = config();
        let (offer, alpha) = (50.0, 0.1);
        let p = p_accept(offer, alpha, cfg.u_bad_responder);
        let expected = offer * p + cfg.u_bad_proposer * (1.0 - p);
        assert_eq!(
            proposer_utility(offer, alpha, 0, &cfg, SwitchRule::Fixed),
            expected
        );
    }

    #[test]
    fn test_zero_bump_matches_fixed_exactly() {
        let cfg = config();
        for depth in 0..6 {
            for &offer in &[0.0, 30.0, 74.3, 100.0] {
                for &alpha in &[0.01, 0.5, 10.0] {
                    let fixed = proposer_utility(offer, alpha, depth, &cfg, SwitchRule::Fixed);
                    let bumped =
                        proposer_utility(offer, alpha, depth, &cfg, SwitchRule::RejectBump(0.0));
                    assert_eq!(fixed, bumped, "depth {depth}, offer {offer}, alpha {alpha}");
                }
            }
        }
    }

    #[test]
    fn test_bump_penalizes_rejection_heavy_offers() {
        // At offer 95 / alpha 5 almost everything is rejected and the
        // one-shot value (~ -75) sits below u_resp (-25), so shifting reject
        // weight toward "control moves away" raises the proposer's utility.
        let cfg = config();
        let offer = 95.0;
        let alpha = 5.0;
        let subgame = proposer_utility(offer, alpha, 0, &cfg, SwitchRule::Fixed);
        assert!(subgame < cfg.u_resp);
        let fixed = proposer_utility(offer, alpha, 1, &cfg, SwitchRule::Fixed);
        let bumped = proposer_utility(offer, alpha, 1, &cfg, SwitchRule::RejectBump(0.3));
        assert!(bumped > fixed);
    }

    #[test]
    fn test_bump_caps_switch_probability_at_one() {
        let rule = SwitchRule::RejectBump(0.9);
        assert_eq!(rule.reject_prob(0.25), 1.0);
        assert_eq!(rule.accept_prob(0.25), 0.25);
        assert_eq!(SwitchRule::Fixed.reject_prob(0.25), 0.25);
    }

    #[test]
    fn test_responder_depth_zero_matches_one_shot_utility() {
        let (offer, alpha, u_bad) = (42.0, 0.05, -75.0);
        assert_eq!(
            responder_utility_horizon(offer, alpha, 0, u_bad),
            responder_utility(offer, alpha, u_bad)
        );
    }

    #[test]
    fn test_responder_horizon_accumulates_rounds() {
        // Each extra round adds one more blended payoff on top of the
        // subgame, so depth d equals (d + 1) one-shot utilities.
        let (offer, alpha, u_bad) = (42.0, 0.05, -75.0);
        let one_shot = responder_utility(offer, alpha, u_bad);
        for depth in 0..5u32 {
            let expected = (depth + 1) as f64 * one_shot;
            let got = responder_utility_horizon(offer, alpha, depth, u_bad);
            assert!((got - expected).abs() < 1e-9, "depth {depth}");
        }
    }

    #[test]
    fn test_proposer_utility_finite_at_extremes() {
        let cfg = config();
        for &alpha in &[0.01, 10.0] {
            for &offer in &[0.0, 100.0] {
                let u = proposer_utility(offer, alpha, 10, &cfg, SwitchRule::RejectBump(0.5));
                assert!(u.is_finite());
            }
        }
    }
}
