//! Responder strategies for the round game.
//!
//! A responder sees the offer and its own rejection payoff for the round
//! and decides whether to accept. The probabilistic responder uses the same
//! logistic acceptance rule the dynamics module optimizes over.

use rand::rngs::StdRng;
use rand::Rng;

use crate::dynamics::accept::p_accept;
use crate::game::round::RoundContext;

/// An accept/reject strategy.
pub trait ResponderStrategy: Send {
    /// Decide whether to accept the given offer.
    fn respond(&mut self, offer: f64, ctx: &RoundContext, rng: &mut StdRng) -> bool;

    /// Learn from the outcome of a round this strategy responded in.
    fn feedback(&mut self, _offer: f64, _accepted: bool) {}
}

/// Accepts exactly when accepting beats rejecting this round.
pub struct UtilitarianResponder;

impl ResponderStrategy for UtilitarianResponder {
    fn respond(&mut self, offer: f64, ctx: &RoundContext, _rng: &mut StdRng) -> bool {
        -offer > ctx.reject_utility
    }
}

/// Accepts offers that beat rejection and are no worse than the last offer
/// it saw, turning the best terms to date into a floor.
#[derive(Default)]
pub struct TitForTatResponder {
    last_utility: Option<f64>,
}

impl TitForTatResponder {
    /// Create a tit-for-tat responder with no history.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResponderStrategy for TitForTatResponder {
    fn respond(&mut self, offer: f64, ctx: &RoundContext, _rng: &mut StdRng) -> bool {
        let utility = -offer;
        match self.last_utility {
            None => utility > ctx.reject_utility,
            Some(last) => utility >= last && utility > ctx.reject_utility,
        }
    }

    fn feedback(&mut self, offer: f64, _accepted: bool) {
        self.last_utility = Some(-offer);
    }
}

/// Accepts with logistic probability in the utility difference between
/// accepting and rejecting.
///
/// `alpha` sets the decisiveness: near zero the response is close to a coin
/// flip, large values approach a hard threshold. Outperforms the naive
/// responders against a binary-search proposer, which its noise misleads.
pub struct ProbabilisticResponder {
    alpha: f64,
}

impl ProbabilisticResponder {
    /// Create a probabilistic responder with the given decisiveness.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl ResponderStrategy for ProbabilisticResponder {
    fn respond(&mut self, offer: f64, ctx: &RoundContext, rng: &mut StdRng) -> bool {
        let prob = p_accept(offer, self.alpha, ctx.reject_utility);
        rng.gen::<f64>() < prob
    }
}

/// Punishes stagnation: accepts beneficial offers, but rejects after seeing
/// the same (or worse) terms too many rounds in a row, to push the proposer
/// toward better deals.
pub struct StrategicRejectorResponder {
    stagnation_tolerance: u32,
    epsilon: f64,
    min_offer: f64,
    prev_offer: Option<f64>,
    streak: u32,
}

impl StrategicRejectorResponder {
    /// Create a strategic rejector with the default tolerance of 4 repeats.
    pub fn new() -> Self {
        Self::with_tolerance(4, 1e-2, 0.0)
    }

    /// Create a strategic rejector with explicit parameters.
    pub fn with_tolerance(stagnation_tolerance: u32, epsilon: f64, min_offer: f64) -> Self {
        Self {
            stagnation_tolerance,
            epsilon,
            min_offer,
            prev_offer: None,
            streak: 0,
        }
    }
}

impl Default for StrategicRejectorResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponderStrategy for StrategicRejectorResponder {
    fn respond(&mut self, offer: f64, ctx: &RoundContext, _rng: &mut StdRng) -> bool {
        // Never take a deal worse than rejecting.
        if -offer < ctx.reject_utility {
            return false;
        }

        // An offer already at the floor cannot improve; no point punishing.
        if offer <= self.min_offer + self.epsilon {
            return true;
        }

        match self.prev_offer {
            None => {
                self.prev_offer = Some(offer);
                true
            }
            Some(prev) => {
                if offer >= prev - self.epsilon {
                    self.streak += 1;
                } else {
                    self.streak = 0;
                }
                self.prev_offer = Some(offer);
                self.streak < self.stagnation_tolerance
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx() -> RoundContext {
        RoundContext {
            min_offer: 0.0,
            max_offer: 100.0,
            reject_utility: -65.0,
            p_base: 0.3,
            p_current: 0.3,
            p_reject_bump: 0.0,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(123)
    }

    #[test]
    fn test_utilitarian_threshold() {
        let (ctx, mut rng) = (ctx(), rng());
        let mut s = UtilitarianResponder;
        assert!(s.respond(60.0, &ctx, &mut rng)); // -60 > -65
        assert!(!s.respond(70.0, &ctx, &mut rng)); // -70 < -65
        assert!(!s.respond(65.0, &ctx, &mut rng)); // strict inequality
    }

    #[test]
    fn test_tit_for_tat_enforces_floor() {
        let (ctx, mut rng) = (ctx(), rng());
        let mut s = TitForTatResponder::new();
        // First round: plain utilitarian.
        assert!(s.respond(50.0, &ctx, &mut rng));
        s.feedback(50.0, true);
        // Worse terms than the last seen offer get refused even though they
        // beat rejection outright.
        assert!(!s.respond(60.0, &ctx, &mut rng));
        // Equal or better terms pass.
        assert!(s.respond(50.0, &ctx, &mut rng));
        assert!(s.respond(40.0, &ctx, &mut rng));
    }

    #[test]
    fn test_probabilistic_tracks_acceptance_probability() {
        let ctx = ctx();
        let mut rng = rng();
        let mut s = ProbabilisticResponder::new(0.5);
        let trials = 4000;
        let mut accepts = 0;
        for _ in 0..trials {
            if s.respond(55.0, &ctx, &mut rng) {
                accepts += 1;
            }
        }
        let expected = p_accept(55.0, 0.5, -65.0);
        let rate = accepts as f64 / trials as f64;
        assert!((rate - expected).abs() < 0.03, "rate {rate} vs {expected}");
    }

    #[test]
    fn test_probabilistic_extreme_alpha_is_deterministic_in_practice() {
        let ctx = ctx();
        let mut rng = rng();
        let mut s = ProbabilisticResponder::new(1000.0);
        for _ in 0..50 {
            assert!(s.respond(40.0, &ctx, &mut rng));
            assert!(!s.respond(90.0, &ctx, &mut rng));
        }
    }

    #[test]
    fn test_strategic_rejector_punishes_stagnation() {
        let (ctx, mut rng) = (ctx(), rng());
        let mut s = StrategicRejectorResponder::new();
        // First offer accepted, then four more repeats tolerated...
        assert!(s.respond(30.0, &ctx, &mut rng));
        for _ in 0..3 {
            assert!(s.respond(30.0, &ctx, &mut rng));
        }
        // ...but the next identical offer trips the tolerance.
        assert!(!s.respond(30.0, &ctx, &mut rng));
        // A genuinely better offer resets the streak.
        assert!(s.respond(20.0, &ctx, &mut rng));
    }

    #[test]
    fn test_strategic_rejector_never_takes_bad_deals() {
        let (ctx, mut rng) = (ctx(), rng());
        let mut s = StrategicRejectorResponder::new();
        assert!(!s.respond(80.0, &ctx, &mut rng));
    }

    #[test]
    fn test_strategic_rejector_accepts_floor_offers() {
        let (ctx, mut rng) = (ctx(), rng());
        let mut s = StrategicRejectorResponder::with_tolerance(1, 1e-2, 0.0);
        for _ in 0..10 {
            assert!(s.respond(0.0, &ctx, &mut rng));
        }
    }
}
