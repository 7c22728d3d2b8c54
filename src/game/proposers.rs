//! Proposer strategies for the round game.
//!
//! Each strategy decides an offer from the visible round context and its
//! own memory of past rounds. Strategies receive feedback after every round
//! they proposed in, and may observe the opponent's offers when roles are
//! reversed.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustc_hash::FxHashMap;

use crate::dynamics::config::ConfigError;
use crate::game::round::RoundContext;

/// Default offer levels for the grid-based strategies: 0, 10, ..., 100.
fn default_offer_levels() -> Vec<f64> {
    (0..=10).map(|i| (i * 10) as f64).collect()
}

/// An offer-making strategy.
pub trait ProposerStrategy: Send {
    /// Choose an offer for the current round.
    fn propose(&mut self, ctx: &RoundContext, rng: &mut StdRng) -> f64;

    /// Learn from the outcome of a round this strategy proposed in.
    fn feedback(&mut self, _accepted: bool, _offer: f64, _ctx: &RoundContext) {}

    /// Observe an offer the opponent made while holding control.
    fn observe_opponent_offer(&mut self, _offer: f64) {}
}

/// Starts high and concedes a fixed decrement on every rejection, never
/// dropping below the game's minimum offer.
pub struct ConcedingProposer {
    current_offer: f64,
    decrement: f64,
}

impl ConcedingProposer {
    /// Create a conceding proposer from a starting offer and step.
    pub fn new(start_offer: f64, decrement: f64) -> Self {
        Self {
            current_offer: start_offer,
            decrement,
        }
    }
}

impl ProposerStrategy for ConcedingProposer {
    fn propose(&mut self, ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        self.current_offer.clamp(ctx.min_offer, ctx.max_offer)
    }

    fn feedback(&mut self, accepted: bool, _offer: f64, _ctx: &RoundContext) {
        if !accepted {
            self.current_offer -= self.decrement;
        }
    }
}

/// Offer distribution for [`RandomProposer`].
#[derive(Debug, Clone, Copy)]
enum OfferDistribution {
    Uniform,
    Normal(Normal<f64>),
}

/// Draws each offer at random, uniformly over the offer range or from a
/// fixed normal distribution, clamped to the admissible range.
pub struct RandomProposer {
    distribution: OfferDistribution,
}

impl RandomProposer {
    /// Uniform over the game's offer range.
    pub fn uniform() -> Self {
        Self {
            distribution: OfferDistribution::Uniform,
        }
    }

    /// Normal with the given mean and standard deviation.
    pub fn normal(mean: f64, stddev: f64) -> Result<Self, ConfigError> {
        if !mean.is_finite() {
            return Err(ConfigError::NonFiniteUtility("mean", mean));
        }
        let dist = Normal::new(mean, stddev)
            .map_err(|_| ConfigError::InvalidBounds("stddev", 0.0, stddev))?;
        Ok(Self {
            distribution: OfferDistribution::Normal(dist),
        })
    }
}

impl ProposerStrategy for RandomProposer {
    fn propose(&mut self, ctx: &RoundContext, rng: &mut StdRng) -> f64 {
        let offer = match self.distribution {
            OfferDistribution::Uniform => rng.gen_range(ctx.min_offer..ctx.max_offer),
            OfferDistribution::Normal(dist) => dist.sample(rng),
        };
        offer.clamp(ctx.min_offer, ctx.max_offer)
    }
}

/// Mirrors the opponent's most recent offer back at them.
///
/// Two players both running this reach social-utility maximization, though
/// it is not generally a best response.
#[derive(Default)]
pub struct TitForTatProposer {
    last_opponent_offer: Option<f64>,
}

impl TitForTatProposer {
    /// Create a tit-for-tat proposer with no observation yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProposerStrategy for TitForTatProposer {
    fn propose(&mut self, ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        self.last_opponent_offer.unwrap_or(ctx.min_offer)
    }

    fn observe_opponent_offer(&mut self, offer: f64) {
        if offer != 0.0 {
            self.last_opponent_offer = Some(offer);
        }
    }
}

/// Steps its offer up after acceptance and down after rejection.
///
/// Too jumpy in practice; dominated by [`BinarySearchProposer`]. Kept as a
/// baseline.
pub struct LearningProposer {
    current_offer: f64,
    step_size: f64,
}

impl LearningProposer {
    /// Create a learning proposer from a starting offer and step size.
    pub fn new(start_offer: f64, step_size: f64) -> Self {
        Self {
            current_offer: start_offer,
            step_size,
        }
    }
}

impl ProposerStrategy for LearningProposer {
    fn propose(&mut self, ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        self.current_offer.clamp(ctx.min_offer, ctx.max_offer)
    }

    fn feedback(&mut self, accepted: bool, _offer: f64, _ctx: &RoundContext) {
        if accepted {
            self.current_offer += self.step_size;
        } else {
            self.current_offer -= self.step_size;
        }
    }
}

/// Bisects toward the largest offer the opponent will accept.
///
/// Against a utilitarian responder this converges to the perfect-information
/// outcome; probabilistic or strategic responders can mislead the bracket.
pub struct BinarySearchProposer {
    low: f64,
    high: f64,
}

impl BinarySearchProposer {
    /// Create a binary-search proposer over the given offer bracket.
    pub fn new(min_offer: f64, max_offer: f64) -> Self {
        Self {
            low: min_offer,
            high: max_offer,
        }
    }
}

impl ProposerStrategy for BinarySearchProposer {
    fn propose(&mut self, _ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        0.5 * (self.low + self.high)
    }

    fn feedback(&mut self, accepted: bool, offer: f64, _ctx: &RoundContext) {
        if accepted {
            self.low = self.low.max(offer);
        } else {
            self.high = self.high.min(offer);
        }
    }
}

/// Per-level acceptance counts.
#[derive(Debug, Clone, Copy, Default)]
struct LevelStats {
    trials: u32,
    accepts: u32,
}

impl LevelStats {
    fn accept_rate(&self, prior: f64) -> f64 {
        if self.trials == 0 {
            prior
        } else {
            self.accepts as f64 / self.trials as f64
        }
    }
}

/// Estimates per-level acceptance rates and rejection cost from experience,
/// then offers the level with the best one-round expected utility.
///
/// The first strategy here that prices in the bad outcome, though it stays
/// short-term in its thinking.
pub struct RiskAwareProposer {
    offer_levels: Vec<f64>,
    stats: FxHashMap<usize, LevelStats>,
    rejection_penalties: Vec<f64>,
}

impl RiskAwareProposer {
    /// Create a risk-aware proposer over the default 0..=100 offer grid.
    pub fn new() -> Self {
        Self::with_levels(default_offer_levels())
    }

    /// Create a risk-aware proposer over a custom offer grid.
    pub fn with_levels(offer_levels: Vec<f64>) -> Self {
        Self {
            offer_levels,
            stats: FxHashMap::default(),
            rejection_penalties: Vec::new(),
        }
    }

    fn level_index(&self, offer: f64) -> Option<usize> {
        self.offer_levels
            .iter()
            .position(|&level| (level - offer).abs() < 1e-9)
    }
}

impl Default for RiskAwareProposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposerStrategy for RiskAwareProposer {
    fn propose(&mut self, ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        let avg_reject_utility = if self.rejection_penalties.is_empty() {
            ctx.reject_utility
        } else {
            self.rejection_penalties.iter().sum::<f64>() / self.rejection_penalties.len() as f64
        };

        let mut best_offer = self.offer_levels[0];
        let mut best_expected = f64::NEG_INFINITY;
        for (i, &offer) in self.offer_levels.iter().enumerate() {
            let stats = self.stats.get(&i).copied().unwrap_or_default();
            let p_accept = stats.accept_rate(0.5);
            let expected = p_accept * offer + (1.0 - p_accept) * avg_reject_utility;
            if expected > best_expected {
                best_expected = expected;
                best_offer = offer;
            }
        }
        best_offer
    }

    fn feedback(&mut self, accepted: bool, offer: f64, ctx: &RoundContext) {
        if let Some(i) = self.level_index(offer) {
            let stats = self.stats.entry(i).or_default();
            stats.trials += 1;
            if accepted {
                stats.accepts += 1;
            }
        }
        if !accepted {
            self.rejection_penalties.push(ctx.reject_utility);
        }
    }
}

/// Values each offer level over a rolling horizon, weighting the reject
/// branch by a bumped role-switch probability.
///
/// More risk averse than the one-round strategies: rejection both costs the
/// penalty now and raises the chance of losing proposer control.
pub struct ForwardLookingProposer {
    offer_levels: Vec<f64>,
    horizon: u32,
    prior_accept_prob: f64,
    responder_utility_estimate: f64,
    accept_stats: FxHashMap<usize, LevelStats>,
}

impl ForwardLookingProposer {
    /// Create a forward-looking proposer with the default grid and priors.
    pub fn new() -> Self {
        Self {
            offer_levels: default_offer_levels(),
            horizon: 5,
            prior_accept_prob: 0.5,
            responder_utility_estimate: -50.0,
            accept_stats: FxHashMap::default(),
        }
    }

    /// Override the lookahead horizon.
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }

    fn estimate_accept_prob(&self, index: usize) -> f64 {
        self.accept_stats
            .get(&index)
            .copied()
            .unwrap_or_default()
            .accept_rate(self.prior_accept_prob)
    }

    /// Expected horizon utility of an offer given its acceptance estimate.
    ///
    /// Accepted: the proposer keeps its role with probability `1 - p_base`
    /// each round and collects the offer while it does. Rejected: penalty
    /// now, then the same geometric survival under the bumped probability,
    /// falling back to the estimated responder payoff once control is lost.
    fn horizon_utility(&self, offer: f64, p_accept: f64, ctx: &RoundContext) -> f64 {
        let bumped_p = (ctx.p_base + ctx.p_reject_bump).min(1.0);

        let mut eu_accept = 0.0;
        for t in 0..self.horizon {
            eu_accept += (1.0 - ctx.p_base).powi(t as i32) * offer;
        }

        let mut eu_reject = ctx.reject_utility;
        let mut role_prob = 1.0;
        for _ in 1..self.horizon {
            role_prob *= 1.0 - bumped_p;
            eu_reject += role_prob * offer + (1.0 - role_prob) * self.responder_utility_estimate;
        }

        p_accept * eu_accept + (1.0 - p_accept) * eu_reject
    }
}

impl Default for ForwardLookingProposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposerStrategy for ForwardLookingProposer {
    fn propose(&mut self, ctx: &RoundContext, _rng: &mut StdRng) -> f64 {
        let mut best_offer = self.offer_levels[0];
        let mut best_eu = f64::NEG_INFINITY;
        for (i, &offer) in self.offer_levels.iter().enumerate() {
            let eu = self.horizon_utility(offer, self.estimate_accept_prob(i), ctx);
            if eu > best_eu {
                best_eu = eu;
                best_offer = offer;
            }
        }
        best_offer
    }

    fn feedback(&mut self, accepted: bool, offer: f64, ctx: &RoundContext) {
        if let Some(i) = self
            .offer_levels
            .iter()
            .position(|&level| (level - offer).abs() < 1e-9)
        {
            let stats = self.accept_stats.entry(i).or_default();
            stats.trials += 1;
            if accepted {
                stats.accepts += 1;
            }
        }
        if !accepted {
            // Rejections refine the estimated cost of losing control.
            self.responder_utility_estimate =
                0.9 * self.responder_utility_estimate + 0.1 * ctx.reject_utility;
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
            reject_utility: -85.0,
            p_base: 0.3,
            p_current: 0.3,
            p_reject_bump: 0.1,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_conceding_decrements_on_rejection_only() {
        let mut s = ConcedingProposer::new(80.0, 10.0);
        let (ctx, mut rng) = (ctx(), rng());
        assert_eq!(s.propose(&ctx, &mut rng), 80.0);
        s.feedback(true, 80.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 80.0);
        s.feedback(false, 80.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 70.0);
    }

    #[test]
    fn test_conceding_respects_min_offer() {
        let mut s = ConcedingProposer::new(5.0, 10.0);
        let (ctx, mut rng) = (ctx(), rng());
        s.feedback(false, 5.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 0.0);
    }

    #[test]
    fn test_random_uniform_in_range() {
        let mut s = RandomProposer::uniform();
        let (ctx, mut rng) = (ctx(), rng());
        for _ in 0..100 {
            let offer = s.propose(&ctx, &mut rng);
            assert!((0.0..=100.0).contains(&offer));
        }
    }

    #[test]
    fn test_random_normal_clamped() {
        let mut s = RandomProposer::normal(120.0, 1.0).unwrap();
        let (ctx, mut rng) = (ctx(), rng());
        for _ in 0..20 {
            assert_eq!(s.propose(&ctx, &mut rng), 100.0);
        }
    }

    #[test]
    fn test_random_normal_rejects_bad_stddev() {
        assert!(RandomProposer::normal(50.0, -1.0).is_err());
        assert!(RandomProposer::normal(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_tit_for_tat_mirrors_nonzero_offers() {
        let mut s = TitForTatProposer::new();
        let (ctx, mut rng) = (ctx(), rng());
        assert_eq!(s.propose(&ctx, &mut rng), 0.0);
        s.observe_opponent_offer(35.0);
        assert_eq!(s.propose(&ctx, &mut rng), 35.0);
        s.observe_opponent_offer(0.0); // zero offers are ignored
        assert_eq!(s.propose(&ctx, &mut rng), 35.0);
    }

    #[test]
    fn test_learning_steps_both_directions() {
        let mut s = LearningProposer::new(50.0, 5.0);
        let (ctx, mut rng) = (ctx(), rng());
        s.feedback(true, 50.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 55.0);
        s.feedback(false, 55.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 50.0);
    }

    #[test]
    fn test_binary_search_narrows_bracket() {
        let mut s = BinarySearchProposer::new(0.0, 100.0);
        let (ctx, mut rng) = (ctx(), rng());
        assert_eq!(s.propose(&ctx, &mut rng), 50.0);
        s.feedback(true, 50.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 75.0);
        s.feedback(false, 75.0, &ctx);
        assert_eq!(s.propose(&ctx, &mut rng), 62.5);
    }

    #[test]
    fn test_risk_aware_avoids_punished_levels() {
        let mut s = RiskAwareProposer::new();
        let (ctx, mut rng) = (ctx(), rng());
        // With a naive 0.5 prior everywhere and a deeply negative reject
        // utility, the highest level wins the first scan.
        assert_eq!(s.propose(&ctx, &mut rng), 100.0);
        // Hammer level 100 with rejections; it should stop being chosen.
        for _ in 0..10 {
            s.feedback(false, 100.0, &ctx);
        }
        assert_ne!(s.propose(&ctx, &mut rng), 100.0);
    }

    #[test]
    fn test_forward_looking_prefers_acceptable_offers() {
        let mut s = ForwardLookingProposer::new();
        let (ctx, mut rng) = (ctx(), rng());
        // Teach it that 90+ gets rejected and 50 gets accepted.
        for _ in 0..8 {
            s.feedback(false, 90.0, &ctx);
            s.feedback(false, 100.0, &ctx);
            s.feedback(true, 50.0, &ctx);
        }
        let offer = s.propose(&ctx, &mut rng);
        assert!(offer < 90.0, "offer = {offer}");
    }

    #[test]
    fn test_forward_looking_updates_responder_estimate() {
        let mut s = ForwardLookingProposer::new();
        let before = s.responder_utility_estimate;
        s.feedback(false, 50.0, &ctx());
        let after = s.responder_utility_estimate;
        assert!((after - (0.9 * before + 0.1 * -85.0)).abs() < 1e-12);
    }
}
