//! Configuration for the bargaining dynamics solver.
//!
//! This module provides the parameter set shared by every utility recursion
//! and best-response optimizer, plus validation and run statistics.

use serde::{Deserialize, Serialize};

/// Maximum supported recursion horizon.
///
/// The finite-horizon recursions are linear in `depth`, but level-k
/// objectives re-solve an inner optimization per candidate point, so very
/// deep horizons get expensive fast. 64 rounds is far beyond anything the
/// dynamics need to converge.
pub const MAX_DEPTH: u32 = 64;

/// Parameters of the bilateral bargaining game.
///
/// The Proposer (Player 1) picks an offer; the Responder (Player 2) accepts
/// with a logistic probability controlled by its decisiveness parameter
/// `alpha`. Both players face a fixed bad outcome if negotiation fails, and
/// proposer control may switch hands after a rejection.
///
/// # Example
/// ```
/// use bargain_solver::dynamics::BargainConfig;
///
/// let config = BargainConfig::default().with_depth(5).with_p_bump(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BargainConfig {
    /// Player 1's payoff when a round ends in rejection.
    pub u_bad_proposer: f64,

    /// Player 2's payoff when a round ends in rejection.
    pub u_bad_responder: f64,

    /// Player 1's fixed payoff in rounds where it has lost proposer control.
    pub u_resp: f64,

    /// Probability that proposer control switches away after a round.
    pub p_switch: f64,

    /// Increase applied to the switch probability on the reject branch
    /// (capped at 1.0). Only used by [`SwitchRule::RejectBump`].
    ///
    /// [`SwitchRule::RejectBump`]: crate::dynamics::SwitchRule::RejectBump
    pub p_bump: f64,

    /// Recursion horizon in rounds. Horizon 0 is the one-shot game.
    pub depth: u32,

    /// Admissible offer interval for Player 1.
    pub offer_bounds: (f64, f64),

    /// Admissible decisiveness interval for Player 2.
    ///
    /// The lower bound stays strictly positive: at alpha = 0 acceptance is a
    /// coin flip regardless of the offer and the objective goes flat.
    pub alpha_bounds: (f64, f64),
}

impl Default for BargainConfig {
    fn default() -> Self {
        Self {
            u_bad_proposer: -75.0,
            u_bad_responder: -75.0,
            u_resp: -25.0,
            p_switch: 0.25,
            p_bump: 0.0,
            depth: 3,
            offer_bounds: (0.0, 100.0),
            alpha_bounds: (0.01, 10.0),
        }
    }
}

impl BargainConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set both players' bad-outcome payoffs.
    pub fn with_bad_outcomes(mut self, proposer: f64, responder: f64) -> Self {
        self.u_bad_proposer = proposer;
        self.u_bad_responder = responder;
        self
    }

    /// Builder method: set Player 1's out-of-control payoff.
    pub fn with_u_resp(mut self, u_resp: f64) -> Self {
        self.u_resp = u_resp;
        self
    }

    /// Builder method: set the base control-switch probability.
    pub fn with_p_switch(mut self, p: f64) -> Self {
        self.p_switch = p;
        self
    }

    /// Builder method: set the rejection bump on the switch probability.
    pub fn with_p_bump(mut self, bump: f64) -> Self {
        self.p_bump = bump;
        self
    }

    /// Builder method: set the recursion horizon.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Builder method: set the offer interval.
    pub fn with_offer_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.offer_bounds = (lo, hi);
        self
    }

    /// Builder method: set the alpha interval.
    pub fn with_alpha_bounds(mut self, lo: f64, hi: f64) -> Self {
        self.alpha_bounds = (lo, hi);
        self
    }

    /// Validate the configuration and return any errors.
    ///
    /// Optimizer bounds are the only thing keeping offers and alphas in
    /// their domains, so malformed intervals are rejected here rather than
    /// surfacing as nonsense optima later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.p_switch) || !self.p_switch.is_finite() {
            return Err(ConfigError::InvalidProbability("p_switch", self.p_switch));
        }

        if self.p_bump < 0.0 || !self.p_bump.is_finite() {
            return Err(ConfigError::InvalidProbability("p_bump", self.p_bump));
        }

        if self.depth > MAX_DEPTH {
            return Err(ConfigError::DepthTooLarge(self.depth));
        }

        Self::check_bounds("offer_bounds", self.offer_bounds)?;
        Self::check_bounds("alpha_bounds", self.alpha_bounds)?;

        if self.alpha_bounds.0 <= 0.0 {
            return Err(ConfigError::InvalidBounds(
                "alpha_bounds",
                self.alpha_bounds.0,
                self.alpha_bounds.1,
            ));
        }

        for (name, value) in [
            ("u_bad_proposer", self.u_bad_proposer),
            ("u_bad_responder", self.u_bad_responder),
            ("u_resp", self.u_resp),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteUtility(name, value));
            }
        }

        Ok(())
    }

    fn check_bounds(name: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ConfigError::InvalidBounds(name, lo, hi));
        }
        Ok(())
    }
}

/// Errors that can occur when validating a bargaining configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probability parameter is outside [0, 1] or non-finite.
    InvalidProbability(&'static str, f64),
    /// An interval is empty, inverted, or non-finite.
    InvalidBounds(&'static str, f64, f64),
    /// The recursion horizon exceeds [`MAX_DEPTH`].
    DepthTooLarge(u32),
    /// A utility constant is NaN or infinite.
    NonFiniteUtility(&'static str, f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidProbability(name, val) => {
                write!(f, "{} = {} is not a probability in [0, 1]", name, val)
            }
            ConfigError::InvalidBounds(name, lo, hi) => {
                write!(f, "{} = ({}, {}) is not a valid interval", name, lo, hi)
            }
            ConfigError::DepthTooLarge(depth) => {
                write!(f, "depth {} exceeds the maximum of {}", depth, MAX_DEPTH)
            }
            ConfigError::NonFiniteUtility(name, val) => {
                write!(f, "{} = {} is not finite", name, val)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Statistics from one alternating-update run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrajectoryStats {
    /// Number of update steps performed (always exactly `n_steps`).
    pub steps: u32,

    /// Wall-clock time spent in the run (in seconds).
    pub elapsed_seconds: f64,

    /// Update steps per second.
    pub steps_per_second: f64,
}

impl TrajectoryStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update steps per second from the elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.steps_per_second = self.steps as f64 / self.elapsed_seconds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BargainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = BargainConfig::new()
            .with_bad_outcomes(-50.0, -60.0)
            .with_u_resp(-10.0)
            .with_p_switch(0.5)
            .with_p_bump(0.1)
            .with_depth(7)
            .with_offer_bounds(10.0, 90.0)
            .with_alpha_bounds(0.1, 5.0);

        assert_eq!(config.u_bad_proposer, -50.0);
        assert_eq!(config.u_bad_responder, -60.0);
        assert_eq!(config.u_resp, -10.0);
        assert_eq!(config.p_switch, 0.5);
        assert_eq!(config.p_bump, 0.1);
        assert_eq!(config.depth, 7);
        assert_eq!(config.offer_bounds, (10.0, 90.0));
        assert_eq!(config.alpha_bounds, (0.1, 5.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        let config = BargainConfig::default().with_p_switch(1.5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidProbability("p_switch", 1.5))
        );

        let config = BargainConfig::default().with_p_bump(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability("p_bump", _))
        ));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = BargainConfig::default().with_offer_bounds(100.0, 0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds("offer_bounds", _, _))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_alpha_lower_bound() {
        let config = BargainConfig::default().with_alpha_bounds(0.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds("alpha_bounds", _, _))
        ));
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let config = BargainConfig::default().with_depth(MAX_DEPTH + 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DepthTooLarge(MAX_DEPTH + 1))
        );
    }

    #[test]
    fn test_rejects_non_finite_utilities() {
        let config = BargainConfig::default().with_bad_outcomes(f64::NAN, -75.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteUtility("u_bad_proposer", _))
        ));
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = BargainConfig::default().with_p_bump(0.1);
        let json = serde_json::to_string(&config).unwrap();
        let back: BargainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.p_bump, 0.1);
        assert_eq!(back.depth, config.depth);
    }
}
