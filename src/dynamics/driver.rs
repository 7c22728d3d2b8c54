//! Alternating best-response dynamics driver.
//!
//! The driver runs a Gauss-Seidel style iteration: the Proposer's offer is
//! re-optimized on even steps and the Responder's alpha on odd steps, each
//! holding the other parameter at its most recent value. The loop always
//! runs exactly `n_steps` updates; there is no convergence check. Apparent
//! convergence is a property of the recorded trajectory, inspected after
//! the fact with [`Trajectory::fixed_point`].

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::dynamics::best_response::{
    best_alpha, best_alpha_level_k, best_offer, best_offer_level_k,
};
use crate::dynamics::config::{BargainConfig, ConfigError, TrajectoryStats};
use crate::dynamics::optimize::OptimizeError;
use crate::dynamics::utility::SwitchRule;

/// Which pair of best-response optimizers the driver alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateRule {
    /// Offer via the fixed-probability horizon recursion; alpha via the
    /// myopic one-shot best response.
    Myopic,
    /// Offer via the bumped-probability recursion; alpha still myopic.
    RejectBump,
    /// Offer via the bumped recursion; alpha via the level-k response that
    /// anticipates the Proposer's counter-offer.
    LevelKResponder,
    /// Both sides level-k aware.
    LevelKBoth,
}

impl UpdateRule {
    /// All rules, in the order the exploration ran them.
    pub const ALL: [UpdateRule; 4] = [
        UpdateRule::Myopic,
        UpdateRule::RejectBump,
        UpdateRule::LevelKResponder,
        UpdateRule::LevelKBoth,
    ];

    /// Short name used in output files.
    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::Myopic => "myopic",
            UpdateRule::RejectBump => "reject_bump",
            UpdateRule::LevelKResponder => "level_k_responder",
            UpdateRule::LevelKBoth => "level_k_both",
        }
    }

    /// Switch rule the Proposer-side recursion uses under this update rule.
    pub fn switch_rule(&self, config: &BargainConfig) -> SwitchRule {
        match self {
            UpdateRule::Myopic => SwitchRule::Fixed,
            _ => SwitchRule::RejectBump(config.p_bump),
        }
    }
}

/// One entry of a trajectory: the (offer, alpha) pair after `step` updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Number of updates applied so far (0 is the starting point).
    pub step: u32,
    /// Proposer's offer.
    pub offer: f64,
    /// Responder's alpha.
    pub alpha: f64,
}

/// An append-only record of one alternating-update run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// Update rule that produced this trajectory.
    pub rule: UpdateRule,
    /// Points, one per step plus the starting point.
    pub points: Vec<TrajectoryPoint>,
    /// Run statistics.
    pub stats: TrajectoryStats,
}

impl Trajectory {
    /// Final (offer, alpha) pair.
    pub fn last(&self) -> TrajectoryPoint {
        // points always holds at least the starting entry
        *self.points.last().unwrap()
    }

    /// The (offer, alpha) pair the trajectory settled on, if its trailing
    /// entries agree to within `tol` in both coordinates.
    ///
    /// Inspection only: the driver never uses this to stop early.
    pub fn fixed_point(&self, tol: f64) -> Option<(f64, f64)> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }
        let last = self.points[n - 1];
        // Compare against the two prior entries so both parameters have
        // been re-optimized at least once since the values matched.
        for prior in &self.points[n - 3..n - 1] {
            if (prior.offer - last.offer).abs() > tol || (prior.alpha - last.alpha).abs() > tol {
                return None;
            }
        }
        Some((last.offer, last.alpha))
    }

    /// First step at which the trajectory reached its final values to
    /// within `tol`, if it did.
    pub fn settled_at(&self, tol: f64) -> Option<u32> {
        let last = self.last();
        let mut settled = None;
        for point in self.points.iter().rev() {
            if (point.offer - last.offer).abs() <= tol && (point.alpha - last.alpha).abs() <= tol {
                settled = Some(point.step);
            } else {
                break;
            }
        }
        settled
    }
}

/// Errors from running the dynamics.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicsError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// A scalar optimization failed.
    Optimize(OptimizeError),
}

impl std::fmt::Display for DynamicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DynamicsError::Config(e) => write!(f, "invalid configuration: {}", e),
            DynamicsError::Optimize(e) => write!(f, "optimization failed: {}", e),
        }
    }
}

impl std::error::Error for DynamicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DynamicsError::Config(e) => Some(e),
            DynamicsError::Optimize(e) => Some(e),
        }
    }
}

impl From<ConfigError> for DynamicsError {
    fn from(e: ConfigError) -> Self {
        DynamicsError::Config(e)
    }
}

impl From<OptimizeError> for DynamicsError {
    fn from(e: OptimizeError) -> Self {
        DynamicsError::Optimize(e)
    }
}

/// Driver for the alternating best-response dynamics.
///
/// # Example
/// ```
/// use bargain_solver::dynamics::{BargainConfig, BestResponseDynamics, UpdateRule};
///
/// let config = BargainConfig::default();
/// let dynamics = BestResponseDynamics::new(config, UpdateRule::Myopic).unwrap();
/// let trajectory = dynamics.run(50.0, 0.1, 20).unwrap();
/// println!("settled at {:?}", trajectory.last());
/// ```
#[derive(Debug, Clone)]
pub struct BestResponseDynamics {
    config: BargainConfig,
    rule: UpdateRule,
}

impl BestResponseDynamics {
    /// Create a driver for a validated configuration.
    pub fn new(config: BargainConfig, rule: UpdateRule) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rule })
    }

    /// The configuration this driver runs with.
    pub fn config(&self) -> &BargainConfig {
        &self.config
    }

    /// Run exactly `n_steps` alternating updates from the given start.
    ///
    /// Even steps re-optimize the offer, odd steps re-optimize alpha. The
    /// returned trajectory has `n_steps + 1` points including the start.
    pub fn run(&self, offer0: f64, alpha0: f64, n_steps: u32) -> Result<Trajectory, DynamicsError> {
        let start_time = Instant::now();
        let switch = self.rule.switch_rule(&self.config);

        let mut offer = offer0;
        let mut alpha = alpha0;
        let mut points = Vec::with_capacity(n_steps as usize + 1);
        points.push(TrajectoryPoint {
            step: 0,
            offer,
            alpha,
        });

        for step in 0..n_steps {
            if step % 2 == 0 {
                offer = self.update_offer(alpha, switch)?;
            } else {
                alpha = self.update_alpha(offer, switch)?;
            }
            points.push(TrajectoryPoint {
                step: step + 1,
                offer,
                alpha,
            });
        }

        let mut stats = TrajectoryStats {
            steps: n_steps,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            steps_per_second: 0.0,
        };
        stats.update_rate();

        Ok(Trajectory {
            rule: self.rule,
            points,
            stats,
        })
    }

    fn update_offer(&self, alpha: f64, switch: SwitchRule) -> Result<f64, DynamicsError> {
        let opt = match self.rule {
            UpdateRule::LevelKBoth => best_offer_level_k(switch, &self.config)?,
            _ => best_offer(alpha, switch, &self.config)?,
        };
        Ok(opt.x)
    }

    fn update_alpha(&self, offer: f64, switch: SwitchRule) -> Result<f64, DynamicsError> {
        let opt = match self.rule {
            UpdateRule::Myopic | UpdateRule::RejectBump => best_alpha(offer, &self.config)?,
            UpdateRule::LevelKResponder | UpdateRule::LevelKBoth => {
                best_alpha_level_k(switch, &self.config)?
            }
        };
        Ok(opt.x)
    }
}
