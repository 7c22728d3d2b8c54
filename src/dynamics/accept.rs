//! Acceptance model: the Responder's logistic accept/reject rule.
//!
//! The Responder accepts an offer with probability given by a logistic
//! sigmoid over the utility difference between accepting and the bad
//! outcome. `alpha` controls decisiveness: alpha near zero is a coin flip,
//! large alpha approaches a hard threshold at `-offer == u_bad_responder`.

/// Numerically stable logistic sigmoid `1 / (1 + exp(-t))`.
///
/// Evaluated via `exp(-|t|)` so large positive or negative arguments
/// saturate cleanly to 1.0 / 0.0 instead of overflowing.
pub fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}

/// Probability that the Responder accepts `offer`.
///
/// Accepting pays the Responder `-offer`; rejecting pays `u_bad_responder`.
/// The acceptance probability is `sigmoid(alpha * (-offer - u_bad_responder))`,
/// increasing in alpha when accepting beats the bad outcome and decreasing
/// otherwise. At the indifference point it is exactly 0.5 for every alpha.
pub fn p_accept(offer: f64, alpha: f64, u_bad_responder: f64) -> f64 {
    sigmoid(alpha * (-offer - u_bad_responder))
}

/// Responder's one-shot expected utility for a given offer and alpha.
///
/// `-offer` with the acceptance probability, the bad outcome otherwise.
pub fn responder_utility(offer: f64, alpha: f64, u_bad_responder: f64) -> f64 {
    let p = p_accept(offer, alpha, u_bad_responder);
    -offer * p + u_bad_responder * (1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_basics() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(40.0) > 0.9999999);
        assert!(sigmoid(-40.0) < 1e-7);
    }

    #[test]
    fn test_sigmoid_extreme_arguments_stay_finite() {
        // The naive 1/(1+exp(-t)) overflows exp() near t = -750.
        assert_eq!(sigmoid(-5000.0), 0.0);
        assert_eq!(sigmoid(5000.0), 1.0);
        assert!(sigmoid(f64::MIN_POSITIVE).is_finite());
    }

    #[test]
    fn test_p_accept_in_open_unit_interval() {
        for &offer in &[0.0, 25.0, 50.0, 74.0, 100.0] {
            for &alpha in &[0.01, 0.1, 1.0, 10.0] {
                let p = p_accept(offer, alpha, -75.0);
                assert!(p > 0.0 && p < 1.0, "p_accept({offer}, {alpha}) = {p}");
            }
        }
    }

    #[test]
    fn test_p_accept_monotonic_in_alpha() {
        // Accepting beats the bad outcome: -50 > -75, so p rises with alpha.
        assert!(p_accept(50.0, 1.0, -75.0) > p_accept(50.0, 0.1, -75.0));
        // Accepting is worse: -90 < -75, so p falls with alpha.
        assert!(p_accept(90.0, 1.0, -75.0) < p_accept(90.0, 0.1, -75.0));
    }

    #[test]
    fn test_p_accept_indifference_point() {
        // -offer == u_bad_responder: exactly 0.5 regardless of alpha.
        for &alpha in &[0.01, 0.5, 10.0] {
            assert_eq!(p_accept(75.0, alpha, -75.0), 0.5);
        }
    }

    #[test]
    fn test_responder_utility_matches_expectation() {
        let (offer, alpha, u_bad) = (50.0, 0.2, -75.0);
        let p = p_accept(offer, alpha, u_bad);
        let expected = -offer * p + u_bad * (1.0 - p);
        assert_eq!(responder_utility(offer, alpha, u_bad), expected);
    }

    #[test]
    fn test_responder_utility_bounded_by_outcomes() {
        // A convex combination of -offer and u_bad can never leave [min, max].
        let u = responder_utility(50.0, 0.7, -75.0);
        assert!(u >= -75.0 && u <= -50.0);
    }
}
