use crate::config::settings::RatingSettings;

/// Classic logistic Elo expectation. The two expected scores for a pairing
/// sum to 1 by construction.
pub fn expected_score(own_rating: f64, other_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((other_rating - own_rating) / 400.0))
}

/// Actual scores for athletes A and B given the observed time differential.
///
/// Differentials inside the draw tolerance score 0.5 each; the tolerance
/// absorbs timing noise. A positive differential favors athlete A.
pub fn actual_scores(performance_diff_seconds: f64, settings: &RatingSettings) -> (f64, f64) {
    if performance_diff_seconds.abs() < settings.draw_tolerance_seconds {
        (0.5, 0.5)
    } else if performance_diff_seconds > 0.0 {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    }
}

/// Margin scaling for the K-factor, capped so blowout results cannot
/// dominate. Always lands in [1, cap].
pub fn margin_factor(performance_diff_seconds: f64, settings: &RatingSettings) -> f64 {
    let scaled = 1.0 + performance_diff_seconds.abs() / settings.margin_scale_seconds;
    scaled.min(settings.margin_factor_cap)
}

/// One computed Elo exchange between two athletes. Pure arithmetic, no
/// persistence.
#[derive(Debug, Clone, Copy)]
pub struct EloExchange {
    pub new_rating_a: f64,
    pub new_rating_b: f64,
    pub actual_score_a: f64,
    pub actual_score_b: f64,
    pub margin_factor: f64,
    pub adjusted_k: f64,
}

pub fn compute_exchange(
    rating_a: f64,
    rating_b: f64,
    performance_diff_seconds: f64,
    weight: f64,
    settings: &RatingSettings,
) -> EloExchange {
    let (actual_a, actual_b) = actual_scores(performance_diff_seconds, settings);
    let expected_a = expected_score(rating_a, rating_b);
    let expected_b = expected_score(rating_b, rating_a);

    let margin_factor = margin_factor(performance_diff_seconds, settings);
    let adjusted_k = settings.base_k_factor * margin_factor * weight;

    EloExchange {
        new_rating_a: rating_a + adjusted_k * (actual_a - expected_a),
        new_rating_b: rating_b + adjusted_k * (actual_b - expected_b),
        actual_score_a: actual_a,
        actual_score_b: actual_b,
        margin_factor,
        adjusted_k,
    }
}

/// Confidence in a rating given how many races inform it. Bounded [0, 1].
pub fn confidence_score(races_count: i64, settings: &RatingSettings) -> f64 {
    (races_count as f64 / settings.confidence_full_races as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RatingSettings {
        RatingSettings::default()
    }

    #[test]
    fn expected_scores_sum_to_one() {
        for (a, b) in [(1000.0, 1000.0), (1200.0, 900.0), (850.0, 1600.0)] {
            let sum = expected_score(a, b) + expected_score(b, a);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn equal_ratings_expect_half() {
        assert!((expected_score(1000.0, 1000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn differentials_inside_tolerance_are_draws() {
        let s = settings();
        assert_eq!(actual_scores(0.0, &s), (0.5, 0.5));
        assert_eq!(actual_scores(0.49, &s), (0.5, 0.5));
        assert_eq!(actual_scores(-0.49, &s), (0.5, 0.5));
        assert_eq!(actual_scores(0.5, &s), (1.0, 0.0));
        assert_eq!(actual_scores(-0.5, &s), (0.0, 1.0));
    }

    #[test]
    fn margin_factor_stays_within_bounds() {
        let s = settings();
        for diff in [0.0, 0.5, 3.0, 5.0, 50.0, -120.0] {
            let f = margin_factor(diff, &s);
            assert!((1.0..=2.0).contains(&f), "factor {} out of bounds", f);
        }
        assert_eq!(margin_factor(0.0, &s), 1.0);
        assert_eq!(margin_factor(5.0, &s), 2.0);
        assert_eq!(margin_factor(100.0, &s), 2.0);
    }

    #[test]
    fn worked_example_three_second_win() {
        // 1000 vs 1000, A faster by 3s: factor 1.6, K 51.2, 1025.6 / 974.4.
        let s = settings();
        let exchange = compute_exchange(1000.0, 1000.0, 3.0, 1.0, &s);

        assert!((exchange.margin_factor - 1.6).abs() < 1e-12);
        assert!((exchange.adjusted_k - 51.2).abs() < 1e-12);
        assert!((exchange.new_rating_a - 1025.6).abs() < 1e-9);
        assert!((exchange.new_rating_b - 974.4).abs() < 1e-9);
    }

    #[test]
    fn weight_scales_the_update() {
        let s = settings();
        let full = compute_exchange(1000.0, 1000.0, 3.0, 1.0, &s);
        let half = compute_exchange(1000.0, 1000.0, 3.0, 0.5, &s);

        let full_delta = full.new_rating_a - 1000.0;
        let half_delta = half.new_rating_a - 1000.0;
        assert!((half_delta * 2.0 - full_delta).abs() < 1e-12);
    }

    #[test]
    fn underdog_gains_more_from_an_upset() {
        let s = settings();
        let exchange = compute_exchange(900.0, 1300.0, 2.0, 1.0, &s);
        // A was expected to lose badly, so the win moves A a long way up.
        assert!(exchange.new_rating_a - 900.0 > 30.0);
        assert!(1300.0 - exchange.new_rating_b > 30.0);
    }

    #[test]
    fn confidence_is_bounded_and_linear() {
        let s = settings();
        assert_eq!(confidence_score(0, &s), 0.0);
        assert_eq!(confidence_score(5, &s), 0.5);
        assert_eq!(confidence_score(10, &s), 1.0);
        assert_eq!(confidence_score(250, &s), 1.0);
    }
}
