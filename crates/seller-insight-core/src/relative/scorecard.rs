use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::performance::RelativeMetricVector;
use super::tiers::Grade;
use crate::config::ScorecardThresholds;
use crate::metrics::{MetricKey, Polarity};

/// Metrics that feed the overall score.
pub const SCORECARD_METRICS: [MetricKey; 5] = [
    MetricKey::AvgOrderValue,
    MetricKey::RepeatRate,
    MetricKey::CustomerLtv,
    MetricKey::CancelRate,
    MetricKey::AvgShipLeadtime,
];

/// One scorecard input after polarity adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub metric: MetricKey,
    pub ratio: Decimal,
    /// `ratio` for direct metrics, `2 - ratio` for inverse ones
    pub adjusted: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub score: Decimal,
    pub grade: Grade,
    pub components: Vec<ScoreComponent>,
    /// False when none of the scorecard metrics could be compared
    pub comparable: bool,
}

/// Polarity-adjusted mean over the scorecard metrics that have a ratio.
/// With nothing to compare the score is a neutral 1.0.
pub fn compute_scorecard(relative: &RelativeMetricVector, thresholds: &ScorecardThresholds) -> Scorecard {
    let components: Vec<ScoreComponent> = SCORECARD_METRICS
        .iter()
        .filter_map(|key| relative.get(*key).map(|m| (*key, m)))
        .map(|(metric, m)| {
            let adjusted = match m.polarity {
                Polarity::Direct => m.ratio,
                Polarity::Inverse => dec!(2) - m.ratio,
            };
            ScoreComponent {
                metric,
                ratio: m.ratio,
                adjusted,
            }
        })
        .collect();

    let comparable = !components.is_empty();
    let score = if comparable {
        let sum: Decimal = components.iter().map(|c| c.adjusted).sum();
        sum / Decimal::from(components.len() as u64)
    } else {
        Decimal::ONE
    };

    Scorecard {
        score,
        grade: overall_grade(score, thresholds),
        components,
        comparable,
    }
}

pub fn overall_grade(score: Decimal, t: &ScorecardThresholds) -> Grade {
    if score >= t.a_plus {
        Grade::APlus
    } else if score >= t.a {
        Grade::A
    } else if score >= t.a_minus {
        Grade::AMinus
    } else if score >= t.b_plus {
        Grade::BPlus
    } else if score >= t.b {
        Grade::B
    } else {
        Grade::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchmarkConfig;
    use crate::metrics::MetricVector;
    use crate::relative::compute_relative;

    #[test]
    fn test_inverse_metrics_are_flipped() {
        let config = BenchmarkConfig::default();
        let seller = MetricVector::empty()
            .with(MetricKey::AvgOrderValue, dec!(36000))
            .with(MetricKey::CancelRate, dec!(0.05));
        let peers = MetricVector::empty()
            .with(MetricKey::AvgOrderValue, dec!(30000))
            .with(MetricKey::CancelRate, dec!(0.10));
        let rel = compute_relative(&seller, &peers, &config);
        let card = compute_scorecard(&rel, &config.scorecard);

        // (1.2 + (2 - 0.5)) / 2
        assert_eq!(card.score, dec!(1.35));
        assert_eq!(card.grade, Grade::APlus);
        assert_eq!(card.components.len(), 2);
        assert!(card.comparable);
    }

    #[test]
    fn test_nothing_comparable_is_neutral() {
        let card = compute_scorecard(&RelativeMetricVector::default(), &ScorecardThresholds::default());
        assert_eq!(card.score, Decimal::ONE);
        assert_eq!(card.grade, Grade::BPlus);
        assert!(!card.comparable);
    }

    #[test]
    fn test_overall_grade_bands() {
        let t = ScorecardThresholds::default();
        assert_eq!(overall_grade(dec!(1.15), &t), Grade::AMinus);
        assert_eq!(overall_grade(dec!(0.95), &t), Grade::B);
        assert_eq!(overall_grade(dec!(0.7), &t), Grade::C);
    }
}
