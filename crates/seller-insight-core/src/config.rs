//! Tunable constants for one benchmarking run.
//!
//! Defaults are the thresholds the reports have always used. They are not
//! statistically derived; treat them as knobs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SellerInsightError;
use crate::ingest::ColumnMapping;
use crate::types::{Days, Ratio};
use crate::SellerInsightResult;

/// Tier cut-offs for one polarity, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCutoffs {
    pub excellent: Ratio,
    pub good: Ratio,
    pub average: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Higher-is-better metrics: ratio >= cut-off
    pub direct: TierCutoffs,
    /// Lower-is-better metrics: ratio <= cut-off
    pub inverse: TierCutoffs,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            direct: TierCutoffs {
                excellent: dec!(1.2),
                good: dec!(1.1),
                average: dec!(0.9),
            },
            inverse: TierCutoffs {
                excellent: dec!(0.8),
                good: dec!(0.9),
                average: dec!(1.1),
            },
        }
    }
}

/// Letter-grade cut-offs for one polarity, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCutoffs {
    pub a_plus: Ratio,
    pub a: Ratio,
    pub b_plus: Ratio,
    pub b: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeThresholds {
    pub direct: GradeCutoffs,
    pub inverse: GradeCutoffs,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        GradeThresholds {
            direct: GradeCutoffs {
                a_plus: dec!(1.3),
                a: dec!(1.2),
                b_plus: dec!(1.1),
                b: dec!(0.9),
            },
            inverse: GradeCutoffs {
                a_plus: dec!(0.7),
                a: dec!(0.8),
                b_plus: dec!(0.9),
                b: dec!(1.1),
            },
        }
    }
}

/// Overall scorecard grade cut-offs (score >= cut-off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardThresholds {
    pub a_plus: Decimal,
    pub a: Decimal,
    pub a_minus: Decimal,
    pub b_plus: Decimal,
    pub b: Decimal,
}

impl Default for ScorecardThresholds {
    fn default() -> Self {
        ScorecardThresholds {
            a_plus: dec!(1.3),
            a: dec!(1.2),
            a_minus: dec!(1.1),
            b_plus: dec!(1.0),
            b: dec!(0.9),
        }
    }
}

/// Exact order-status labels counted by the status-rate metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLabels {
    pub completed: String,
    pub cancelled: String,
    pub delayed: String,
    pub returned: String,
    pub exchanged: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        StatusLabels {
            completed: "배송완료".into(),
            cancelled: "결제취소".into(),
            delayed: "배송지연".into(),
            returned: "반품".into(),
            exchanged: "교환".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Sellers with fewer orders in the category are not used as peers
    pub min_peer_orders: usize,
    /// Ship lead times at or below this many days count as same-day
    pub same_day_ship_days: Days,
    /// Items kept in the product breakdown, by seller revenue
    pub top_products: usize,
    pub tiers: TierThresholds,
    pub grades: GradeThresholds,
    pub scorecard: ScorecardThresholds,
    pub status_labels: StatusLabels,
    pub columns: ColumnMapping,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            min_peer_orders: 10,
            same_day_ship_days: dec!(1),
            top_products: 20,
            tiers: TierThresholds::default(),
            grades: GradeThresholds::default(),
            scorecard: ScorecardThresholds::default(),
            status_labels: StatusLabels::default(),
            columns: ColumnMapping::default(),
        }
    }
}

impl BenchmarkConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SellerInsightResult<Self> {
        let config: BenchmarkConfig =
            serde_json::from_str(json).map_err(|e| SellerInsightError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SellerInsightResult<()> {
        if self.min_peer_orders == 0 {
            return Err(invalid("min_peer_orders", "Must be at least 1"));
        }
        if self.same_day_ship_days < Decimal::ZERO {
            return Err(invalid("same_day_ship_days", "Must be non-negative"));
        }
        if self.top_products == 0 {
            return Err(invalid("top_products", "Must be at least 1"));
        }

        let d = &self.tiers.direct;
        if !(d.excellent >= d.good && d.good >= d.average) {
            return Err(invalid(
                "tiers.direct",
                "Cut-offs must be non-increasing from excellent to average",
            ));
        }
        let i = &self.tiers.inverse;
        if !(i.excellent <= i.good && i.good <= i.average) {
            return Err(invalid(
                "tiers.inverse",
                "Cut-offs must be non-decreasing from excellent to average",
            ));
        }

        let gd = &self.grades.direct;
        if !(gd.a_plus >= gd.a && gd.a >= gd.b_plus && gd.b_plus >= gd.b) {
            return Err(invalid("grades.direct", "Cut-offs must be non-increasing"));
        }
        let gi = &self.grades.inverse;
        if !(gi.a_plus <= gi.a && gi.a <= gi.b_plus && gi.b_plus <= gi.b) {
            return Err(invalid("grades.inverse", "Cut-offs must be non-decreasing"));
        }

        let s = &self.scorecard;
        if !(s.a_plus >= s.a && s.a >= s.a_minus && s.a_minus >= s.b_plus && s.b_plus >= s.b) {
            return Err(invalid("scorecard", "Cut-offs must be non-increasing"));
        }

        let labels = &self.status_labels;
        for (name, label) in [
            ("completed", &labels.completed),
            ("cancelled", &labels.cancelled),
            ("delayed", &labels.delayed),
            ("returned", &labels.returned),
            ("exchanged", &labels.exchanged),
        ] {
            if label.trim().is_empty() {
                return Err(invalid(
                    &format!("status_labels.{name}"),
                    "Status label must not be empty",
                ));
            }
        }

        self.columns.validate()
    }
}

fn invalid(field: &str, reason: &str) -> SellerInsightError {
    SellerInsightError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial_override() {
        let config = BenchmarkConfig::from_json(r#"{"min_peer_orders": 5}"#).unwrap();
        assert_eq!(config.min_peer_orders, 5);
        assert_eq!(config.tiers, TierThresholds::default());

        let err = BenchmarkConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, SellerInsightError::Config(_)));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = BenchmarkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_peer_orders, 10);
        assert_eq!(config.tiers.direct.excellent, dec!(1.2));
        assert_eq!(config.grades.inverse.a_plus, dec!(0.7));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BenchmarkConfig =
            serde_json::from_str(r#"{"min_peer_orders": 25, "status_labels": {"cancelled": "취소"}}"#)
                .unwrap();
        assert_eq!(config.min_peer_orders, 25);
        assert_eq!(config.status_labels.cancelled, "취소");
        assert_eq!(config.status_labels.completed, "배송완료");
        assert_eq!(config.tiers, TierThresholds::default());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = BenchmarkConfig {
            min_peer_orders: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BenchmarkConfig {
            top_products: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let mut config = BenchmarkConfig::default();
        config.tiers.direct.good = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = BenchmarkConfig::default();
        config.tiers.inverse.excellent = dec!(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_status_label_rejected() {
        let mut config = BenchmarkConfig::default();
        config.status_labels.returned = " ".into();
        assert!(config.validate().is_err());
    }
}
