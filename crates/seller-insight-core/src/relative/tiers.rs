use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{GradeThresholds, TierThresholds};
use crate::metrics::Polarity;
use crate::types::Ratio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceTier::Excellent => "excellent",
            PerformanceTier::Good => "good",
            PerformanceTier::Average => "average",
            PerformanceTier::BelowAverage => "below_average",
        };
        write!(f, "{label}")
    }
}

/// Letter grade, best first. `AMinus` only comes out of the overall
/// scorecard; per-metric grading skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier for a seller/peer ratio under the metric's polarity.
pub fn classify_tier(ratio: Ratio, polarity: Polarity, thresholds: &TierThresholds) -> PerformanceTier {
    match polarity {
        Polarity::Direct => {
            let c = &thresholds.direct;
            if ratio >= c.excellent {
                PerformanceTier::Excellent
            } else if ratio >= c.good {
                PerformanceTier::Good
            } else if ratio >= c.average {
                PerformanceTier::Average
            } else {
                PerformanceTier::BelowAverage
            }
        }
        Polarity::Inverse => {
            let c = &thresholds.inverse;
            if ratio <= c.excellent {
                PerformanceTier::Excellent
            } else if ratio <= c.good {
                PerformanceTier::Good
            } else if ratio <= c.average {
                PerformanceTier::Average
            } else {
                PerformanceTier::BelowAverage
            }
        }
    }
}

/// Letter grade for a seller/peer ratio under the metric's polarity.
pub fn letter_grade(ratio: Ratio, polarity: Polarity, thresholds: &GradeThresholds) -> Grade {
    match polarity {
        Polarity::Direct => {
            let c = &thresholds.direct;
            if ratio >= c.a_plus {
                Grade::APlus
            } else if ratio >= c.a {
                Grade::A
            } else if ratio >= c.b_plus {
                Grade::BPlus
            } else if ratio >= c.b {
                Grade::B
            } else {
                Grade::C
            }
        }
        Polarity::Inverse => {
            let c = &thresholds.inverse;
            if ratio <= c.a_plus {
                Grade::APlus
            } else if ratio <= c.a {
                Grade::A
            } else if ratio <= c.b_plus {
                Grade::BPlus
            } else if ratio <= c.b {
                Grade::B
            } else {
                Grade::C
            }
        }
    }
}
