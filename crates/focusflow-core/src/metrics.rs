//! Posture metric aggregation.
//!
//! The backend reports a posture score that arrives either as a fraction in
//! [0, 1] or already as a percentage in [0, 100]. The ambiguity is resolved
//! once, at the ingress boundary, by tagging the sample; everything downstream
//! works in percent.

use serde::{Deserialize, Serialize};

/// A posture sample, tagged by the scale it arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureScore {
    /// Raw value in [0, 1].
    Fraction(f64),
    /// Raw value in [0, 100].
    Percentage(f64),
}

impl PostureScore {
    /// Classify a raw wire value. Values at or below 1 are fractions.
    pub fn from_raw(value: f64) -> Self {
        if value <= 1.0 {
            PostureScore::Fraction(value)
        } else {
            PostureScore::Percentage(value)
        }
    }

    /// The sample on the percentage scale, clamped to [0, 100].
    pub fn as_percent(self) -> f64 {
        let pct = match self {
            PostureScore::Fraction(f) => f * 100.0,
            PostureScore::Percentage(p) => p,
        };
        pct.clamp(0.0, 100.0)
    }
}

/// Running average of posture samples for one focus session.
///
/// Holds `(sum, count)` only; reset on every session start and whenever the
/// controller leaves the focus phase.
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    sum: f64,
    count: u32,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one sample and return the updated rounded average.
    pub fn ingest(&mut self, score: PostureScore) -> u8 {
        self.sum += score.as_percent();
        self.count += 1;
        self.average()
    }

    /// Rounded average in [0, 100]; 0 when no samples have been ingested.
    pub fn average(&self) -> u8 {
        if self.count == 0 {
            return 0;
        }
        (self.sum / f64::from(self.count)).round() as u8
    }

    pub fn sample_count(&self) -> u32 {
        self.count
    }

    /// Zero both accumulators.
    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fraction_samples_average() {
        let mut agg = MetricAggregator::new();
        agg.ingest(PostureScore::from_raw(0.5));
        let avg = agg.ingest(PostureScore::from_raw(0.8));
        assert_eq!(avg, 65);
    }

    #[test]
    fn percentage_samples_average() {
        let mut agg = MetricAggregator::new();
        agg.ingest(PostureScore::from_raw(50.0));
        let avg = agg.ingest(PostureScore::from_raw(80.0));
        assert_eq!(avg, 65);
    }

    #[test]
    fn reset_then_single_sample() {
        let mut agg = MetricAggregator::new();
        agg.ingest(PostureScore::from_raw(0.2));
        agg.reset();
        assert_eq!(agg.average(), 0);
        assert_eq!(agg.ingest(PostureScore::from_raw(0.9)), 90);
    }

    #[test]
    fn empty_average_is_zero() {
        assert_eq!(MetricAggregator::new().average(), 0);
    }

    #[test]
    fn boundary_value_one_is_a_fraction() {
        assert_eq!(PostureScore::from_raw(1.0).as_percent(), 100.0);
        assert_eq!(PostureScore::from_raw(1.5).as_percent(), 1.5);
    }

    proptest! {
        #[test]
        fn average_stays_in_percent_range(samples in proptest::collection::vec(0.0f64..100.0, 1..50)) {
            let mut agg = MetricAggregator::new();
            for s in samples {
                agg.ingest(PostureScore::from_raw(s));
            }
            prop_assert!(agg.average() <= 100);
        }
    }
}
