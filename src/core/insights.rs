// YearScope - core/insights.rs
//
// Pure downstream derivations over aggregate results: the "key insights"
// lines of the results panel, the headline trend arrow, and the colour
// band for each region on the map.

use crate::core::aggregate::{AggregateResult, CategoryStats, PeriodStats};
use crate::core::model::Continent;
use crate::util::constants;
use serde::Serialize;

/// Direction shown next to the headline accuracy figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTrend {
    Up,
    Neutral,
    Down,
}

impl AccuracyTrend {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy > constants::TREND_UP_THRESHOLD {
            Self::Up
        } else if accuracy > constants::TREND_NEUTRAL_THRESHOLD {
            Self::Neutral
        } else {
            Self::Down
        }
    }
}

/// Map colour band for a region's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyBand {
    High,
    Medium,
    Low,
    /// Zero accuracy, including regions with no records.
    Empty,
}

impl AccuracyBand {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= constants::MAP_HIGH_ACCURACY {
            Self::High
        } else if accuracy >= constants::MAP_MEDIUM_ACCURACY {
            Self::Medium
        } else if accuracy > 0.0 {
            Self::Low
        } else {
            Self::Empty
        }
    }
}

/// A populated region with its map colour band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionBand {
    pub region: Continent,
    pub accuracy: f64,
    pub band: AccuracyBand,
}

/// Insights for the single-model results panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub trend: AccuracyTrend,
    pub best_category: Option<CategoryStats>,
    pub most_accurate_period: Option<PeriodStats>,
    pub region_bands: Vec<RegionBand>,
}

/// First item with the strictly greatest key. Ties keep the earliest item.
pub fn argmax_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let k = key(item);
        if best.map_or(true, |(_, best_key)| k > best_key) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

/// Derive the results-panel insights from an aggregate.
pub fn derive_insights(result: &AggregateResult) -> Insights {
    Insights {
        trend: AccuracyTrend::from_accuracy(result.overall.accuracy),
        best_category: argmax_by(&result.by_category, |c| c.accuracy).cloned(),
        most_accurate_period: argmax_by(&result.by_period, |p| p.accuracy).cloned(),
        region_bands: result
            .by_region
            .iter()
            .map(|r| RegionBand {
                region: r.region,
                accuracy: r.accuracy,
                band: AccuracyBand::from_accuracy(r.accuracy),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate;
    use crate::core::model::fixtures::record;
    use crate::core::model::{HistoricalPeriod, PrimaryCategory};

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(AccuracyTrend::from_accuracy(0.71), AccuracyTrend::Up);
        assert_eq!(AccuracyTrend::from_accuracy(0.7), AccuracyTrend::Neutral);
        assert_eq!(AccuracyTrend::from_accuracy(0.51), AccuracyTrend::Neutral);
        assert_eq!(AccuracyTrend::from_accuracy(0.5), AccuracyTrend::Down);
        assert_eq!(AccuracyTrend::from_accuracy(0.0), AccuracyTrend::Down);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(AccuracyBand::from_accuracy(0.8), AccuracyBand::High);
        assert_eq!(AccuracyBand::from_accuracy(0.5), AccuracyBand::Medium);
        assert_eq!(AccuracyBand::from_accuracy(0.01), AccuracyBand::Low);
        assert_eq!(AccuracyBand::from_accuracy(0.0), AccuracyBand::Empty);
    }

    #[test]
    fn test_argmax_ties_keep_first() {
        let items = [("a", 0.5), ("b", 0.9), ("c", 0.9)];
        assert_eq!(argmax_by(&items, |i| i.1).map(|i| i.0), Some("b"));
        let empty: [(&str, f64); 0] = [];
        assert!(argmax_by(&empty, |i| i.1).is_none());
    }

    #[test]
    fn test_insights_pick_best_category_and_period() {
        let mut modern = record(PrimaryCategory::ArtsCulture, true, 0.9);
        modern.event.historical_period = HistoricalPeriod::Modern;
        let mut ancient = record(PrimaryCategory::MilitaryWarfare, false, 0.2);
        ancient.event.historical_period = HistoricalPeriod::Ancient;

        let insights = derive_insights(&aggregate(&[ancient, modern]));
        assert_eq!(
            insights.best_category.map(|c| c.category),
            Some(PrimaryCategory::ArtsCulture)
        );
        assert_eq!(
            insights.most_accurate_period.map(|p| p.period),
            Some(HistoricalPeriod::Modern)
        );
        assert_eq!(insights.trend, AccuracyTrend::Down);
        assert_eq!(insights.region_bands.len(), 1);
        assert_eq!(insights.region_bands[0].region, Continent::Europe);
        assert_eq!(insights.region_bands[0].band, AccuracyBand::Medium);
    }

    #[test]
    fn test_insights_on_empty_result() {
        let insights = derive_insights(&AggregateResult::empty());
        assert!(insights.best_category.is_none());
        assert!(insights.most_accurate_period.is_none());
        assert!(insights.region_bands.is_empty());
        assert_eq!(insights.trend, AccuracyTrend::Down);
    }
}
