// YearScope - core/aggregate.rs
//
// Multi-dimensional aggregation over a filtered record set: overall
// accuracy and confidence, per-category, per-period and per-region
// rollups, and the fixed five-bucket confidence histogram.
//
// Every ratio is guarded: an empty denominator yields 0, never NaN.
// Grouped rollups list groups in first-encountered order and only when
// populated; the histogram always has all five buckets.

use crate::core::model::{Continent, EvaluationRecord, HistoricalPeriod, PrimaryCategory};
use crate::util::constants::{CONFIDENCE_BUCKET_COUNT, CONFIDENCE_BUCKET_EDGES};
use serde::Serialize;

/// Headline statistics for a record set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_events: usize,
    pub correct_events: usize,
    pub accuracy: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: PrimaryCategory,
    pub count: usize,
    pub accuracy: f64,
    pub avg_confidence: f64,
}

/// One confidence-histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    /// Display label, e.g. "0.2-0.4".
    pub range: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Share of the record set in this bucket, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub period: HistoricalPeriod,
    pub count: usize,
    pub accuracy: f64,
}

/// Accuracy for one continent, feeding the world-map overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    pub region: Continent,
    pub count: usize,
    pub accuracy: f64,
}

/// Everything the results dashboard renders for one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub overall: OverallStats,
    pub by_category: Vec<CategoryStats>,
    pub by_confidence_bucket: Vec<BucketStats>,
    pub by_period: Vec<PeriodStats>,
    pub by_region: Vec<RegionStats>,
}

impl AggregateResult {
    /// The zero state: no records, five empty buckets.
    pub fn empty() -> Self {
        aggregate(std::iter::empty::<&EvaluationRecord>())
    }
}

impl Default for AggregateResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Running counts for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: usize,
    correct: usize,
    confidence_sum: f64,
}

impl Tally {
    fn add(&mut self, record: &EvaluationRecord) {
        self.total += 1;
        if record.is_correct {
            self.correct += 1;
        }
        self.confidence_sum += record.confidence_score;
    }

    fn accuracy(&self) -> f64 {
        ratio(self.correct as f64, self.total)
    }

    fn avg_confidence(&self) -> f64 {
        ratio(self.confidence_sum, self.total)
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0 or the result
/// is not finite.
fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let value = numerator / denominator as f64;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Find-or-insert in a first-encountered-order group list.
fn tally_for<K: PartialEq + Copy>(groups: &mut Vec<(K, Tally)>, key: K) -> &mut Tally {
    let pos = match groups.iter().position(|(k, _)| *k == key) {
        Some(pos) => pos,
        None => {
            groups.push((key, Tally::default()));
            groups.len() - 1
        }
    };
    &mut groups[pos].1
}

/// Index of the histogram bucket holding `confidence`.
///
/// Buckets are `[lo, hi)` except the last, which is `[lo, hi]`. Values
/// outside [0, 1] (and NaN) belong to no bucket.
pub fn bucket_index(confidence: f64) -> Option<usize> {
    let first = CONFIDENCE_BUCKET_EDGES[0];
    let last = CONFIDENCE_BUCKET_EDGES[CONFIDENCE_BUCKET_COUNT];
    if !(first..=last).contains(&confidence) {
        return None;
    }
    (0..CONFIDENCE_BUCKET_COUNT).find(|&i| {
        let lower = CONFIDENCE_BUCKET_EDGES[i];
        let upper = CONFIDENCE_BUCKET_EDGES[i + 1];
        let is_last = i + 1 == CONFIDENCE_BUCKET_COUNT;
        confidence >= lower && (confidence < upper || (is_last && confidence <= upper))
    })
}

/// Aggregate a record set in a single pass.
///
/// Accepts any iterator of borrowed records so callers can pass a filtered
/// view without copying. Output is a pure function of the input sequence.
pub fn aggregate<'a, I>(records: I) -> AggregateResult
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    let mut overall = Tally::default();
    let mut categories: Vec<(PrimaryCategory, Tally)> = Vec::new();
    let mut periods: Vec<(HistoricalPeriod, Tally)> = Vec::new();
    let mut regions: Vec<(Continent, Tally)> = Vec::new();
    let mut buckets = [0usize; CONFIDENCE_BUCKET_COUNT];

    for record in records {
        overall.add(record);
        tally_for(&mut categories, record.event.primary_category).add(record);
        tally_for(&mut periods, record.event.historical_period).add(record);
        tally_for(&mut regions, record.event.continental).add(record);
        if let Some(idx) = bucket_index(record.confidence_score) {
            buckets[idx] += 1;
        }
    }

    let by_confidence_bucket = buckets
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let lower = CONFIDENCE_BUCKET_EDGES[i];
            let upper = CONFIDENCE_BUCKET_EDGES[i + 1];
            BucketStats {
                range: format!("{lower:.1}-{upper:.1}"),
                lower,
                upper,
                count,
                percentage: ratio(count as f64, overall.total) * 100.0,
            }
        })
        .collect();

    AggregateResult {
        overall: OverallStats {
            total_events: overall.total,
            correct_events: overall.correct,
            accuracy: overall.accuracy(),
            avg_confidence: overall.avg_confidence(),
        },
        by_category: categories
            .into_iter()
            .map(|(category, t)| CategoryStats {
                category,
                count: t.total,
                accuracy: t.accuracy(),
                avg_confidence: t.avg_confidence(),
            })
            .collect(),
        by_confidence_bucket,
        by_period: periods
            .into_iter()
            .map(|(period, t)| PeriodStats {
                period,
                count: t.total,
                accuracy: t.accuracy(),
            })
            .collect(),
        by_region: regions
            .into_iter()
            .map(|(region, t)| RegionStats {
                region,
                count: t.total,
                accuracy: t.accuracy(),
            })
            .collect(),
    }
}
