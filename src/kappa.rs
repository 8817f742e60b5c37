use std::collections::BTreeMap;

use crate::error::ScorerError;
use crate::model::{AgreementSummary, ClassStats, PairSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KappaScorer {
    min_rating: i64,
    max_rating: i64,
}

impl KappaScorer {
    pub fn for_classes(class_count: usize) -> Self {
        Self {
            min_rating: 0,
            max_rating: class_count.saturating_sub(1) as i64,
        }
    }

    pub fn score_pairs(&self, pairs: &PairSequence) -> Result<f64, ScorerError> {
        self.score(pairs.predicted(), pairs.actual())
    }

    pub fn score(&self, predicted: &[i64], actual: &[i64]) -> Result<f64, ScorerError> {
        if predicted.len() != actual.len() {
            return Err(ScorerError::LengthMismatch {
                predicted: predicted.len(),
                actual: actual.len(),
            });
        }
        if predicted.is_empty() {
            return Err(ScorerError::Empty);
        }
        self.check_range(predicted)?;
        self.check_range(actual)?;

        Ok(quadratic_weighted_kappa(
            predicted,
            actual,
            self.min_rating,
            self.max_rating,
        ))
    }

    fn check_range(&self, ratings: &[i64]) -> Result<(), ScorerError> {
        match ratings
            .iter()
            .position(|label| !(self.min_rating..=self.max_rating).contains(label))
        {
            Some(index) => Err(ScorerError::OutOfRange {
                index,
                label: ratings[index],
                min: self.min_rating,
                max: self.max_rating,
            }),
            None => Ok(()),
        }
    }
}

// Callers guarantee equal, non-zero lengths and labels inside
// `min_rating..=max_rating`; `KappaScorer::score` is the checked entry point.
fn quadratic_weighted_kappa(a: &[i64], b: &[i64], min_rating: i64, max_rating: i64) -> f64 {
    let num_ratings = (max_rating - min_rating + 1) as usize;
    let offset = |label: i64| (label - min_rating) as usize;

    let mut observed = vec![vec![0.0_f64; num_ratings]; num_ratings];
    let mut hist_a = vec![0.0_f64; num_ratings];
    let mut hist_b = vec![0.0_f64; num_ratings];
    for (&x, &y) in a.iter().zip(b) {
        observed[offset(x)][offset(y)] += 1.0;
        hist_a[offset(x)] += 1.0;
        hist_b[offset(y)] += 1.0;
    }

    let total = a.len() as f64;
    let scale = ((num_ratings.max(2) - 1) as f64).powi(2);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..num_ratings {
        for j in 0..num_ratings {
            let distance = i as f64 - j as f64;
            let weight = distance * distance / scale;
            let expected = hist_a[i] * hist_b[j] / total;
            numerator += weight * observed[i][j];
            denominator += weight * expected;
        }
    }

    // Zero expected disagreement: both raters used a single shared class.
    if denominator == 0.0 {
        return 1.0;
    }

    // Rounding can land a fully reversed rating a few ulps below -1.
    (1.0 - numerator / denominator).clamp(-1.0, 1.0)
}

pub fn summarize_agreement(pairs: &PairSequence) -> AgreementSummary {
    let observations = pairs.len();
    let mut cells: BTreeMap<(i64, i64), usize> = BTreeMap::new();
    let mut actual_counts: BTreeMap<i64, usize> = BTreeMap::new();
    let mut predicted_counts: BTreeMap<i64, usize> = BTreeMap::new();

    for (predicted, actual) in pairs.iter() {
        *cells.entry((predicted, actual)).or_default() += 1;
        *actual_counts.entry(actual).or_default() += 1;
        *predicted_counts.entry(predicted).or_default() += 1;
    }

    let ratio = |numerator: usize, denominator: usize| {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    };

    let mut classes = Vec::with_capacity(actual_counts.len());
    let mut precision_total = 0.0;
    let mut recall_total = 0.0;
    let mut correct_total = 0_usize;
    for (&label, &actual_count) in &actual_counts {
        let correct = cells.get(&(label, label)).copied().unwrap_or(0);
        let precision = ratio(correct, predicted_counts.get(&label).copied().unwrap_or(0));
        let recall = ratio(correct, actual_count);
        let class_dist = ratio(actual_count, observations);

        precision_total += class_dist * precision;
        recall_total += class_dist * recall;
        correct_total += correct;

        // Share of this actual class landing in each predicted class, over the
        // actual-class labels; `None` where the cell never occurred.
        let predicted_shares = actual_counts
            .keys()
            .map(|&predicted| {
                cells
                    .get(&(predicted, label))
                    .map(|&count| ratio(count, actual_count))
            })
            .collect();

        classes.push(ClassStats {
            label,
            predicted_shares,
            f1_score: f1(precision, recall),
            precision,
            recall,
            class_dist,
        });
    }

    AgreementSummary {
        observations,
        accuracy: ratio(correct_total, observations),
        precision: precision_total,
        recall: recall_total,
        f1_score: f1(precision_total, recall_total),
        classes,
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9
    }

    fn sequence(pairs: &[(i64, i64)]) -> PairSequence {
        let mut sequence = PairSequence::with_capacity(pairs.len());
        for &(predicted, actual) in pairs {
            sequence.push(predicted, actual);
        }
        sequence
    }

    #[test]
    fn identical_ratings_score_one() {
        let scorer = KappaScorer::for_classes(13);
        let ratings = vec![0, 3, 7, 12, 12, 5];
        let kappa = scorer.score(&ratings, &ratings).expect("valid input");
        assert!(approx_eq(kappa, 1.0), "unexpected kappa: {kappa}");
    }

    #[test]
    fn single_shared_class_scores_one() {
        let scorer = KappaScorer::for_classes(13);
        let kappa = scorer.score(&[4, 4, 4], &[4, 4, 4]).expect("valid input");
        assert_eq!(kappa, 1.0);
    }

    #[test]
    fn reversed_ratings_score_minus_one() {
        let scorer = KappaScorer::for_classes(2);
        let kappa = scorer.score(&[0, 1], &[1, 0]).expect("valid input");
        assert!(approx_eq(kappa, -1.0), "unexpected kappa: {kappa}");
    }

    #[test]
    fn fully_reversed_ratings_never_drop_below_minus_one() {
        let kappa = KappaScorer::for_classes(3)
            .score(&[0, 1, 2], &[2, 1, 0])
            .expect("valid input");
        assert_eq!(kappa, -1.0);

        let kappa = KappaScorer::for_classes(13)
            .score(&[0, 6, 12], &[12, 6, 0])
            .expect("valid input");
        assert_eq!(kappa, -1.0);
    }

    #[test]
    fn partial_agreement_matches_hand_computed_value() {
        // O = [[1,1],[0,1]], hist_a = [2,1], hist_b = [1,2], N = 3
        // numerator = 1, denominator = 2*2/3 + 1*1/3 = 5/3
        let scorer = KappaScorer::for_classes(2);
        let kappa = scorer.score(&[0, 0, 1], &[0, 1, 1]).expect("valid input");
        assert!(approx_eq(kappa, 0.4), "unexpected kappa: {kappa}");
    }

    #[test]
    fn kappa_stays_within_bounds() {
        let scorer = KappaScorer::for_classes(13);
        let predicted = vec![0, 12, 6, 3, 9, 1, 11, 2];
        let actual = vec![12, 0, 5, 3, 2, 10, 0, 7];
        let kappa = scorer.score(&predicted, &actual).expect("valid input");
        assert!((-1.0..=1.0).contains(&kappa), "unexpected kappa: {kappa}");
    }

    #[test]
    fn scorer_rejects_precondition_violations() {
        let scorer = KappaScorer::for_classes(13);
        assert_eq!(scorer.score(&[], &[]), Err(ScorerError::Empty));
        assert_eq!(
            scorer.score(&[1, 2], &[1]),
            Err(ScorerError::LengthMismatch {
                predicted: 2,
                actual: 1
            })
        );
        assert_eq!(
            scorer.score(&[1, 13], &[1, 2]),
            Err(ScorerError::OutOfRange {
                index: 1,
                label: 13,
                min: 0,
                max: 12
            })
        );
        assert!(matches!(
            scorer.score(&[1, 2], &[-1, 2]),
            Err(ScorerError::OutOfRange { label: -1, .. })
        ));
    }

    #[test]
    fn summary_reports_per_class_precision_and_recall() {
        // class 0: predicted 3 times (2 correct), actual 2 times
        // class 1: predicted 1 time (1 correct), actual 2 times
        let pairs = sequence(&[(0, 0), (0, 0), (0, 1), (1, 1)]);
        let summary = summarize_agreement(&pairs);

        assert_eq!(summary.observations, 4);
        assert!(approx_eq(summary.accuracy, 0.75));
        assert_eq!(summary.classes.len(), 2);

        let class_zero = &summary.classes[0];
        assert_eq!(class_zero.label, 0);
        assert!(approx_eq(class_zero.precision, 2.0 / 3.0));
        assert!(approx_eq(class_zero.recall, 1.0));
        assert!(approx_eq(class_zero.f1_score, 0.8));
        assert!(approx_eq(class_zero.class_dist, 0.5));

        let class_one = &summary.classes[1];
        assert!(approx_eq(class_one.precision, 1.0));
        assert!(approx_eq(class_one.recall, 0.5));

        assert_eq!(class_zero.predicted_shares, vec![Some(1.0), None]);
        assert_eq!(class_one.predicted_shares, vec![Some(0.5), Some(0.5)]);

        assert!(approx_eq(summary.precision, 0.5 * (2.0 / 3.0) + 0.5));
        assert!(approx_eq(summary.recall, 0.75));
    }

    #[test]
    fn summary_handles_labels_never_predicted() {
        let pairs = sequence(&[(0, 2), (0, 2)]);
        let summary = summarize_agreement(&pairs);
        assert_eq!(summary.classes.len(), 1);
        assert_eq!(summary.classes[0].label, 2);
        assert_eq!(summary.classes[0].precision, 0.0);
        assert_eq!(summary.classes[0].f1_score, 0.0);
        assert_eq!(summary.accuracy, 0.0);
    }
}
