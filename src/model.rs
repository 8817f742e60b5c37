use serde::Serialize;

/// Two aligned label sequences, one observation per index.
///
/// Only the decoders build these; the fields stay private so the
/// equal-length invariant cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSequence {
    predicted: Vec<i64>,
    actual: Vec<i64>,
}

impl PairSequence {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            predicted: Vec::with_capacity(capacity),
            actual: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, predicted: i64, actual: i64) {
        self.predicted.push(predicted);
        self.actual.push(actual);
    }

    pub(crate) fn push_repeated(&mut self, predicted: i64, actual: i64, times: usize) {
        self.predicted.extend(std::iter::repeat_n(predicted, times));
        self.actual.extend(std::iter::repeat_n(actual, times));
    }

    pub fn predicted(&self) -> &[i64] {
        &self.predicted
    }

    pub fn actual(&self) -> &[i64] {
        &self.actual
    }

    pub fn len(&self) -> usize {
        self.predicted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.predicted.iter().copied().zip(self.actual.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Scored {
        kappa: f64,
        observations: usize,
        accuracy: f64,
        sha256: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub source_name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl Outcome {
    pub fn is_scored(&self) -> bool {
        matches!(self.status, OutcomeStatus::Scored { .. })
    }

    pub fn kappa(&self) -> Option<f64> {
        match self.status {
            OutcomeStatus::Scored { kappa, .. } => Some(kappa),
            OutcomeStatus::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub generated_at: String,
    pub results_dir: String,
    pub token: String,
    pub format: String,
    pub class_count: usize,
    pub file_count: usize,
    pub scored_count: usize,
    pub failed_count: usize,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassStats {
    pub label: i64,
    pub f1_score: f64,
    pub precision: f64,
    pub recall: f64,
    pub class_dist: f64,
    pub predicted_shares: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgreementSummary {
    pub observations: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub classes: Vec<ClassStats>,
}
