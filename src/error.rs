use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed confusion row {row}: {reason}")]
    MalformedConfusionRow { row: usize, reason: String },

    #[error("malformed pair line {line}: {reason}")]
    MalformedPairLine { line: usize, reason: String },

    #[error("decoded result holds no observations")]
    EmptyResult,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScorerError {
    #[error("scorer needs at least one observation")]
    Empty,

    #[error("rating sequences differ in length: predicted={predicted} actual={actual}")]
    LengthMismatch { predicted: usize, actual: usize },

    #[error("label {label} at index {index} outside rating range {min}..={max}")]
    OutOfRange {
        index: usize,
        label: i64,
        min: i64,
        max: i64,
    },
}

/// Anything that turns one located file into a failed outcome.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file unreadable: {0}")]
    FileUnreadable(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("scorer precondition violated: {0}")]
    Scorer(#[from] ScorerError),
}
