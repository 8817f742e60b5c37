use regex::Regex;

use super::MAX_OBSERVATIONS;
use crate::error::DecodeError;
use crate::model::PairSequence;

pub fn decode_confusion(
    content: &str,
    class_count: usize,
    count_token: &Regex,
) -> Result<PairSequence, DecodeError> {
    let mut lines = content.lines();
    let mut matrix = Vec::with_capacity(class_count);
    let mut total = 0_usize;

    for row in 0..class_count {
        let line = lines.next().ok_or_else(|| DecodeError::MalformedConfusionRow {
            row,
            reason: format!("expected {class_count} rows, file ends after {row}"),
        })?;

        let counts = parse_row(line, row, class_count, count_token)?;
        for &count in &counts {
            total = total
                .checked_add(count)
                .filter(|sum| *sum <= MAX_OBSERVATIONS)
                .ok_or_else(|| DecodeError::MalformedConfusionRow {
                    row,
                    reason: format!("matrix exceeds {MAX_OBSERVATIONS} observations"),
                })?;
        }
        matrix.push(counts);
    }

    if total == 0 {
        return Err(DecodeError::EmptyResult);
    }

    let mut pairs = PairSequence::with_capacity(total);
    for (predicted, counts) in matrix.iter().enumerate() {
        for (actual, &count) in counts.iter().enumerate() {
            pairs.push_repeated(predicted as i64, actual as i64, count);
        }
    }

    Ok(pairs)
}

fn parse_row(
    line: &str,
    row: usize,
    class_count: usize,
    count_token: &Regex,
) -> Result<Vec<usize>, DecodeError> {
    let stripped = line.replace(['[', ']'], "");
    let tokens = stripped.split_whitespace().collect::<Vec<&str>>();

    if tokens.len() != class_count {
        return Err(DecodeError::MalformedConfusionRow {
            row,
            reason: format!("expected {class_count} counts, found {}", tokens.len()),
        });
    }

    tokens
        .iter()
        .map(|token| {
            if !count_token.is_match(token) {
                return Err(DecodeError::MalformedConfusionRow {
                    row,
                    reason: format!("count is not a non-negative integer: {token:?}"),
                });
            }
            token
                .parse::<usize>()
                .map_err(|err| DecodeError::MalformedConfusionRow {
                    row,
                    reason: format!("count {token:?} out of range: {err}"),
                })
        })
        .collect()
}
