use crate::error::DecodeError;
use crate::model::PairSequence;

pub fn decode_pairs(content: &str) -> Result<PairSequence, DecodeError> {
    let mut pairs = PairSequence::with_capacity(0);

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        let mut tokens = line.split_whitespace();
        let (Some(predicted), Some(actual)) = (tokens.next(), tokens.next()) else {
            return Err(DecodeError::MalformedPairLine {
                line: line_number,
                reason: "expected `predicted actual`".to_string(),
            });
        };

        pairs.push(
            parse_label(predicted, line_number)?,
            parse_label(actual, line_number)?,
        );
    }

    if pairs.is_empty() {
        return Err(DecodeError::EmptyResult);
    }

    Ok(pairs)
}

fn parse_label(token: &str, line: usize) -> Result<i64, DecodeError> {
    token
        .parse::<i64>()
        .map_err(|err| DecodeError::MalformedPairLine {
            line,
            reason: format!("label {token:?} is not an integer: {err}"),
        })
}
