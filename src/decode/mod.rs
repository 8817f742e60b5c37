use anyhow::{Context, Result};
use regex::Regex;

use crate::cli::ResultFormat;
use crate::error::DecodeError;
use crate::model::PairSequence;

mod confusion;
mod pairs;

pub use self::confusion::decode_confusion;
pub use self::pairs::decode_pairs;

pub const DEFAULT_CLASS_COUNT: usize = 13;

// Upper bound on expanded observations; a corrupt count must fail the file
// instead of exhausting memory.
pub const MAX_OBSERVATIONS: usize = 50_000_000;

#[derive(Debug, Clone)]
pub enum Decoder {
    Confusion {
        class_count: usize,
        count_token: Regex,
    },
    Pairs,
}

impl Decoder {
    pub fn for_format(format: ResultFormat, class_count: usize) -> Result<Self> {
        match format {
            ResultFormat::Confusion => {
                let count_token =
                    Regex::new(r"^[0-9]+$").context("failed to compile confusion count regex")?;
                Ok(Self::Confusion {
                    class_count,
                    count_token,
                })
            }
            ResultFormat::Pairs => Ok(Self::Pairs),
        }
    }

    pub fn format(&self) -> ResultFormat {
        match self {
            Self::Confusion { .. } => ResultFormat::Confusion,
            Self::Pairs => ResultFormat::Pairs,
        }
    }

    pub fn decode(&self, content: &str) -> Result<PairSequence, DecodeError> {
        match self {
            Self::Confusion {
                class_count,
                count_token,
            } => decode_confusion(content, *class_count, count_token),
            Self::Pairs => decode_pairs(content),
        }
    }
}
