use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::decode::DEFAULT_CLASS_COUNT;

// The scorer allocates a classes x classes matrix per file.
const MAX_CLASS_COUNT: usize = 1024;

#[derive(Parser, Debug)]
#[command(
    name = "qwk-score",
    version,
    about = "Score classifier result files with quadratic weighted kappa"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Score(ScoreArgs),
    Inspect(InspectArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ResultFormat {
    Confusion,
    Pairs,
}

impl ResultFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confusion => "confusion",
            Self::Pairs => "pairs",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    #[arg(long, default_value = "kaggle")]
    pub token: String,

    #[arg(long, value_enum, default_value_t = ResultFormat::Confusion)]
    pub format: ResultFormat,

    #[arg(long, default_value_t = DEFAULT_CLASS_COUNT, value_parser = parse_class_count)]
    pub classes: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = ResultFormat::Confusion)]
    pub format: ResultFormat,

    #[arg(long, default_value_t = DEFAULT_CLASS_COUNT, value_parser = parse_class_count)]
    pub classes: usize,
}

fn parse_class_count(raw: &str) -> Result<usize, String> {
    let count = raw
        .parse::<usize>()
        .map_err(|err| format!("invalid class count {raw:?}: {err}"))?;
    if !(1..=MAX_CLASS_COUNT).contains(&count) {
        return Err(format!("class count must be between 1 and {MAX_CLASS_COUNT}"));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_args_default_to_confusion_with_thirteen_classes() {
        let cli = Cli::try_parse_from(["qwk-score", "score", "--results-dir", "out"])
            .expect("score args should parse");
        let Commands::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.results_dir, PathBuf::from("out"));
        assert_eq!(args.token, "kaggle");
        assert_eq!(args.format, ResultFormat::Confusion);
        assert_eq!(args.classes, 13);
        assert!(!args.json);
    }

    #[test]
    fn inspect_args_accept_pairs_format() {
        let cli = Cli::try_parse_from([
            "qwk-score",
            "inspect",
            "--file",
            "run.txt",
            "--format",
            "pairs",
            "--classes",
            "5",
        ])
        .expect("inspect args should parse");
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.format, ResultFormat::Pairs);
        assert_eq!(args.classes, 5);
    }

    #[test]
    fn out_of_range_class_counts_are_rejected() {
        let result = Cli::try_parse_from(["qwk-score", "score", "--classes", "0"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["qwk-score", "score", "--classes", "5000"]);
        assert!(result.is_err());
    }
}
