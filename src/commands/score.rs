use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ScoreArgs;
use crate::commands::locate::locate_result_files;
use crate::decode::Decoder;
use crate::error::FileError;
use crate::kappa::{KappaScorer, summarize_agreement};
use crate::model::{Outcome, OutcomeStatus, ScoreReport};
use crate::util::{format_score, now_utc_string, sha256_hex, write_json_stdout};

pub const FAILURE_MARKER: &str = "ERROR";

pub fn run(args: ScoreArgs) -> Result<()> {
    let decoder = Decoder::for_format(args.format, args.classes)?;
    let scorer = KappaScorer::for_classes(args.classes);

    info!(
        results_dir = %args.results_dir.display(),
        token = %args.token,
        format = args.format.as_str(),
        classes = args.classes,
        "scoring result files"
    );

    let outcomes = score_directory(&args.results_dir, &args.token, &decoder, &scorer)?;
    let report = build_report(&args, outcomes);

    info!(
        files = report.file_count,
        scored = report.scored_count,
        failed = report.failed_count,
        "scoring completed"
    );

    if args.json {
        write_json_stdout(&report)
    } else {
        write_text_report(&report.outcomes)
    }
}

pub fn score_directory(
    results_dir: &Path,
    token: &str,
    decoder: &Decoder,
    scorer: &KappaScorer,
) -> Result<Vec<Outcome>> {
    let located = locate_result_files(results_dir, token)?;
    info!(count = located.len(), "located result files");

    let mut outcomes = Vec::with_capacity(located.len());
    for entry in located {
        let status = match score_file(&entry.path, decoder, scorer) {
            Ok(status) => status,
            Err(err) => {
                warn!(file = %entry.source_name, error = %err, "result file failed");
                OutcomeStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        outcomes.push(Outcome {
            source_name: entry.source_name,
            status,
        });
    }

    Ok(outcomes)
}

pub fn score_file(
    path: &Path,
    decoder: &Decoder,
    scorer: &KappaScorer,
) -> Result<OutcomeStatus, FileError> {
    let content = fs::read_to_string(path)?;
    let pairs = decoder.decode(&content)?;
    let kappa = scorer.score_pairs(&pairs)?;

    Ok(OutcomeStatus::Scored {
        kappa,
        observations: pairs.len(),
        accuracy: summarize_agreement(&pairs).accuracy,
        sha256: sha256_hex(content.as_bytes()),
    })
}

fn build_report(args: &ScoreArgs, outcomes: Vec<Outcome>) -> ScoreReport {
    let scored_count = outcomes.iter().filter(|outcome| outcome.is_scored()).count();

    ScoreReport {
        generated_at: now_utc_string(),
        results_dir: args.results_dir.display().to_string(),
        token: args.token.clone(),
        format: args.format.as_str().to_string(),
        class_count: args.classes,
        file_count: outcomes.len(),
        scored_count,
        failed_count: outcomes.len() - scored_count,
        outcomes,
    }
}

pub fn render_report_line(outcome: &Outcome) -> String {
    match outcome.kappa() {
        Some(kappa) => format!("{} {}", format_score(kappa), outcome.source_name),
        None => format!("{FAILURE_MARKER} {}", outcome.source_name),
    }
}

fn write_text_report(outcomes: &[Outcome]) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    for outcome in outcomes {
        writeln!(output, "{}", render_report_line(outcome))?;
    }
    output.flush()?;
    Ok(())
}
