use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InspectArgs;
use crate::decode::Decoder;
use crate::kappa::{KappaScorer, summarize_agreement};
use crate::model::AgreementSummary;
use crate::util::format_score;

const COLUMN_WIDTH: usize = 12;

pub fn run(args: InspectArgs) -> Result<()> {
    let decoder = Decoder::for_format(args.format, args.classes)?;
    let scorer = KappaScorer::for_classes(args.classes);

    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let pairs = decoder
        .decode(&content)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;
    let kappa = scorer
        .score_pairs(&pairs)
        .with_context(|| format!("failed to score {}", args.file.display()))?;
    let summary = summarize_agreement(&pairs);

    info!(
        file = %args.file.display(),
        format = decoder.format().as_str(),
        observations = summary.observations,
        "inspected result file"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    for line in render_confusion_table(&summary)
        .into_iter()
        .chain(render_stats(kappa, &summary))
    {
        writeln!(output, "{line}")?;
    }
    output.flush()?;
    Ok(())
}

/// Rows are actual classes, columns predicted classes; each cell is the
/// share of that actual class predicted as the column's label, `-` when the
/// pair never occurred.
pub fn render_confusion_table(summary: &AgreementSummary) -> Vec<String> {
    let widest = summary
        .classes
        .iter()
        .map(|class| class.label.to_string().len())
        .max()
        .unwrap_or(0);
    let w = widest.max(7) + 2;
    let mut lines = Vec::with_capacity(summary.classes.len() + 2);

    let mut header = format!("{:w$}  ", "");
    for class in &summary.classes {
        header.push_str(&format!("{:<w$}", class.label));
    }
    lines.push(header.trim_end().to_string());
    lines.push(format!("{:w$}{}", "", "-".repeat(summary.classes.len() * w)));

    for class in &summary.classes {
        let mut row = format!("{:>width$} | ", class.label, width = w - 1);
        for share in &class.predicted_shares {
            match share {
                Some(share) => row.push_str(&format!("{share:<w$.3}")),
                None => row.push_str(&format!("{:<w$}", "- ")),
            }
        }
        lines.push(row.trim_end().to_string());
    }

    lines
}

pub fn render_stats(kappa: f64, summary: &AgreementSummary) -> Vec<String> {
    let w = COLUMN_WIDTH;
    let rule = "-".repeat(w * 5);
    let mut lines = Vec::with_capacity(summary.classes.len() + 8);

    lines.push(rule.clone());
    lines.push(format!(
        "{:<w$}{:<w$}{:<w$}{:<w$}{:<w$}",
        "Class", "F1 Score", "Precision", "Recall", "Class Dist"
    ));
    lines.push(rule.clone());
    for class in &summary.classes {
        lines.push(format!(
            "{:<w$}{:<w$.3}{:<w$.3}{:<w$.3}{:<w$.3}",
            class.label, class.f1_score, class.precision, class.recall, class.class_dist
        ));
    }
    lines.push(rule.clone());
    lines.push(format!(
        "{:<w$}{:<w$.3}{:<w$.3}{:<w$.3}",
        "Total", summary.f1_score, summary.precision, summary.recall
    ));
    lines.push(rule);
    lines.push(format!(
        "{} predictions attempted, overall accuracy: {:.3}",
        summary.observations, summary.accuracy
    ));
    lines.push(format!("quadratic weighted kappa: {}", format_score(kappa)));

    lines
}
