// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardangle — estimate the rotation of photographed cards
//
// Entry point. Parses arguments, initialises logging, runs the batch and
// prints one line per image.

mod cli;

use std::path::Path;

use cardangle_core::{BatchReport, CardAngleError, FileOutcome};
use cardangle_vision::{BatchRunner, HoughSegmentDetector};
use clap::Parser;

use cli::{Cli, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cardangle starting");

    let code = match run(&cli) {
        Ok(report) => summary_code(&report),
        Err(err) => {
            eprintln!("Error: {err}");
            let code = ExitCode::for_error(&err);
            tracing::error!(error = %err, code = code as u8, "{}", code.description());
            code
        }
    };
    code.into()
}

fn run(cli: &Cli) -> Result<BatchReport, CardAngleError> {
    let config = cli.batch_config()?;
    let detector = HoughSegmentDetector::new(config.detector.clone());
    let runner = BatchRunner::new(config, detector)?;

    let report = runner.run()?;
    for outcome in &report.outcomes {
        println!("{}", outcome_line(outcome));
    }
    println!("{}", summary_line(&report, &cli.input));

    if let Some(path) = &cli.report {
        write_report(&report, path)?;
    }
    Ok(report)
}

fn summary_code(report: &BatchReport) -> ExitCode {
    if report.failed() > 0 {
        ExitCode::ProcessingError
    } else {
        ExitCode::Success
    }
}

fn summary_line(report: &BatchReport, input: &Path) -> String {
    if report.is_empty() {
        return format!("No supported images found in: {}", input.display());
    }
    format!(
        "Processed {} image(s): {} failed, {} without a valid angle",
        report.len(),
        report.failed(),
        report.without_detection()
    )
}

fn write_report(report: &BatchReport, path: &Path) -> Result<(), CardAngleError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn outcome_line(outcome: &FileOutcome) -> String {
    let name = file_name(outcome.input());
    match outcome {
        FileOutcome::Processed { estimate, .. } => match estimate.angle {
            Some(angle) => format!("{name} → Detected angle: {angle:.2}°"),
            None => format!("No valid angles found in: {name}"),
        },
        FileOutcome::Failed { reason, .. } => format!("Error: {name}: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardangle_core::AngleEstimate;
    use std::path::PathBuf;

    fn processed(angle: Option<f64>) -> FileOutcome {
        FileOutcome::Processed {
            input: PathBuf::from("photos/card.jpg"),
            output: PathBuf::from("out/card_angle.jpg"),
            estimate: AngleEstimate {
                angle,
                segments_detected: 4,
                segments_accepted: 3,
                dominant_votes: if angle.is_some() { 2 } else { 0 },
            },
        }
    }

    #[test]
    fn detected_line_uses_two_decimals() {
        assert_eq!(
            outcome_line(&processed(Some(30.5))),
            "card.jpg → Detected angle: 30.50°"
        );
    }

    #[test]
    fn undetected_line() {
        assert_eq!(
            outcome_line(&processed(None)),
            "No valid angles found in: card.jpg"
        );
    }

    #[test]
    fn failed_line_carries_reason() {
        let outcome = FileOutcome::Failed {
            input: PathBuf::from("photos/broken.png"),
            reason: "image processing failed: bad header".into(),
        };
        assert_eq!(
            outcome_line(&outcome),
            "Error: broken.png: image processing failed: bad header"
        );
    }

    #[test]
    fn any_failure_sets_processing_exit_code() {
        let mut report = BatchReport::default();
        report.push(processed(None));
        assert_eq!(summary_code(&report), ExitCode::Success);
        report.push(FileOutcome::Failed {
            input: PathBuf::from("x.png"),
            reason: "unreadable".into(),
        });
        assert_eq!(summary_code(&report), ExitCode::ProcessingError);
    }

    #[test]
    fn summary_reports_empty_input() {
        let input = Path::new("images_new");
        let mut report = BatchReport::default();
        assert_eq!(
            summary_line(&report, input),
            "No supported images found in: images_new"
        );
        report.push(processed(Some(3.5)));
        report.push(processed(None));
        assert_eq!(
            summary_line(&report, input),
            "Processed 2 image(s): 0 failed, 1 without a valid angle"
        );
    }

    #[test]
    fn report_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = BatchReport::default();
        report.push(processed(Some(-12.5)));

        write_report(&report, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: BatchReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
        assert!(text.contains("\"status\": \"processed\""));
    }
}
