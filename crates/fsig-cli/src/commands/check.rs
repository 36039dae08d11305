//! Check command implementation
//!
//! Regenerates the manifest in memory and compares it with the file on disk.
//! Never writes.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::generate::{build, summarize};
use super::json_output::{error_codes, print_json, CheckOutput, JsonError};
use crate::output::{first_difference, LineDiff};

/// Run the check command
///
/// # Returns
/// Exit code: 0 if the manifest is up to date, 1 if stale or on error
pub fn run(
    library: &str,
    source_dir: &str,
    manifest_path: &str,
    profile_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if !json_output {
        println!("{} {}", "Checking:".cyan().bold(), manifest_path);
    }

    let (profile, outcome) = match build(library, source_dir, profile_path) {
        Ok(built) => built,
        Err(failure) => {
            if json_output {
                print_json(&CheckOutput {
                    success: false,
                    errors: failure.to_json(),
                    difference: None,
                    result: None,
                });
            } else {
                failure.print();
                println!("\n{} Could not regenerate manifest", "FAILED".red().bold());
            }
            return Ok(ExitCode::from(1));
        }
    };
    let summary = summarize(&profile, &outcome);

    let on_disk = match std::fs::read_to_string(manifest_path) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("failed to read file '{}': {}", manifest_path, e);
            if json_output {
                print_json(&CheckOutput {
                    success: false,
                    errors: vec![JsonError::new(error_codes::FILE_READ, message)
                        .with_file(manifest_path)],
                    difference: None,
                    result: Some(summary),
                });
            } else {
                println!("  {} {}", "x".red(), message);
            }
            return Ok(ExitCode::from(1));
        }
    };

    let difference = first_difference(&outcome.manifest.render(), &on_disk);
    if json_output {
        let errors = match &difference {
            Some(diff) => vec![JsonError::new(
                error_codes::STALE_MANIFEST,
                format!("manifest is out of date at line {}", diff.line),
            )
            .with_file(manifest_path)
            .with_line(diff.line)],
            None => Vec::new(),
        };
        print_json(&CheckOutput {
            success: difference.is_none(),
            errors,
            difference: difference.clone(),
            result: Some(summary),
        });
    } else {
        match &difference {
            None => println!(
                "{} Manifest is up to date ({} routines)",
                "SUCCESS".green().bold(),
                outcome.manifest.len()
            ),
            Some(diff) => print_difference(diff),
        }
    }

    Ok(if difference.is_none() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_difference(diff: &LineDiff) {
    println!(
        "{} Manifest is out of date at line {}",
        "STALE".yellow().bold(),
        diff.line
    );
    let show = |line: &Option<String>| match line {
        Some(text) => text.clone(),
        None => "<end of file>".to_string(),
    };
    println!("  {} {}", "expected:".dimmed(), show(&diff.expected).green());
    println!("  {} {}", "found:   ".dimmed(), show(&diff.actual).red());
}
