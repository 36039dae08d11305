//! Generate command implementation
//!
//! Scans a source directory, builds the manifest and writes it atomically.

use anyhow::{Context, Result};
use colored::Colorize;
use fsig_core::{BuildOutcome, ExclusionReason, LibraryProfile, ManifestBuilder, ManifestError};
use fsig_fortran::FortranParser;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{
    error_codes, input_error_to_json, manifest_error_to_json, print_json, BuildSummary,
    GenerateOutput, JsonError,
};
use crate::input::{self, InputError};
use crate::output;

/// Why a build did not produce a manifest.
#[derive(Debug)]
pub(crate) enum BuildFailure {
    Input(InputError),
    Manifest(ManifestError),
}

impl BuildFailure {
    pub(crate) fn to_json(&self) -> Vec<JsonError> {
        match self {
            BuildFailure::Input(e) => vec![input_error_to_json(e)],
            BuildFailure::Manifest(e) => manifest_error_to_json(e),
        }
    }

    pub(crate) fn print(&self) {
        match self {
            BuildFailure::Input(e) => {
                println!("  {} {}", "x".red(), e);
            }
            BuildFailure::Manifest(e) => {
                println!("\n{}", "Errors:".red().bold());
                for failure in e.failures() {
                    println!(
                        "  {} [{}] {}",
                        "x".red(),
                        failure.code().to_string().red(),
                        failure
                    );
                }
            }
        }
    }
}

/// Loads the profile, scans the sources and builds the manifest in memory.
pub(crate) fn build(
    library: &str,
    source_dir: &str,
    profile_path: Option<&str>,
) -> Result<(LibraryProfile, BuildOutcome), BuildFailure> {
    let profile = input::load_profile(library, profile_path).map_err(BuildFailure::Input)?;
    let sources = input::scan_sources(source_dir).map_err(BuildFailure::Input)?;
    let outcome = ManifestBuilder::new(&profile)
        .build(&sources, &FortranParser)
        .map_err(BuildFailure::Manifest)?;
    Ok((profile, outcome))
}

pub(crate) fn summarize(profile: &LibraryProfile, outcome: &BuildOutcome) -> BuildSummary {
    BuildSummary {
        library: profile.library.to_string(),
        candidates: outcome.report.candidates,
        synthesized: outcome.report.synthesized,
        overridden: outcome.report.overridden,
        excluded: outcome.report.excluded.clone(),
        manifest_hash: outcome.manifest.hash(),
    }
}

/// Run the generate command
///
/// # Arguments
/// * `library` - Target library (blas or lapack, case-insensitive)
/// * `source_dir` - Directory with one Fortran source file per routine
/// * `output_file` - Manifest path to overwrite
/// * `profile_path` - Optional JSON profile applied on top of the built-in one
/// * `json_output` - Whether to output machine-readable JSON
/// * `verbose` - List every excluded and synthesized routine
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    library: &str,
    source_dir: &str,
    output_file: &str,
    profile_path: Option<&str>,
    json_output: bool,
    verbose: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(library, source_dir, output_file, profile_path)
    } else {
        run_human(library, source_dir, output_file, profile_path, verbose)
    }
}

fn run_human(
    library: &str,
    source_dir: &str,
    output_file: &str,
    profile_path: Option<&str>,
    verbose: bool,
) -> Result<ExitCode> {
    println!(
        "{} {} manifest from {}",
        "Generating:".cyan().bold(),
        library.to_ascii_lowercase(),
        input::normalize_dir(source_dir)
    );
    if let Some(path) = profile_path {
        println!("{} {}", "Profile:".dimmed(), path);
    }

    let (profile, outcome) = match build(library, source_dir, profile_path) {
        Ok(built) => built,
        Err(failure) => {
            failure.print();
            println!(
                "\n{} Manifest not written: {}",
                "FAILED".red().bold(),
                output_file
            );
            return Ok(ExitCode::from(1));
        }
    };

    let report = &outcome.report;
    println!(
        "{} Scanned {} source file(s)",
        "INFO".blue().bold(),
        report.candidates
    );
    if verbose {
        print_details(&outcome);
    }

    output::write_atomic(Path::new(output_file), &outcome.manifest.render())
        .with_context(|| format!("Failed to write manifest: {}", output_file))?;

    println!(
        "{} Wrote {} routine(s) to {} ({} synthesized, {} overridden, {} excluded)",
        "SUCCESS".green().bold(),
        outcome.manifest.len(),
        output_file,
        report.synthesized,
        report.overridden,
        report.excluded.len()
    );
    println!(
        "{} {} ({})",
        "Hash:".dimmed(),
        &outcome.manifest.hash()[..16],
        profile.library
    );

    Ok(ExitCode::SUCCESS)
}

fn print_details(outcome: &BuildOutcome) {
    for excluded in &outcome.report.excluded {
        let reason = match excluded.reason {
            ExclusionReason::Static => "excluded",
            ExclusionReason::Overridden => "overridden",
        };
        println!("  {} {} ({})", "-".dimmed(), excluded.name, reason.dimmed());
    }
    for entry in outcome.manifest.entries() {
        println!("  {} {}", "+".green(), entry.line.trim_end());
    }
}

fn run_json(
    library: &str,
    source_dir: &str,
    output_file: &str,
    profile_path: Option<&str>,
) -> Result<ExitCode> {
    let (profile, outcome) = match build(library, source_dir, profile_path) {
        Ok(built) => built,
        Err(failure) => {
            print_json(&GenerateOutput::failure(failure.to_json()));
            return Ok(ExitCode::from(1));
        }
    };

    if let Err(e) = output::write_atomic(Path::new(output_file), &outcome.manifest.render()) {
        let error = JsonError::new(
            error_codes::FILE_WRITE,
            format!("Failed to write manifest: {}", e),
        )
        .with_file(output_file);
        print_json(&GenerateOutput::failure(vec![error]));
        return Ok(ExitCode::from(1));
    }

    let summary = summarize(&profile, &outcome);
    print_json(&GenerateOutput::success(output_file, summary));
    Ok(ExitCode::SUCCESS)
}
