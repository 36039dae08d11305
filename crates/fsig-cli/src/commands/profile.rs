//! Profile command implementation
//!
//! Prints the effective exclusions and override lines for a library.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{input_error_to_json, print_json, ProfileOutput};
use crate::input;

/// Run the profile command
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(library: &str, profile_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        return match input::load_profile(library, profile_path) {
            Ok(profile) => {
                print_json(&ProfileOutput::from_profile(&profile));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                print_json(&serde_json::json!({
                    "success": false,
                    "errors": [input_error_to_json(&e)],
                }));
                Ok(ExitCode::from(1))
            }
        };
    }

    let profile = input::load_profile(library, profile_path)
        .with_context(|| format!("Failed to load profile for library: {}", library))?;

    println!("{} {}", "Library:".cyan().bold(), profile.library);
    if let Some(path) = profile_path {
        println!("{} {}", "Profile:".dimmed(), path);
    }

    println!(
        "\n{} ({})",
        "Exclusions:".cyan().bold(),
        profile.exclusions.len()
    );
    for name in &profile.exclusions {
        println!("  {} {}", "-".dimmed(), name);
    }

    println!(
        "\n{} ({})",
        "Overrides:".cyan().bold(),
        profile.overrides.len()
    );
    if profile.overrides.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for entry in profile.overrides.entries() {
        println!("  {} {}", "*".yellow(), entry.line);
    }

    Ok(ExitCode::SUCCESS)
}
