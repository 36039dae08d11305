//! JSON output types for machine-readable CLI output.
//!
//! `generate`, `check` and `profile` print one of these documents instead of
//! colored status lines when `--json` is given.

use fsig_core::{Excluded, LibraryProfile, ManifestError};
use fsig_fortran::ParseError;
use serde::Serialize;

use crate::input::InputError;
use crate::output::LineDiff;

/// Error codes for CLI operations.
///
/// These codes are stable. Library errors pass through their own `E0xx` codes.
pub mod error_codes {
    /// Source directory missing or not a directory
    pub const SOURCE_DIR: &str = "CLI_001";
    /// File could not be read
    pub const FILE_READ: &str = "CLI_002";
    /// Manifest could not be written
    pub const FILE_WRITE: &str = "CLI_003";
    /// Scan pattern could not be compiled
    pub const SCAN_PATTERN: &str = "CLI_004";
    /// Manifest on disk differs from the regenerated one
    pub const STALE_MANIFEST: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the line number for this error.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Converts an input error.
pub fn input_error_to_json(error: &InputError) -> JsonError {
    match error {
        InputError::SourceDir { path } => JsonError::new(error_codes::SOURCE_DIR, error.to_string())
            .with_file(path.display().to_string()),
        InputError::Pattern { .. } => JsonError::new(error_codes::SCAN_PATTERN, error.to_string()),
        InputError::FileRead { path, .. } => JsonError::new(error_codes::FILE_READ, error.to_string())
            .with_file(path.display().to_string()),
        InputError::Profile { path, source } => {
            let json = JsonError::new(source.code().code(), error.to_string());
            match path {
                Some(path) => json.with_file(path.display().to_string()),
                None => json,
            }
        }
    }
}

/// Converts a build failure into one entry per failed routine.
pub fn manifest_error_to_json(error: &ManifestError) -> Vec<JsonError> {
    error
        .failures()
        .into_iter()
        .map(|failure| {
            let json = JsonError::new(failure.code().code(), failure.to_string());
            match failure {
                ManifestError::Parse { path, source } => {
                    let json = json.with_file(path.display().to_string());
                    match source.downcast_ref::<ParseError>() {
                        Some(ParseError::Syntax { line, .. }) => json.with_line(*line),
                        _ => json,
                    }
                }
                ManifestError::Synthesis { path, .. } | ManifestError::InvalidFileName { path } => {
                    json.with_file(path.display().to_string())
                }
                _ => json,
            }
        })
        .collect()
}

/// Summary of a successful `generate` or `check` build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    /// Library name (blas or lapack)
    pub library: String,
    /// Source files scanned
    pub candidates: usize,
    /// Lines synthesized from source
    pub synthesized: usize,
    /// Lines taken from the override registry
    pub overridden: usize,
    /// Candidates skipped, with the reason
    pub excluded: Vec<Excluded>,
    /// BLAKE3 hash of the rendered manifest
    pub manifest_hash: String,
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutput {
    /// Whether the manifest was written
    pub success: bool,
    /// Errors (empty on success)
    pub errors: Vec<JsonError>,
    /// Output path written (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Build details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildSummary>,
}

impl GenerateOutput {
    /// Creates a successful output.
    pub fn success(output_file: impl Into<String>, result: BuildSummary) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            output_file: Some(output_file.into()),
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            output_file: None,
            result: None,
        }
    }
}

/// JSON output for the `check` command.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// Whether the manifest on disk is up to date
    pub success: bool,
    /// Errors (empty when up to date)
    pub errors: Vec<JsonError>,
    /// First differing line (when stale)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<LineDiff>,
    /// Build details (when the build itself succeeded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BuildSummary>,
}

/// JSON output for the `profile` command.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    /// Library name
    pub library: String,
    /// Static exclusions, sorted
    pub exclusions: Vec<String>,
    /// Override lines, in registry order
    pub overrides: Vec<String>,
}

impl ProfileOutput {
    pub fn from_profile(profile: &LibraryProfile) -> Self {
        Self {
            library: profile.library.to_string(),
            exclusions: profile.exclusions.iter().cloned().collect(),
            overrides: profile
                .overrides
                .entries()
                .iter()
                .map(|e| e.line.clone())
                .collect(),
        }
    }
}

/// Prints a document as pretty JSON on stdout.
pub fn print_json<T: Serialize>(output: &T) {
    let json =
        serde_json::to_string_pretty(output).expect("JSON output serialization should not fail");
    println!("{}", json);
}
