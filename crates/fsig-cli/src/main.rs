//! fsig CLI - Fortran signature manifests for BLAS/LAPACK wrappers
//!
//! This binary scans a directory of reference BLAS or LAPACK sources and
//! writes the sorted signature manifest consumed by the wrapper generator.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use fsig_cli::commands;

/// fsig - BLAS/LAPACK signature manifest generator
#[derive(Parser)]
#[command(name = "fsig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signature manifest from a directory of Fortran sources
    Generate {
        /// Target library (blas or lapack, case-insensitive)
        library: String,

        /// Directory containing one source file per routine
        source_dir: String,

        /// Manifest file to overwrite
        output_file: String,

        /// JSON profile applied on top of the built-in library profile
        #[arg(short, long)]
        profile: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// List every excluded and generated routine
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check that an existing manifest matches the sources (never writes)
    Check {
        /// Target library (blas or lapack, case-insensitive)
        library: String,

        /// Directory containing one source file per routine
        source_dir: String,

        /// Manifest file to compare against
        manifest: String,

        /// JSON profile applied on top of the built-in library profile
        #[arg(short, long)]
        profile: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the effective exclusions and override lines for a library
    Profile {
        /// Target library (blas or lapack, case-insensitive)
        library: String,

        /// JSON profile applied on top of the built-in library profile
        #[arg(short, long)]
        profile: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            library,
            source_dir,
            output_file,
            profile,
            json,
            verbose,
        } => commands::generate::run(
            &library,
            &source_dir,
            &output_file,
            profile.as_deref(),
            json,
            verbose,
        ),
        Commands::Check {
            library,
            source_dir,
            manifest,
            profile,
            json,
        } => commands::check::run(&library, &source_dir, &manifest, profile.as_deref(), json),
        Commands::Profile {
            library,
            profile,
            json,
        } => commands::profile::run(&library, profile.as_deref(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "fsig",
            "generate",
            "lapack",
            "lapack/SRC/",
            "_lapack_subroutines.txt",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                library,
                source_dir,
                output_file,
                profile,
                json,
                verbose,
            } => {
                assert_eq!(library, "lapack");
                assert_eq!(source_dir, "lapack/SRC/");
                assert_eq!(output_file, "_lapack_subroutines.txt");
                assert!(profile.is_none());
                assert!(!json);
                assert!(!verbose);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_with_flags() {
        let cli = Cli::try_parse_from([
            "fsig",
            "generate",
            "BLAS",
            "blas/SRC",
            "out.txt",
            "--profile",
            "profile.json",
            "--json",
            "-v",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                library,
                profile,
                json,
                verbose,
                ..
            } => {
                assert_eq!(library, "BLAS");
                assert_eq!(profile.as_deref(), Some("profile.json"));
                assert!(json);
                assert!(verbose);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_requires_three_generate_arguments() {
        let err = Cli::try_parse_from(["fsig", "generate", "blas", "blas/SRC"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("OUTPUT_FILE"));
    }

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from(["fsig", "check", "blas", "src", "manifest.txt", "--json"])
            .unwrap();
        match cli.command {
            Commands::Check {
                library,
                source_dir,
                manifest,
                profile,
                json,
            } => {
                assert_eq!(library, "blas");
                assert_eq!(source_dir, "src");
                assert_eq!(manifest, "manifest.txt");
                assert!(profile.is_none());
                assert!(json);
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_cli_parses_profile() {
        let cli = Cli::try_parse_from(["fsig", "profile", "lapack", "-p", "extra.json"]).unwrap();
        match cli.command {
            Commands::Profile {
                library,
                profile,
                json,
            } => {
                assert_eq!(library, "lapack");
                assert_eq!(profile.as_deref(), Some("extra.json"));
                assert!(!json);
            }
            _ => panic!("expected profile command"),
        }
    }
}
