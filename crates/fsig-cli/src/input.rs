//! Loading inputs: the library profile and the candidate source files.

use std::path::{Path, PathBuf};

use fsig_core::{Library, LibraryProfile, ProfileConfig, ProfileError};
use glob::{glob, Pattern};

/// File-name pattern for Fortran sources (`.f`, `.f90`, `.for`, ...).
pub const SOURCE_PATTERN: &str = "*.f*";

/// Errors that can occur while loading inputs.
#[derive(Debug)]
pub enum InputError {
    /// The source directory does not exist or is not a directory.
    SourceDir { path: PathBuf },

    /// The scan pattern could not be compiled.
    Pattern { source: glob::PatternError },

    /// A file could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown library or invalid profile document.
    Profile {
        path: Option<PathBuf>,
        source: ProfileError,
    },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::SourceDir { path } => {
                write!(f, "source directory '{}' not found", path.display())
            }
            InputError::Pattern { source } => write!(f, "invalid scan pattern: {}", source),
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::Profile {
                path: Some(path),
                source,
            } => write!(f, "invalid profile '{}': {}", path.display(), source),
            InputError::Profile { path: None, source } => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::SourceDir { .. } => None,
            InputError::Pattern { source } => Some(source),
            InputError::FileRead { source, .. } => Some(source),
            InputError::Profile { source, .. } => Some(source),
        }
    }
}

/// Resolves the effective profile for `library`, applying an optional JSON
/// profile file on top of the built-in one.
pub fn load_profile(library: &str, profile_path: Option<&str>) -> Result<LibraryProfile, InputError> {
    let library: Library = library
        .parse()
        .map_err(|source| InputError::Profile { path: None, source })?;
    let builtin = LibraryProfile::builtin(library);

    let Some(path) = profile_path else {
        return Ok(builtin);
    };
    let path = PathBuf::from(path);
    let content = std::fs::read_to_string(&path).map_err(|e| InputError::FileRead {
        path: path.clone(),
        source: e,
    })?;

    ProfileConfig::from_json(&content)
        .and_then(|config| builtin.with_config(config))
        .map_err(|source| InputError::Profile {
            path: Some(path),
            source,
        })
}

/// Strips trailing path separators, keeping a bare root intact.
pub fn normalize_dir(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches(|c: char| c == '/' || c == '\\');
    if trimmed.is_empty() && !dir.is_empty() {
        &dir[..1]
    } else {
        trimmed
    }
}

/// Lists the Fortran source files directly inside `dir`, sorted by path.
///
/// An entry that cannot be inspected is an error rather than a skipped
/// routine.
pub fn scan_sources(dir: &str) -> Result<Vec<PathBuf>, InputError> {
    let dir = Path::new(normalize_dir(dir));
    if !dir.is_dir() {
        return Err(InputError::SourceDir {
            path: dir.to_path_buf(),
        });
    }

    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        SOURCE_PATTERN
    );

    let mut sources = Vec::new();
    for entry in glob(&pattern).map_err(|source| InputError::Pattern { source })? {
        let path = entry.map_err(|e| InputError::FileRead {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        let metadata = std::fs::metadata(&path).map_err(|source| InputError::FileRead {
            path: path.clone(),
            source,
        })?;
        if metadata.is_file() {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}
