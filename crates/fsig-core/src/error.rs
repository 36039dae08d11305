//! Error types for signature synthesis and manifest building.

use std::path::PathBuf;

use thiserror::Error;

/// Stable error codes reported in machine-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Synthesis errors (E001-E009)
    /// E001: Declared type outside the recognized spellings
    UnknownType,
    /// E002: Argument has no entry in the variable table
    MissingArgumentMetadata,
    /// E003: Function has no declared return type
    MissingReturnType,

    // Manifest errors (E010-E019)
    /// E010: The source parser rejected a file
    ParseFailed,
    /// E011: Two entries resolve to the same routine name
    DuplicateRoutine,
    /// E012: Source file name cannot be used as a routine name
    InvalidFileName,
    /// E013: More than one routine failed
    MultipleFailures,

    // Configuration errors (E020-E029)
    /// E020: Override line is not a signature
    InvalidOverride,
    /// E021: Override registry names a routine twice
    DuplicateOverride,
    /// E022: Library name is not recognized
    UnknownLibrary,
    /// E023: Profile document could not be decoded
    InvalidProfile,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnknownType => "E001",
            ErrorCode::MissingArgumentMetadata => "E002",
            ErrorCode::MissingReturnType => "E003",
            ErrorCode::ParseFailed => "E010",
            ErrorCode::DuplicateRoutine => "E011",
            ErrorCode::InvalidFileName => "E012",
            ErrorCode::MultipleFailures => "E013",
            ErrorCode::InvalidOverride => "E020",
            ErrorCode::DuplicateOverride => "E021",
            ErrorCode::UnknownLibrary => "E022",
            ErrorCode::InvalidProfile => "E023",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A Fortran type spelling the type mapper does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown Fortran type `{type_spec}`")]
pub struct UnknownTypeError {
    /// The declared type spelling as received.
    pub type_spec: String,
}

/// Failure to turn one routine's metadata into a signature line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// An argument or return value has an unrecognized type.
    #[error("routine `{routine}`: `{variable}` has unknown Fortran type `{type_spec}`")]
    UnknownType {
        routine: String,
        variable: String,
        type_spec: String,
    },

    /// An argument name has no type information.
    #[error("routine `{routine}`: argument `{argument}` has no type declaration")]
    MissingArgumentMetadata { routine: String, argument: String },

    /// A function whose own name has no type information.
    #[error("function `{routine}` has no declared return type")]
    MissingReturnType { routine: String },
}

impl SynthesisError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SynthesisError::UnknownType { .. } => ErrorCode::UnknownType,
            SynthesisError::MissingArgumentMetadata { .. } => ErrorCode::MissingArgumentMetadata,
            SynthesisError::MissingReturnType { .. } => ErrorCode::MissingReturnType,
        }
    }
}

/// Errors raised while reading an override block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A line that does not look like `<ret> <name>(<params>)`.
    #[error("override line {line_number} is not a signature ({reason}): {line}")]
    InvalidLine {
        line_number: usize,
        line: String,
        reason: &'static str,
    },

    /// The same routine is overridden twice.
    #[error("routine `{name}` is overridden more than once")]
    DuplicateOverride { name: String },
}

impl RegistryError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::InvalidLine { .. } => ErrorCode::InvalidOverride,
            RegistryError::DuplicateOverride { .. } => ErrorCode::DuplicateOverride,
        }
    }
}

/// Errors raised while resolving a library profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Library name outside `blas`/`lapack`.
    #[error("unknown library `{0}` (expected `blas` or `lapack`)")]
    UnknownLibrary(String),

    /// Profile JSON could not be decoded.
    #[error("invalid profile: {0}")]
    Json(#[from] serde_json::Error),

    /// Profile overrides are malformed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ProfileError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProfileError::UnknownLibrary(_) => ErrorCode::UnknownLibrary,
            ProfileError::Json(_) => ErrorCode::InvalidProfile,
            ProfileError::Registry(e) => e.code(),
        }
    }
}

/// Top-level error type for manifest building.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The parser rejected a source file. The parser's error is kept as the source.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Parsed metadata could not be synthesized.
    #[error("failed to synthesize {}: {source}", .path.display())]
    Synthesis {
        path: PathBuf,
        #[source]
        source: SynthesisError,
    },

    /// A source file whose stem is not valid UTF-8.
    #[error("source file name is not a valid routine name: {}", .path.display())]
    InvalidFileName { path: PathBuf },

    /// Two manifest entries carry the same routine name.
    #[error("routine `{name}` appears more than once in the manifest")]
    DuplicateRoutine { name: String },

    /// Several candidates failed; every failure is kept.
    #[error("{} routine(s) failed to synthesize", .0.len())]
    Routines(Vec<ManifestError>),
}

impl ManifestError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ManifestError::Parse { .. } => ErrorCode::ParseFailed,
            ManifestError::Synthesis { source, .. } => source.code(),
            ManifestError::InvalidFileName { .. } => ErrorCode::InvalidFileName,
            ManifestError::DuplicateRoutine { .. } => ErrorCode::DuplicateRoutine,
            ManifestError::Routines(_) => ErrorCode::MultipleFailures,
        }
    }

    /// Flattens `Routines` into its individual failures.
    pub fn failures(&self) -> Vec<&ManifestError> {
        match self {
            ManifestError::Routines(errors) => errors.iter().flat_map(|e| e.failures()).collect(),
            other => vec![other],
        }
    }
}
