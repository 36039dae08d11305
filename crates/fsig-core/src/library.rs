//! Per-library configuration: static exclusions and overrides.
//!
//! The built-in profiles describe reference BLAS and reference LAPACK. A JSON
//! [`ProfileConfig`] can extend either one without touching the synthesizer.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::exclusion::ExclusionPolicy;
use crate::registry::OverrideRegistry;

/// Routines left out of the BLAS manifest.
pub const BLAS_EXCLUSIONS: &[&str] = &["scabs1", "xerbla"];

/// Routines left out of the LAPACK manifest.
///
/// Their interfaces changed between LAPACK 3.1 and 3.5, they take string
/// arguments, or the ABI wrappers do not cover them.
pub const LAPACK_EXCLUSIONS: &[&str] = &[
    "sisnan", "csrot", "zdrot", "ilaenv", "iparmq", "lsamen", "xerbla", "zcgesv", "dlaisnan",
    "slaisnan", "dlazq3", "dlazq4", "slazq3", "slazq4", "dlasq3", "dlasq4", "slasq3", "slasq4",
    "dlasq5", "slasq5", "slaneg",
];

/// Target library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Library {
    Blas,
    Lapack,
}

impl Library {
    pub const ALL: [Library; 2] = [Library::Blas, Library::Lapack];

    pub fn name(&self) -> &'static str {
        match self {
            Library::Blas => "blas",
            Library::Lapack => "lapack",
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Library {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blas" => Ok(Library::Blas),
            "lapack" => Ok(Library::Lapack),
            _ => Err(ProfileError::UnknownLibrary(s.to_string())),
        }
    }
}

/// Additions to a built-in profile, loaded from JSON.
///
/// ```json
/// {
///   "exclusions": ["dlartg"],
///   "overrides": ["void mycb(int *n)"],
///   "replace_overrides": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Extra names added to the static exclusions.
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Extra override lines, emitted verbatim. Surrounding whitespace is an error.
    #[serde(default)]
    pub overrides: Vec<String>,
    /// Drop the built-in override block before adding `overrides`.
    #[serde(default)]
    pub replace_overrides: bool,
}

impl ProfileConfig {
    /// Parses a profile document.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Effective configuration for one run.
#[derive(Debug, Clone)]
pub struct LibraryProfile {
    pub library: Library,
    pub exclusions: BTreeSet<String>,
    pub overrides: OverrideRegistry,
}

impl LibraryProfile {
    /// The built-in profile. BLAS has no override block.
    pub fn builtin(library: Library) -> Self {
        let (exclusions, overrides) = match library {
            Library::Blas => (BLAS_EXCLUSIONS, OverrideRegistry::new()),
            Library::Lapack => (LAPACK_EXCLUSIONS, OverrideRegistry::lapack()),
        };
        Self {
            library,
            exclusions: exclusions.iter().map(|s| s.to_string()).collect(),
            overrides,
        }
    }

    /// Applies a [`ProfileConfig`] on top of this profile.
    pub fn with_config(mut self, config: ProfileConfig) -> Result<Self, ProfileError> {
        self.exclusions.extend(config.exclusions);
        if config.replace_overrides {
            self.overrides = OverrideRegistry::new();
        }
        self.overrides.extend_lines(&config.overrides)?;
        Ok(self)
    }

    /// The exclusion policy: static exclusions plus every overridden name.
    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy::new(self.exclusions.clone(), &self.overrides)
    }
}
