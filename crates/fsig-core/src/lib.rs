//! fsig core library
//!
//! Turns routine metadata extracted from BLAS/LAPACK Fortran sources into a
//! sorted manifest of C-style signature lines, for consumption by a wrapper
//! generator.
//!
//! # Overview
//!
//! - **Type mapping**: Fortran declared type → short type tag (`int`, `d`, `z`, ...)
//! - **Synthesis**: one [`RoutineMeta`] → one signature line, every parameter a pointer
//! - **Overrides**: hand-written lines for routines that cannot be synthesized
//! - **Exclusions**: per-library names that are never synthesized
//! - **Manifest**: synthesized + overridden lines, sorted by routine name
//!
//! # Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use fsig_core::{Library, LibraryProfile, ManifestBuilder, RoutineMeta, VarInfo};
//!
//! let parser = |path: &Path| -> Result<RoutineMeta, std::io::Error> {
//!     let name = path.file_stem().unwrap().to_string_lossy().into_owned();
//!     Ok(RoutineMeta::subroutine(name)
//!         .arg("n", VarInfo::new("integer"))
//!         .arg("a", VarInfo::new("double precision"))
//!         .build())
//! };
//!
//! let profile = LibraryProfile::builtin(Library::Blas);
//! let candidates = vec![PathBuf::from("dscal.f"), PathBuf::from("xerbla.f")];
//! let outcome = ManifestBuilder::new(&profile).build(&candidates, &parser).unwrap();
//!
//! assert!(outcome.manifest.render().ends_with("void dscal(int *n, d *a)\n"));
//! assert_eq!(outcome.report.excluded.len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error types and stable error codes
//! - [`types`]: Type tags and the type mapper
//! - [`meta`]: Routine metadata produced by parsers
//! - [`signature`]: Signature lines and routine-name extraction
//! - [`synth`]: The signature synthesizer
//! - [`registry`]: The override registry
//! - [`exclusion`]: The exclusion policy
//! - [`library`]: Built-in library profiles and JSON profile files
//! - [`parser`]: The parser trait
//! - [`manifest`]: The manifest builder

pub mod error;
pub mod exclusion;
pub mod library;
pub mod manifest;
pub mod meta;
pub mod parser;
pub mod registry;
pub mod signature;
pub mod synth;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{
    ErrorCode, ManifestError, ProfileError, RegistryError, SynthesisError, UnknownTypeError,
};
pub use exclusion::{is_excluded, ExclusionPolicy, ExclusionReason};
pub use library::{Library, LibraryProfile, ProfileConfig, BLAS_EXCLUSIONS, LAPACK_EXCLUSIONS};
pub use manifest::{
    BuildOutcome, BuildReport, EntryOrigin, Excluded, Manifest, ManifestBuilder, ManifestEntry,
    MANIFEST_HEADER,
};
pub use meta::{BlockKind, RoutineMeta, RoutineMetaBuilder, VarInfo};
pub use parser::RoutineParser;
pub use registry::{OverrideEntry, OverrideRegistry};
pub use signature::{routine_name_of, Param, ReturnType, Signature};
pub use synth::synthesize;
pub use types::{map_type, TypeTag};
