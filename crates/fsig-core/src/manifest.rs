//! Manifest building: synthesize, merge overrides, sort.
//!
//! The builder runs a single linear pass over the candidate files:
//!
//! 1. **Synthesizing**: every candidate whose file stem is not excluded is
//!    parsed and synthesized. All candidates are attempted and every failure
//!    is collected; any failure aborts the build.
//! 2. **Merging**: synthesized lines for overridden routines are dropped,
//!    then the override lines are appended verbatim. The parsed routine name
//!    decides, so a file whose stem differs from its routine still yields
//!    the override.
//! 3. **Sorting**: entries are ordered by the routine name extracted from the
//!    rendered line (stable, case-sensitive).
//!
//! Filesystem enumeration and writing happen outside this module.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ManifestError;
use crate::exclusion::ExclusionReason;
use crate::library::LibraryProfile;
use crate::parser::RoutineParser;
use crate::signature::routine_name_of;
use crate::synth::synthesize;

/// Header written at the top of every manifest.
pub const MANIFEST_HEADER: &str =
    "# This file was generated by fsig.\n# Do not edit this file directly.\n\n";

/// Where a manifest line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOrigin {
    Synthesized { source: PathBuf },
    Override,
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    /// The signature line, LF-terminated.
    pub line: String,
    pub origin: EntryOrigin,
}

/// Sorted, de-duplicated signature lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn synthesized_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.origin, EntryOrigin::Synthesized { .. }))
            .count()
    }

    pub fn override_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.origin == EntryOrigin::Override)
            .count()
    }

    /// Renders the full file: header followed by every line.
    pub fn render(&self) -> String {
        let mut out = String::from(MANIFEST_HEADER);
        for entry in &self.entries {
            out.push_str(&entry.line);
        }
        out
    }

    /// BLAKE3 hex digest of [`Manifest::render`].
    pub fn hash(&self) -> String {
        blake3::hash(self.render().as_bytes()).to_hex().to_string()
    }
}

/// A skipped candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excluded {
    pub name: String,
    pub reason: ExclusionReason,
}

/// What happened during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Candidate files handed to the builder.
    pub candidates: usize,
    /// Candidates skipped by the exclusion policy, in candidate order.
    pub excluded: Vec<Excluded>,
    /// Lines synthesized from source.
    pub synthesized: usize,
    /// Lines taken from the override registry.
    pub overridden: usize,
}

/// A finished build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub manifest: Manifest,
    pub report: BuildReport,
}

/// Builds a manifest for one library profile.
pub struct ManifestBuilder<'a> {
    profile: &'a LibraryProfile,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(profile: &'a LibraryProfile) -> Self {
        Self { profile }
    }

    /// Builds the manifest from candidate source files.
    ///
    /// The routine name of a candidate is its file stem. The result depends
    /// only on the set of candidates, not on their order.
    ///
    /// # Errors
    /// Returns the single failure, or [`ManifestError::Routines`] when several
    /// candidates failed. A duplicate routine name after merging is also fatal.
    pub fn build<P: RoutineParser>(
        &self,
        candidates: &[PathBuf],
        parser: &P,
    ) -> Result<BuildOutcome, ManifestError> {
        let mut report = BuildReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        let mut entries = self.synthesize_candidates(candidates, parser, &mut report)?;
        self.drop_overridden(&mut entries, &mut report);
        report.synthesized = entries.len();

        self.merge_overrides(&mut entries);
        report.overridden = entries.len() - report.synthesized;

        sort_entries(&mut entries);
        check_duplicates(&entries)?;

        Ok(BuildOutcome {
            manifest: Manifest { entries },
            report,
        })
    }

    fn synthesize_candidates<P: RoutineParser>(
        &self,
        candidates: &[PathBuf],
        parser: &P,
        report: &mut BuildReport,
    ) -> Result<Vec<ManifestEntry>, ManifestError> {
        let policy = self.profile.exclusion_policy();
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for path in candidates {
            let name = match candidate_name(path) {
                Some(name) => name,
                None => {
                    failures.push(ManifestError::InvalidFileName { path: path.clone() });
                    continue;
                }
            };
            if let Some(reason) = policy.reason(name) {
                report.excluded.push(Excluded {
                    name: name.to_string(),
                    reason,
                });
                continue;
            }

            match synthesize_file(path, parser) {
                Ok(entry) => entries.push(entry),
                Err(e) => failures.push(e),
            }
        }

        match failures.len() {
            0 => Ok(entries),
            1 => Err(failures.remove(0)),
            _ => Err(ManifestError::Routines(failures)),
        }
    }

    fn drop_overridden(&self, entries: &mut Vec<ManifestEntry>, report: &mut BuildReport) {
        let overrides = &self.profile.overrides;
        entries.retain(|entry| {
            if !overrides.contains(&entry.name) {
                return true;
            }
            report.excluded.push(Excluded {
                name: entry.name.clone(),
                reason: ExclusionReason::Overridden,
            });
            false
        });
    }

    fn merge_overrides(&self, entries: &mut Vec<ManifestEntry>) {
        entries.extend(self.profile.overrides.entries().iter().map(|o| ManifestEntry {
            name: o.name.clone(),
            line: format!("{}\n", o.line),
            origin: EntryOrigin::Override,
        }));
    }
}

fn candidate_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|stem| stem.to_str())
}

fn synthesize_file<P: RoutineParser>(
    path: &Path,
    parser: &P,
) -> Result<ManifestEntry, ManifestError> {
    let meta = parser.parse(path).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    let signature = synthesize(&meta).map_err(|e| ManifestError::Synthesis {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(ManifestEntry {
        name: signature.name.clone(),
        line: signature.to_line(),
        origin: EntryOrigin::Synthesized {
            source: path.to_path_buf(),
        },
    })
}

/// Orders entries by the routine name parsed out of each line.
fn sort_entries(entries: &mut [ManifestEntry]) {
    entries.sort_by(|a, b| routine_name_of(&a.line).cmp(routine_name_of(&b.line)));
}

fn check_duplicates(sorted: &[ManifestEntry]) -> Result<(), ManifestError> {
    for pair in sorted.windows(2) {
        if routine_name_of(&pair[0].line) == routine_name_of(&pair[1].line) {
            return Err(ManifestError::DuplicateRoutine {
                name: routine_name_of(&pair[0].line).to_string(),
            });
        }
    }
    Ok(())
}
