//! Hand-written signature overrides.
//!
//! Some routines cannot be synthesized: those taking callback arguments (the
//! `gees`/`gges` families) and those whose interface differs between library
//! releases. Their signature lines are kept verbatim here.

use std::collections::BTreeSet;

use crate::error::RegistryError;
use crate::signature::routine_name_of;

/// Override block shipped for LAPACK.
const LAPACK_OVERRIDES: &str = include_str!("../data/lapack_overrides.txt");

/// One override line and the routine it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub name: String,
    /// The signature text, without line terminator.
    pub line: String,
}

/// An ordered set of override lines, unique by routine name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideRegistry {
    entries: Vec<OverrideEntry>,
}

impl OverrideRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The LAPACK override block.
    pub fn lapack() -> Self {
        Self::parse(LAPACK_OVERRIDES).expect("embedded LAPACK override block is well-formed")
    }

    /// Parses a block of signature lines, one per non-blank line.
    ///
    /// Lines are kept verbatim. A line with leading or trailing whitespace is
    /// rejected rather than trimmed.
    ///
    /// # Errors
    /// Returns [`RegistryError`] for a line that is not a signature or for a
    /// routine named twice.
    pub fn parse(text: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            registry.insert_line(index + 1, line)?;
        }
        Ok(registry)
    }

    /// Appends lines to the registry, numbering them from 1 for error reporting.
    pub fn extend_lines<I, S>(&mut self, lines: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, line) in lines.into_iter().enumerate() {
            self.insert_line(index + 1, line.as_ref())?;
        }
        Ok(())
    }

    fn insert_line(&mut self, line_number: usize, line: &str) -> Result<(), RegistryError> {
        let invalid = |reason| RegistryError::InvalidLine {
            line_number,
            line: line.to_string(),
            reason,
        };

        if line.trim() != line {
            return Err(invalid("leading or trailing whitespace"));
        }
        if !line.contains('(') {
            return Err(invalid("missing `(`"));
        }
        if !line.ends_with(')') {
            return Err(invalid("must end with `)`"));
        }
        let name = routine_name_of(line);
        if name.is_empty() {
            return Err(invalid("missing routine name"));
        }
        if !line.split('(').next().unwrap_or("").trim().contains(' ') {
            return Err(invalid("missing return type"));
        }
        if self.contains(name) {
            return Err(RegistryError::DuplicateOverride {
                name: name.to_string(),
            });
        }

        self.entries.push(OverrideEntry {
            name: name.to_string(),
            line: line.to_string(),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[OverrideEntry] {
        &self.entries
    }

    /// Routine names covered by the registry.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&OverrideEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
