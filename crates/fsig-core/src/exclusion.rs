//! Which routines are never auto-synthesized.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::registry::OverrideRegistry;

/// Returns true if `name` must not be synthesized from source.
pub fn is_excluded(
    name: &str,
    static_exclusions: &BTreeSet<String>,
    override_names: &BTreeSet<String>,
) -> bool {
    static_exclusions.contains(name) || override_names.contains(name)
}

/// Why a candidate was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Listed in the library's static exclusions.
    Static,
    /// Supplied by the override registry instead.
    Overridden,
}

/// Exclusion set for one library run.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    static_exclusions: BTreeSet<String>,
    override_names: BTreeSet<String>,
}

impl ExclusionPolicy {
    pub fn new(static_exclusions: BTreeSet<String>, overrides: &OverrideRegistry) -> Self {
        Self {
            static_exclusions,
            override_names: overrides.names(),
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        is_excluded(name, &self.static_exclusions, &self.override_names)
    }

    /// The reason `name` is skipped, if it is. Static exclusion wins.
    pub fn reason(&self, name: &str) -> Option<ExclusionReason> {
        if self.static_exclusions.contains(name) {
            Some(ExclusionReason::Static)
        } else if self.override_names.contains(name) {
            Some(ExclusionReason::Overridden)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_excluded_union() {
        let statics = set(&["xerbla", "scabs1"]);
        let overrides = set(&["dlamch"]);
        assert!(is_excluded("xerbla", &statics, &overrides));
        assert!(is_excluded("dlamch", &statics, &overrides));
        assert!(!is_excluded("dgemm", &statics, &overrides));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let statics = set(&["xerbla"]);
        assert!(!is_excluded("XERBLA", &statics, &BTreeSet::new()));
    }

    #[test]
    fn test_policy_reasons() {
        let registry = OverrideRegistry::parse("d dlamch(char *cmach)\nvoid xerbla()").unwrap();
        let policy = ExclusionPolicy::new(set(&["xerbla"]), &registry);

        assert_eq!(policy.reason("xerbla"), Some(ExclusionReason::Static));
        assert_eq!(policy.reason("dlamch"), Some(ExclusionReason::Overridden));
        assert_eq!(policy.reason("dgesv"), None);
        assert!(policy.is_excluded("dlamch"));
    }
}
