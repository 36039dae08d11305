//! Property-based tests for type mapping, synthesis and manifest ordering.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fsig-tests --test proptest_manifest
//! ```

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use fsig_core::types::recognized_spellings;
use fsig_core::{
    map_type, routine_name_of, synthesize, Library, LibraryProfile, ManifestBuilder, RoutineMeta,
    TypeTag, VarInfo,
};

// ============================================================================
// 1. Type Mapping
// ============================================================================

fn spelling() -> impl Strategy<Value = &'static str> {
    prop::sample::select(recognized_spellings().collect::<Vec<_>>())
}

/// Re-cases each letter and widens each space.
fn respell(spelling: &str, upper: &[bool], gap: usize) -> String {
    spelling
        .chars()
        .zip(upper.iter().cycle())
        .map(|(c, up)| match c {
            ' ' => " ".repeat(gap),
            c if *up => c.to_ascii_uppercase().to_string(),
            c => c.to_string(),
        })
        .collect()
}

proptest! {
    /// Every recognized spelling maps, whatever its case and spacing.
    #[test]
    fn recognized_spellings_always_map(
        s in spelling(),
        upper in prop::collection::vec(any::<bool>(), 1..20),
        gap in 1usize..4,
    ) {
        let canonical = map_type(s, false).unwrap();
        let variant = respell(s, &upper, gap);
        prop_assert_eq!(map_type(&variant, false).unwrap(), canonical);
    }

    /// The kind qualifier only promotes `complex`.
    #[test]
    fn kind_qualifier_only_affects_complex(s in spelling()) {
        let plain = map_type(s, false).unwrap();
        let kinded = map_type(s, true).unwrap();
        if s == "complex" {
            prop_assert_eq!(plain, TypeTag::C);
            prop_assert_eq!(kinded, TypeTag::Z);
        } else {
            prop_assert_eq!(plain, kinded);
        }
    }

    /// Anything outside the table is an error, never a guess.
    #[test]
    fn unknown_spellings_are_rejected(s in "[a-z()*0-9 ]{0,24}") {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assume!(!recognized_spellings().any(|known| known == normalized));
        prop_assert!(map_type(&s, false).is_err());
        prop_assert!(map_type(&s, true).is_err());
    }
}

// ============================================================================
// 2. Synthesis
// ============================================================================

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

proptest! {
    /// Only an argument named exactly `rank_bn` is renamed.
    #[test]
    fn rank_fixup_is_exact(args in prop::collection::btree_set(identifier(), 0..8)) {
        let mut builder = RoutineMeta::subroutine("dtest");
        for arg in &args {
            builder = builder.arg(arg.clone(), VarInfo::new("integer"));
        }
        let sig = synthesize(&builder.build()).unwrap();

        prop_assert_eq!(sig.params.len(), args.len());
        for (param, arg) in sig.params.iter().zip(&args) {
            if arg == "rank_bn" {
                prop_assert_eq!(param.name.as_str(), "rank");
            } else {
                prop_assert_eq!(&param.name, arg);
            }
        }
    }

    /// The sort key of a synthesized line is the routine name.
    #[test]
    fn routine_name_round_trips(
        name in identifier(),
        args in prop::collection::btree_set(identifier(), 0..5),
        function in any::<bool>(),
    ) {
        let mut builder = if function {
            RoutineMeta::function(name.clone(), VarInfo::new("double precision"))
        } else {
            RoutineMeta::subroutine(name.clone())
        };
        for arg in &args {
            builder = builder.arg(arg.clone(), VarInfo::new("real"));
        }
        let line = synthesize(&builder.build()).unwrap().to_line();

        prop_assert_eq!(routine_name_of(&line), name.as_str());
        prop_assert!(line.ends_with(")\n"));
        prop_assert_eq!(line.matches('\n').count(), 1);
    }
}

// ============================================================================
// 3. Manifest Ordering
// ============================================================================

fn stub_parser(path: &Path) -> Result<RoutineMeta, std::io::Error> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RoutineMeta::subroutine(name)
        .arg("n", VarInfo::new("integer"))
        .build())
}

fn candidate_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("q[a-z0-9]{1,8}", 1..20)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    /// Manifest lines come out sorted by routine name.
    #[test]
    fn manifest_is_sorted(names in candidate_names()) {
        let profile = LibraryProfile::builtin(Library::Blas);
        let candidates: Vec<PathBuf> = names.iter().map(|n| PathBuf::from(format!("{}.f", n))).collect();
        let outcome = ManifestBuilder::new(&profile).build(&candidates, &stub_parser).unwrap();

        let keys: Vec<&str> = outcome.manifest.entries().iter().map(|e| routine_name_of(&e.line)).collect();
        prop_assert_eq!(keys.len(), names.len());
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Candidate order never changes the rendered bytes.
    #[test]
    fn manifest_ignores_candidate_order(names in candidate_names()) {
        let profile = LibraryProfile::builtin(Library::Lapack);
        let mut candidates: Vec<PathBuf> = names.iter().map(|n| PathBuf::from(format!("{}.f", n))).collect();
        let shuffled = ManifestBuilder::new(&profile).build(&candidates, &stub_parser).unwrap();
        candidates.sort();
        let sorted = ManifestBuilder::new(&profile).build(&candidates, &stub_parser).unwrap();

        prop_assert_eq!(shuffled.manifest.render(), sorted.manifest.render());
    }
}
