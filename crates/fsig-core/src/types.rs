//! Fortran declared type to C-ABI type tag mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTypeError;

/// Short type tag used in signature lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Signed 32-bit integer.
    Int,
    /// Single-precision complex.
    C,
    /// Double-precision real.
    D,
    /// Single-precision real.
    S,
    /// Double-precision complex.
    Z,
    /// Character.
    Char,
    /// Fortran logical.
    Bint,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Int,
        TypeTag::C,
        TypeTag::D,
        TypeTag::S,
        TypeTag::Z,
        TypeTag::Char,
        TypeTag::Bint,
    ];

    /// Returns the tag as written in signature lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::C => "c",
            TypeTag::D => "d",
            TypeTag::S => "s",
            TypeTag::Z => "z",
            TypeTag::Char => "char",
            TypeTag::Bint => "bint",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized type spellings. Built once, never mutated.
static TYPE_TABLE: [(&str, TypeTag); 8] = [
    ("integer", TypeTag::Int),
    ("complex", TypeTag::C),
    ("double precision", TypeTag::D),
    ("real", TypeTag::S),
    ("complex*16", TypeTag::Z),
    ("double complex", TypeTag::Z),
    ("character", TypeTag::Char),
    ("logical", TypeTag::Bint),
];

/// Returns every type spelling the mapper accepts.
pub fn recognized_spellings() -> impl Iterator<Item = &'static str> {
    TYPE_TABLE.iter().map(|(spelling, _)| *spelling)
}

/// Maps a Fortran declared type to its type tag.
///
/// Spellings are matched case-insensitively with internal whitespace
/// collapsed, so `DOUBLE  PRECISION` and `double precision` are the same.
/// `complex` maps to [`TypeTag::Z`] when a kind qualifier is present and to
/// [`TypeTag::C`] otherwise. The qualifier has no effect on any other spelling.
///
/// # Example
/// ```
/// use fsig_core::types::{map_type, TypeTag};
///
/// assert_eq!(map_type("double precision", false).unwrap(), TypeTag::D);
/// assert_eq!(map_type("complex", true).unwrap(), TypeTag::Z);
/// assert!(map_type("type(foo)", false).is_err());
/// ```
pub fn map_type(type_spec: &str, has_kind_qualifier: bool) -> Result<TypeTag, UnknownTypeError> {
    let normalized = normalize_spelling(type_spec);
    let tag = TYPE_TABLE
        .iter()
        .find(|(spelling, _)| *spelling == normalized)
        .map(|(_, tag)| *tag)
        .ok_or_else(|| UnknownTypeError {
            type_spec: type_spec.to_string(),
        })?;

    if tag == TypeTag::C && has_kind_qualifier {
        return Ok(TypeTag::Z);
    }
    Ok(tag)
}

fn normalize_spelling(type_spec: &str) -> String {
    type_spec
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
