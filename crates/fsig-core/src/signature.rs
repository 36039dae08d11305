//! Signature lines.

use std::fmt;

use crate::types::TypeTag;

/// Return type of a signature: `void` for subroutines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Value(TypeTag),
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Value(tag) => tag.fmt(f),
        }
    }
}

/// One typed parameter. Always rendered as a pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub tag: TypeTag,
    pub name: String,
}

impl Param {
    pub fn new(tag: TypeTag, name: impl Into<String>) -> Self {
        Self {
            tag,
            name: name.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} *{}", self.tag, self.name)
    }
}

/// A synthesized signature.
///
/// `Display` renders `<ret> <name>(<type> *<param>, ...)` without a line
/// terminator; [`Signature::to_line`] appends it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub return_type: ReturnType,
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    /// Renders the manifest line, LF-terminated.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            param.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// Extracts the routine name from a formatted signature line.
///
/// The name is the last space-separated token before the first `(`. Used as
/// the sort key so that overridden and synthesized lines order the same way.
///
/// # Example
/// ```
/// use fsig_core::signature::routine_name_of;
///
/// assert_eq!(routine_name_of("d dlamch(char *cmach)\n"), "dlamch");
/// assert_eq!(routine_name_of("void xerbla()"), "xerbla");
/// ```
pub fn routine_name_of(line: &str) -> &str {
    let head = line.split('(').next().unwrap_or("");
    head.rsplit(' ').next().unwrap_or("")
}
