//! Unit headers and type declarations.

use std::sync::OnceLock;

use fsig_core::meta::{BlockKind, VarInfo};
use regex::Regex;

use crate::error::ParseError;
use crate::source::Statement;

const TYPE_SPEC_PATTERN: &str = r"^(?P<base>double\s*precision|double\s*complex|integer|real|complex|character|logical)(?P<sel>\s*\*\s*(?:\d+|\([^()]*\))|\s*\([^()]*\))?";

/// Type specs the mapper has no tag for. Declarations using them are still
/// recorded so the type error names the offending variable.
const FOREIGN_TYPE_PATTERN: &str =
    r"^(?P<base>(?:type|class|procedure)\s*\([^()]*\)|record\s*/[^/]*/|byte)";

const HEADER_PATTERN: &str =
    r"^(?P<prefix>.*?)\b(?P<kind>function|subroutine)\s+(?P<name>[a-z][a-z0-9_]*)\s*(?P<rest>.*)$";

const RESULT_PATTERN: &str = r"^\s*result\s*\(\s*(?P<name>[a-z][a-z0-9_]*)\s*\)";

const UNIT_END_PATTERN: &str = r"^end\s*(?:(?:function|subroutine|program)\b.*)?$";

const INTERFACE_START_PATTERN: &str = r"^(?:abstract\s+)?interface\b";

const INTERFACE_END_PATTERN: &str = r"^end\s*interface\b";

/// Keywords that may precede FUNCTION/SUBROUTINE besides a type.
const PREFIX_KEYWORDS: &[&str] = &["recursive", "pure", "elemental", "impure", "module"];

static TYPE_SPEC_REGEX: OnceLock<Regex> = OnceLock::new();
static FOREIGN_TYPE_REGEX: OnceLock<Regex> = OnceLock::new();
static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();
static RESULT_REGEX: OnceLock<Regex> = OnceLock::new();
static UNIT_END_REGEX: OnceLock<Regex> = OnceLock::new();
static INTERFACE_START_REGEX: OnceLock<Regex> = OnceLock::new();
static INTERFACE_END_REGEX: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

/// A FUNCTION or SUBROUTINE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub kind: BlockKind,
    pub name: String,
    pub args: Vec<String>,
    /// Type given in the prefix, e.g. `double precision function`.
    pub return_type: Option<VarInfo>,
    /// Name from a `result(...)` clause.
    pub result: Option<String>,
}

/// Parses a unit header. `Ok(None)` means the statement is not a header.
pub(crate) fn parse_header(stmt: &Statement) -> Result<Option<Header>, ParseError> {
    let Some(caps) = regex(&HEADER_REGEX, HEADER_PATTERN).captures(&stmt.text) else {
        return Ok(None);
    };
    let Some(return_type) = parse_prefix(&caps["prefix"]) else {
        return Ok(None);
    };

    let kind = if &caps["kind"] == "function" {
        BlockKind::Function
    } else {
        BlockKind::Subroutine
    };
    let (args, tail) = parse_arg_list(caps.name("rest").map_or("", |m| m.as_str()), stmt.line)?;
    let result = regex(&RESULT_REGEX, RESULT_PATTERN)
        .captures(tail)
        .map(|c| c["name"].to_string());

    Ok(Some(Header {
        kind,
        name: caps["name"].to_string(),
        args,
        return_type,
        result,
    }))
}

/// `Some(None)`: valid prefix without a type. `None`: not a header prefix.
fn parse_prefix(prefix: &str) -> Option<Option<VarInfo>> {
    let rest = strip_prefix_keywords(prefix.trim());
    if rest.is_empty() {
        return Some(None);
    }
    let (info, after) = parse_type_spec(rest)?;
    if strip_prefix_keywords(after.trim()).is_empty() {
        Some(Some(info))
    } else {
        None
    }
}

fn strip_prefix_keywords(mut text: &str) -> &str {
    loop {
        let before = text;
        for kw in PREFIX_KEYWORDS {
            if let Some(rest) = text.strip_prefix(*kw) {
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    text = rest.trim_start();
                }
            }
        }
        if text == before {
            return text;
        }
    }
}

fn parse_arg_list(rest: &str, line: usize) -> Result<(Vec<String>, &str), ParseError> {
    let rest = rest.trim_start();
    let Some(open) = rest.strip_prefix('(') else {
        return Ok((Vec::new(), rest));
    };
    let close = open
        .find(')')
        .ok_or_else(|| ParseError::syntax(line, "unbalanced parentheses in argument list"))?;
    let inner = &open[..close];
    if inner.contains('(') {
        return Err(ParseError::syntax(
            line,
            "unbalanced parentheses in argument list",
        ));
    }

    let args = inner
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty() && *a != "*")
        .map(|a| {
            if is_identifier(a) {
                Ok(a.to_string())
            } else {
                Err(ParseError::syntax(line, format!("invalid argument name `{}`", a)))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((args, &open[close + 1..]))
}

/// Parses a leading type spec. Returns the declared type and the remaining text.
///
/// Types outside the recognized spellings (`type(foo)`, `byte`, ...) come back
/// with their written spelling as `type_spec`, for the mapper to reject.
pub(crate) fn parse_type_spec(text: &str) -> Option<(VarInfo, &str)> {
    if let Some(caps) = regex(&TYPE_SPEC_REGEX, TYPE_SPEC_PATTERN).captures(text) {
        let rest = ends_at_boundary(&text[caps.get(0)?.end()..])?;
        let base = normalize_base(&caps["base"]);
        // A character selector is a length, never a kind.
        let kind_selector = match base.as_str() {
            "character" | "double precision" | "double complex" => None,
            _ => caps.name("sel").map(|m| selector_text(m.as_str())),
        };
        return Some((
            VarInfo {
                type_spec: base,
                kind_selector,
            },
            rest,
        ));
    }

    let caps = regex(&FOREIGN_TYPE_REGEX, FOREIGN_TYPE_PATTERN).captures(text)?;
    let rest = ends_at_boundary(&text[caps.get(0)?.end()..])?;
    let spelling: String = caps["base"].chars().filter(|c| !c.is_whitespace()).collect();
    Some((VarInfo::new(spelling), rest))
}

fn ends_at_boundary(rest: &str) -> Option<&str> {
    if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == ',' || c == ':') {
        Some(rest)
    } else {
        None
    }
}

fn normalize_base(base: &str) -> String {
    match base.strip_prefix("double") {
        Some(tail) => format!("double {}", tail.trim()),
        None => base.to_string(),
    }
}

/// `*16` → `16`, `(kind=8)` → `8`, `( wp )` → `wp`.
fn selector_text(sel: &str) -> String {
    let sel = sel.trim();
    let inner = sel.strip_prefix('*').map(str::trim).unwrap_or(sel);
    let inner = inner
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(inner);
    let inner = inner
        .strip_prefix("kind")
        .map(str::trim_start)
        .and_then(|s| s.strip_prefix('='))
        .map(str::trim)
        .unwrap_or(inner);
    inner.to_string()
}

/// Parses a type declaration into its type and declared names.
pub(crate) fn parse_declaration(text: &str) -> Option<(VarInfo, Vec<String>)> {
    let (info, rest) = parse_type_spec(text)?;
    let rest = rest.trim_start();
    let entities = match rest.find("::") {
        Some(pos) => &rest[pos + 2..],
        None if rest.starts_with(',') || rest.starts_with(':') => return None,
        None => rest,
    };

    let names = split_top_level(entities)
        .into_iter()
        .map(entity_name)
        .collect::<Option<Vec<_>>>()?;
    if names.is_empty() {
        return None;
    }
    Some((info, names))
}

/// Splits on commas outside parentheses.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(list[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// `a( lda, * )` → `a`; `name*10` → `name`; `x = 1.0` → `x`.
fn entity_name(entity: &str) -> Option<String> {
    let end = entity
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(entity.len());
    let (name, rest) = entity.split_at(end);
    if !is_identifier(name) {
        return None;
    }
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with(|c| matches!(c, '(' | '*' | '=')) {
        Some(name.to_string())
    } else {
        None
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn is_unit_end(text: &str) -> bool {
    regex(&UNIT_END_REGEX, UNIT_END_PATTERN).is_match(text)
}

pub(crate) fn is_interface_start(text: &str) -> bool {
    regex(&INTERFACE_START_REGEX, INTERFACE_START_PATTERN).is_match(text)
}

pub(crate) fn is_interface_end(text: &str) -> bool {
    regex(&INTERFACE_END_REGEX, INTERFACE_END_PATTERN).is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stmt(text: &str) -> Statement {
        Statement {
            line: 1,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_type_specs() {
        let cases = [
            ("integer n", "integer", None),
            ("double precision a", "double precision", None),
            ("doubleprecision a", "double precision", None),
            ("double complex z", "double complex", None),
            ("complex*16 zx(*)", "complex", Some("16")),
            ("complex * 16 zx", "complex", Some("16")),
            ("complex cx", "complex", None),
            ("complex(kind=8) :: z", "complex", Some("8")),
            ("complex( wp ) :: z", "complex", Some("wp")),
            ("real*8 x", "real", Some("8")),
            ("character*1 uplo", "character", None),
            ("character*(*) name", "character", None),
            ("character(len=*) :: name", "character", None),
            ("character*(n) name", "character", None),
            ("real*(8) x", "real", Some("8")),
            ("logical lsame", "logical", None),
        ];
        for (text, spec, kind) in cases {
            let (info, _) = parse_type_spec(text).unwrap_or_else(|| panic!("{}", text));
            assert_eq!(info.type_spec, spec, "{}", text);
            assert_eq!(info.kind_selector.as_deref(), kind, "{}", text);
        }
    }

    #[test]
    fn test_unrecognized_types_keep_their_spelling() {
        let cases = [
            ("type(foo) x", "type(foo)"),
            ("type( foo ), intent(in) :: x", "type(foo)"),
            ("class(base) :: obj", "class(base)"),
            ("procedure(cb), pointer :: p", "procedure(cb)"),
            ("byte b", "byte"),
        ];
        for (text, spec) in cases {
            let (info, _) = parse_type_spec(text).unwrap_or_else(|| panic!("{}", text));
            assert_eq!(info, VarInfo::new(spec), "{}", text);
        }

        let (info, names) = parse_declaration("type(foo) x, y(3)").unwrap();
        assert_eq!(info.type_spec, "type(foo)");
        assert_eq!(names, ["x", "y"]);
        assert!(parse_type_spec("bytes = 1").is_none());
        assert!(parse_type_spec("type foo").is_none());
    }

    #[test]
    fn test_function_header_with_unrecognized_type() {
        let header = parse_header(&stmt("type(foo) function fweird(n)"))
            .unwrap()
            .unwrap();
        assert_eq!(header.name, "fweird");
        assert_eq!(header.return_type, Some(VarInfo::new("type(foo)")));
    }

    #[test]
    fn test_type_spec_requires_word_boundary() {
        assert!(parse_type_spec("realpart = 1").is_none());
        assert!(parse_type_spec("integer_count = 1").is_none());
        assert!(parse_type_spec("call real_op(x)").is_none());
    }

    #[test]
    fn test_declarations() {
        let (info, names) = parse_declaration("double precision a( lda, * ), b( ldb, * ), w").unwrap();
        assert_eq!(info.type_spec, "double precision");
        assert_eq!(names, ["a", "b", "w"]);

        let (_, names) = parse_declaration("integer, intent(in) :: n, lda").unwrap();
        assert_eq!(names, ["n", "lda"]);

        let (_, names) = parse_declaration("integer, parameter :: wp = kind(1.d0)").unwrap();
        assert_eq!(names, ["wp"]);

        let (_, names) = parse_declaration("character name*10, c").unwrap();
        assert_eq!(names, ["name", "c"]);
    }

    #[test]
    fn test_non_declarations() {
        assert!(parse_declaration("integer = 5").is_none());
        assert!(parse_declaration("real, intent(in) x").is_none());
        assert!(parse_declaration("external lsame").is_none());
        assert!(parse_declaration("real").is_none());
    }

    #[test]
    fn test_subroutine_header() {
        let header = parse_header(&stmt("subroutine dgesv( n, nrhs, a, lda, ipiv, b, ldb, info )"))
            .unwrap()
            .unwrap();
        assert_eq!(header.kind, BlockKind::Subroutine);
        assert_eq!(header.name, "dgesv");
        assert_eq!(header.args, ["n", "nrhs", "a", "lda", "ipiv", "b", "ldb", "info"]);
        assert_eq!(header.return_type, None);
    }

    #[test]
    fn test_function_header_with_type_prefix() {
        let header = parse_header(&stmt("double precision function dlamch( cmach )"))
            .unwrap()
            .unwrap();
        assert_eq!(header.kind, BlockKind::Function);
        assert_eq!(header.return_type, Some(VarInfo::new("double precision")));

        let header = parse_header(&stmt("complex*16 function zdotc(n,zx,incx,zy,incy)"))
            .unwrap()
            .unwrap();
        assert_eq!(header.return_type, Some(VarInfo::with_kind("complex", "16")));
    }

    #[test]
    fn test_header_keywords_and_result() {
        let header = parse_header(&stmt("recursive subroutine dlaqz0(wants)"))
            .unwrap()
            .unwrap();
        assert_eq!(header.name, "dlaqz0");

        let header = parse_header(&stmt("pure real(wp) elemental function f(x) result(y)"))
            .unwrap()
            .unwrap();
        assert_eq!(header.return_type, Some(VarInfo::with_kind("real", "wp")));
        assert_eq!(header.result.as_deref(), Some("y"));
    }

    #[test]
    fn test_header_without_arguments() {
        let header = parse_header(&stmt("subroutine xstop")).unwrap().unwrap();
        assert!(header.args.is_empty());
        let header = parse_header(&stmt("subroutine xstop()")).unwrap().unwrap();
        assert!(header.args.is_empty());
    }

    #[test]
    fn test_not_headers() {
        assert_eq!(parse_header(&stmt("end subroutine dgesv")).unwrap(), None);
        assert_eq!(parse_header(&stmt("integer function_count")).unwrap(), None);
        assert_eq!(parse_header(&stmt("call dgetrf( n, n, a, lda, ipiv, info )")).unwrap(), None);
    }

    #[test]
    fn test_malformed_argument_list() {
        let err = parse_header(&stmt("subroutine bad( n, a")).unwrap_err();
        assert!(err.to_string().contains("unbalanced"));
        let err = parse_header(&stmt("subroutine bad( n, 1x )")).unwrap_err();
        assert!(err.to_string().contains("invalid argument name `1x`"));
    }

    #[test]
    fn test_unit_end() {
        assert!(is_unit_end("end"));
        assert!(is_unit_end("end subroutine dgesv"));
        assert!(is_unit_end("endfunction"));
        assert!(!is_unit_end("end do"));
        assert!(!is_unit_end("endif"));
        assert!(!is_unit_end("end interface"));
    }

    #[test]
    fn test_interface_markers() {
        assert!(is_interface_start("interface"));
        assert!(is_interface_start("abstract interface"));
        assert!(is_interface_end("end interface"));
        assert!(is_interface_end("endinterface"));
        assert!(!is_interface_start("integer interfaces"));
    }
}
