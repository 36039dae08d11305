//! Fortran routine metadata extraction
//!
//! A small reader for the Fortran dialect used by reference BLAS and
//! LAPACK. It finds the first FUNCTION or SUBROUTINE in a file and collects
//! its argument list and declared types, which is all the manifest builder
//! needs.
//!
//! The reader does not resolve kind parameters, apply implicit typing,
//! evaluate expressions or follow INCLUDE lines. A `real(wp)` declaration is
//! recorded with kind selector `wp` as written.
//!
//! # Example
//!
//! ```
//! use fsig_fortran::{parse_source, SourceForm};
//!
//! let src = "      DOUBLE PRECISION FUNCTION DLAMCH( CMACH )\n      CHARACTER CMACH\n      END\n";
//! let meta = parse_source(src, SourceForm::Fixed).unwrap();
//! assert_eq!(meta.name, "dlamch");
//! assert_eq!(meta.args, ["cmach"]);
//! assert_eq!(meta.var("dlamch").unwrap().type_spec, "double precision");
//! ```

mod decl;
pub mod error;
pub mod source;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fsig_core::meta::{BlockKind, RoutineMeta, VarInfo};
use fsig_core::parser::RoutineParser;

pub use error::ParseError;
pub use source::{statements, SourceForm, Statement};

use decl::Header;

/// Parses the first routine in a file. The form comes from the extension.
pub fn parse_file(path: impl AsRef<Path>) -> Result<RoutineMeta, ParseError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    parse_source(&source, SourceForm::from_path(path))
}

/// Parses the first routine in `source`.
pub fn parse_source(source: &str, form: SourceForm) -> Result<RoutineMeta, ParseError> {
    let statements = source::statements(source, form);
    let mut rest = statements.iter();

    let header = loop {
        let stmt = rest.next().ok_or(ParseError::NoRoutine)?;
        if let Some(header) = decl::parse_header(stmt)? {
            break header;
        }
    };

    let vars = collect_declarations(rest);
    Ok(assemble(header, vars))
}

/// Declared types up to the end of the unit. The first declaration of a name wins.
fn collect_declarations<'a>(
    statements: impl Iterator<Item = &'a Statement>,
) -> BTreeMap<String, VarInfo> {
    let mut vars = BTreeMap::new();
    let mut interface_depth = 0usize;

    for stmt in statements {
        let text = stmt.text.as_str();
        if decl::is_interface_start(text) {
            interface_depth += 1;
            continue;
        }
        if decl::is_interface_end(text) {
            interface_depth = interface_depth.saturating_sub(1);
            continue;
        }
        if interface_depth > 0 {
            continue;
        }
        if text == "contains" || decl::is_unit_end(text) {
            break;
        }
        if let Some((info, names)) = decl::parse_declaration(text) {
            for name in names {
                vars.entry(name).or_insert_with(|| info.clone());
            }
        }
    }
    vars
}

fn assemble(header: Header, mut vars: BTreeMap<String, VarInfo>) -> RoutineMeta {
    if header.kind == BlockKind::Function {
        match (header.return_type, header.result) {
            (Some(ret), _) => {
                vars.insert(header.name.clone(), ret);
            }
            (None, Some(result)) if result != header.name => {
                if let Some(info) = vars.get(&result).cloned() {
                    vars.insert(header.name.clone(), info);
                }
            }
            _ => {}
        }
    }

    RoutineMeta {
        name: header.name,
        block: header.kind,
        args: header.args,
        vars,
    }
}

/// [`RoutineParser`] backed by [`parse_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FortranParser;

impl RoutineParser for FortranParser {
    type Error = ParseError;

    fn parse(&self, path: &Path) -> Result<RoutineMeta, ParseError> {
        parse_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixed(src: &str) -> RoutineMeta {
        parse_source(src, SourceForm::Fixed).unwrap()
    }

    #[test]
    fn test_lapack_subroutine() {
        let meta = fixed(
            "\
*> \\brief <b> DGESV computes the solution to system of linear equations A * X = B for GE matrices</b>
      SUBROUTINE DGESV( N, NRHS, A, LDA, IPIV, B, LDB, INFO )
*
*     .. Scalar Arguments ..
      INTEGER            INFO, LDA, LDB, N, NRHS
*     ..
*     .. Array Arguments ..
      INTEGER            IPIV( * )
      DOUBLE PRECISION   A( LDA, * ), B( LDB, * )
*     ..
      EXTERNAL           DGETRF, DGETRS, XERBLA
      INTRINSIC          MAX
      INFO = 0
      IF( N.LT.0 ) THEN
         INFO = -1
      END IF
      RETURN
      END
",
        );
        assert_eq!(meta.name, "dgesv");
        assert_eq!(meta.block, BlockKind::Subroutine);
        assert_eq!(meta.args, ["n", "nrhs", "a", "lda", "ipiv", "b", "ldb", "info"]);
        assert_eq!(meta.var("ipiv"), Some(&VarInfo::new("integer")));
        assert_eq!(meta.var("b"), Some(&VarInfo::new("double precision")));
        assert_eq!(meta.vars.len(), 8);
    }

    #[test]
    fn test_typed_function_header() {
        let meta = fixed(
            "
      COMPLEX*16 FUNCTION ZDOTC(N,ZX,INCX,ZY,INCY)
      INTEGER INCX,INCY,N
      COMPLEX*16 ZX(*),ZY(*)
      COMPLEX*16 ZTEMP
      END
",
        );
        assert!(meta.is_function());
        assert_eq!(meta.var("zdotc"), Some(&VarInfo::with_kind("complex", "16")));
        assert_eq!(meta.var("zx"), Some(&VarInfo::with_kind("complex", "16")));
        assert_eq!(meta.var("ztemp"), Some(&VarInfo::with_kind("complex", "16")));
    }

    #[test]
    fn test_function_typed_in_body() {
        let meta = fixed(
            "
      FUNCTION ILAENV( ISPEC, NAME, OPTS, N1, N2, N3, N4 )
      CHARACTER*( * )    NAME, OPTS
      INTEGER            ISPEC, N1, N2, N3, N4
      INTEGER            ILAENV
      END
",
        );
        assert_eq!(meta.var("ilaenv"), Some(&VarInfo::new("integer")));
        assert_eq!(meta.var("name"), Some(&VarInfo::new("character")));
    }

    #[test]
    fn test_logical_function() {
        let meta = fixed(
            "
      LOGICAL FUNCTION LSAME(CA,CB)
      CHARACTER CA,CB
      INTEGER INTA,INTB,ZCODE
      LSAME = CA .EQ. CB
      IF (LSAME) RETURN
      END
",
        );
        assert_eq!(meta.var("lsame"), Some(&VarInfo::new("logical")));
        assert_eq!(meta.var("ca"), Some(&VarInfo::new("character")));
    }

    #[test]
    fn test_undeclared_argument_is_left_out() {
        let meta = fixed(
            "
      SUBROUTINE FOO( N, X )
      INTEGER N
      END
",
        );
        assert_eq!(meta.args, ["n", "x"]);
        assert_eq!(meta.var("x"), None);
    }

    #[test]
    fn test_only_first_unit_is_read() {
        let meta = fixed(
            "
      DOUBLE PRECISION FUNCTION DLAMCH( CMACH )
      CHARACTER          CMACH
      DO 10 I = 1, 2
   10 CONTINUE
      IF( LSAME( CMACH, 'E' ) ) THEN
         RMACH = EPS
      END IF
      END
      DOUBLE PRECISION FUNCTION DLAMC3( A, B )
      DOUBLE PRECISION   A, B
      END
",
        );
        assert_eq!(meta.name, "dlamch");
        assert_eq!(meta.args, ["cmach"]);
        assert_eq!(meta.var("a"), None);
    }

    #[test]
    fn test_end_do_and_end_if_do_not_close_unit() {
        let meta = parse_source(
            "\
subroutine f(n, x)
  do i = 1, n
  end do
  if (n > 0) then
  endif
  integer :: n
  real :: x
end subroutine f
",
            SourceForm::Free,
        )
        .unwrap();
        assert_eq!(meta.var("n"), Some(&VarInfo::new("integer")));
        assert_eq!(meta.var("x"), Some(&VarInfo::new("real")));
    }

    #[test]
    fn test_free_form_kind_parameter() {
        let meta = parse_source(
            "\
!> DLARTG generates a plane rotation
subroutine DLARTG( f, g, c, s, r )
   use LA_CONSTANTS, &
   only: wp=>dp, zero=>dzero, half=>dhalf, one=>done
   real(wp) :: c, f, g, r, s
   real(wp) :: d, f1
end subroutine
",
            SourceForm::Free,
        )
        .unwrap();
        assert_eq!(meta.args, ["f", "g", "c", "s", "r"]);
        assert_eq!(meta.var("c"), Some(&VarInfo::with_kind("real", "wp")));
    }

    #[test]
    fn test_result_clause() {
        let meta = parse_source(
            "\
function dnrm2( n, x, incx ) result(nrm)
   integer, parameter :: wp = kind(1.d0)
   real(wp) :: nrm
   integer :: incx, n
   real(wp) :: x(*)
end function
",
            SourceForm::Free,
        )
        .unwrap();
        assert_eq!(meta.var("dnrm2"), Some(&VarInfo::with_kind("real", "wp")));
    }

    #[test]
    fn test_interface_block_is_skipped() {
        let meta = parse_source(
            "\
subroutine g(n)
  interface
    subroutine cb(m)
      real :: m
    end subroutine
  end interface
  integer :: n
  real :: m
end subroutine
",
            SourceForm::Free,
        )
        .unwrap();
        assert_eq!(meta.name, "g");
        assert_eq!(meta.var("m"), Some(&VarInfo::new("real")));
        assert_eq!(meta.var("n"), Some(&VarInfo::new("integer")));
    }

    #[test]
    fn test_unrecognized_types_surface_as_type_errors() {
        use fsig_core::{synthesize, ErrorCode, SynthesisError};

        let meta = fixed("      SUBROUTINE DWEIRD(N, X)\n      INTEGER N\n      TYPE(FOO) X\n      END\n");
        assert_eq!(meta.var("x"), Some(&VarInfo::new("type(foo)")));
        let err = synthesize(&meta).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownType);
        assert!(matches!(err, SynthesisError::UnknownType { ref variable, .. } if variable == "x"));

        let meta = fixed("      TYPE(FOO) FUNCTION FWEIRD(N)\n      INTEGER N\n      END\n");
        assert!(meta.is_function());
        let err = synthesize(&meta).unwrap_err();
        assert!(matches!(err, SynthesisError::UnknownType { ref variable, .. } if variable == "fweird"));
    }

    #[test]
    fn test_no_routine() {
        let err = parse_source("      PROGRAM MAIN\n      END\n", SourceForm::Fixed).unwrap_err();
        assert!(matches!(err, ParseError::NoRoutine));
        let err = parse_source("", SourceForm::Free).unwrap_err();
        assert!(matches!(err, ParseError::NoRoutine));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse_source("! header\nsubroutine f(a, b\n", SourceForm::Free).unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sscal.f90");
        fs::write(&path, "subroutine sscal(n, sa, sx, incx)\ninteger :: n, incx\nreal :: sa, sx(*)\nend\n")
            .unwrap();

        let meta = FortranParser.parse(&path).unwrap();
        assert_eq!(meta.name, "sscal");
        assert_eq!(meta.var("sx"), Some(&VarInfo::new("real")));
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(dir.path().join("missing.f")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
