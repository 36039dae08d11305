//! Test fixture utilities for creating synthetic Fortran source trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Reference BLAS `DGEMM` header and declarations.
pub const DGEMM: &str = "\
*> \\brief \\b DGEMM
      SUBROUTINE DGEMM(TRANSA,TRANSB,M,N,K,ALPHA,A,LDA,B,LDB,BETA,C,LDC)
*
*     .. Scalar Arguments ..
      DOUBLE PRECISION ALPHA,BETA
      INTEGER K,LDA,LDB,LDC,M,N
      CHARACTER TRANSA,TRANSB
*     ..
*     .. Array Arguments ..
      DOUBLE PRECISION A(LDA,*),B(LDB,*),C(LDC,*)
*     ..
      EXTERNAL LSAME,XERBLA
      LOGICAL LSAME
      RETURN
      END
";

/// Reference BLAS `ZDOTC`: a `COMPLEX*16` function.
pub const ZDOTC: &str = "      COMPLEX*16 FUNCTION ZDOTC(N,ZX,INCX,ZY,INCY)
      INTEGER INCX,INCY,N
      COMPLEX*16 ZX(*),ZY(*)
      COMPLEX*16 ZTEMP
      INTEGER I,IX,IY
      INTRINSIC DCONJG
      ZTEMP = (0.0d0,0.0d0)
      ZDOTC = ZTEMP
      RETURN
      END
";

/// Reference LAPACK `DLAMCH`, followed by a helper unit.
pub const DLAMCH: &str = "      DOUBLE PRECISION FUNCTION DLAMCH( CMACH )
      CHARACTER          CMACH
      DOUBLE PRECISION   ONE, ZERO
      PARAMETER          ( ONE = 1.0D+0, ZERO = 0.0D+0 )
      DLAMCH = ZERO
      RETURN
      END
      DOUBLE PRECISION FUNCTION DLAMC3( A, B )
      DOUBLE PRECISION   A, B
      DLAMC3 = A + B
      RETURN
      END
";

/// Reference LAPACK `DGEES`, whose `SELECT` argument is a callback.
pub const DGEES: &str = "      SUBROUTINE DGEES( JOBVS, SORT, SELECT, N, A, LDA, SDIM, WR, WI,
     $                  VS, LDVS, WORK, LWORK, BWORK, INFO )
      CHARACTER          JOBVS, SORT
      INTEGER            INFO, LDA, LDVS, LWORK, N, SDIM
      LOGICAL            BWORK( * )
      DOUBLE PRECISION   A( LDA, * ), VS( LDVS, * ), WI( * ), WORK( * ),
     $                   WR( * )
      LOGICAL            SELECT
      EXTERNAL           SELECT
      END
";

/// A LAPACK routine with an argument named exactly `rank_bn`.
pub const DRANKBN: &str = "      SUBROUTINE DRANKBN( N, RANK_BN, RANK_BNX )
      INTEGER            N, RANK_BN, RANK_BNX
      END
";

/// Free-form source with a kind parameter.
pub const DLARTG_F90: &str = "\
!> DLARTG generates a plane rotation
subroutine DLARTG( f, g, c, s, r )
   use LA_CONSTANTS, &
      only: wp=>dp, zero=>dzero, half=>dhalf, one=>done
   real(wp) :: c, f, g, r, s
end subroutine
";

/// A Fortran source tree in a temporary directory.
pub struct SourceTree {
    pub root: TempDir,
    pub src_dir: PathBuf,
}

impl SourceTree {
    /// Create an empty tree with a `SRC` directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let src_dir = root.path().join("SRC");
        fs::create_dir_all(&src_dir).expect("Failed to create SRC dir");
        Self { root, src_dir }
    }

    /// A small reference BLAS tree: `dgemm`, `zdotc`, and the excluded
    /// `xerbla` and `scabs1`.
    pub fn blas() -> Self {
        let tree = Self::new();
        tree.add_source("dgemm.f", DGEMM);
        tree.add_source("zdotc.f", ZDOTC);
        tree.add_subroutine("xerbla", &[("srname", "CHARACTER*(*)"), ("info", "INTEGER")]);
        tree.add_function("scabs1", "REAL", &[("z", "COMPLEX")]);
        tree
    }

    /// A small reference LAPACK tree with overridden and excluded routines.
    pub fn lapack() -> Self {
        let tree = Self::new();
        tree.add_source("dlamch.f", DLAMCH);
        tree.add_source("dgees.f", DGEES);
        tree.add_source("drankbn.f", DRANKBN);
        tree.add_source("dlartg.f90", DLARTG_F90);
        tree.add_subroutine(
            "dgesv",
            &[
                ("n", "INTEGER"),
                ("nrhs", "INTEGER"),
                ("a", "DOUBLE PRECISION"),
                ("lda", "INTEGER"),
                ("ipiv", "INTEGER"),
                ("b", "DOUBLE PRECISION"),
                ("ldb", "INTEGER"),
                ("info", "INTEGER"),
            ],
        );
        tree.add_function(
            "ilaenv",
            "INTEGER",
            &[("ispec", "INTEGER"), ("name", "CHARACTER*(*)")],
        );
        tree.add_subroutine("xerbla", &[("srname", "CHARACTER*(*)"), ("info", "INTEGER")]);
        tree
    }

    /// Get the tree root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// The source directory as a string argument.
    pub fn src_arg(&self) -> String {
        self.src_dir.to_string_lossy().into_owned()
    }

    /// A path next to the source directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Write a source file verbatim.
    pub fn add_source(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.src_dir.join(file_name);
        fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Remove a source file.
    pub fn remove_source(&self, file_name: &str) {
        fs::remove_file(self.src_dir.join(file_name)).expect("Failed to remove source file");
    }

    /// Write a fixed-form subroutine with one declaration per argument.
    pub fn add_subroutine(&self, name: &str, args: &[(&str, &str)]) -> PathBuf {
        let source = fixed_form_unit("SUBROUTINE", name, args);
        self.add_source(&format!("{}.f", name), &source)
    }

    /// Write a fixed-form function with a typed header.
    pub fn add_function(&self, name: &str, return_type: &str, args: &[(&str, &str)]) -> PathBuf {
        let source = fixed_form_unit(&format!("{} FUNCTION", return_type), name, args);
        self.add_source(&format!("{}.f", name), &source)
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a fixed-form unit, one argument per continuation line so no line
/// passes column 72.
pub fn fixed_form_unit(keyword: &str, name: &str, args: &[(&str, &str)]) -> String {
    let mut source = format!("      {} {}(", keyword, name.to_uppercase());
    for (i, (arg, _)) in args.iter().enumerate() {
        source.push_str(if i == 0 { "\n     $   " } else { ",\n     $   " });
        source.push_str(&arg.to_uppercase());
    }
    source.push_str(" )\n");
    for (arg, type_spec) in args {
        source.push_str(&format!("      {} {}\n", type_spec, arg.to_uppercase()));
    }
    source.push_str("      END\n");
    source
}
