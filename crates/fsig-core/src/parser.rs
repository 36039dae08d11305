//! The seam to the source parser.

use std::path::Path;

use crate::meta::RoutineMeta;

/// Extracts routine metadata from one source file.
///
/// The manifest builder only depends on this trait, so any parser can be
/// plugged in. Closures of the right shape implement it too, which keeps
/// test stubs short:
///
/// ```
/// use std::path::Path;
/// use fsig_core::meta::RoutineMeta;
/// use fsig_core::parser::RoutineParser;
///
/// let stub = |path: &Path| -> Result<RoutineMeta, std::io::Error> {
///     let name = path.file_stem().unwrap().to_string_lossy().into_owned();
///     Ok(RoutineMeta::subroutine(name).build())
/// };
/// assert_eq!(stub.parse(Path::new("dfoo.f")).unwrap().name, "dfoo");
/// ```
pub trait RoutineParser {
    /// Parser-specific failure, propagated unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    fn parse(&self, path: &Path) -> Result<RoutineMeta, Self::Error>;
}

impl<F, E> RoutineParser for F
where
    F: Fn(&Path) -> Result<RoutineMeta, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn parse(&self, path: &Path) -> Result<RoutineMeta, E> {
        self(path)
    }
}
