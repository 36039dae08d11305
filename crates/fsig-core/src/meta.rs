//! Routine metadata as produced by a source parser.

use std::collections::BTreeMap;

/// Whether a routine returns a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Function,
    Subroutine,
}

/// Declared type of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarInfo {
    /// Type spelling, e.g. `double precision` or `complex`.
    pub type_spec: String,
    /// Kind selector text, if the declaration carried one (`16` for `COMPLEX*16`).
    pub kind_selector: Option<String>,
}

impl VarInfo {
    /// A declaration without a kind selector.
    pub fn new(type_spec: impl Into<String>) -> Self {
        Self {
            type_spec: type_spec.into(),
            kind_selector: None,
        }
    }

    /// A declaration with a kind selector.
    pub fn with_kind(type_spec: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            type_spec: type_spec.into(),
            kind_selector: Some(kind.into()),
        }
    }

    pub fn has_kind_qualifier(&self) -> bool {
        self.kind_selector.is_some()
    }
}

/// Metadata for one routine.
///
/// `args` is the call-site parameter order. `vars` holds the declared type of
/// every known name; for a function the routine's own name carries the
/// return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineMeta {
    pub name: String,
    pub block: BlockKind,
    pub args: Vec<String>,
    pub vars: BTreeMap<String, VarInfo>,
}

impl RoutineMeta {
    /// Starts building a subroutine.
    pub fn subroutine(name: impl Into<String>) -> RoutineMetaBuilder {
        RoutineMetaBuilder::new(name.into(), BlockKind::Subroutine)
    }

    /// Starts building a function returning `ret`.
    pub fn function(name: impl Into<String>, ret: VarInfo) -> RoutineMetaBuilder {
        let name = name.into();
        let mut builder = RoutineMetaBuilder::new(name.clone(), BlockKind::Function);
        builder.meta.vars.insert(name, ret);
        builder
    }

    /// Looks up the declared type of `name`.
    pub fn var(&self, name: &str) -> Option<&VarInfo> {
        self.vars.get(name)
    }

    pub fn is_function(&self) -> bool {
        self.block == BlockKind::Function
    }
}

/// Builder for [`RoutineMeta`].
#[derive(Debug, Clone)]
pub struct RoutineMetaBuilder {
    meta: RoutineMeta,
}

impl RoutineMetaBuilder {
    fn new(name: String, block: BlockKind) -> Self {
        Self {
            meta: RoutineMeta {
                name,
                block,
                args: Vec::new(),
                vars: BTreeMap::new(),
            },
        }
    }

    /// Appends an argument with its declared type.
    pub fn arg(mut self, name: impl Into<String>, info: VarInfo) -> Self {
        let name = name.into();
        self.meta.args.push(name.clone());
        self.meta.vars.insert(name, info);
        self
    }

    /// Appends an argument with no declaration.
    pub fn undeclared_arg(mut self, name: impl Into<String>) -> Self {
        self.meta.args.push(name.into());
        self
    }

    /// Declares a non-argument variable.
    pub fn local(mut self, name: impl Into<String>, info: VarInfo) -> Self {
        self.meta.vars.insert(name.into(), info);
        self
    }

    pub fn build(self) -> RoutineMeta {
        self.meta
    }
}
