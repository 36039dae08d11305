//! Signature synthesis from routine metadata.

use crate::error::SynthesisError;
use crate::meta::RoutineMeta;
use crate::signature::{Param, ReturnType, Signature};
use crate::types::{map_type, TypeTag};

/// Argument name the parser emits in place of `rank`.
const RANK_ARTIFACT: &str = "rank_bn";

/// Synthesizes the signature of one routine.
///
/// Subroutines return `void`; functions return the mapped type of their own
/// name. Arguments keep their order. An argument named exactly `rank_bn` is
/// written as `rank`.
///
/// # Errors
/// Returns [`SynthesisError`] if any argument or the return value is
/// undeclared or has an unrecognized type.
///
/// # Example
/// ```
/// use fsig_core::meta::{RoutineMeta, VarInfo};
/// use fsig_core::synth::synthesize;
///
/// let meta = RoutineMeta::subroutine("dpotrf")
///     .arg("uplo", VarInfo::new("character"))
///     .arg("n", VarInfo::new("integer"))
///     .build();
/// let sig = synthesize(&meta).unwrap();
/// assert_eq!(sig.to_line(), "void dpotrf(char *uplo, int *n)\n");
/// ```
pub fn synthesize(meta: &RoutineMeta) -> Result<Signature, SynthesisError> {
    let return_type = if meta.is_function() {
        let info = meta
            .var(&meta.name)
            .ok_or_else(|| SynthesisError::MissingReturnType {
                routine: meta.name.clone(),
            })?;
        ReturnType::Value(resolve(meta, &meta.name, &info.type_spec, info.has_kind_qualifier())?)
    } else {
        ReturnType::Void
    };

    let params = meta
        .args
        .iter()
        .map(|arg| {
            let info = meta
                .var(arg)
                .ok_or_else(|| SynthesisError::MissingArgumentMetadata {
                    routine: meta.name.clone(),
                    argument: arg.clone(),
                })?;
            let tag = resolve(meta, arg, &info.type_spec, info.has_kind_qualifier())?;
            Ok(Param::new(tag, fix_param_name(arg)))
        })
        .collect::<Result<Vec<_>, SynthesisError>>()?;

    Ok(Signature {
        return_type,
        name: meta.name.clone(),
        params,
    })
}

fn resolve(
    meta: &RoutineMeta,
    variable: &str,
    type_spec: &str,
    has_kind: bool,
) -> Result<TypeTag, SynthesisError> {
    map_type(type_spec, has_kind).map_err(|e| SynthesisError::UnknownType {
        routine: meta.name.clone(),
        variable: variable.to_string(),
        type_spec: e.type_spec,
    })
}

fn fix_param_name(name: &str) -> &str {
    if name == RANK_ARTIFACT {
        "rank"
    } else {
        name
    }
}
