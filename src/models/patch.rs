//! Sparse patch documents applied to a resource's mutable update view.
//!
//! A patch is an ordered list of field-level edit operations. Operations are
//! applied in sequence, mutating the working view in place; the request is
//! rejected as a whole on the first operation that addresses an unknown or
//! disallowed field path. Field-constraint validation is deliberately not
//! performed here: it runs once, after the full sequence has been applied.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, FieldViolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    Add,
    Replace,
    Remove,
}

/// One field-level edit operation addressed by field path (e.g. `/title`).
#[derive(Debug, Clone, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOpKind,
    pub path: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// A mutable projection that a patch sequence can be applied to.
pub trait PatchTarget {
    /// Write `value` into the field at `path`; `None` clears the field.
    /// Returns the violation when the path is unknown or the value has the
    /// wrong shape.
    fn write_field(&mut self, path: &str, value: Option<&Value>) -> Result<(), FieldViolation>;
}

/// Apply an edit-operation sequence to `target`, in the order given.
pub fn apply_patch<T: PatchTarget>(
    target: &mut T,
    ops: &[PatchOperation],
) -> Result<(), AppError> {
    for op in ops {
        let outcome = match op.op {
            PatchOpKind::Add | PatchOpKind::Replace => match op.value.as_ref() {
                Some(value) => target.write_field(&op.path, Some(value)),
                None => Err(FieldViolation::new(
                    op.path.clone(),
                    "A value is required for add and replace operations.",
                )),
            },
            PatchOpKind::Remove => target.write_field(&op.path, None),
        };
        outcome.map_err(|violation| AppError::Unprocessable(vec![violation]))?;
    }
    Ok(())
}
