//! Classification of method return types into invocation shapes.
//!
//! The dispatcher never inspects a return type directly; it branches on the
//! `ReturnKind` computed once at resolution time. An adapter method and its
//! target must classify to the same kind.

use std::fmt;

use crate::Ty;

/// The invocation shape implied by a method's return type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// Returns nothing.
    Void,
    /// Returns a value synchronously.
    Sync,
    /// Returns a task with no result.
    Task,
    /// Returns a task producing a value.
    GenericTask,
    /// Returns a value task with no result.
    ValueTask,
    /// Returns a value task producing a value.
    GenericValueTask,
}

impl ReturnKind {
    /// Classify a return type.
    pub fn classify(ty: &Ty) -> Self {
        match ty {
            Ty::Void => ReturnKind::Void,
            Ty::Task => ReturnKind::Task,
            Ty::TaskOf(_) => ReturnKind::GenericTask,
            Ty::ValueTask => ReturnKind::ValueTask,
            Ty::ValueTaskOf(_) => ReturnKind::GenericValueTask,
            _ => ReturnKind::Sync,
        }
    }

    /// Whether calls of this shape complete asynchronously.
    #[inline]
    pub fn is_async(self) -> bool {
        !matches!(self, ReturnKind::Void | ReturnKind::Sync)
    }

    /// Whether the asynchronous result carries a value that must be remapped.
    #[inline]
    pub fn has_inner_value(self) -> bool {
        matches!(self, ReturnKind::GenericTask | ReturnKind::GenericValueTask)
    }

    /// Whether a null handle is possible for this shape.
    ///
    /// Task handles are references and may be null; value tasks are values.
    #[inline]
    pub fn is_nullable_handle(self) -> bool {
        matches!(self, ReturnKind::Task | ReturnKind::GenericTask)
    }

    /// The inner value type of a generic task or value task.
    pub fn inner(ty: &Ty) -> Option<&Ty> {
        match ty {
            Ty::TaskOf(inner) | Ty::ValueTaskOf(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for ReturnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReturnKind::Void => "void",
            ReturnKind::Sync => "synchronous value",
            ReturnKind::Task => "task",
            ReturnKind::GenericTask => "task with value",
            ReturnKind::ValueTask => "value task",
            ReturnKind::GenericValueTask => "value task with value",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_every_shape() {
        let custom = Ty::named("Custom");
        assert_eq!(ReturnKind::classify(&Ty::Void), ReturnKind::Void);
        assert_eq!(ReturnKind::classify(&custom), ReturnKind::Sync);
        assert_eq!(ReturnKind::classify(&Ty::list(custom.clone())), ReturnKind::Sync);
        assert_eq!(ReturnKind::classify(&Ty::Task), ReturnKind::Task);
        assert_eq!(
            ReturnKind::classify(&Ty::task_of(custom.clone())),
            ReturnKind::GenericTask
        );
        assert_eq!(ReturnKind::classify(&Ty::ValueTask), ReturnKind::ValueTask);
        assert_eq!(
            ReturnKind::classify(&Ty::value_task_of(custom)),
            ReturnKind::GenericValueTask
        );
    }

    #[test]
    fn test_async_and_nullability() {
        assert!(!ReturnKind::Void.is_async());
        assert!(!ReturnKind::Sync.is_async());
        assert!(ReturnKind::Task.is_nullable_handle());
        assert!(ReturnKind::GenericTask.is_nullable_handle());
        assert!(!ReturnKind::ValueTask.is_nullable_handle());
        assert!(!ReturnKind::GenericValueTask.is_nullable_handle());
        assert!(ReturnKind::GenericValueTask.has_inner_value());
        assert!(!ReturnKind::ValueTask.has_inner_value());
    }

    #[test]
    fn test_inner_only_for_generic_tasks() {
        let custom = Ty::named("Custom");
        assert_eq!(ReturnKind::inner(&Ty::task_of(custom.clone())), Some(&custom));
        assert_eq!(ReturnKind::inner(&Ty::Task), None);
        assert_eq!(ReturnKind::inner(&custom), None);
    }
}
