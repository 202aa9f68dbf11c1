//! Runtime type descriptors.
//!
//! `Ty` is the narrow type-introspection facility the engine needs: enough
//! structure to substitute parameter types, recognise container wrappers and
//! by-reference parameters, and classify asynchronous return types. It is not
//! a general type system; nominal types are opaque names.
//!
//! # Textual Form
//!
//! Every `Ty` has a canonical textual form used by `Display`, `FromStr` and
//! shape declarations:
//!
//! | Variant | Text |
//! |---------|------|
//! | `Void` | `void` |
//! | `Named` | `Custom` |
//! | `Applied` | `Map<str, Custom>` |
//! | `Array` | `Custom[]` |
//! | `List` / `Enumerable` / `Collection` | `List<Custom>` |
//! | `ByRef` | `ref Custom` |
//! | `Task` / `TaskOf` | `Task`, `Task<Custom>` |
//! | `ValueTask` / `ValueTaskOf` | `ValueTask`, `ValueTask<Custom>` |

mod parse;

pub use parse::TyParseError;

use std::fmt;

use crate::Name;

/// A runtime type descriptor.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// No value (`void`).
    Void,
    /// A nominal type identified only by its name.
    Named(Name),
    /// A generic type other than the recognised containers and tasks.
    Applied(Name, Vec<Ty>),
    /// `T[]`
    Array(Box<Ty>),
    /// `List<T>`
    List(Box<Ty>),
    /// `Enumerable<T>`
    Enumerable(Box<Ty>),
    /// `Collection<T>`
    Collection(Box<Ty>),
    /// A by-reference (in/out) parameter of type `T`.
    ByRef(Box<Ty>),
    /// A task with no result.
    Task,
    /// A task producing `T`.
    TaskOf(Box<Ty>),
    /// A value task with no result.
    ValueTask,
    /// A value task producing `T`.
    ValueTaskOf(Box<Ty>),
}

/// The container wrappers a type pair expands into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Array,
    List,
    Enumerable,
    Collection,
}

impl ContainerKind {
    /// All container kinds, in expansion order.
    pub const ALL: [ContainerKind; 4] = [
        ContainerKind::Array,
        ContainerKind::List,
        ContainerKind::Enumerable,
        ContainerKind::Collection,
    ];

    /// Wrap `element` in this container.
    pub fn wrap(self, element: Ty) -> Ty {
        let element = Box::new(element);
        match self {
            ContainerKind::Array => Ty::Array(element),
            ContainerKind::List => Ty::List(element),
            ContainerKind::Enumerable => Ty::Enumerable(element),
            ContainerKind::Collection => Ty::Collection(element),
        }
    }
}

impl Ty {
    /// A nominal type.
    pub fn named(name: impl Into<Name>) -> Self {
        Ty::Named(name.into())
    }

    /// A generic type applied to arguments.
    pub fn applied(name: impl Into<Name>, args: Vec<Ty>) -> Self {
        Ty::Applied(name.into(), args)
    }

    pub fn array(element: Ty) -> Self {
        Ty::Array(Box::new(element))
    }

    pub fn list(element: Ty) -> Self {
        Ty::List(Box::new(element))
    }

    pub fn enumerable(element: Ty) -> Self {
        Ty::Enumerable(Box::new(element))
    }

    pub fn collection(element: Ty) -> Self {
        Ty::Collection(Box::new(element))
    }

    pub fn task_of(inner: Ty) -> Self {
        Ty::TaskOf(Box::new(inner))
    }

    pub fn value_task_of(inner: Ty) -> Self {
        Ty::ValueTaskOf(Box::new(inner))
    }

    /// The by-reference form of this type.
    ///
    /// Wrapping an already by-reference type is a no-op.
    pub fn by_ref(self) -> Self {
        match self {
            Ty::ByRef(_) => self,
            other => Ty::ByRef(Box::new(other)),
        }
    }

    /// Whether this is a by-reference parameter type.
    #[inline]
    pub fn is_by_ref(&self) -> bool {
        matches!(self, Ty::ByRef(_))
    }

    /// The referenced type for by-reference types, `self` otherwise.
    pub fn strip_ref(&self) -> &Ty {
        match self {
            Ty::ByRef(inner) => inner,
            other => other,
        }
    }

    /// The container kind and element type, if this is a container.
    pub fn container(&self) -> Option<(ContainerKind, &Ty)> {
        match self {
            Ty::Array(element) => Some((ContainerKind::Array, element)),
            Ty::List(element) => Some((ContainerKind::List, element)),
            Ty::Enumerable(element) => Some((ContainerKind::Enumerable, element)),
            Ty::Collection(element) => Some((ContainerKind::Collection, element)),
            _ => None,
        }
    }

    /// The name of a nominal type.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Ty::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Void => f.write_str("void"),
            Ty::Named(name) => write!(f, "{name}"),
            Ty::Applied(name, args) => {
                write!(f, "{name}<")?;
                write_list(f, args)?;
                f.write_str(">")
            }
            Ty::Array(element) => write!(f, "{element}[]"),
            Ty::List(element) => write!(f, "List<{element}>"),
            Ty::Enumerable(element) => write!(f, "Enumerable<{element}>"),
            Ty::Collection(element) => write!(f, "Collection<{element}>"),
            Ty::ByRef(inner) => write!(f, "ref {inner}"),
            Ty::Task => f.write_str("Task"),
            Ty::TaskOf(inner) => write!(f, "Task<{inner}>"),
            Ty::ValueTask => f.write_str("ValueTask"),
            Ty::ValueTaskOf(inner) => write!(f, "ValueTask<{inner}>"),
        }
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({self})")
    }
}

/// Write a comma-separated type list.
pub fn write_list(f: &mut fmt::Formatter<'_>, types: &[Ty]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
