//! Adapter method identity and signature rendering.

use std::fmt;

use morph_types::{write_list, Name, Ty};

/// The static description of one adapter-facing method.
///
/// This is the method identity used as the resolution cache key: two
/// descriptors with the same name, parameter types and return type resolve
/// to the same target method. A forwarding type typically keeps one
/// descriptor per interface member in a `static` and passes it with every
/// call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AdapterMethod {
    name: Name,
    params: Vec<Ty>,
    ret: Ty,
}

impl AdapterMethod {
    pub fn new(name: impl Into<Name>, params: impl IntoIterator<Item = Ty>, ret: Ty) -> Self {
        AdapterMethod {
            name: name.into(),
            params: params.into_iter().collect(),
            ret,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn params(&self) -> &[Ty] {
        &self.params
    }

    pub fn ret(&self) -> &Ty {
        &self.ret
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn signature(&self) -> Signature<'_> {
        Signature::new(&self.name, &self.params, Some(&self.ret))
    }
}

impl fmt::Display for AdapterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.signature().fmt(f)
    }
}

/// Displays a method as `name(A, ref B) -> R`.
#[derive(Clone, Copy, Debug)]
pub struct Signature<'a> {
    name: &'a Name,
    params: &'a [Ty],
    ret: Option<&'a Ty>,
}

impl<'a> Signature<'a> {
    /// A signature; `ret` is omitted from the rendering when `None`.
    pub fn new(name: &'a Name, params: &'a [Ty], ret: Option<&'a Ty>) -> Self {
        Signature { name, params, ret }
    }
}

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_list(f, self.params)?;
        f.write_str(")")?;
        if let Some(ret) = self.ret {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}
