//! Shared identifier for type and method names.
//!
//! Names are created once while a shape is declared and then cloned into
//! every descriptor that mentions them, so they are reference counted rather
//! than copied.

use std::fmt;
use std::sync::Arc;

/// An immutable, cheaply clonable name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// Create a name from any string-like value.
    pub fn new(value: impl AsRef<str>) -> Self {
        Name(Arc::from(value.as_ref()))
    }

    /// The name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(Arc::from(value))
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_equality_is_by_content() {
        assert_eq!(Name::new("Custom"), Name::from(String::from("Custom")));
        assert_ne!(Name::new("Custom"), Name::new("Plain"));
    }

    #[test]
    fn test_name_display() {
        assert_eq!(Name::new("Custom").to_string(), "Custom");
        assert_eq!(format!("{:?}", Name::new("Custom")), "Name(\"Custom\")");
    }
}
