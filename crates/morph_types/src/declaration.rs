//! Declarative form of an adapter shape's type pairs.
//!
//! A `ShapeDeclaration` is the whole configuration surface of an adapter
//! shape: an ordered list of pairs plus the unmapped-type policy. With the
//! `serde` feature it can be loaded from any serde format; types are written
//! in their canonical textual form.
//!
//! ```text
//! {
//!   "strict": true,
//!   "passthrough": ["int", "str"],
//!   "pairs": [
//!     { "source": "Custom", "destination": "Plain", "add_reverse": true }
//!   ]
//! }
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Ty;

/// One `(source, destination, expand_containers, add_reverse)` tuple.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct PairDeclaration {
    pub source: Ty,
    pub destination: Ty,
    #[cfg_attr(feature = "serde", serde(default = "default_expand_containers"))]
    pub expand_containers: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub add_reverse: bool,
}

/// The declared type pairs and unmapped-type policy of one adapter shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ShapeDeclaration {
    #[cfg_attr(feature = "serde", serde(default))]
    pub pairs: Vec<PairDeclaration>,
    /// Fail on unmapped types instead of passing them through.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strict: bool,
    /// Types that intentionally map to themselves under `strict`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passthrough: Vec<Ty>,
}

#[cfg(feature = "serde")]
fn default_expand_containers() -> bool {
    true
}

#[cfg(feature = "serde")]
impl Serialize for Ty {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Ty {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
