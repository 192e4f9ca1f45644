//! Core types used within a pipeline [crate::node::GenericNode].
//!
//! These are strings restricted to a pattern, so their inner value is private.

#[cfg(any(test, feature = "testing"))]
mod test_defaults;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("got {value:?} which is not {expected}")]
pub struct ValueError<V> {
    pub value: V,
    pub expected: &'static str,
}

/// Implements construction, parsing and formatting for a newtype around a `String` that must
/// match `$pattern` in full.
macro_rules! pattern_string {
    ($name:ident, $what:literal, $pattern:literal) => {
        impl $name {
            const EXPECTED: &str = concat!($what, " matching ", $pattern);

            fn parse<S>(value: S) -> Result<Self, S>
            where
                S: Into<String> + AsRef<str>,
            {
                if lazy_regex::regex_is_match!($pattern, value.as_ref()) {
                    Ok(Self(value.into()))
                } else {
                    Err(value)
                }
            }

            #[cfg(test)]
            fn new_unchecked(value: String) -> Self {
                Self(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueError<String>;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value).map_err(|value| ValueError {
                    value: value.to_owned(),
                    expected: Self::EXPECTED,
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError<String>;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value).map_err(|value| ValueError {
                    value,
                    expected: Self::EXPECTED,
                })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(s).map_err(|s| {
                    serde::de::Error::invalid_value(serde::de::Unexpected::Str(&s), &Self::EXPECTED)
                })
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Unique identifier of a [crate::node::GenericNode] within a
/// [crate::pipeline::GenericPipeline].
///
/// Node IDs double as artifact names (`gpio.json`), so `.` and `_` are permitted between the
/// leading and trailing alphanumeric characters.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NodeId(String);

pattern_string!(
    NodeId,
    "a node ID",
    r"^[a-zA-Z0-9]([a-zA-Z0-9._-]*[a-zA-Z0-9])?$"
);

impl NodeId {
    #[cfg(any(test, feature = "testing"))]
    pub fn test_node_id(s: &str) -> Self {
        s.try_into().expect("expected valid NodeId value")
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

/// Tag value that non-uniquely identifies a set of [crate::node::GenericNode]s. Components are
/// delimited by `/`, with each nested beneath the one before.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct Tag(String);

pattern_string!(
    Tag,
    "a tag",
    r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(/[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)*$"
);

impl Tag {
    #[cfg(any(test, feature = "testing"))]
    pub fn test_tag(s: &str) -> Self {
        s.try_into().expect("expected valid Tag value")
    }

    /// Returns true if `self` equals `parent`, or is nested beneath it by one or more whole
    /// components.
    pub fn is_self_or_child_of(&self, parent: &Tag) -> bool {
        match self.0.strip_prefix(parent.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }
}
