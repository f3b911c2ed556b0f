//! Namespaced identifiers (`namespace:path`).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// A namespaced key such as `minecraft:overworld/continents`.
///
/// Parsing a string without a `:` places it in [`Identifier::VANILLA_NAMESPACE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// Namespace part.
    pub namespace: Cow<'static, str>,
    /// Path part.
    pub path: Cow<'static, str>,
}

/// The identifier string was not `namespace:path` with valid characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier `{0}`")]
pub struct InvalidIdentifier(pub String);

impl Identifier {
    /// Namespace used when none is given.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Build from parts without validation.
    #[must_use]
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// An identifier in the vanilla namespace.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// An owned identifier in the vanilla namespace.
    #[must_use]
    pub fn vanilla(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Self::VANILLA_NAMESPACE, path)
    }

    fn valid_namespace(s: &str) -> bool {
        !s.is_empty()
            && s.bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.'))
    }

    fn valid_path(s: &str) -> bool {
        !s.is_empty()
            && s.bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b'/'))
    }
}

impl FromStr for Identifier {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s.split_once(':').unwrap_or((Self::VANILLA_NAMESPACE, s));
        if Self::valid_namespace(namespace) && Self::valid_path(path) {
            Ok(Self::new(namespace.to_owned(), path.to_owned()))
        } else {
            Err(InvalidIdentifier(s.to_owned()))
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_vanilla_namespace() {
        let id: Identifier = "overworld/continents".parse().expect("valid");
        assert_eq!(id, Identifier::vanilla_static("overworld/continents"));
        assert_eq!(id.to_string(), "minecraft:overworld/continents");
    }

    #[test]
    fn keeps_explicit_namespace() {
        let id: Identifier = "strata:caves/noodle".parse().expect("valid");
        assert_eq!(id.namespace, "strata");
        assert_eq!(id.path, "caves/noodle");
    }

    #[test]
    fn rejects_bad_characters() {
        assert!("Minecraft:Stone".parse::<Identifier>().is_err());
        assert!("minecraft:".parse::<Identifier>().is_err());
        assert!("a:b:c".parse::<Identifier>().is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let id = Identifier::vanilla_static("offset");
        let json = serde_json::to_value(&id).expect("serializable");
        assert_eq!(json, "minecraft:offset");
        let back: Identifier = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back, id);
    }
}
