// Wrapper type making it harder to accidentally mix up plain strings and
// namespaced identifiers.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;

/// A namespaced identifier such as `minecraft:chests/simple_dungeon`.
///
/// Loot tables are referenced by these. Parsing a bare path (no `:`
/// separator) defaults the namespace to `minecraft`, matching vanilla.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    namespace: Cow<'static, str>,
    path: Cow<'static, str>,
}

/// Error produced when parsing an [`Identifier`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input was empty.
    #[error("empty identifier")]
    Empty,
    /// The namespace component contains invalid characters.
    #[error("invalid namespace in identifier `{0}`")]
    InvalidNamespace(String),
    /// The path component contains invalid characters.
    #[error("invalid path in identifier `{0}`")]
    InvalidPath(String),
}

impl Identifier {
    /// The default namespace.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Creates an identifier in the `minecraft` namespace.
    #[must_use]
    pub fn vanilla(path: String) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Owned(path),
        }
    }

    /// Creates an identifier in the `minecraft` namespace from a static path.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The path component, without the namespace.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn valid_namespace_char(c: char) -> bool {
        c == '_' || c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.'
    }

    fn valid_path_char(c: char) -> bool {
        c == '_'
            || c == '-'
            || c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '/'
            || c == '.'
    }

    fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty() && namespace.chars().all(Self::valid_namespace_char)
    }

    fn validate_path(path: &str) -> bool {
        !path.is_empty() && path.chars().all(Self::valid_path_char)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let Some((namespace, path)) = s.split_once(':') else {
            if !Self::validate_path(s) {
                return Err(IdentifierError::InvalidPath(s.to_string()));
            }
            return Ok(Self::vanilla(s.to_string()));
        };

        if !Self::validate_namespace(namespace) {
            return Err(IdentifierError::InvalidNamespace(s.to_string()));
        }
        if !Self::validate_path(path) {
            return Err(IdentifierError::InvalidPath(s.to_string()));
        }

        Ok(Self {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }
}
