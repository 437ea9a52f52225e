//! Semantic wrapper for module names.
//!
//! This module provides the [`ModuleName`] newtype for type-safe handling of
//! module identifiers throughout the aggregation pipeline. Names are unique
//! within a build and become part of task identifiers, so they are validated
//! on construction.

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;

/// A validated module identifier.
///
/// # Examples
///
/// ```
/// use universal_jar::module_name::ModuleName;
///
/// let name = ModuleName::try_from("velocity").expect("valid module name");
/// assert_eq!(name.as_str(), "velocity");
/// assert!(ModuleName::try_from("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Get the module name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_module_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ModuleName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_module_name(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_module_name(value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidModuleName {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.is_empty() {
        return Err(invalid("module name must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid("module name must not contain whitespace"));
    }
    if value.contains(['/', '\\', ':']) {
        return Err(invalid("module name must not contain '/', '\\' or ':'"));
    }
    Ok(())
}
