//! Version-qualified naming for the published archive.
//!
//! A [`NameTemplate`] holds exactly one `${version}` placeholder. Rendering
//! it with a [`Version`] yields the [`ArtifactName`] the publisher writes
//! under the destination directory.

use super::error::{ArchiveError, Result};
use std::fmt;

/// Placeholder substituted with the project version.
pub const VERSION_PLACEHOLDER: &str = "${version}";

/// Extension used by the default template.
pub const DEFAULT_EXTENSION: &str = ".jar";

/// A validated filename template.
///
/// # Examples
///
/// ```
/// use universal_jar::archive::naming::{NameTemplate, Version};
///
/// let template = NameTemplate::parse("ViaBackwards-${version}.jar").expect("valid template");
/// let version = Version::try_from("4.9.0").expect("valid version");
/// assert_eq!(template.render(&version).filename(), "ViaBackwards-4.9.0.jar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    prefix: String,
    suffix: String,
}

impl NameTemplate {
    /// Parse and validate a template.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidTemplate`] when the template is empty,
    /// does not contain exactly one `${version}` placeholder, contains any
    /// other `${...}` placeholder, or contains a path separator.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| ArchiveError::InvalidTemplate {
            template: template.to_owned(),
            reason: reason.to_owned(),
        };

        if template.trim().is_empty() {
            return Err(invalid("template must not be empty"));
        }
        if template.contains(['/', '\\']) {
            return Err(invalid("template must name a file, not a path"));
        }

        let mut pieces = template.split(VERSION_PLACEHOLDER);
        let (Some(prefix), Some(suffix), None) = (pieces.next(), pieces.next(), pieces.next())
        else {
            return Err(invalid("template must contain exactly one ${version} placeholder"));
        };
        if prefix.contains("${") || suffix.contains("${") {
            return Err(invalid("only the ${version} placeholder is supported"));
        }

        Ok(Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        })
    }

    /// The conventional `<product>-${version}<extension>` template.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidTemplate`] when the product name or
    /// extension would make the template invalid.
    pub fn for_product(product: &str, extension: &str) -> Result<Self> {
        Self::parse(&format!("{product}-{VERSION_PLACEHOLDER}{extension}"))
    }

    /// Substitute `version` into the template.
    #[must_use]
    pub fn render(&self, version: &Version) -> ArtifactName {
        ArtifactName(format!("{}{}{}", self.prefix, version, self.suffix))
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VERSION_PLACEHOLDER}{}", self.prefix, self.suffix)
    }
}

/// A project version that can be embedded in a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Version {
    type Error = ArchiveError;

    fn try_from(value: &str) -> Result<Self> {
        let invalid = |reason: &str| ArchiveError::InvalidVersion {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };
        if value.is_empty() {
            return Err(invalid("version must not be empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(invalid("version must not contain whitespace"));
        }
        if value.contains(['/', '\\']) {
            return Err(invalid("version must not contain path separators"));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Version {
    type Error = ArchiveError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The rendered filename of a published archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Return the filename as a string slice.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
