//! Project configuration loaded from `universal.toml`.
//!
//! The file names the product, its version, and the modules whose archives
//! are aggregated. Module order in the file is the merge order. Relative
//! paths are resolved against the project root.
//!
//! ```toml
//! product = "ViaBackwards"
//! version = "4.9.0"
//! # name_template = "ViaBackwards-${version}.jar"
//! # destination = "build/libs"
//! # jobs = 4
//!
//! [[modules]]
//! name = "bukkit"
//! output = "bukkit/build/libs/viabackwards-bukkit.jar"
//! command = ["./gradlew", ":viabackwards-bukkit:shadowJar"]
//! ```

use crate::aggregation::AggregationSettings;
use crate::archive::naming::{DEFAULT_EXTENSION, NameTemplate, Version};
use crate::command::PackagingCommand;
use crate::error::ConfigError;
use crate::module::{ModuleOutputRef, ModuleSpec};
use crate::module_name::ModuleName;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Default configuration filename at the project root.
pub const FILE_NAME: &str = "universal.toml";

/// Default publication directory, relative to the project root.
pub const DEFAULT_DESTINATION: &str = "build/libs";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    product: String,
    version: String,
    name_template: Option<String>,
    destination: Option<Utf8PathBuf>,
    jobs: Option<NonZeroUsize>,
    #[serde(default)]
    modules: Vec<RawModule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModule {
    name: String,
    output: Utf8PathBuf,
    command: Option<Vec<String>>,
}

/// Validated project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    root: Utf8PathBuf,
    product: String,
    version: Version,
    template: NameTemplate,
    destination: Utf8PathBuf,
    jobs: Option<NonZeroUsize>,
    modules: Vec<ModuleSpec>,
}

impl ProjectConfig {
    /// Load the configuration for the project at `root`.
    ///
    /// Reads `path` when given, otherwise `root/universal.toml`. A relative
    /// `path` is resolved against `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or any
    /// parse or validation error from [`Self::parse`].
    pub fn load(root: &Utf8Path, path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(|| root.join(FILE_NAME), |path| root.join(path));
        debug!("loading configuration from {path}");
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(root, &path, &text)
    }

    /// Parse configuration text as if read from `root/universal.toml`.
    ///
    /// # Errors
    ///
    /// As for [`Self::parse`].
    pub fn from_toml_str(root: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        Self::parse(root, &root.join(FILE_NAME), text)
    }

    /// Parse and validate configuration text read from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// a validation error for an invalid product, version, template, module
    /// name, duplicate module, empty module list, or empty command.
    pub fn parse(root: &Utf8Path, source: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source_err| ConfigError::Parse {
            path: source.to_owned(),
            source: source_err,
        })?;
        Self::from_raw(root, raw)
    }

    fn from_raw(root: &Utf8Path, raw: RawConfig) -> Result<Self, ConfigError> {
        let product = validate_product(raw.product)?;
        let version = Version::try_from(raw.version)?;
        let template = match raw.name_template {
            Some(template) => NameTemplate::parse(&template)?,
            None => NameTemplate::for_product(&product, DEFAULT_EXTENSION)?,
        };
        let destination = root.join(
            raw.destination
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DESTINATION)),
        );
        let modules = validate_modules(root, raw.modules)?;

        Ok(Self {
            root: root.to_owned(),
            product,
            version,
            template,
            destination,
            jobs: raw.jobs,
            modules,
        })
    }

    /// Replace the configured version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] if `version` cannot be embedded
    /// in a filename.
    pub fn with_version(mut self, version: &str) -> Result<Self, ConfigError> {
        self.version = Version::try_from(version)?;
        Ok(self)
    }

    /// Replace the configured worker limit.
    #[must_use]
    pub fn with_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The product name.
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    /// The project version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The filename template for the aggregate archive.
    #[must_use]
    pub fn template(&self) -> &NameTemplate {
        &self.template
    }

    /// Absolute publication directory.
    #[must_use]
    pub fn destination(&self) -> &Utf8Path {
        &self.destination
    }

    /// Worker limit, when configured.
    #[must_use]
    pub fn jobs(&self) -> Option<NonZeroUsize> {
        self.jobs
    }

    /// Modules in merge order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    /// References to every module's packaging task, in merge order.
    #[must_use]
    pub fn module_refs(&self) -> Vec<ModuleOutputRef> {
        self.modules.iter().map(ModuleSpec::output_ref).collect()
    }

    /// Publication settings for the aggregation task.
    #[must_use]
    pub fn aggregation_settings(&self) -> AggregationSettings {
        AggregationSettings::new(
            self.destination.clone(),
            self.template.clone(),
            self.version.clone(),
        )
    }
}

fn validate_product(product: String) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidProduct {
        value: product.clone(),
        reason: reason.to_owned(),
    };
    if product.trim().is_empty() {
        return Err(invalid("product name must not be empty"));
    }
    if product.chars().any(char::is_whitespace) {
        return Err(invalid("product name must not contain whitespace"));
    }
    if product.contains(['/', '\\', '$']) {
        return Err(invalid("product name must not contain '/', '\\' or '$'"));
    }
    Ok(product)
}

fn validate_modules(root: &Utf8Path, raw: Vec<RawModule>) -> Result<Vec<ModuleSpec>, ConfigError> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|module| {
            let name = ModuleName::try_from(module.name)?;
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateModule { name });
            }
            let command = module
                .command
                .map(|argv| {
                    PackagingCommand::from_argv(argv).ok_or_else(|| ConfigError::InvalidCommand {
                        module: name.clone(),
                        reason: "command must name a program".to_owned(),
                    })
                })
                .transpose()?;
            Ok(ModuleSpec::new(name, root.join(module.output), command))
        })
        .collect()
}
