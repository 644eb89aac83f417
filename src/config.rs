//! Configuration System
//!
//! Layered SDK settings: built-in defaults, the global settings file, the
//! workspace settings files, then `SMCONFIG__*` environment variables.

use crate::error::SettingsError;
use crate::jumpstart::constants::{region_info, JUMPSTART_DEFAULT_REGION_NAME};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SdkSettings {
    #[serde(default)]
    pub jumpstart: JumpStartSettings,

    #[serde(default)]
    pub debugger: DebuggerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to model URI retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpStartSettings {
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub tolerate_vulnerable_model: bool,

    #[serde(default)]
    pub tolerate_deprecated_model: bool,

    /// Catalog document used by the static resolver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_region() -> String {
    JUMPSTART_DEFAULT_REGION_NAME.to_string()
}

impl Default for JumpStartSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            tolerate_vulnerable_model: false,
            tolerate_deprecated_model: false,
            catalog_path: None,
        }
    }
}

/// Output locations applied to rules that do not set their own
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_output_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_local_output_path: Option<String>,
}

impl JumpStartSettings {
    pub fn validate(&self) -> Result<(), String> {
        if region_info(&self.region).is_none() {
            return Err(format!("JumpStart is not launched in region '{}'", self.region));
        }
        Ok(())
    }
}

impl DebuggerSettings {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.s3_output_path {
            if !path.starts_with("s3://") {
                return Err(format!("s3_output_path must be an s3:// URI, got '{}'", path));
            }
        }
        Ok(())
    }
}

impl SdkSettings {
    /// Validate every section, collecting all failures.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = [
            self.jumpstart.validate().map_err(|e| format!("jumpstart: {}", e)),
            self.debugger.validate().map_err(|e| format!("debugger: {}", e)),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the effective settings as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config(e.to_string()))
    }
}

/// Loads [`SdkSettings`] from the layered sources.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load and validate settings for a workspace.
    pub fn load(workspace_root: &Path) -> Result<SdkSettings, SettingsError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::environment::add_to_builder(builder);

        let settings: SdkSettings = builder.build()?.try_deserialize()?;
        Self::validated(settings)
    }

    /// Load settings from a single file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<SdkSettings, SettingsError> {
        let settings: SdkSettings = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        Self::validated(settings)
    }

    fn validated(settings: SdkSettings) -> Result<SdkSettings, SettingsError> {
        settings
            .validate()
            .map_err(|errors| SettingsError::Validation(errors.join("\n")))?;
        debug!(region = %settings.jumpstart.region, "Loaded settings");
        Ok(settings)
    }
}
