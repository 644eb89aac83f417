//! Merge rules: defaults, override order, conflict handling.

use crate::jumpstart::constants::JUMPSTART_DEFAULT_REGION_NAME;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key: defaults, global file,
/// workspace files, then environment.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Ok(Config::builder()
        .set_default("jumpstart.region", JUMPSTART_DEFAULT_REGION_NAME)?
        .set_default("jumpstart.tolerate_vulnerable_model", false)?
        .set_default("jumpstart.tolerate_deprecated_model", false)?)
}
