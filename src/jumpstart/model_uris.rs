//! Model artifact URI retrieval.

use crate::config::JumpStartSettings;
use crate::error::CatalogError;
use crate::jumpstart::constants::JUMPSTART_DEFAULT_REGION_NAME;
use crate::jumpstart::resolver::{ArtifactRequest, ArtifactResolver};
use crate::jumpstart::types::ModelScope;
use tracing::debug;

/// Arguments to [`retrieve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelUriQuery {
    pub region: Option<String>,
    pub model_id: Option<String>,
    pub model_version: Option<String>,
    pub model_scope: Option<ModelScope>,
    pub tolerate_vulnerable_model: bool,
    pub tolerate_deprecated_model: bool,
}

impl ModelUriQuery {
    pub fn new(model_id: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            model_id: Some(model_id.into()),
            model_version: Some(model_version.into()),
            ..Self::default()
        }
    }

    /// A query seeded with the configured region and tolerance flags.
    pub fn from_settings(settings: &JumpStartSettings) -> Self {
        Self {
            region: Some(settings.region.clone()),
            tolerate_vulnerable_model: settings.tolerate_vulnerable_model,
            tolerate_deprecated_model: settings.tolerate_deprecated_model,
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: ModelScope) -> Self {
        self.model_scope = Some(scope);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

fn is_well_formed(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

fn missing_model_input() -> CatalogError {
    CatalogError::InvalidArgument(
        "Must specify `model_id` and `model_version` when retrieving model URIs.".to_string(),
    )
}

/// Whether the arguments name a JumpStart model.
///
/// Neither given is `false`; both given and well formed is `true`; anything
/// else is an `InvalidArgument`.
pub fn is_jumpstart_model_input(
    model_id: Option<&str>,
    model_version: Option<&str>,
) -> Result<bool, CatalogError> {
    match (model_id, model_version) {
        (None, None) => Ok(false),
        (Some(model_id), Some(model_version))
            if is_well_formed(model_id) && is_well_formed(model_version) =>
        {
            Ok(true)
        }
        _ => Err(missing_model_input()),
    }
}

/// Resolve the S3 URI of a model's artifact.
///
/// Errors from the resolver are returned unchanged inside
/// [`CatalogError::Resolver`].
pub fn retrieve<R: ArtifactResolver + ?Sized>(
    resolver: &R,
    query: &ModelUriQuery,
) -> Result<String, CatalogError> {
    let (model_id, model_version) = match (query.model_id.as_deref(), query.model_version.as_deref()) {
        (Some(model_id), Some(model_version))
            if is_well_formed(model_id) && is_well_formed(model_version) =>
        {
            (model_id, model_version)
        }
        _ => return Err(missing_model_input()),
    };

    let region = query
        .region
        .as_deref()
        .unwrap_or(JUMPSTART_DEFAULT_REGION_NAME);

    let request = ArtifactRequest {
        model_id,
        model_version,
        model_scope: query.model_scope,
        region,
        tolerate_vulnerable_model: query.tolerate_vulnerable_model,
        tolerate_deprecated_model: query.tolerate_deprecated_model,
    };
    debug!(model_id, model_version, region, "Retrieving JumpStart model URI");

    Ok(resolver.resolve_model_uri(&request)?)
}
