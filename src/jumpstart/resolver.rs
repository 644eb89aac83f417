//! Artifact resolution: the collaborator `retrieve` delegates to.

use crate::error::{CatalogError, ResolverError};
use crate::jumpstart::constants::region_info;
use crate::jumpstart::holder::{as_object, required, JumpStartDataHolder};
use crate::jumpstart::specs::JumpStartModelSpecs;
use crate::jumpstart::types::{JumpStartVersionedModelId, ModelScope};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

const LATEST_VERSION: &str = "*";

/// Everything a resolver needs to locate one model artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactRequest<'a> {
    pub model_id: &'a str,
    pub model_version: &'a str,
    pub model_scope: Option<ModelScope>,
    pub region: &'a str,
    pub tolerate_vulnerable_model: bool,
    pub tolerate_deprecated_model: bool,
}

/// Resolves a model id/version to the S3 URI of its artifact.
pub trait ArtifactResolver {
    fn resolve_model_uri(&self, request: &ArtifactRequest<'_>) -> Result<String, ResolverError>;
}

/// Resolver over an in-memory catalog of model specs.
#[derive(Debug, Clone, Default)]
pub struct StaticArtifactResolver {
    specs: HashMap<JumpStartVersionedModelId, JumpStartModelSpecs>,
    vulnerable: HashMap<JumpStartVersionedModelId, Vec<String>>,
    deprecated: HashSet<JumpStartVersionedModelId>,
}

impl StaticArtifactResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, specs: JumpStartModelSpecs) {
        self.specs.insert(specs.versioned_id(), specs);
    }

    pub fn mark_vulnerable(&mut self, id: JumpStartVersionedModelId, dependencies: Vec<String>) {
        self.vulnerable.insert(id, dependencies);
    }

    pub fn mark_deprecated(&mut self, id: JumpStartVersionedModelId) {
        self.deprecated.insert(id);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Build from a catalog document:
    ///
    /// `{"specs": [...], "vulnerable": [{"model_id", "version", "dependencies"}], "deprecated": [{"model_id", "version"}]}`
    ///
    /// Only `specs` is required.
    pub fn from_catalog_json(json: &Value) -> Result<Self, CatalogError> {
        const TYPE_NAME: &str = "StaticArtifactResolver";
        let object = as_object(TYPE_NAME, json)?;
        let mut resolver = Self::new();

        for entry in array(TYPE_NAME, required(TYPE_NAME, object, "specs")?, "specs")? {
            resolver.insert(JumpStartModelSpecs::from_json(entry)?);
        }

        if let Some(entries) = object.get("vulnerable") {
            for entry in array(TYPE_NAME, entries, "vulnerable")? {
                let id = JumpStartVersionedModelId::from_json(entry)?;
                let dependencies = match entry.get("dependencies") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(deps) => string_list(TYPE_NAME, deps, "dependencies")?,
                };
                resolver.mark_vulnerable(id, dependencies);
            }
        }

        if let Some(entries) = object.get("deprecated") {
            for entry in array(TYPE_NAME, entries, "deprecated")? {
                resolver.mark_deprecated(JumpStartVersionedModelId::from_json(entry)?);
            }
        }

        debug!(models = resolver.len(), "Loaded static JumpStart catalog");
        Ok(resolver)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        let json: Value = serde_json::from_str(&contents)?;
        Self::from_catalog_json(&json)
    }

    fn lookup(&self, model_id: &str, version: &str) -> Option<&JumpStartModelSpecs> {
        if version == LATEST_VERSION {
            return self
                .specs
                .values()
                .filter(|specs| specs.model_id == model_id)
                .max_by(|a, b| compare_versions(&a.version, &b.version));
        }
        self.specs
            .get(&JumpStartVersionedModelId::new(model_id, version))
    }
}

fn array<'a>(
    type_name: &'static str,
    value: &'a Value,
    field: &str,
) -> Result<&'a Vec<Value>, CatalogError> {
    value.as_array().ok_or_else(|| CatalogError::InvalidField {
        type_name,
        field: field.to_string(),
        message: "expected a list".to_string(),
    })
}

fn string_list(
    type_name: &'static str,
    value: &Value,
    field: &str,
) -> Result<Vec<String>, CatalogError> {
    array(type_name, value, field)?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CatalogError::InvalidField {
                    type_name,
                    field: field.to_string(),
                    message: format!("expected a list of strings, found {}", item),
                })
        })
        .collect()
}

/// Dotted numeric comparison; non-numeric components compare as text.
fn compare_versions(left: &str, right: &str) -> Ordering {
    let mut left_parts = left.split('.');
    let mut right_parts = right.split('.');
    loop {
        match (left_parts.next(), right_parts.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some(l), Some(r)) => {
                let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

impl ArtifactResolver for StaticArtifactResolver {
    fn resolve_model_uri(&self, request: &ArtifactRequest<'_>) -> Result<String, ResolverError> {
        let scope = request.model_scope.ok_or(ResolverError::MissingScope)?;
        let region = region_info(request.region)
            .ok_or_else(|| ResolverError::RegionNotLaunched(request.region.to_string()))?;

        let specs = self
            .lookup(request.model_id, request.model_version)
            .ok_or_else(|| ResolverError::ModelNotFound {
                model_id: request.model_id.to_string(),
                version: request.model_version.to_string(),
            })?;
        let id = specs.versioned_id();

        if let Some(dependencies) = self.vulnerable.get(&id) {
            if !request.tolerate_vulnerable_model {
                return Err(ResolverError::VulnerableModel {
                    model_id: id.model_id,
                    version: id.version,
                    dependencies: dependencies.clone(),
                });
            }
            warn!(model_id = %id.model_id, version = %id.version, "Using model with vulnerable dependencies");
        }

        if self.deprecated.contains(&id) {
            if !request.tolerate_deprecated_model {
                return Err(ResolverError::DeprecatedModel {
                    model_id: id.model_id,
                    version: id.version,
                });
            }
            warn!(model_id = %id.model_id, version = %id.version, "Using deprecated model");
        }

        let artifact_key = match scope {
            ModelScope::Inference => specs.hosting_artifact_key.as_str(),
            ModelScope::Training => {
                specs
                    .training_artifact_key()
                    .ok_or_else(|| ResolverError::UnsupportedScope {
                        model_id: id.model_id.clone(),
                        scope: scope.to_string(),
                    })?
            }
        };

        Ok(format!("s3://{}/{}", region.content_bucket, artifact_key))
    }
}
