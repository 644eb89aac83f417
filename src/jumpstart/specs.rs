//! Full metadata record for one catalog model version.

use crate::error::CatalogError;
use crate::jumpstart::holder::{
    as_object, impl_structural_identity, optional_object, required, required_bool, required_str,
    JumpStartDataHolder,
};
use crate::jumpstart::types::{JumpStartECRSpecs, JumpStartVersionedModelId};
use serde_json::{Map, Value};

const TRAINING_FIELDS: [&str; 4] = [
    "training_ecr_specs",
    "training_artifact_key",
    "training_script_key",
    "hyperparameters",
];

/// Training attributes of a model, present only when training is supported.
#[derive(Debug, Clone, PartialEq)]
pub enum Training {
    Supported {
        ecr_specs: JumpStartECRSpecs,
        artifact_key: String,
        script_key: String,
        hyperparameters: Option<Map<String, Value>>,
    },
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct JumpStartModelSpecs {
    pub model_id: String,
    pub version: String,
    pub min_sdk_version: String,
    pub incremental_training_supported: bool,
    pub hosting_ecr_specs: JumpStartECRSpecs,
    pub hosting_artifact_key: String,
    pub hosting_script_key: String,
    pub training: Training,
}

impl JumpStartModelSpecs {
    pub fn versioned_id(&self) -> JumpStartVersionedModelId {
        JumpStartVersionedModelId::new(&self.model_id, &self.version)
    }

    pub fn training_supported(&self) -> bool {
        matches!(self.training, Training::Supported { .. })
    }

    pub fn training_ecr_specs(&self) -> Option<&JumpStartECRSpecs> {
        match &self.training {
            Training::Supported { ecr_specs, .. } => Some(ecr_specs),
            Training::Unsupported => None,
        }
    }

    pub fn training_artifact_key(&self) -> Option<&str> {
        match &self.training {
            Training::Supported { artifact_key, .. } => Some(artifact_key),
            Training::Unsupported => None,
        }
    }

    pub fn training_script_key(&self) -> Option<&str> {
        match &self.training {
            Training::Supported { script_key, .. } => Some(script_key),
            Training::Unsupported => None,
        }
    }

    pub fn hyperparameters(&self) -> Option<&Map<String, Value>> {
        match &self.training {
            Training::Supported {
                hyperparameters, ..
            } => hyperparameters.as_ref(),
            Training::Unsupported => None,
        }
    }

    fn training_from_json(object: &Map<String, Value>) -> Result<Training, CatalogError> {
        if !required_bool(Self::TYPE_NAME, object, "training_supported")? {
            return Ok(Training::Unsupported);
        }

        Ok(Training::Supported {
            ecr_specs: JumpStartECRSpecs::from_json(required(
                Self::TYPE_NAME,
                object,
                "training_ecr_specs",
            )?)?,
            artifact_key: required_str(Self::TYPE_NAME, object, "training_artifact_key")?,
            script_key: required_str(Self::TYPE_NAME, object, "training_script_key")?,
            hyperparameters: optional_object(Self::TYPE_NAME, object, "hyperparameters")?,
        })
    }
}

impl JumpStartDataHolder for JumpStartModelSpecs {
    const TYPE_NAME: &'static str = "JumpStartModelSpecs";
    const FIELDS: &'static [&'static str] = &[
        "model_id",
        "version",
        "min_sdk_version",
        "incremental_training_supported",
        "hosting_ecr_specs",
        "hosting_artifact_key",
        "hosting_script_key",
        "training_supported",
        "training_ecr_specs",
        "training_artifact_key",
        "training_script_key",
        "hyperparameters",
    ];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            model_id: required_str(Self::TYPE_NAME, object, "model_id")?,
            version: required_str(Self::TYPE_NAME, object, "version")?,
            min_sdk_version: required_str(Self::TYPE_NAME, object, "min_sdk_version")?,
            incremental_training_supported: required_bool(
                Self::TYPE_NAME,
                object,
                "incremental_training_supported",
            )?,
            hosting_ecr_specs: JumpStartECRSpecs::from_json(required(
                Self::TYPE_NAME,
                object,
                "hosting_ecr_specs",
            )?)?,
            hosting_artifact_key: required_str(Self::TYPE_NAME, object, "hosting_artifact_key")?,
            hosting_script_key: required_str(Self::TYPE_NAME, object, "hosting_script_key")?,
            training: Self::training_from_json(object)?,
        })
    }

    /// Nested ECR specs are written as objects; unsupported training writes explicit nulls.
    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("model_id".into(), self.model_id.clone().into());
        json.insert("version".into(), self.version.clone().into());
        json.insert("min_sdk_version".into(), self.min_sdk_version.clone().into());
        json.insert(
            "incremental_training_supported".into(),
            self.incremental_training_supported.into(),
        );
        json.insert(
            "hosting_ecr_specs".into(),
            Value::Object(self.hosting_ecr_specs.to_json()),
        );
        json.insert("hosting_artifact_key".into(), self.hosting_artifact_key.clone().into());
        json.insert("hosting_script_key".into(), self.hosting_script_key.clone().into());
        json.insert("training_supported".into(), self.training_supported().into());

        match &self.training {
            Training::Supported {
                ecr_specs,
                artifact_key,
                script_key,
                hyperparameters,
            } => {
                json.insert("training_ecr_specs".into(), Value::Object(ecr_specs.to_json()));
                json.insert("training_artifact_key".into(), artifact_key.clone().into());
                json.insert("training_script_key".into(), script_key.clone().into());
                json.insert(
                    "hyperparameters".into(),
                    hyperparameters.clone().map_or(Value::Null, Value::Object),
                );
            }
            Training::Unsupported => {
                for field in TRAINING_FIELDS {
                    json.insert(field.into(), Value::Null);
                }
            }
        }
        json
    }
}

impl_structural_identity!(JumpStartModelSpecs);
