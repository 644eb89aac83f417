//! JumpStart catalog records.

use crate::error::CatalogError;
use crate::jumpstart::holder::{
    as_object, impl_structural_identity, optional_str, required, required_str, JumpStartDataHolder,
};
use crate::jumpstart::specs::JumpStartModelSpecs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The two kinds of catalog file kept per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpStartS3FileType {
    Manifest,
    Specs,
}

impl JumpStartS3FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JumpStartS3FileType::Manifest => "manifest",
            JumpStartS3FileType::Specs => "specs",
        }
    }
}

impl fmt::Display for JumpStartS3FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JumpStartS3FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(JumpStartS3FileType::Manifest),
            "specs" => Ok(JumpStartS3FileType::Specs),
            other => Err(format!("unknown JumpStart file type '{}'", other)),
        }
    }
}

/// Which artifact of a model is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelScope {
    Inference,
    Training,
}

impl fmt::Display for ModelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelScope::Inference => f.write_str("inference"),
            ModelScope::Training => f.write_str("training"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JumpStartLaunchedRegionInfo {
    pub content_bucket: String,
    pub region_name: String,
}

impl JumpStartDataHolder for JumpStartLaunchedRegionInfo {
    const TYPE_NAME: &'static str = "JumpStartLaunchedRegionInfo";
    const FIELDS: &'static [&'static str] = &["content_bucket", "region_name"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            content_bucket: required_str(Self::TYPE_NAME, object, "content_bucket")?,
            region_name: required_str(Self::TYPE_NAME, object, "region_name")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("content_bucket".into(), self.content_bucket.clone().into());
        json.insert("region_name".into(), self.region_name.clone().into());
        json
    }
}

/// One manifest entry pointing at a model version's spec file.
#[derive(Debug, Clone)]
pub struct JumpStartModelHeader {
    pub model_id: String,
    pub version: String,
    pub min_version: String,
    pub spec_key: String,
}

impl JumpStartModelHeader {
    pub fn versioned_id(&self) -> JumpStartVersionedModelId {
        JumpStartVersionedModelId::new(&self.model_id, &self.version)
    }
}

impl JumpStartDataHolder for JumpStartModelHeader {
    const TYPE_NAME: &'static str = "JumpStartModelHeader";
    const FIELDS: &'static [&'static str] = &["model_id", "version", "min_version", "spec_key"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            model_id: required_str(Self::TYPE_NAME, object, "model_id")?,
            version: required_str(Self::TYPE_NAME, object, "version")?,
            min_version: required_str(Self::TYPE_NAME, object, "min_version")?,
            spec_key: required_str(Self::TYPE_NAME, object, "spec_key")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("model_id".into(), self.model_id.clone().into());
        json.insert("version".into(), self.version.clone().into());
        json.insert("min_version".into(), self.min_version.clone().into());
        json.insert("spec_key".into(), self.spec_key.clone().into());
        json
    }
}

/// Container image coordinates for hosting or training.
#[derive(Debug, Clone)]
pub struct JumpStartECRSpecs {
    pub framework: String,
    pub framework_version: String,
    pub py_version: String,
}

impl JumpStartDataHolder for JumpStartECRSpecs {
    const TYPE_NAME: &'static str = "JumpStartECRSpecs";
    const FIELDS: &'static [&'static str] = &["framework", "framework_version", "py_version"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            framework: required_str(Self::TYPE_NAME, object, "framework")?,
            framework_version: required_str(Self::TYPE_NAME, object, "framework_version")?,
            py_version: required_str(Self::TYPE_NAME, object, "py_version")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("framework".into(), self.framework.clone().into());
        json.insert("framework_version".into(), self.framework_version.clone().into());
        json.insert("py_version".into(), self.py_version.clone().into());
        json
    }
}

#[derive(Debug, Clone)]
pub struct JumpStartVersionedModelId {
    pub model_id: String,
    pub version: String,
}

impl JumpStartVersionedModelId {
    pub fn new(model_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            version: version.into(),
        }
    }
}

impl JumpStartDataHolder for JumpStartVersionedModelId {
    const TYPE_NAME: &'static str = "JumpStartVersionedModelId";
    const FIELDS: &'static [&'static str] = &["model_id", "version"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            model_id: required_str(Self::TYPE_NAME, object, "model_id")?,
            version: required_str(Self::TYPE_NAME, object, "version")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("model_id".into(), self.model_id.clone().into());
        json.insert("version".into(), self.version.clone().into());
        json
    }
}

/// Cache key for one catalog file.
#[derive(Debug, Clone)]
pub struct JumpStartCachedS3ContentKey {
    pub file_type: JumpStartS3FileType,
    pub s3_key: String,
}

impl JumpStartCachedS3ContentKey {
    pub fn new(file_type: JumpStartS3FileType, s3_key: impl Into<String>) -> Self {
        Self {
            file_type,
            s3_key: s3_key.into(),
        }
    }
}

impl JumpStartDataHolder for JumpStartCachedS3ContentKey {
    const TYPE_NAME: &'static str = "JumpStartCachedS3ContentKey";
    const FIELDS: &'static [&'static str] = &["file_type", "s3_key"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        let file_type = required_str(Self::TYPE_NAME, object, "file_type")?
            .parse::<JumpStartS3FileType>()
            .map_err(|message| CatalogError::InvalidField {
                type_name: Self::TYPE_NAME,
                field: "file_type".to_string(),
                message,
            })?;
        Ok(Self {
            file_type,
            s3_key: required_str(Self::TYPE_NAME, object, "s3_key")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("file_type".into(), self.file_type.as_str().into());
        json.insert("s3_key".into(), self.s3_key.clone().into());
        json
    }
}

/// Parsed content of a cached catalog file.
///
/// A spec file describes one model version, so `Specs` holds one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedContent {
    Manifest(HashMap<JumpStartVersionedModelId, JumpStartModelHeader>),
    Specs(Box<JumpStartModelSpecs>),
}

impl FormattedContent {
    /// Index manifest headers by their versioned id.
    pub fn manifest_from_headers(headers: impl IntoIterator<Item = JumpStartModelHeader>) -> Self {
        FormattedContent::Manifest(
            headers
                .into_iter()
                .map(|header| (header.versioned_id(), header))
                .collect(),
        )
    }

    /// A manifest is a JSON list of headers; specs are a JSON object.
    pub fn from_json(json: &Value) -> Result<Self, CatalogError> {
        match json {
            Value::Array(entries) => {
                let headers = entries
                    .iter()
                    .map(JumpStartModelHeader::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::manifest_from_headers(headers))
            }
            other => Ok(FormattedContent::Specs(Box::new(
                JumpStartModelSpecs::from_json(other)?,
            ))),
        }
    }

    /// Manifest headers are listed sorted by model id, then version.
    pub fn to_json(&self) -> Value {
        match self {
            FormattedContent::Manifest(headers) => {
                let mut sorted: Vec<&JumpStartModelHeader> = headers.values().collect();
                sorted.sort_by(|a, b| (&a.model_id, &a.version).cmp(&(&b.model_id, &b.version)));
                Value::Array(
                    sorted
                        .into_iter()
                        .map(|header| Value::Object(header.to_json()))
                        .collect(),
                )
            }
            FormattedContent::Specs(specs) => Value::Object(specs.to_json()),
        }
    }
}

/// Cached catalog file content with its checksum.
#[derive(Debug, Clone)]
pub struct JumpStartCachedS3ContentValue {
    pub formatted_content: FormattedContent,
    pub md5_hash: Option<String>,
}

impl JumpStartCachedS3ContentValue {
    pub fn manifest(&self) -> Result<&HashMap<JumpStartVersionedModelId, JumpStartModelHeader>, CatalogError> {
        match &self.formatted_content {
            FormattedContent::Manifest(headers) => Ok(headers),
            FormattedContent::Specs(_) => Err(CatalogError::TypeMismatch(
                "cached content holds model specs, not a manifest".to_string(),
            )),
        }
    }

    pub fn specs(&self) -> Result<&JumpStartModelSpecs, CatalogError> {
        match &self.formatted_content {
            FormattedContent::Specs(specs) => Ok(specs),
            FormattedContent::Manifest(_) => Err(CatalogError::TypeMismatch(
                "cached content holds a manifest, not model specs".to_string(),
            )),
        }
    }
}

impl JumpStartDataHolder for JumpStartCachedS3ContentValue {
    const TYPE_NAME: &'static str = "JumpStartCachedS3ContentValue";
    const FIELDS: &'static [&'static str] = &["formatted_content", "md5_hash"];

    fn from_json(json: &Value) -> Result<Self, CatalogError> {
        let object = as_object(Self::TYPE_NAME, json)?;
        Ok(Self {
            formatted_content: FormattedContent::from_json(required(
                Self::TYPE_NAME,
                object,
                "formatted_content",
            )?)?,
            md5_hash: optional_str(Self::TYPE_NAME, object, "md5_hash")?,
        })
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert("formatted_content".into(), self.formatted_content.to_json());
        json.insert(
            "md5_hash".into(),
            self.md5_hash.clone().map_or(Value::Null, Value::String),
        );
        json
    }
}

impl_structural_identity!(
    JumpStartLaunchedRegionInfo,
    JumpStartModelHeader,
    JumpStartECRSpecs,
    JumpStartVersionedModelId,
    JumpStartCachedS3ContentKey,
    JumpStartCachedS3ContentValue,
);
