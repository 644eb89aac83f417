//! Debugger hook and TensorBoard output configuration.

use crate::debugger::collection::CollectionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the training container's debugger hook writes tensors, and what it saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebuggerHookConfig {
    #[serde(rename = "S3OutputPath", skip_serializing_if = "Option::is_none")]
    pub s3_output_path: Option<String>,

    #[serde(rename = "LocalPath", skip_serializing_if = "Option::is_none")]
    pub container_local_output_path: Option<String>,

    #[serde(rename = "HookParameters", skip_serializing_if = "Option::is_none")]
    pub hook_parameters: Option<BTreeMap<String, String>>,

    #[serde(
        rename = "CollectionConfigurations",
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_configs: Option<Vec<CollectionConfig>>,
}

impl DebuggerHookConfig {
    pub fn new(s3_output_path: impl Into<String>) -> Self {
        Self {
            s3_output_path: Some(s3_output_path.into()),
            ..Self::default()
        }
    }

    /// Request fragment; unset fields are left out entirely.
    pub fn to_request_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Where TensorBoard-compatible output is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorBoardOutputConfig {
    #[serde(rename = "S3OutputPath", skip_serializing_if = "Option::is_none")]
    pub s3_output_path: Option<String>,

    #[serde(rename = "LocalPath", skip_serializing_if = "Option::is_none")]
    pub container_local_output_path: Option<String>,
}

impl TensorBoardOutputConfig {
    pub fn new(s3_output_path: impl Into<String>) -> Self {
        Self {
            s3_output_path: Some(s3_output_path.into()),
            container_local_output_path: None,
        }
    }

    pub fn to_request_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
