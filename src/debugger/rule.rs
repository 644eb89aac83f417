//! Debugger rules: built-in ("sagemaker") and custom rule factories.

use crate::debugger::builtin::DebugRuleBaseConfig;
use crate::debugger::collection::CollectionConfig;
use crate::debugger::parameters::{
    merge_rule_parameters, other_trial_parameters, RuleParameters, KEY_RULE_TO_INVOKE,
};
use crate::error::RuleError;
use serde::Serialize;
use tracing::debug;

/// Image placeholder the job-submission service swaps for its own rule evaluator.
pub const DEFAULT_RULE_EVALUATOR_IMAGE: &str = "DEFAULT_RULE_EVALUATOR_IMAGE";

/// Attributes shared by debugger and profiler rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    pub name: String,
    pub image_uri: String,
    /// Left unset for built-in rules; the execution environment picks a default.
    pub instance_type: Option<String>,
    pub container_local_output_path: Option<String>,
    pub s3_output_path: Option<String>,
    pub volume_size_in_gb: Option<u32>,
    pub rule_parameters: RuleParameters,
}

/// Rule configuration request fragment.
///
/// `P` is the parameter representation: raw values for debugger rules, text
/// for profiler rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConfigRequest<P> {
    #[serde(rename = "RuleConfigurationName")]
    pub rule_configuration_name: String,

    #[serde(rename = "RuleEvaluatorImage")]
    pub rule_evaluator_image: String,

    #[serde(rename = "InstanceType", skip_serializing_if = "is_blank")]
    pub instance_type: Option<String>,

    #[serde(rename = "VolumeSizeInGB", skip_serializing_if = "is_unset_volume")]
    pub volume_size_in_gb: Option<u32>,

    #[serde(rename = "LocalPath", skip_serializing_if = "is_blank")]
    pub local_path: Option<String>,

    #[serde(rename = "S3OutputPath", skip_serializing_if = "is_blank")]
    pub s3_output_path: Option<String>,

    #[serde(rename = "RuleParameters", skip_serializing_if = "Option::is_none")]
    pub rule_parameters: Option<P>,
}

// Empty text and a zero volume are left out like absent values
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_unset_volume(value: &Option<u32>) -> bool {
    value.map_or(true, |size| size == 0)
}

impl RuleBase {
    /// Build the request fragment, mapping non-empty parameters through `render`.
    pub(crate) fn to_request<P>(&self, render: impl FnOnce(&RuleParameters) -> P) -> RuleConfigRequest<P> {
        RuleConfigRequest {
            rule_configuration_name: self.name.clone(),
            rule_evaluator_image: self.image_uri.clone(),
            instance_type: self.instance_type.clone(),
            volume_size_in_gb: self.volume_size_in_gb,
            local_path: self.container_local_output_path.clone(),
            s3_output_path: self.s3_output_path.clone(),
            rule_parameters: if self.rule_parameters.is_empty() {
                None
            } else {
                Some(render(&self.rule_parameters))
            },
        }
    }
}

pub(crate) fn to_json_value<T: Serialize>(request: &T) -> serde_json::Value {
    // Request fragments hold only strings, integers, floats and bools
    serde_json::to_value(request).unwrap_or(serde_json::Value::Null)
}

/// Options for [`Rule::sagemaker`]; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct SagemakerRuleOptions {
    pub name: Option<String>,
    pub container_local_output_path: Option<String>,
    pub s3_output_path: Option<String>,
    pub other_trials_s3_input_paths: Option<Vec<String>>,
    pub rule_parameters: Option<RuleParameters>,
    pub collections_to_save: Option<Vec<CollectionConfig>>,
}

/// Options for [`Rule::custom`].
#[derive(Debug, Clone)]
pub struct CustomRuleOptions {
    pub name: String,
    pub image_uri: String,
    pub instance_type: String,
    pub volume_size_in_gb: u32,
    pub source: Option<String>,
    pub rule_to_invoke: Option<String>,
    pub container_local_output_path: Option<String>,
    pub s3_output_path: Option<String>,
    pub other_trials_s3_input_paths: Option<Vec<String>>,
    pub rule_parameters: Option<RuleParameters>,
    pub collections_to_save: Option<Vec<CollectionConfig>>,
}

impl CustomRuleOptions {
    pub fn new(
        name: impl Into<String>,
        image_uri: impl Into<String>,
        instance_type: impl Into<String>,
        volume_size_in_gb: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_uri: image_uri.into(),
            instance_type: instance_type.into(),
            volume_size_in_gb,
            source: None,
            rule_to_invoke: None,
            container_local_output_path: None,
            s3_output_path: None,
            other_trials_s3_input_paths: None,
            rule_parameters: None,
            collections_to_save: None,
        }
    }
}

/// A debugging rule evaluated against the tensors a training job emits.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub base: RuleBase,
    pub collection_configs: Vec<CollectionConfig>,
}

impl Rule {
    /// Configure a built-in rule from its base configuration.
    ///
    /// Parameter precedence (lowest to highest): `other_trial_<n>` entries,
    /// the base config's defaults, then caller `rule_parameters`.
    pub fn sagemaker(
        base_config: &DebugRuleBaseConfig,
        options: SagemakerRuleOptions,
    ) -> Result<Self, RuleError> {
        if let Some(parameters) = &options.rule_parameters {
            if parameters.contains_key(KEY_RULE_TO_INVOKE) {
                return Err(RuleError::ConfigurationConflict(
                    "You cannot provide a 'rule_to_invoke' for SageMaker rules.".to_string(),
                ));
            }
        }

        let mut merged = options
            .other_trials_s3_input_paths
            .as_deref()
            .map(other_trial_parameters)
            .unwrap_or_default();
        merged.extend(base_config.default_parameters());
        if let Some(parameters) = options.rule_parameters {
            merged.extend(parameters);
        }

        // An empty list or name counts as not given
        let collection_configs = options
            .collections_to_save
            .filter(|collections| !collections.is_empty())
            .unwrap_or_else(|| base_config.collections());

        let name = options
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| base_config.rule_name().to_string());

        debug!(
            rule = %name,
            parameters = merged.len(),
            collections = collection_configs.len(),
            "Configured built-in debugger rule"
        );

        Ok(Self {
            base: RuleBase {
                name,
                image_uri: DEFAULT_RULE_EVALUATOR_IMAGE.to_string(),
                instance_type: None,
                container_local_output_path: options.container_local_output_path,
                s3_output_path: options.s3_output_path,
                volume_size_in_gb: None,
                rule_parameters: merged,
            },
            collection_configs,
        })
    }

    /// Configure a rule that runs in a caller-provided evaluator image.
    pub fn custom(options: CustomRuleOptions) -> Result<Self, RuleError> {
        let mut merged = options
            .other_trials_s3_input_paths
            .as_deref()
            .map(other_trial_parameters)
            .unwrap_or_default();
        merged.extend(merge_rule_parameters(
            options.source.as_deref(),
            options.rule_to_invoke.as_deref(),
            options.rule_parameters.as_ref(),
        )?);

        debug!(rule = %options.name, image = %options.image_uri, "Configured custom debugger rule");

        Ok(Self {
            base: RuleBase {
                name: options.name,
                image_uri: options.image_uri,
                instance_type: Some(options.instance_type),
                container_local_output_path: options.container_local_output_path,
                s3_output_path: options.s3_output_path,
                volume_size_in_gb: Some(options.volume_size_in_gb),
                rule_parameters: merged,
            },
            collection_configs: options.collections_to_save.unwrap_or_default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn rule_parameters(&self) -> &RuleParameters {
        &self.base.rule_parameters
    }

    pub fn to_debugger_rule_config_request(&self) -> RuleConfigRequest<RuleParameters> {
        self.base.to_request(RuleParameters::clone)
    }

    /// Request fragment with parameter values left as they are.
    pub fn to_debugger_rule_config_dict(&self) -> serde_json::Value {
        to_json_value(&self.to_debugger_rule_config_request())
    }
}
