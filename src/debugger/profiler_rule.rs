//! Profiler rules, evaluated against system and framework metrics.

use crate::debugger::builtin::{profiler_report, ProfilerRuleBase};
use crate::debugger::parameters::{merge_rule_parameters, stringify_parameters, RuleParameters};
use crate::debugger::rule::{to_json_value, RuleBase, RuleConfigRequest, DEFAULT_RULE_EVALUATOR_IMAGE};
use crate::error::RuleError;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct SagemakerProfilerRuleOptions {
    pub name: Option<String>,
    pub container_local_output_path: Option<String>,
    pub s3_output_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CustomProfilerRuleOptions {
    pub name: String,
    pub image_uri: String,
    pub instance_type: String,
    pub volume_size_in_gb: u32,
    pub source: Option<String>,
    pub rule_to_invoke: Option<String>,
    pub container_local_output_path: Option<String>,
    pub s3_output_path: Option<String>,
    pub rule_parameters: Option<RuleParameters>,
}

impl CustomProfilerRuleOptions {
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
            rule_parameters: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilerRule {
    pub base: RuleBase,
}

impl ProfilerRule {
    /// Configure a built-in profiler rule; parameters come from the base rule as-is.
    pub fn sagemaker(base_config: &ProfilerRuleBase, options: SagemakerProfilerRuleOptions) -> Self {
        let name = options
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| base_config.rule_name.clone());
        debug!(rule = %name, "Configured built-in profiler rule");

        Self {
            base: RuleBase {
                name,
                image_uri: DEFAULT_RULE_EVALUATOR_IMAGE.to_string(),
                instance_type: None,
                container_local_output_path: options.container_local_output_path,
                s3_output_path: options.s3_output_path,
                volume_size_in_gb: None,
                rule_parameters: base_config.rule_parameters.clone(),
            },
        }
    }

    pub fn custom(options: CustomProfilerRuleOptions) -> Result<Self, RuleError> {
        let rule_parameters = merge_rule_parameters(
            options.source.as_deref(),
            options.rule_to_invoke.as_deref(),
            options.rule_parameters.as_ref(),
        )?;
        debug!(rule = %options.name, image = %options.image_uri, "Configured custom profiler rule");

        Ok(Self {
            base: RuleBase {
                name: options.name,
                image_uri: options.image_uri,
                instance_type: Some(options.instance_type),
                container_local_output_path: options.container_local_output_path,
                s3_output_path: options.s3_output_path,
                volume_size_in_gb: Some(options.volume_size_in_gb),
                rule_parameters,
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn rule_parameters(&self) -> &RuleParameters {
        &self.base.rule_parameters
    }

    pub fn to_profiler_rule_config_request(&self) -> RuleConfigRequest<BTreeMap<String, String>> {
        self.base.to_request(stringify_parameters)
    }

    /// Request fragment; the profiling API only accepts text parameter values.
    pub fn to_profiler_rule_config_dict(&self) -> serde_json::Value {
        to_json_value(&self.to_profiler_rule_config_request())
    }
}

/// The profiler rule attached to a training job when the caller sets none:
/// `ProfilerReport` named `ProfilerReport-<unix seconds>`.
pub fn default_profiler_rule() -> Result<ProfilerRule, RuleError> {
    default_profiler_rule_at(now_seconds())
}

pub fn default_profiler_rule_at(unix_seconds: u64) -> Result<ProfilerRule, RuleError> {
    let base = profiler_report()?;
    let options = SagemakerProfilerRuleOptions {
        name: Some(format!("{}-{}", base.rule_name, unix_seconds)),
        ..SagemakerProfilerRuleOptions::default()
    };
    Ok(ProfilerRule::sagemaker(&base, options))
}

fn now_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
