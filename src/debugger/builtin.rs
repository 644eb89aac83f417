//! Built-in rule base configurations.
//!
//! Debugger rules are described by a base configuration document:
//!
//! ```json
//! {
//!   "DebugRuleConfiguration": {
//!     "RuleConfigurationName": "VanishingGradient",
//!     "RuleParameters": {"rule_to_invoke": "VanishingGradient", "threshold": "0.0000001"}
//!   },
//!   "CollectionConfigurations": [
//!     {"CollectionName": "gradients", "CollectionParameters": {"save_interval": "500"}}
//!   ]
//! }
//! ```
//!
//! Profiler rules carry a rule name and default parameters directly.

use crate::debugger::collection::CollectionConfig;
use crate::debugger::parameters::{ParameterValue, RuleParameters, KEY_RULE_TO_INVOKE};
use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// The `DebugRuleConfiguration` section of a base config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugRuleConfiguration {
    #[serde(rename = "RuleConfigurationName")]
    pub rule_configuration_name: String,

    #[serde(
        rename = "RuleParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rule_parameters: Option<RuleParameters>,
}

/// One raw `CollectionConfigurations` entry; both keys may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    #[serde(rename = "CollectionName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "CollectionParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parameters: Option<HashMap<String, String>>,
}

impl From<&CollectionEntry> for CollectionConfig {
    fn from(entry: &CollectionEntry) -> Self {
        CollectionConfig {
            name: entry.name.clone(),
            parameters: Some(entry.parameters.clone().unwrap_or_default()),
        }
    }
}

/// Base configuration for a built-in debugger rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugRuleBaseConfig {
    #[serde(rename = "DebugRuleConfiguration")]
    pub debug_rule_configuration: DebugRuleConfiguration,

    #[serde(
        rename = "CollectionConfigurations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_configurations: Option<Vec<CollectionEntry>>,
}

impl DebugRuleBaseConfig {
    pub fn from_json(value: serde_json::Value) -> Result<Self, RuleError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn rule_name(&self) -> &str {
        &self.debug_rule_configuration.rule_configuration_name
    }

    /// The rule's own default parameters (empty when none are declared).
    pub fn default_parameters(&self) -> RuleParameters {
        self.debug_rule_configuration
            .rule_parameters
            .clone()
            .unwrap_or_default()
    }

    /// One `CollectionConfig` per declared collection entry.
    pub fn collections(&self) -> Vec<CollectionConfig> {
        self.collection_configurations
            .iter()
            .flatten()
            .map(CollectionConfig::from)
            .collect()
    }
}

/// Base configuration for a built-in profiler rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilerRuleBase {
    pub rule_name: String,
    pub rule_parameters: RuleParameters,
}

impl ProfilerRuleBase {
    /// Build a profiler rule base; `rule_to_invoke` is always the rule name.
    pub fn new(rule_name: impl Into<String>, parameters: RuleParameters) -> Self {
        let rule_name = rule_name.into();
        let mut rule_parameters = parameters;
        rule_parameters.insert(
            KEY_RULE_TO_INVOKE.to_string(),
            ParameterValue::Text(rule_name.clone()),
        );
        Self {
            rule_name,
            rule_parameters,
        }
    }
}

pub const DEBUGGER_RULE_NAMES: &[&str] = &[
    "VanishingGradient",
    "ExplodingTensor",
    "LossNotDecreasing",
    "Overfit",
    "DeadRelu",
    "PoorWeightInitialization",
];

pub const PROFILER_RULE_NAMES: &[&str] = &[
    "ProfilerReport",
    "BatchSize",
    "CPUBottleneck",
    "GPUMemoryIncrease",
    "IOBottleneck",
    "LoadBalancing",
    "LowGPUUtilization",
    "MaxInitializationTime",
    "OverallSystemUsage",
    "StepOutlier",
];

const SCAN_INTERVAL_US: i64 = 60_000_000;

/// Look up a built-in debugger rule base config by name.
pub fn debugger_rule(name: &str) -> Result<DebugRuleBaseConfig, RuleError> {
    let document = match name {
        "VanishingGradient" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "VanishingGradient",
                "RuleParameters": {"rule_to_invoke": "VanishingGradient", "threshold": "0.0000001"}
            },
            "CollectionConfigurations": [
                {"CollectionName": "gradients", "CollectionParameters": {"save_interval": "500"}}
            ]
        }),
        "ExplodingTensor" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "ExplodingTensor",
                "RuleParameters": {
                    "rule_to_invoke": "ExplodingTensor",
                    "collection_names": "",
                    "tensor_regex": "",
                    "only_nan": "False"
                }
            },
            "CollectionConfigurations": [
                {"CollectionName": "gradients", "CollectionParameters": {"save_interval": "500"}}
            ]
        }),
        "LossNotDecreasing" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "LossNotDecreasing",
                "RuleParameters": {
                    "rule_to_invoke": "LossNotDecreasing",
                    "use_losses_collection": "True",
                    "num_steps": "10",
                    "diff_percent": "0.1",
                    "increase_threshold_percent": "5",
                    "mode": "GLOBAL"
                }
            },
            "CollectionConfigurations": [
                {"CollectionName": "losses", "CollectionParameters": {"save_interval": "500"}}
            ]
        }),
        "Overfit" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "Overfit",
                "RuleParameters": {
                    "rule_to_invoke": "Overfit",
                    "start_step": "0",
                    "patience": "1",
                    "ratio_threshold": "0.1"
                }
            },
            "CollectionConfigurations": [
                {"CollectionName": "losses", "CollectionParameters": {"save_interval": "500"}}
            ]
        }),
        "DeadRelu" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "DeadRelu",
                "RuleParameters": {
                    "rule_to_invoke": "DeadRelu",
                    "tensor_regex": ".*relu_output|.*ReLU_output",
                    "threshold_inactivity": "1.0",
                    "threshold_layer": "50.0"
                }
            },
            "CollectionConfigurations": [
                {
                    "CollectionName": "relu_output",
                    "CollectionParameters": {
                        "include_regex": ".*relu_output|.*ReLU_output",
                        "save_interval": "500"
                    }
                }
            ]
        }),
        "PoorWeightInitialization" => json!({
            "DebugRuleConfiguration": {
                "RuleConfigurationName": "PoorWeightInitialization",
                "RuleParameters": {
                    "rule_to_invoke": "PoorWeightInitialization",
                    "activation_inputs_regex": ".*relu_input|.*ReLU_input",
                    "threshold": "10.0",
                    "distribution_range": "0.001",
                    "patience": "5",
                    "steps": "10"
                }
            },
            "CollectionConfigurations": [
                {
                    "CollectionName": "ReluInput",
                    "CollectionParameters": {
                        "include_regex": ".*relu_input|.*ReLU_input",
                        "save_interval": "500"
                    }
                }
            ]
        }),
        other => return Err(RuleError::UnknownBuiltinRule(other.to_string())),
    };

    DebugRuleBaseConfig::from_json(document)
}

/// Look up a built-in profiler rule by name.
pub fn profiler_rule(name: &str) -> Result<ProfilerRuleBase, RuleError> {
    use crate::debugger::parameters::rule_parameters as params;

    let parameters: RuleParameters = match name {
        "ProfilerReport" => RuleParameters::new(),
        "BatchSize" => params([
            ("cpu_threshold_p95", 70_i64),
            ("gpu_threshold_p95", 70_i64),
            ("gpu_memory_threshold_p95", 70_i64),
            ("patience", 1000_i64),
            ("window", 500_i64),
        ]),
        "CPUBottleneck" => params([
            ("threshold", 50_i64),
            ("gpu_threshold", 10_i64),
            ("cpu_threshold", 90_i64),
            ("patience", 1000_i64),
        ]),
        "GPUMemoryIncrease" => params([("increase", 5_i64), ("patience", 1000_i64), ("window", 10_i64)]),
        "IOBottleneck" => params([
            ("threshold", 50_i64),
            ("gpu_threshold", 10_i64),
            ("io_threshold", 50_i64),
            ("patience", 1000_i64),
        ]),
        "LoadBalancing" => {
            let mut p = params([("threshold", 0.5)]);
            p.insert("patience".to_string(), 1000_i64.into());
            p
        }
        "LowGPUUtilization" => params([
            ("threshold_p95", 70_i64),
            ("threshold_p5", 10_i64),
            ("window", 500_i64),
            ("patience", 1000_i64),
        ]),
        "MaxInitializationTime" => params([("threshold", 20_i64)]),
        "OverallSystemUsage" => RuleParameters::new(),
        "StepOutlier" => {
            let mut p = params([("stddev", 3_i64), ("n_outliers", 10_i64)]);
            p.insert("mode".to_string(), "None".into());
            p
        }
        other => return Err(RuleError::UnknownBuiltinRule(other.to_string())),
    };

    let mut parameters = parameters;
    if name != "ProfilerReport" {
        parameters.insert("scan_interval_us".to_string(), SCAN_INTERVAL_US.into());
    }
    Ok(ProfilerRuleBase::new(name, parameters))
}

pub fn vanishing_gradient() -> Result<DebugRuleBaseConfig, RuleError> {
    debugger_rule("VanishingGradient")
}

pub fn loss_not_decreasing() -> Result<DebugRuleBaseConfig, RuleError> {
    debugger_rule("LossNotDecreasing")
}

pub fn profiler_report() -> Result<ProfilerRuleBase, RuleError> {
    profiler_rule("ProfilerReport")
}
