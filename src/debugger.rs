//! Debugger and profiler instrumentation for training jobs.
//!
//! Rules, hook configuration, TensorBoard output and tensor collections, each
//! rendered as a request fragment for the job-submission API.

pub mod builtin;
pub mod collection;
pub mod hook;
pub mod parameters;
pub mod profiler_rule;
pub mod rule;

pub use builtin::{DebugRuleBaseConfig, ProfilerRuleBase};
pub use collection::CollectionConfig;
pub use hook::{DebuggerHookConfig, TensorBoardOutputConfig};
pub use parameters::{merge_rule_parameters, ParameterValue, RuleParameters};
pub use profiler_rule::{
    default_profiler_rule, CustomProfilerRuleOptions, ProfilerRule, SagemakerProfilerRuleOptions,
};
pub use rule::{
    CustomRuleOptions, Rule, RuleConfigRequest, SagemakerRuleOptions, DEFAULT_RULE_EVALUATOR_IMAGE,
};
