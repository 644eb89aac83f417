//! Debugger and profiler rule request fragments

use serde_json::json;
use smconfig::debugger::builtin::{
    debugger_rule, loss_not_decreasing, profiler_report, profiler_rule, vanishing_gradient,
};
use smconfig::debugger::parameters::rule_parameters;
use smconfig::debugger::{
    CollectionConfig, CustomProfilerRuleOptions, CustomRuleOptions, DebuggerHookConfig,
    ProfilerRule, Rule, SagemakerProfilerRuleOptions, SagemakerRuleOptions,
    TensorBoardOutputConfig,
};
use smconfig::error::RuleError;
use std::collections::{BTreeMap, HashMap};

#[test]
fn test_builtin_rule_with_caller_overrides() {
    let base = vanishing_gradient().unwrap();
    let rule = Rule::sagemaker(
        &base,
        SagemakerRuleOptions {
            name: Some("vg-check".to_string()),
            s3_output_path: Some("s3://bucket/rules".to_string()),
            other_trials_s3_input_paths: Some(vec!["s3://a".to_string(), "s3://b".to_string()]),
            rule_parameters: Some(rule_parameters([("threshold", "0.5")])),
            ..SagemakerRuleOptions::default()
        },
    )
    .unwrap();

    assert_eq!(
        rule.to_debugger_rule_config_dict(),
        json!({
            "RuleConfigurationName": "vg-check",
            "RuleEvaluatorImage": "DEFAULT_RULE_EVALUATOR_IMAGE",
            "S3OutputPath": "s3://bucket/rules",
            "RuleParameters": {
                "other_trial_0": "s3://a",
                "other_trial_1": "s3://b",
                "rule_to_invoke": "VanishingGradient",
                "threshold": "0.5"
            }
        })
    );
    assert_eq!(rule.collection_configs, base.collections());
}

#[test]
fn test_builtin_rule_keeps_requested_collections() {
    let base = loss_not_decreasing().unwrap();
    let collections = vec![CollectionConfig::new("weights")];
    let rule = Rule::sagemaker(
        &base,
        SagemakerRuleOptions {
            collections_to_save: Some(collections.clone()),
            ..SagemakerRuleOptions::default()
        },
    )
    .unwrap();

    assert_eq!(rule.name(), "LossNotDecreasing");
    assert_eq!(rule.collection_configs, collections);
}

#[test]
fn test_builtin_rule_rejects_rule_to_invoke() {
    let base = debugger_rule("Overfit").unwrap();
    let result = Rule::sagemaker(
        &base,
        SagemakerRuleOptions {
            rule_parameters: Some(rule_parameters([("rule_to_invoke", "Other")])),
            ..SagemakerRuleOptions::default()
        },
    );
    assert!(matches!(result, Err(RuleError::ConfigurationConflict(_))));
}

#[test]
fn test_custom_rule_request() {
    let mut options = CustomRuleOptions::new("my-rule", "123.dkr.ecr/rules:latest", "ml.m5.xlarge", 30);
    options.source = Some("s3://bucket/rule.py".to_string());
    options.rule_to_invoke = Some("CustomGradientRule".to_string());
    options.rule_parameters = Some(rule_parameters([("threshold", 20.0)]));

    let rule = Rule::custom(options).unwrap();
    assert_eq!(
        rule.to_debugger_rule_config_dict(),
        json!({
            "RuleConfigurationName": "my-rule",
            "RuleEvaluatorImage": "123.dkr.ecr/rules:latest",
            "InstanceType": "ml.m5.xlarge",
            "VolumeSizeInGB": 30,
            "RuleParameters": {
                "source_s3_uri": "s3://bucket/rule.py",
                "rule_to_invoke": "CustomGradientRule",
                "threshold": 20.0
            }
        })
    );
    assert!(rule.collection_configs.is_empty());
}

#[test]
fn test_custom_rule_source_without_rule_to_invoke() {
    let mut options = CustomRuleOptions::new("my-rule", "image", "ml.m5.xlarge", 30);
    options.source = Some("s3://bucket/rule.py".to_string());
    assert!(matches!(
        Rule::custom(options),
        Err(RuleError::InvalidArgument(_))
    ));
}

#[test]
fn test_profiler_rules_stringify_parameters() {
    let report = ProfilerRule::sagemaker(&profiler_report().unwrap(), SagemakerProfilerRuleOptions::default());
    assert_eq!(
        report.to_profiler_rule_config_dict(),
        json!({
            "RuleConfigurationName": "ProfilerReport",
            "RuleEvaluatorImage": "DEFAULT_RULE_EVALUATOR_IMAGE",
            "RuleParameters": {"rule_to_invoke": "ProfilerReport"}
        })
    );

    let balancing = ProfilerRule::sagemaker(
        &profiler_rule("LoadBalancing").unwrap(),
        SagemakerProfilerRuleOptions {
            name: Some("balance".to_string()),
            ..SagemakerProfilerRuleOptions::default()
        },
    );
    let dict = balancing.to_profiler_rule_config_dict();
    assert_eq!(dict["RuleConfigurationName"], "balance");
    assert_eq!(dict["RuleParameters"]["threshold"], "0.5");
    assert_eq!(dict["RuleParameters"]["patience"], "1000");
    assert_eq!(dict["RuleParameters"]["scan_interval_us"], "60000000");
}

#[test]
fn test_custom_profiler_rule_request() {
    let mut options = CustomProfilerRuleOptions::new("cpu", "image", "ml.m5.xlarge", 10);
    options.source = Some("s3://bucket/profiler.py".to_string());
    options.rule_to_invoke = Some("CPUCheck".to_string());
    options.rule_parameters = Some(rule_parameters([("verbose", true)]));

    let dict = ProfilerRule::custom(options).unwrap().to_profiler_rule_config_dict();
    assert_eq!(dict["VolumeSizeInGB"], 10);
    assert_eq!(dict["RuleParameters"]["verbose"], "True");
    assert_eq!(dict["RuleParameters"]["rule_to_invoke"], "CPUCheck");
}

#[test]
fn test_hook_and_tensorboard_requests() {
    let mut hook = DebuggerHookConfig::new("s3://bucket/tensors");
    hook.hook_parameters = Some(BTreeMap::from([(
        "save_interval".to_string(),
        "100".to_string(),
    )]));
    hook.collection_configs = Some(vec![CollectionConfig::with_parameters(
        "gradients",
        HashMap::from([("save_interval".to_string(), "500".to_string())]),
    )]);

    assert_eq!(
        hook.to_request_dict(),
        json!({
            "S3OutputPath": "s3://bucket/tensors",
            "HookParameters": {"save_interval": "100"},
            "CollectionConfigurations": [
                {"CollectionName": "gradients", "CollectionParameters": {"save_interval": "500"}}
            ]
        })
    );

    assert_eq!(
        TensorBoardOutputConfig::new("s3://bucket/tb").to_request_dict(),
        json!({"S3OutputPath": "s3://bucket/tb"})
    );
}
