//! Property-based tests for structural equality of configuration values

use proptest::prelude::*;
use smconfig::debugger::parameters::{merge_rule_parameters, rule_parameters};
use smconfig::debugger::CollectionConfig;
use smconfig::jumpstart::{
    JumpStartDataHolder, JumpStartECRSpecs, JumpStartLaunchedRegionInfo, JumpStartVersionedModelId,
};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    /// Parameter insertion order never affects equality or hash.
    #[test]
    fn collection_config_ignores_parameter_order(
        name in "[a-z_]{1,12}",
        pairs in prop::collection::vec(("[a-z_]{1,8}", "[0-9]{1,4}"), 0..8),
    ) {
        let forward: HashMap<String, String> = pairs.iter().cloned().collect();
        let mut reversed = HashMap::new();
        for (key, value) in pairs.iter().rev() {
            reversed.entry(key.clone()).or_insert_with(|| value.clone());
        }

        let a = CollectionConfig::with_parameters(name.clone(), forward);
        let b = CollectionConfig::with_parameters(name, reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// Holders rebuilt from their own JSON are equal and hash alike.
    #[test]
    fn holder_json_round_trip_preserves_identity(
        framework in "[a-z]{1,10}",
        framework_version in "[0-9]\\.[0-9]{1,2}\\.[0-9]",
        py_version in "py3[0-9]?",
    ) {
        let specs = JumpStartECRSpecs::from_json(&serde_json::json!({
            "framework": framework,
            "framework_version": framework_version,
            "py_version": py_version,
        })).unwrap();
        let rebuilt = JumpStartECRSpecs::from_json(&serde_json::Value::Object(specs.to_json())).unwrap();

        prop_assert_eq!(&specs, &rebuilt);
        prop_assert_eq!(hash_of(&specs), hash_of(&rebuilt));
        prop_assert_eq!(specs.to_string(), rebuilt.to_string());
    }

    #[test]
    fn region_info_json_round_trip(region_name in "[a-z]{2}-[a-z]{4,9}-[1-3]") {
        let info = JumpStartLaunchedRegionInfo {
            content_bucket: format!("jumpstart-cache-prod-{}", region_name),
            region_name,
        };
        let rebuilt =
            JumpStartLaunchedRegionInfo::from_json(&serde_json::Value::Object(info.to_json())).unwrap();

        prop_assert_eq!(&info, &rebuilt);
        prop_assert_eq!(hash_of(&info), hash_of(&rebuilt));
        prop_assert_eq!(rebuilt.content_bucket, info.content_bucket.clone());
    }

    #[test]
    fn versioned_id_json_round_trip(
        model_id in "[a-z0-9-]{1,24}",
        version in "([0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}|\\*)",
    ) {
        let id = JumpStartVersionedModelId::new(model_id, version);
        let rebuilt =
            JumpStartVersionedModelId::from_json(&serde_json::Value::Object(id.to_json())).unwrap();

        prop_assert_eq!(&id, &rebuilt);
        prop_assert_eq!(hash_of(&id), hash_of(&rebuilt));
        prop_assert_eq!(id.to_string(), rebuilt.to_string());
    }

    /// Any differing attribute makes versioned ids unequal.
    #[test]
    fn versioned_ids_differ_when_any_field_differs(
        model_id in "[a-z-]{1,16}",
        version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        other_version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
    ) {
        let a = JumpStartVersionedModelId::new(model_id.clone(), version.clone());
        let b = JumpStartVersionedModelId::new(model_id, other_version.clone());
        prop_assert_eq!(a == b, version == other_version);
    }

    /// Caller parameters always win over source and rule_to_invoke.
    #[test]
    fn caller_parameters_take_precedence(
        source in "s3://[a-z]{1,10}/[a-z]{1,10}\\.py",
        rule in "[A-Z][a-zA-Z]{1,12}",
        overridden in "[a-z]{1,10}",
    ) {
        let caller = rule_parameters([("rule_to_invoke", overridden.as_str())]);
        let merged = merge_rule_parameters(Some(source.as_str()), Some(rule.as_str()), Some(&caller)).unwrap();
        prop_assert_eq!(merged["rule_to_invoke"].to_string(), overridden);
        prop_assert_eq!(merged["source_s3_uri"].to_string(), source);
    }
}
