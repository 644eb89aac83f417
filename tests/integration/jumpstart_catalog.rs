//! Catalog loading and model URI retrieval through the static resolver

use serde_json::{json, Value};
use smconfig::error::{CatalogError, ResolverError};
use smconfig::jumpstart::{
    retrieve, FormattedContent, JumpStartCachedS3ContentKey, JumpStartCachedS3ContentValue,
    JumpStartDataHolder, JumpStartModelHeader, JumpStartS3FileType, ModelScope, ModelUriQuery,
    StaticArtifactResolver,
};
use tempfile::TempDir;

fn model_specs(model_id: &str, version: &str, training_supported: bool) -> Value {
    let mut specs = json!({
        "model_id": model_id,
        "version": version,
        "min_sdk_version": "2.49.0",
        "incremental_training_supported": false,
        "hosting_ecr_specs": {"framework": "pytorch", "framework_version": "1.7.0", "py_version": "py3"},
        "hosting_artifact_key": format!("pytorch-infer/infer-{}-{}.tar.gz", model_id, version),
        "hosting_script_key": "source-directory-tarballs/pytorch/inference/ic/v1.0.0/sourcedir.tar.gz",
        "training_supported": training_supported
    });
    if training_supported {
        let object = specs.as_object_mut().unwrap();
        object.insert(
            "training_ecr_specs".into(),
            json!({"framework": "pytorch", "framework_version": "1.5.0", "py_version": "py3"}),
        );
        object.insert(
            "training_artifact_key".into(),
            json!(format!("pytorch-training/train-{}-{}.tar.gz", model_id, version)),
        );
        object.insert(
            "training_script_key".into(),
            json!("source-directory-tarballs/pytorch/transfer_learning/ic/v1.0.0/sourcedir.tar.gz"),
        );
    }
    specs
}

fn catalog() -> Value {
    json!({
        "specs": [
            model_specs("pytorch-ic-mobilenet-v2", "1.0.0", true),
            model_specs("pytorch-ic-mobilenet-v2", "1.10.0", true),
            model_specs("pytorch-ic-mobilenet-v2", "1.9.0", true),
            model_specs("tensorflow-od-ssd", "2.0.0", false),
            model_specs("xgboost-classification", "1.0.0", true)
        ],
        "vulnerable": [
            {"model_id": "xgboost-classification", "version": "1.0.0", "dependencies": ["numpy==1.16.0"]}
        ],
        "deprecated": [
            {"model_id": "pytorch-ic-mobilenet-v2", "version": "1.0.0"}
        ]
    })
}

fn resolver() -> StaticArtifactResolver {
    StaticArtifactResolver::from_catalog_json(&catalog()).unwrap()
}

fn resolver_error(result: Result<String, CatalogError>) -> ResolverError {
    match result {
        Err(CatalogError::Resolver(err)) => err,
        other => panic!("expected resolver error, got {:?}", other),
    }
}

#[test]
fn test_load_catalog_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.json");
    std::fs::write(&path, serde_json::to_string_pretty(&catalog()).unwrap()).unwrap();

    let resolver = StaticArtifactResolver::load(&path).unwrap();
    assert_eq!(resolver.len(), 5);
}

#[test]
fn test_load_missing_catalog_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = StaticArtifactResolver::load(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn test_inference_and_training_uris() {
    let resolver = resolver();
    let query = ModelUriQuery::new("pytorch-ic-mobilenet-v2", "1.9.0");

    let inference = retrieve(&resolver, &query.clone().with_scope(ModelScope::Inference)).unwrap();
    assert_eq!(
        inference,
        "s3://jumpstart-cache-prod-us-west-2/pytorch-infer/infer-pytorch-ic-mobilenet-v2-1.9.0.tar.gz"
    );

    let training = retrieve(
        &resolver,
        &query
            .with_scope(ModelScope::Training)
            .with_region("eu-west-1"),
    )
    .unwrap();
    assert_eq!(
        training,
        "s3://jumpstart-cache-prod-eu-west-1/pytorch-training/train-pytorch-ic-mobilenet-v2-1.9.0.tar.gz"
    );
}

#[test]
fn test_latest_version_wildcard() {
    let uri = retrieve(
        &resolver(),
        &ModelUriQuery::new("pytorch-ic-mobilenet-v2", "*").with_scope(ModelScope::Inference),
    )
    .unwrap();
    assert!(uri.ends_with("infer-pytorch-ic-mobilenet-v2-1.10.0.tar.gz"));
}

#[test]
fn test_missing_scope() {
    let err = resolver_error(retrieve(
        &resolver(),
        &ModelUriQuery::new("pytorch-ic-mobilenet-v2", "1.9.0"),
    ));
    assert_eq!(err, ResolverError::MissingScope);
}

#[test]
fn test_training_scope_unsupported() {
    let err = resolver_error(retrieve(
        &resolver(),
        &ModelUriQuery::new("tensorflow-od-ssd", "2.0.0").with_scope(ModelScope::Training),
    ));
    assert!(matches!(err, ResolverError::UnsupportedScope { .. }));
}

#[test]
fn test_region_not_launched() {
    let err = resolver_error(retrieve(
        &resolver(),
        &ModelUriQuery::new("tensorflow-od-ssd", "2.0.0")
            .with_scope(ModelScope::Inference)
            .with_region("mars-north-1"),
    ));
    assert_eq!(err, ResolverError::RegionNotLaunched("mars-north-1".to_string()));
}

#[test]
fn test_unknown_model() {
    let err = resolver_error(retrieve(
        &resolver(),
        &ModelUriQuery::new("no-such-model", "1.0.0").with_scope(ModelScope::Inference),
    ));
    assert!(matches!(err, ResolverError::ModelNotFound { .. }));
}

#[test]
fn test_vulnerable_model_needs_tolerance() {
    let resolver = resolver();
    let query = ModelUriQuery::new("xgboost-classification", "1.0.0").with_scope(ModelScope::Inference);

    let err = resolver_error(retrieve(&resolver, &query));
    match err {
        ResolverError::VulnerableModel { dependencies, .. } => {
            assert_eq!(dependencies, vec!["numpy==1.16.0".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let tolerant = ModelUriQuery {
        tolerate_vulnerable_model: true,
        ..query
    };
    assert!(retrieve(&resolver, &tolerant).is_ok());
}

#[test]
fn test_deprecated_model_needs_tolerance() {
    let resolver = resolver();
    let query = ModelUriQuery::new("pytorch-ic-mobilenet-v2", "1.0.0").with_scope(ModelScope::Training);

    let err = resolver_error(retrieve(&resolver, &query));
    assert!(matches!(err, ResolverError::DeprecatedModel { .. }));

    let tolerant = ModelUriQuery {
        tolerate_deprecated_model: true,
        ..query
    };
    assert!(retrieve(&resolver, &tolerant).is_ok());
}

#[test]
fn test_manifest_content_round_trip() {
    let headers: Vec<JumpStartModelHeader> = catalog()["specs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|specs| {
            JumpStartModelHeader::from_json(&json!({
                "model_id": specs["model_id"],
                "version": specs["version"],
                "min_version": specs["min_sdk_version"],
                "spec_key": format!("community_models_specs/{}/specs_v{}.json",
                    specs["model_id"].as_str().unwrap(), specs["version"].as_str().unwrap())
            }))
            .unwrap()
        })
        .collect();

    let content = FormattedContent::manifest_from_headers(headers.clone());
    let value = JumpStartCachedS3ContentValue {
        formatted_content: FormattedContent::from_json(&content.to_json()).unwrap(),
        md5_hash: Some("abc123".to_string()),
    };

    let manifest = value.manifest().unwrap();
    assert_eq!(manifest.len(), headers.len());
    for header in &headers {
        assert_eq!(manifest.get(&header.versioned_id()), Some(header));
    }
    assert!(matches!(value.specs(), Err(CatalogError::TypeMismatch(_))));

    let key = JumpStartCachedS3ContentKey::new(JumpStartS3FileType::Manifest, "models_manifest.json");
    assert_eq!(
        JumpStartCachedS3ContentKey::from_json(&Value::Object(key.to_json())).unwrap(),
        key
    );
}
