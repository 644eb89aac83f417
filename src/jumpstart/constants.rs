//! Catalog locations and launched regions.

use crate::jumpstart::types::JumpStartLaunchedRegionInfo;

pub const JUMPSTART_DEFAULT_REGION_NAME: &str = "us-west-2";

pub const JUMPSTART_DEFAULT_MANIFEST_FILE_S3_KEY: &str = "models_manifest.json";

const JUMPSTART_BUCKET_NAME_PREFIX: &str = "jumpstart-cache-prod-";

const LAUNCHED_REGION_NAMES: &[&str] = &[
    "us-west-2",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "ca-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "me-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
];

fn region_info_for(region_name: &str) -> JumpStartLaunchedRegionInfo {
    JumpStartLaunchedRegionInfo {
        content_bucket: format!("{}{}", JUMPSTART_BUCKET_NAME_PREFIX, region_name),
        region_name: region_name.to_string(),
    }
}

pub fn launched_regions() -> Vec<JumpStartLaunchedRegionInfo> {
    LAUNCHED_REGION_NAMES
        .iter()
        .map(|region| region_info_for(region))
        .collect()
}

/// Region info for a launched region, or `None` if JumpStart is not available there.
pub fn region_info(region_name: &str) -> Option<JumpStartLaunchedRegionInfo> {
    LAUNCHED_REGION_NAMES
        .contains(&region_name)
        .then(|| region_info_for(region_name))
}
