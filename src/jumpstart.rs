//! JumpStart model catalog: record types and artifact URI retrieval.

pub mod constants;
pub mod holder;
pub mod model_uris;
pub mod resolver;
pub mod specs;
pub mod types;

pub use holder::JumpStartDataHolder;
pub use model_uris::{retrieve, ModelUriQuery};
pub use resolver::{ArtifactRequest, ArtifactResolver, StaticArtifactResolver};
pub use specs::{JumpStartModelSpecs, Training};
pub use types::{
    FormattedContent, JumpStartCachedS3ContentKey, JumpStartCachedS3ContentValue,
    JumpStartECRSpecs, JumpStartLaunchedRegionInfo, JumpStartModelHeader, JumpStartS3FileType,
    JumpStartVersionedModelId, ModelScope,
};
