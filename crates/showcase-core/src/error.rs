use crate::gpu::ProgramKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShotListError {
    #[error("shot list needs at least 2 shots, found {found}")]
    TooFewShots { found: usize },
    #[error("shot {index} contains a non-finite coordinate")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("phase thresholds must satisfy 0 < a < b < c <= 1, got {0:?}")]
    Thresholds([f32; 3]),
    #[error("damping rate for {what} must be finite and positive, got {value}")]
    DampingRate { what: &'static str, value: f32 },
    #[error(transparent)]
    ShotList(#[from] ShotListError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GpuError {
    #[error("shader program {program:?} failed to compile")]
    ShaderCompile { program: ProgramKind },
    #[error("failed to allocate {what}")]
    Allocation { what: String },
    #[error("unknown gpu handle {0}")]
    UnknownHandle(u64),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("device or surface lost")]
    Lost,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextureLoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("image data is {got} bytes, expected {expected}")]
    Size { expected: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("gpu: {0}")]
    Gpu(#[from] GpuError),
    #[error("scene already disposed")]
    Disposed,
}

impl From<ShotListError> for SceneError {
    fn from(e: ShotListError) -> Self {
        SceneError::Config(ConfigError::ShotList(e))
    }
}
