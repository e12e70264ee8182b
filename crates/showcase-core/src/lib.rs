pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod damping;
pub mod error;
pub mod gpu;
pub mod lighting;
pub mod material;
pub mod noise;
pub mod particles;
pub mod phase;
pub mod product;
pub mod scene;
pub mod scroll;
pub mod shots;
pub mod texture;
pub mod uniforms;
#[cfg(feature = "gpu")]
pub mod wgpu_backend;

// Shaders bundled as string constants
pub static SURFACE_WGSL: &str = include_str!("../shaders/surface.wgsl");
pub static FLAT_WGSL: &str = include_str!("../shaders/flat.wgsl");
pub static IMAGE_WGSL: &str = include_str!("../shaders/image.wgsl");
pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");

pub use camera::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use gpu::*;
pub use lighting::*;
pub use material::*;
pub use particles::*;
pub use phase::*;
pub use product::*;
pub use scene::*;
pub use scroll::*;
pub use shots::*;
pub use texture::*;
