//! Parameter definitions with physical units and documented semantics.

mod render;
mod terrain;
mod water;

// Re-export all types
pub use render::RenderConfig;
pub use terrain::TerrainParams;
pub use water::{parse_wave_config, read_wave_config, WaveDef, DEG_TO_RAD_DIVISOR, MAX_WAVE_TRAINS};
