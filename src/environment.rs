//! Collaborator context passed into the water subsystem.
//!
//! The water core never reaches for globals: everything it consumes from the
//! host simulation (terrain bounds, hardware capability flags, viewport size)
//! arrives through an explicit `Environment` handed to constructors.

use glam::Vec3;

/// GPU program support reported by the renderer.
///
/// Any water mode beyond basic flat water needs both flags; the check happens
/// once at init (see `quality::WaterMode::validate`).
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub vertex_programs: bool,
    pub fragment_programs: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            vertex_programs: true,
            fragment_programs: true,
        }
    }
}

/// External context for water construction.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Terrain bounding box extents in meters; sizes the displayed patch.
    pub max_terrain_size: Vec3,
    /// Renderer-reported program support.
    pub capabilities: Capabilities,
    /// Main viewport framebuffer dimensions in pixels.
    pub viewport: (u32, u32),
}

impl Environment {
    pub fn new(max_terrain_size: Vec3, capabilities: Capabilities, viewport: (u32, u32)) -> Self {
        Self {
            max_terrain_size,
            capabilities,
            viewport,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            max_terrain_size: Vec3::new(1500.0, 500.0, 1500.0),
            capabilities: Capabilities::default(),
            viewport: (1280, 720),
        }
    }
}
