//! Display-patch mesh: the finite grid that shows the wave field.
//!
//! The patch is a fixed-topology `(N+1)^2` grid that slides under the camera
//! in large, rare jumps (see `tracker`). Every frame its vertex heights are
//! rewritten from the wave oracle, so the displayed surface and the physics
//! answers come from the same function.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::waves::WaveField;

/// Default grid resolution (cells per side).
pub const DEFAULT_RESOLUTION: usize = 100;

/// Vertex data for the water mesh (position + normal + UV).
///
/// The 32-byte stride is a contract with the GPU buffer: a size mismatch
/// disables wave updates rather than writing past the allocation.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// The displayed water patch plus its static bottom plane.
pub struct WaterPatch {
    /// Cells per side (N). The grid has (N+1)^2 vertices.
    resolution: usize,
    /// World-space patch extent in meters.
    size: Vec2,
    /// World-space patch origin (center of the grid, on the baseline).
    origin: Vec3,
    h0: f32,
    /// World Y of the static bottom plane, from the terrain config.
    bottom_line: f32,
    pub vertices: Vec<WaterVertex>,
    pub indices: Vec<u32>,
    pub bottom_vertices: [WaterVertex; 4],
    pub bottom_indices: [u32; 6],
    visible: bool,
    wave_updates_enabled: bool,
    mismatch_logged: bool,
    dirty: bool,
}

/// Patch world size from terrain bounds: the shorter horizontal extent is
/// stretched when the terrain is strongly elongated, so the patch still
/// covers the view across the narrow axis.
pub fn patch_size_from_terrain(max_terrain_size: Vec3) -> Vec2 {
    let aspect = max_terrain_size.x / max_terrain_size.z.max(1e-6);
    let scale = if (0.5..=2.0).contains(&aspect) { 1.0 } else { 1.5 };
    Vec2::new(max_terrain_size.x * scale, max_terrain_size.z * scale)
}

impl WaterPatch {
    pub fn new(resolution: usize, size: Vec2, h0: f32, bottom_line: f32) -> Self {
        let n = resolution;
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));

        for pz in 0..=n {
            for px in 0..=n {
                vertices.push(WaterVertex {
                    position: [
                        size.x / 2.0 - px as f32 * size.x / n as f32,
                        h0,
                        pz as f32 * size.y / n as f32 - size.y / 2.0,
                    ],
                    normal: [0.0, 1.0, 0.0],
                    uv: [px as f32 / n as f32, pz as f32 / n as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity(n * n * 6);
        for pz in 0..n {
            for px in 0..n {
                let top_left = (pz * (n + 1) + px) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((pz + 1) * (n + 1) + px) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        let mut patch = Self {
            resolution: n,
            size,
            origin: Vec3::new(0.0, h0, 0.0),
            h0,
            bottom_line,
            vertices,
            indices,
            bottom_vertices: [WaterVertex::zeroed(); 4],
            bottom_indices: [0, 2, 1, 1, 2, 3],
            visible: true,
            wave_updates_enabled: true,
            mismatch_logged: false,
            dirty: true,
        };
        patch.rebuild_bottom();
        patch
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn bottom_line(&self) -> f32 {
        self.bottom_line
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hides the patch, the bottom plane, and the water plane as one. The
    /// oracle stays queryable regardless.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn wave_updates_enabled(&self) -> bool {
        self.wave_updates_enabled
    }

    /// Byte size the GPU vertex buffer must have.
    pub fn expected_buffer_bytes(&self) -> u64 {
        (self.vertices.len() * std::mem::size_of::<WaterVertex>()) as u64
    }

    /// Containment for a GPU buffer whose size stopped matching the grid:
    /// leave the patch flat and keep rendering. Logged once.
    pub fn check_buffer_shape(&mut self, actual_bytes: u64) -> bool {
        if actual_bytes == self.expected_buffer_bytes() {
            return true;
        }
        self.wave_updates_enabled = false;
        if !self.mismatch_logged {
            self.mismatch_logged = true;
            eprintln!(
                "Water vertex buffer is {} bytes, expected {}; wave updates disabled",
                actual_bytes,
                self.expected_buffer_bytes()
            );
        }
        false
    }

    /// Move the patch (and its bottom plane, which rides the same model
    /// offset) to a new world origin.
    pub fn translate_to(&mut self, origin: Vec3) {
        self.origin = Vec3::new(origin.x, self.h0, origin.z);
        self.dirty = true;
    }

    /// Move the flat baseline, keeping the grid's rest height in step. The
    /// bottom plane stays at its configured world Y.
    pub fn set_baseline(&mut self, h0: f32) {
        self.h0 = h0;
        self.origin.y = h0;
        self.dirty = true;
    }

    fn rebuild_bottom(&mut self) {
        let y = self.bottom_line;
        let (hx, hz) = (self.size.x / 2.0, self.size.y / 2.0);
        let corners = [(-hx, -hz), (hx, -hz), (-hx, hz), (hx, hz)];
        for (v, (cx, cz)) in self.bottom_vertices.iter_mut().zip(corners) {
            *v = WaterVertex {
                position: [cx, y, cz],
                normal: [0.0, 1.0, 0.0],
                uv: [(cx + hx) / self.size.x, (cz + hz) / self.size.y],
            };
        }
    }

    /// Rewrite all vertex heights from the oracle, then recompute normals by
    /// central differences. No-op when wave updates were disabled.
    pub fn rebuild(&mut self, field: &WaveField, t: f32) {
        if !self.wave_updates_enabled {
            return;
        }

        let n = self.resolution;
        for pz in 0..=n {
            for px in 0..=n {
                let v = &mut self.vertices[pz * (n + 1) + px];
                let wx = self.origin.x + v.position[0];
                let wz = v.position[2] + self.origin.z;
                v.position[1] = field.height(wx, wz, t);
            }
        }

        self.recompute_normals();
        self.dirty = true;
    }

    /// Cross product of the two grid tangents at each vertex, neighbors
    /// clamped at the edges. Degenerate lengths get an epsilon substitute
    /// instead of dividing by zero.
    fn recompute_normals(&mut self) {
        let n = self.resolution;
        let at = |px: usize, pz: usize, verts: &[WaterVertex]| -> Vec3 {
            Vec3::from_array(verts[pz * (n + 1) + px].position)
        };

        for pz in 0..=n {
            for px in 0..=n {
                let left = at((px + 1).min(n), pz, &self.vertices);
                let right = at(px.saturating_sub(1), pz, &self.vertices);
                let up = at(px, (pz + 1).min(n), &self.vertices);
                let down = at(px, pz.saturating_sub(1), &self.vertices);

                let normal = (left - right).cross(up - down);
                let normal = normal / normal.length().max(1e-9);
                self.vertices[pz * (n + 1) + px].normal = normal.to_array();
            }
        }
    }

    /// True when vertex data changed since the last GPU upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
