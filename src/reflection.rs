//! Mirror planes, mirror cameras, and oblique near-clip projection.
//!
//! Everything here is plain math on `glam` types so the flip logic is
//! testable without a GPU. The offscreen targets that consume these matrices
//! live in `rendering`.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::CameraPose;

/// Near-clip slack around the water surface, in meters. Keeps the clipped
/// scene from opening a seam exactly at the waterline.
pub const CLIP_PLANE_OFFSET_M: f32 = 0.15;

/// A world-space plane `normal . p + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    pub fn reflect_point(&self, p: Vec3) -> Vec3 {
        p - 2.0 * self.signed_distance(p) * self.normal
    }

    pub fn reflect_direction(&self, v: Vec3) -> Vec3 {
        v - 2.0 * self.normal.dot(v) * self.normal
    }

    pub fn as_vec4(&self) -> Vec4 {
        self.normal.extend(self.d)
    }

    /// Plane coefficients transformed into the space `view` maps into.
    pub fn in_view_space(&self, view: Mat4) -> Vec4 {
        view.inverse().transpose() * self.as_vec4()
    }
}

/// The three planes kept in lockstep with the observer.
///
/// Built whole from `for_surface`; there is no way to observe a partial
/// flip, which is what keeps the submersion edge atomic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionPlanes {
    /// The mirror through which the reflection camera looks.
    pub water: Plane,
    /// Oblique near clip for the reflection camera.
    pub reflection: Plane,
    /// Oblique near clip for the refraction camera.
    pub refraction: Plane,
}

impl ReflectionPlanes {
    /// Plane configuration for the observer side of the surface.
    pub fn for_surface(h0: f32, submerged: bool) -> Self {
        // keeps everything above the surface (with slack below it)
        let keep_above = Plane::new(Vec3::Y, -(h0 - CLIP_PLANE_OFFSET_M));
        // keeps everything below the surface (with slack above it)
        let keep_below = Plane::new(Vec3::NEG_Y, h0 + CLIP_PLANE_OFFSET_M);

        if submerged {
            Self {
                water: Plane::new(Vec3::NEG_Y, h0),
                reflection: keep_below,
                refraction: keep_above,
            }
        } else {
            Self {
                water: Plane::new(Vec3::Y, -h0),
                reflection: keep_above,
                refraction: keep_below,
            }
        }
    }
}

/// Mirror the main camera through the water plane: position and orientation
/// reflected, projection parameters kept.
pub fn mirror_camera(main: &CameraPose, water: &Plane) -> CameraPose {
    CameraPose {
        eye: water.reflect_point(main.eye),
        dir: water.reflect_direction(main.dir),
        up: water.reflect_direction(main.up),
        ..*main
    }
}

/// Rewrite a perspective projection so its near plane coincides with an
/// arbitrary view-space clip plane (Lengyel's oblique depth projection,
/// [0, 1] depth range). The camera must lie on the negative side of the
/// plane.
pub fn oblique_projection(proj: Mat4, clip_view: Vec4) -> Mat4 {
    let mut m = proj.to_cols_array_2d();

    // Corner point of the frustum farthest opposite the clip plane,
    // expressed in clip coordinates.
    let q = Vec4::new(
        (clip_view.x.signum() + m[2][0]) / m[0][0],
        (clip_view.y.signum() + m[2][1]) / m[1][1],
        -1.0,
        (1.0 + m[2][2]) / m[3][2],
    );

    let c = clip_view * (1.0 / clip_view.dot(q));

    // replace the depth row
    m[0][2] = c.x;
    m[1][2] = c.y;
    m[2][2] = c.z;
    m[3][2] = c.w;

    Mat4::from_cols_array_2d(&m)
}

/// Main-scene state that the offscreen passes must not render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFlags {
    pub water_visible: bool,
    pub shadows_enabled: bool,
    pub particles_enabled: bool,
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self {
            water_visible: true,
            shadows_enabled: true,
            particles_enabled: true,
        }
    }
}

/// Scoped pre-/post-render pair around an offscreen pass.
///
/// Construction hides the water plane, shadows, and water-dependent
/// particles; `Drop` restores whatever was saved, so the pair stays balanced
/// on every exit path including unwinding.
pub struct OffscreenGuard<'a> {
    flags: &'a mut SceneFlags,
    saved: SceneFlags,
}

impl<'a> OffscreenGuard<'a> {
    pub fn begin(flags: &'a mut SceneFlags) -> Self {
        let saved = *flags;
        flags.water_visible = false;
        flags.shadows_enabled = false;
        flags.particles_enabled = false;
        Self { flags, saved }
    }

    /// Flags as seen while the offscreen pass runs.
    pub fn flags(&self) -> &SceneFlags {
        self.flags
    }
}

impl Drop for OffscreenGuard<'_> {
    fn drop(&mut self) {
        *self.flags = self.saved;
    }
}
