//! Observer tracking: where the patch sits and whether the eye is under water.
//!
//! The patch is finite while the wave field is analytic everywhere, so the
//! patch follows the camera in large, rare jumps instead of sliding
//! continuously. The tracker also owns the submersion edge detection that
//! drives the reflection-plane flip.

use glam::{Vec2, Vec3};

use crate::camera::CameraPose;
use crate::waves::WaveField;

/// Minimum world-space distance before the patch origin jumps.
const ORIGIN_MOVE_THRESHOLD_M: f32 = 200.0;

/// Per-frame tracking result.
#[derive(Debug, Clone, Copy)]
pub struct TrackerOutcome {
    /// New patch origin when the patch must move this frame.
    pub new_origin: Option<Vec3>,
    /// Eye is below the wave surface.
    pub submerged: bool,
    /// Submersion state changed since the previous frame.
    pub submersion_edge: bool,
}

pub struct ObserverTracker {
    patch_size: Vec2,
    origin: Vec3,
    submerged: bool,
    force_update: bool,
}

impl ObserverTracker {
    pub fn new(patch_size: Vec2, initial_origin: Vec3) -> Self {
        Self {
            patch_size,
            origin: initial_origin,
            submerged: false,
            force_update: true,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn is_submerged(&self) -> bool {
        self.submerged
    }

    /// Request an unconditional patch move on the next `track` call (after a
    /// baseline change, for example).
    pub fn force_update(&mut self) {
        self.force_update = true;
    }

    /// Point the camera is looking at on the baseline plane, or the eye
    /// projected onto the plane when the view never meets it in front.
    fn focus_point(camera: &CameraPose, h0: f32) -> Vec3 {
        if camera.dir.y.abs() > 1e-6 {
            let along = (h0 - camera.eye.y) / camera.dir.y;
            if along > 0.0 {
                return camera.eye + camera.dir * along;
            }
        }
        Vec3::new(camera.eye.x, h0, camera.eye.z)
    }

    /// Decide patch placement and submersion for this frame.
    pub fn track(&mut self, camera: &CameraPose, field: &WaveField, t: f32) -> TrackerOutcome {
        let h0 = field.h0();
        let eye_on_plane = Vec3::new(camera.eye.x, h0, camera.eye.z);
        let focus = Self::focus_point(camera, h0);

        // Bound the slide so the camera never leaves the patch interior.
        let max_offset = self.patch_size.min_element() / 2.0;
        let offset = eye_on_plane.distance(focus).min(max_offset);
        let toward = (focus - eye_on_plane).normalize_or(Vec3::ZERO);
        let target = eye_on_plane + toward * offset;

        let new_origin = if self.force_update
            || target.distance(self.origin) > ORIGIN_MOVE_THRESHOLD_M
        {
            self.force_update = false;
            self.origin = target;
            Some(target)
        } else {
            None
        };

        let submerged = field.is_submerged(camera.eye, t);
        let submersion_edge = submerged != self.submerged;
        self.submerged = submerged;

        TrackerOutcome {
            new_origin,
            submerged,
            submersion_edge,
        }
    }
}
