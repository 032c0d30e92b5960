//! Main-camera contract consumed from the scene layer.

use glam::{Mat4, Vec3};

/// World-space camera pose plus projection parameters.
///
/// This is the shape the water core expects from `set_camera`: enough to
/// mirror the view through the water plane and to rebuild the projection
/// with an oblique near clip.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    pub eye: Vec3,
    /// Normalized view direction.
    pub dir: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraPose {
    /// Build a pose looking from `eye` toward `target`.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let dir = (target - eye).normalize_or(Vec3::NEG_Z);
        Self {
            eye,
            dir,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 3000.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.dir, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 20.0, 0.0),
            dir: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 3000.0,
        }
    }
}

/// Procedural orbit path used by the demo binary.
///
/// The eye circles the map center while the altitude swings below the
/// waterline once per period, so the submersion flip is exercised without
/// any input handling.
#[derive(Debug, Clone)]
pub struct OrbitPath {
    pub center: Vec3,
    pub radius_m: f32,
    pub base_altitude_m: f32,
    pub altitude_swing_m: f32,
    pub angular_speed_rad_per_s: f32,
    pub dive_freq_hz: f32,
}

impl Default for OrbitPath {
    fn default() -> Self {
        Self {
            center: Vec3::new(750.0, 0.0, 750.0),
            radius_m: 300.0,
            base_altitude_m: 6.0,
            altitude_swing_m: 10.0,
            angular_speed_rad_per_s: 0.12,
            dive_freq_hz: 0.03,
        }
    }
}

impl OrbitPath {
    /// Compute eye and look-at target for a given time.
    pub fn position_and_target(&self, time_s: f32) -> (Vec3, Vec3) {
        let angle = time_s * self.angular_speed_rad_per_s;
        let altitude = self.base_altitude_m
            + (time_s * self.dive_freq_hz * std::f32::consts::TAU).sin() * self.altitude_swing_m;

        let eye = Vec3::new(
            self.center.x + angle.cos() * self.radius_m,
            self.center.y + altitude,
            self.center.z + angle.sin() * self.radius_m,
        );

        // Look across the orbit, slightly toward the surface
        let target = Vec3::new(self.center.x, self.center.y + altitude * 0.3, self.center.z);
        (eye, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_direction_normalized() {
        let pose = CameraPose::look_at(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 75.0, 1.6);
        assert!((pose.dir.length() - 1.0).abs() < 1e-6);
        assert!((pose.dir - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_view_proj_is_valid() {
        let pose = CameraPose::default();
        let vp = pose.view_proj();
        assert_ne!(vp, Mat4::IDENTITY);
        assert_ne!(vp, Mat4::ZERO);
    }

    #[test]
    fn test_projection_honors_clip_plane_overrides() {
        // Hosts override near/far from their render config after look_at.
        let mut pose = CameraPose::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 75.0, 1.6);
        let default_proj = pose.projection();
        pose.near = 1.0;
        pose.far = 500.0;
        let overridden = pose.projection();
        assert_ne!(default_proj, overridden);
        assert_eq!(
            overridden,
            Mat4::perspective_rh(75.0f32.to_radians(), 1.6, 1.0, 500.0)
        );
    }

    #[test]
    fn test_orbit_stays_on_radius() {
        let path = OrbitPath::default();
        for i in 0..50 {
            let (eye, _) = path.position_and_target(i as f32 * 0.7);
            let horizontal =
                Vec3::new(eye.x - path.center.x, 0.0, eye.z - path.center.z).length();
            assert!((horizontal - path.radius_m).abs() < 1e-2);
        }
    }

    #[test]
    fn test_orbit_dips_below_and_above_base() {
        let path = OrbitPath::default();
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for i in 0..2000 {
            let (eye, _) = path.position_and_target(i as f32 * 0.05);
            min_y = min_y.min(eye.y);
            max_y = max_y.max(eye.y);
        }
        assert!(min_y < path.base_altitude_m - 0.5 * path.altitude_swing_m);
        assert!(max_y > path.base_altitude_m + 0.5 * path.altitude_swing_m);
    }
}
