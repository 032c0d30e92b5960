//! Per-frame update coordinator and the facade other subsystems talk to.
//!
//! The frame order is strict: time advances, the tracker decides patch
//! placement and submersion, the patch rewrites its vertices, and only then
//! are the mirror planes rebuilt and the offscreen cadence decided. The
//! renderer consumes the resulting `FrameUpdate` without reordering anything.

use glam::{Mat4, Vec3};

use crate::camera::CameraPose;
use crate::environment::Environment;
use crate::error::WaterError;
use crate::params::{TerrainParams, WaveDef};
use crate::patch::{patch_size_from_terrain, WaterPatch, DEFAULT_RESOLUTION};
use crate::quality::WaterMode;
use crate::reflection::{mirror_camera, oblique_projection, ReflectionPlanes, SceneFlags};
use crate::tracker::{ObserverTracker, TrackerOutcome};
use crate::waves::WaveField;

/// What the renderer must do for the frame just coordinated.
#[derive(Debug, Clone, Copy)]
pub struct FrameUpdate {
    /// Vertex data changed; upload before any pass samples it.
    pub upload_patch: bool,
    pub render_reflection: bool,
    pub render_refraction: bool,
    /// Fragment entry point for the patch material this frame.
    pub fragment_entry: &'static str,
    pub submerged: bool,
    pub submersion_edge: bool,
}

/// The water subsystem: wave oracle, display patch, observer tracking, and
/// reflection state, driven once per frame.
pub struct WaterSystem {
    field: WaveField,
    pub patch: WaterPatch,
    tracker: ObserverTracker,
    mode: WaterMode,
    camera: CameraPose,
    planes: ReflectionPlanes,
    reflection_camera: CameraPose,
    reflection_view_proj: Mat4,
    refraction_view_proj: Mat4,
    pub scene: SceneFlags,
    fade_color: [f32; 4],
    frame: u64,
    time: f32,
    submerged: bool,
}

impl WaterSystem {
    pub fn new(
        env: &Environment,
        terrain: &TerrainParams,
        wave_defs: &[WaveDef],
    ) -> Result<Self, WaterError> {
        let mode = WaterMode::parse(&terrain.water_effects);
        mode.validate(&env.capabilities)?;

        let size = patch_size_from_terrain(env.max_terrain_size);
        let h0 = terrain.water_line;
        let field = WaveField::new(wave_defs, h0, terrain.waves, size / 2.0);
        let patch = WaterPatch::new(DEFAULT_RESOLUTION, size, h0, terrain.water_bottom_line);
        let tracker = ObserverTracker::new(size, Vec3::new(0.0, h0, 0.0));

        let camera = CameraPose::default();
        let planes = ReflectionPlanes::for_surface(h0, false);
        let reflection_camera = mirror_camera(&camera, &planes.water);

        println!(
            "Water: mode '{}', patch {:.0}x{:.0} m at {} vertices, {} wave train(s)",
            mode.label(),
            size.x,
            size.y,
            patch.vertices.len(),
            field.trains().len()
        );

        let mut system = Self {
            field,
            patch,
            tracker,
            mode,
            camera,
            planes,
            reflection_camera,
            reflection_view_proj: Mat4::IDENTITY,
            refraction_view_proj: Mat4::IDENTITY,
            scene: SceneFlags::default(),
            fade_color: [0.33, 0.42, 0.51, 1.0],
            frame: 0,
            time: 0.0,
            submerged: false,
        };
        system.rebind_mirror_state();
        Ok(system)
    }

    /// Rebuild planes, mirror camera, and the two offscreen view-projections
    /// from the current camera and submersion state. All of it changes in
    /// one step, so a flip can never be observed half-applied.
    fn rebind_mirror_state(&mut self) {
        self.planes = ReflectionPlanes::for_surface(self.field.h0(), self.submerged);

        let mirrored = mirror_camera(&self.camera, &self.planes.water);
        let refl_clip = self.planes.reflection.in_view_space(mirrored.view());
        self.reflection_view_proj =
            oblique_projection(mirrored.projection(), refl_clip) * mirrored.view();

        let refr_clip = self.planes.refraction.in_view_space(self.camera.view());
        self.refraction_view_proj =
            oblique_projection(self.camera.projection(), refr_clip) * self.camera.view();

        self.reflection_camera = mirrored;
    }

    /// Drive one frame in the required order. `t` is the simulation clock,
    /// monotonically advanced by the caller.
    pub fn update(&mut self, t: f32, camera: &CameraPose) -> FrameUpdate {
        // 1. advance simulation time
        self.time = t;
        self.camera = *camera;

        // 2. patch placement and submersion
        let TrackerOutcome {
            new_origin,
            submerged,
            submersion_edge,
        } = self.tracker.track(camera, &self.field, t);
        self.submerged = submerged;

        if let Some(origin) = new_origin {
            self.patch.translate_to(origin);
        }

        // 3. rewrite vertices when the patch moved or waves are live
        if new_origin.is_some() || self.field.has_waves() {
            self.patch.rebuild(&self.field, t);
        }

        // 4. rebind planes and mirror cameras, decide offscreen cadence
        self.rebind_mirror_state();
        let (render_reflection, render_refraction) = self.mode.targets_for_frame(self.frame);
        self.frame += 1;

        FrameUpdate {
            upload_patch: self.patch.take_dirty(),
            render_reflection,
            render_refraction,
            fragment_entry: self.mode.fragment_entry(submerged),
            submerged,
            submersion_edge,
        }
    }

    // --- collaborator contract -------------------------------------------

    /// Flat baseline height.
    pub fn get_height(&self) -> f32 {
        self.field.h0()
    }

    /// Move the flat baseline and force the patch to re-place itself.
    pub fn set_height(&mut self, h: f32) {
        self.field.set_height(h);
        self.patch.set_baseline(h);
        self.tracker.force_update();
    }

    /// Wave-aware surface height for a caller at a known altitude.
    pub fn height_with_waves(&self, x: f32, y: f32, z: f32) -> f32 {
        self.field.height_for(Vec3::new(x, y, z), self.time)
    }

    /// Surface velocity at a horizontal position.
    pub fn velocity(&self, x: f32, _y: f32, z: f32) -> Vec3 {
        self.field.velocity(x, z, self.time)
    }

    pub fn is_submerged(&self, pos: Vec3) -> bool {
        self.field.is_submerged(pos, self.time)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.patch.set_visible(visible);
    }

    pub fn set_camera(&mut self, camera: CameraPose) {
        self.camera = camera;
        self.rebind_mirror_state();
    }

    /// Clear color for the offscreen targets.
    pub fn set_fade_color(&mut self, rgba: [f32; 4]) {
        self.fade_color = rgba;
    }

    /// Accepted and ignored; reserved for back-ends that shade by sun angle.
    pub fn set_sun_position(&mut self, _pos: Vec3) {}

    // --- renderer-facing accessors ---------------------------------------

    pub fn field(&self) -> &WaveField {
        &self.field
    }

    pub fn mode(&self) -> WaterMode {
        self.mode
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn planes(&self) -> &ReflectionPlanes {
        &self.planes
    }

    pub fn reflection_camera(&self) -> &CameraPose {
        &self.reflection_camera
    }

    pub fn reflection_view_proj(&self) -> Mat4 {
        self.reflection_view_proj
    }

    pub fn refraction_view_proj(&self) -> Mat4 {
        self.refraction_view_proj
    }

    pub fn fade_color(&self) -> [f32; 4] {
        self.fade_color
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Capabilities;
    use crate::params::parse_wave_config;

    fn test_env() -> Environment {
        Environment::default()
    }

    fn wavy_terrain() -> TerrainParams {
        TerrainParams {
            water_line: 0.0,
            water_bottom_line: -30.0,
            waves: true,
            water_effects: "Reflection + refraction (quality optimized)".to_string(),
        }
    }

    fn one_train() -> Vec<WaveDef> {
        parse_wave_config("20.0, 1.0, 1.0, 0\n")
    }

    fn looking_forward(eye: Vec3) -> CameraPose {
        CameraPose::look_at(eye, eye + Vec3::new(0.0, -0.2, 1.0), 75.0, 16.0 / 9.0)
    }

    #[test]
    fn test_capability_gate_at_init() {
        let mut env = test_env();
        env.capabilities = Capabilities {
            vertex_programs: true,
            fragment_programs: false,
        };
        let err = WaterSystem::new(&env, &wavy_terrain(), &one_train());
        assert!(matches!(
            err,
            Err(WaterError::CapabilityInsufficient { .. })
        ));
    }

    #[test]
    fn test_first_frame_uploads_patch() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let fu = water.update(0.0, &looking_forward(Vec3::new(100.0, 10.0, 100.0)));
        assert!(fu.upload_patch);
    }

    #[test]
    fn test_quality_mode_renders_both_targets_every_frame() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        for i in 0..4 {
            let fu = water.update(i as f32 * 0.016, &looking_forward(Vec3::new(0.0, 10.0, 0.0)));
            assert!(fu.render_reflection && fu.render_refraction);
        }
    }

    #[test]
    fn test_speed_mode_alternates() {
        let terrain = TerrainParams {
            water_effects: "Reflection + refraction (speed optimized)".to_string(),
            ..wavy_terrain()
        };
        let mut water = WaterSystem::new(&test_env(), &terrain, &one_train()).unwrap();
        let camera = looking_forward(Vec3::new(0.0, 10.0, 0.0));
        let a = water.update(0.0, &camera);
        let b = water.update(0.016, &camera);
        assert_eq!((a.render_reflection, a.render_refraction), (true, false));
        assert_eq!((b.render_reflection, b.render_refraction), (false, true));
    }

    #[test]
    fn test_basic_mode_renders_no_targets() {
        let terrain = TerrainParams {
            water_effects: "Basic (fastest)".to_string(),
            ..wavy_terrain()
        };
        let mut water = WaterSystem::new(&test_env(), &terrain, &one_train()).unwrap();
        let fu = water.update(0.0, &looking_forward(Vec3::new(0.0, 10.0, 0.0)));
        assert!(!fu.render_reflection && !fu.render_refraction);
        assert_eq!(fu.fragment_entry, "fs_basic");
    }

    #[test]
    fn test_submersion_edge_flips_all_planes() {
        // Invariant 8: the frame of a submersion edge changes the sign of
        // every plane normal in one step.
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let above = looking_forward(Vec3::new(200.0, 10.0, 200.0));
        let fu = water.update(0.0, &above);
        assert!(!fu.submerged);
        let planes_above = *water.planes();
        assert_eq!(planes_above.water.normal, Vec3::Y);

        let below = looking_forward(Vec3::new(200.0, -3.0, 200.0));
        let fu = water.update(0.016, &below);
        assert!(fu.submerged);
        assert!(fu.submersion_edge);
        assert_eq!(fu.fragment_entry, "fs_underside");
        let planes_below = *water.planes();
        assert_eq!(planes_below.water.normal, -planes_above.water.normal);
        assert_eq!(
            planes_below.reflection.normal,
            -planes_above.reflection.normal
        );
        assert_eq!(
            planes_below.refraction.normal,
            -planes_above.refraction.normal
        );
    }

    #[test]
    fn test_mirror_camera_tracks_main_camera() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let camera = looking_forward(Vec3::new(300.0, 12.0, 300.0));
        water.update(0.0, &camera);
        let mirrored = *water.reflection_camera();
        // reflected through y = h0 = 0
        assert!((mirrored.eye.y + camera.eye.y).abs() < 1e-4);
        assert!((mirrored.dir.y + camera.dir.y).abs() < 1e-6);
    }

    #[test]
    fn test_set_height_forces_patch_update() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let camera = looking_forward(Vec3::new(0.0, 10.0, 0.0));
        water.update(0.0, &camera);
        // second frame with a still camera: no patch move
        let fu = water.update(0.016, &camera);
        assert!(fu.upload_patch); // waves are live, vertices rewrite anyway

        water.set_height(4.0);
        assert_eq!(water.get_height(), 4.0);
        let fu = water.update(0.032, &camera);
        assert!(fu.upload_patch);
        assert_eq!(water.patch.origin().y, 4.0);
    }

    #[test]
    fn test_restore_and_oracle_passthrough() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        water.update(1.0, &looking_forward(Vec3::new(0.0, 10.0, 0.0)));

        // oracle answers agree with the field queried directly
        let direct = water.field().height(1200.0, 900.0, water.time());
        assert_eq!(water.height_with_waves(1200.0, -5.0, 900.0), direct);

        // far above the wave bound short-circuits to the baseline
        assert_eq!(water.height_with_waves(1200.0, 100.0, 900.0), 0.0);

        assert!(water.is_submerged(Vec3::new(1200.0, -5.0, 900.0)));
        assert!(!water.is_submerged(Vec3::new(1200.0, 100.0, 900.0)));
    }

    #[test]
    fn test_flat_terrain_has_no_waves() {
        let terrain = TerrainParams {
            waves: false,
            ..wavy_terrain()
        };
        let water = WaterSystem::new(&test_env(), &terrain, &one_train()).unwrap();
        assert!(!water.field().has_waves());
        assert_eq!(water.height_with_waves(10.0, 0.0, 10.0), 0.0);
        assert_eq!(water.velocity(10.0, 0.0, 10.0), Vec3::ZERO);
    }

    #[test]
    fn test_envelope_center_is_half_patch_size() {
        let water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let size = water.patch.size();
        // wave contribution vanishes at the map center for all t
        let h = water.field().height(size.x / 2.0, size.y / 2.0, 3.7);
        assert!((h - water.get_height()).abs() < 1e-6);
    }

    #[test]
    fn test_bottom_line_from_terrain_config() {
        // The terrain's WaterBottomLine key places the bottom quad.
        let terrain = TerrainParams::parse("WaterLine = 0\nWaterBottomLine = -42\nWaves = yes\n");
        let water = WaterSystem::new(&test_env(), &terrain, &one_train()).unwrap();
        assert_eq!(water.patch.bottom_line(), -42.0);
        for v in &water.patch.bottom_vertices {
            assert_eq!(v.position[1], -42.0);
        }
    }

    #[test]
    fn test_set_visible_hides_patch_and_bottom_as_one() {
        // The renderer gates both the water mesh and the bottom plane on
        // this one flag, so hiding the water hides the whole node.
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        assert!(water.patch.is_visible());
        water.set_visible(false);
        assert!(!water.patch.is_visible());
        // the oracle keeps answering while hidden
        let h = water.height_with_waves(1200.0, -5.0, 900.0);
        assert!(h.is_finite());
        water.set_visible(true);
        assert!(water.patch.is_visible());
    }

    #[test]
    fn test_fade_color_follows_render_config() {
        use crate::params::RenderConfig;
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let config = RenderConfig {
            fade_color: [0.1, 0.2, 0.3, 1.0],
            ..RenderConfig::default()
        };
        water.set_fade_color(config.fade_color);
        assert_eq!(water.fade_color(), config.fade_color);
    }

    #[test]
    fn test_sun_position_accepted_and_ignored() {
        let mut water = WaterSystem::new(&test_env(), &wavy_terrain(), &one_train()).unwrap();
        let before = water.fade_color();
        water.set_sun_position(Vec3::new(0.0, 1000.0, 0.0));
        assert_eq!(water.fade_color(), before);
    }
}
