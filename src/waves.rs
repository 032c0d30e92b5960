//! Analytic wave field: the wave-train table and the height/velocity oracle.
//!
//! The oracle is deterministic and stateless in space: given `(x, z, t)` it
//! sums the loaded sinusoid trains under a distance-based amplitude envelope.
//! Everything here is written once at load and read-only afterwards, so
//! physics threads may query it concurrently with the render thread.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

use crate::params::WaveDef;

/// Divisor turning squared distance from the map center into the amplitude
/// envelope. Scale-dependent on the default 1500-unit map; existing configs
/// are authored against it, so it stays verbatim.
const ENVELOPE_DIVISOR: f32 = 3_000_000.0;

/// One sinusoid train with its load-time derived terms.
#[derive(Debug, Clone, Copy)]
pub struct WaveTrain {
    pub wavelength: f32,
    pub amplitude: f32,
    pub max_height: f32,
    pub direction: f32,
    /// Deep-water gravity-wave approximation: 1.25 * sqrt(wavelength).
    pub wave_speed: f32,
    sin_dir: f32,
    cos_dir: f32,
}

impl WaveTrain {
    fn from_def(def: &WaveDef) -> Self {
        Self {
            wavelength: def.wavelength,
            // amplitude may never exceed its configured ceiling
            amplitude: def.amplitude.min(def.max_height),
            max_height: def.max_height,
            direction: def.direction,
            wave_speed: 1.25 * def.wavelength.sqrt(),
            sin_dir: def.direction.sin(),
            cos_dir: def.direction.cos(),
        }
    }

    #[inline]
    fn phase(&self, x: f32, z: f32, t: f32) -> f32 {
        TAU * (t * self.wave_speed + self.sin_dir * x + self.cos_dir * z) / self.wavelength
    }
}

/// The height & velocity oracle over a fixed wave-train table.
#[derive(Debug, Clone)]
pub struct WaveField {
    trains: Vec<WaveTrain>,
    h0: f32,
    h0_orig: f32,
    has_waves: bool,
    /// Absolute bound on wave deviation: sum of per-train ceilings.
    max_amplitude: f32,
    /// Reference point of the distance envelope (map center).
    envelope_center: Vec2,
}

impl WaveField {
    /// Build the field from parsed train definitions.
    ///
    /// `envelope_center` is half the patch world size: waves vanish there and
    /// grow with squared distance until each train hits its ceiling.
    pub fn new(defs: &[WaveDef], h0: f32, has_waves: bool, envelope_center: Vec2) -> Self {
        let trains: Vec<WaveTrain> = defs.iter().map(WaveTrain::from_def).collect();
        let max_amplitude = trains.iter().map(|w| w.max_height).sum();
        let has_waves = has_waves && !trains.is_empty();

        Self {
            trains,
            h0,
            h0_orig: h0,
            has_waves,
            max_amplitude,
            envelope_center,
        }
    }

    /// Flat baseline height.
    #[inline]
    pub fn h0(&self) -> f32 {
        self.h0
    }

    pub fn has_waves(&self) -> bool {
        self.has_waves
    }

    /// Sum of per-train amplitude ceilings.
    pub fn max_amplitude(&self) -> f32 {
        self.max_amplitude
    }

    pub fn trains(&self) -> &[WaveTrain] {
        &self.trains
    }

    /// Move the flat baseline. Callers owning a patch must force-update it.
    pub fn set_height(&mut self, h: f32) {
        self.h0 = h;
    }

    /// Restore the baseline loaded from config.
    pub fn restore_height(&mut self) {
        self.h0 = self.h0_orig;
    }

    /// Amplitude envelope at a horizontal position: squared distance from the
    /// map center over the fixed divisor. Zero at the center, unbounded far
    /// out (the per-train ceiling clamps it).
    #[inline]
    fn envelope(&self, x: f32, z: f32) -> f32 {
        Vec2::new(x, z).distance_squared(self.envelope_center) / ENVELOPE_DIVISOR
    }

    /// Water surface height at `(x, z)` and time `t`.
    pub fn height(&self, x: f32, z: f32, t: f32) -> f32 {
        if !self.has_waves {
            return self.h0;
        }

        let e = self.envelope(x, z);
        let mut result = self.h0;
        for w in &self.trains {
            let amp = (w.amplitude * e).min(w.max_height);
            result += amp * w.phase(x, z, t).sin();
        }
        result
    }

    /// Height query for a caller at a known altitude: positions above the
    /// wave bound short-circuit to the baseline.
    pub fn height_for(&self, pos: Vec3, t: f32) -> f32 {
        if pos.y > self.h0 + self.max_amplitude {
            return self.h0;
        }
        self.height(pos.x, pos.z, t)
    }

    /// Surface velocity at `(x, z)` and time `t`: the time derivative of the
    /// height field plus the horizontal particle-motion approximation.
    pub fn velocity(&self, x: f32, z: f32, t: f32) -> Vec3 {
        if !self.has_waves {
            return Vec3::ZERO;
        }

        let e = self.envelope(x, z);
        let mut v = Vec3::ZERO;
        for w in &self.trains {
            let amp = (w.amplitude * e).min(w.max_height);
            let phase = w.phase(x, z, t);
            let v_scalar = TAU * amp / (w.wavelength / w.wave_speed);

            v.y += v_scalar * phase.cos();
            // Horizontal basis matches the phase term: direction is the
            // angle from +X measured toward +Z.
            v.x += w.direction.sin() * v_scalar * phase.sin();
            v.z += w.direction.cos() * v_scalar * phase.sin();
        }
        v
    }

    /// Whether `pos` is below the wave surface. Positions above the wave
    /// bound are reported dry without evaluating the trains.
    pub fn is_submerged(&self, pos: Vec3, t: f32) -> bool {
        if pos.y > self.h0 + self.max_amplitude {
            return false;
        }
        pos.y < self.height(pos.x, pos.z, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_train(wavelength: f32, amplitude: f32, max_height: f32, direction: f32) -> WaveDef {
        WaveDef {
            wavelength,
            amplitude,
            max_height,
            direction,
        }
    }

    fn center_1000() -> Vec2 {
        Vec2::new(500.0, 500.0)
    }

    #[test]
    fn test_flat_water_everywhere() {
        // S1: no waves means the baseline exactly, zero velocity.
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            5.0,
            false,
            center_1000(),
        );
        assert_eq!(field.height(10.0, 10.0, 0.0), 5.0);
        assert_eq!(field.height(-3.0, 999.0, 7.5), 5.0);
        assert_eq!(field.velocity(42.0, -17.0, 3.0), Vec3::ZERO);
    }

    #[test]
    fn test_empty_table_is_flat() {
        let field = WaveField::new(&[], 2.0, true, center_1000());
        assert!(!field.has_waves());
        assert_eq!(field.height(100.0, 100.0, 1.0), 2.0);
    }

    #[test]
    fn test_envelope_zero_at_map_center() {
        // S2: at the envelope center the wave contribution vanishes for all t.
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            0.0,
            true,
            center_1000(),
        );
        for i in 0..20 {
            let t = i as f32 * 0.37;
            assert!(field.height(500.0, 500.0, t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_envelope_value_at_known_distance() {
        // S2: 500 m from center gives e = 500^2 / 3e6, and z=1000 puts the
        // phase at an exact multiple of TAU at t=0, so height is ~0.
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            0.0,
            true,
            center_1000(),
        );
        let h = field.height(500.0, 1000.0, 0.0);
        assert!(h.abs() < 1e-3, "height at phase multiple was {}", h);

        // Nudge a quarter wavelength over for the crest; amplitude must be
        // the envelope value 0.0833... (not yet clamped).
        let crest = field.height(500.0, 1005.0, 0.0);
        let e = (500.0f32 * 500.0) / 3_000_000.0;
        // envelope grows slightly as z moves from 1000 to 1005
        assert!((crest - e).abs() < 5e-3, "crest {} vs envelope {}", crest, e);
    }

    #[test]
    fn test_envelope_monotone_until_clamp() {
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 0.8, 0.0)],
            0.0,
            true,
            center_1000(),
        );
        // Sample crest amplitudes at increasing distance along +X from
        // center; x does not enter the phase for direction 0.
        let crest_z = 505.0; // quarter wavelength off a TAU multiple
        let mut last = -1.0;
        let mut clamped = false;
        for step in 0..40 {
            let x = 500.0 + step as f32 * 100.0;
            let amp = field.height(x, crest_z, 0.0).abs();
            assert!(amp <= 0.8 + 1e-5);
            if (amp - 0.8).abs() < 1e-4 {
                clamped = true;
            } else if !clamped {
                assert!(amp >= last - 1e-6, "envelope not monotone at x={}", x);
            }
            last = amp;
        }
        assert!(clamped, "never reached the max_height clamp");
    }

    #[test]
    fn test_waves_bounded_by_max_heights() {
        let defs = [
            single_train(20.0, 1.0, 1.0, 0.0),
            single_train(40.0, 0.5, 0.5, 90.0 / 57.0),
            single_train(13.0, 2.0, 0.7, 33.0 / 57.0),
        ];
        let field = WaveField::new(&defs, 3.0, true, center_1000());
        let bound: f32 = defs.iter().map(|d| d.max_height).sum();
        for i in 0..30 {
            for j in 0..30 {
                let (x, z) = (i as f32 * 333.0 - 4000.0, j as f32 * 217.0 - 3000.0);
                let h = field.height(x, z, i as f32 * 0.1 + j as f32);
                assert!((h - 3.0).abs() <= bound + 1e-4);
            }
        }
    }

    #[test]
    fn test_single_train_periodicity() {
        let def = single_train(20.0, 1.0, 1.0, 0.3);
        let field = WaveField::new(&[def], 0.0, true, center_1000());
        let period = def.wavelength / (1.25 * def.wavelength.sqrt());
        for i in 0..10 {
            let t = i as f32 * 0.21;
            let a = field.height(800.0, 650.0, t);
            let b = field.height(800.0, 650.0, t + period);
            assert!((a - b).abs() < 1e-3, "period broken: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_superposition() {
        // S3: N trains summed equal the per-train evaluations minus the
        // (N-1) extra baselines.
        let d1 = single_train(20.0, 1.0, 1.0, 0.0);
        let d2 = single_train(40.0, 0.5, 0.5, 90.0 / 57.0);
        let h0 = 2.0;
        let both = WaveField::new(&[d1, d2], h0, true, center_1000());
        let only1 = WaveField::new(&[d1], h0, true, center_1000());
        let only2 = WaveField::new(&[d2], h0, true, center_1000());

        let (x, z, t) = (1500.0, 1500.0, 1.0);
        let sum = only1.height(x, z, t) + only2.height(x, z, t) - h0;
        assert!((both.height(x, z, t) - sum).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_matches_height_derivative() {
        // Finite differences of the height field must agree with velocity.y
        // to within 1%. Sample where the phase stays small so f32 noise does
        // not drown the comparison.
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 0.5, 0.0)],
            0.0,
            true,
            Vec2::new(5.0, 5.0),
        );
        let (x, z) = (1000.0, 0.4);
        let t = 0.0;
        let dt = 1e-3;
        let numeric = (field.height(x, z, t + dt) - field.height(x, z, t - dt)) / (2.0 * dt);
        let analytic = field.velocity(x, z, t).y;
        assert!(
            (numeric - analytic).abs() <= 0.01 * analytic.abs().max(1e-3),
            "numeric {} vs analytic {}",
            numeric,
            analytic
        );
    }

    #[test]
    fn test_velocity_horizontal_basis() {
        // Direction 0 points toward +Z in this convention: the horizontal
        // particle motion must stay in the Z axis.
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            0.0,
            true,
            center_1000(),
        );
        let v = field.velocity(900.0, 903.0, 0.7);
        assert_eq!(v.x, 0.0);
        assert!(v.z.abs() > 0.0);
    }

    #[test]
    fn test_submersion_symmetry() {
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            1.0,
            true,
            center_1000(),
        );
        for i in 0..40 {
            let p = Vec3::new(
                i as f32 * 77.0 - 1500.0,
                (i as f32 * 0.13).sin() * 2.0,
                i as f32 * 51.0 - 900.0,
            );
            let t = i as f32 * 0.05;
            assert_eq!(
                field.is_submerged(p, t),
                p.y < field.height(p.x, p.z, t),
                "asymmetry at {:?}",
                p
            );
        }
    }

    #[test]
    fn test_high_positions_short_circuit() {
        let field = WaveField::new(
            &[single_train(20.0, 1.0, 1.0, 0.0)],
            1.0,
            true,
            center_1000(),
        );
        let high = Vec3::new(3000.0, 1.0 + field.max_amplitude() + 0.1, 3000.0);
        assert!(!field.is_submerged(high, 0.0));
        assert_eq!(field.height_for(high, 0.0), 1.0);
    }

    #[test]
    fn test_baseline_moves_and_restores() {
        let mut field = WaveField::new(&[], 5.0, false, center_1000());
        field.set_height(9.0);
        assert_eq!(field.h0(), 9.0);
        assert_eq!(field.height(0.0, 0.0, 0.0), 9.0);
        field.restore_height();
        assert_eq!(field.h0(), 5.0);
    }

    #[test]
    fn test_amplitude_clamped_to_ceiling_at_load() {
        let field = WaveField::new(&[single_train(20.0, 5.0, 1.0, 0.0)], 0.0, true, center_1000());
        assert_eq!(field.trains()[0].amplitude, 1.0);
    }

    #[test]
    fn test_wave_speed_derivation() {
        let field = WaveField::new(&[single_train(16.0, 0.5, 0.5, 0.0)], 0.0, true, center_1000());
        assert!((field.trains()[0].wave_speed - 5.0).abs() < 1e-6);
    }
}
