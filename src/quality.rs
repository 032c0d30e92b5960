//! Render mode selection and hardware capability gating.
//!
//! The four modes differ only in which offscreen targets are active and
//! which fragment entry the patch material uses, so they are a plain enum
//! with per-mode lookups instead of a type hierarchy.

use crate::environment::Capabilities;
use crate::error::WaterError;

/// Water render mode, chosen once from the terrain's effects string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterMode {
    /// Flat water, no offscreen targets.
    Basic,
    /// Reflection camera and its target every frame.
    Reflection,
    /// Reflection on even frames, refraction on odd frames.
    ReflectionRefractionSpeed,
    /// Both targets every frame.
    ReflectionRefractionQuality,
}

impl WaterMode {
    /// Parse the terrain effects string. Unknown values select the
    /// speed-optimized mode.
    pub fn parse(effects: &str) -> Self {
        match effects.trim() {
            "None" | "Basic (fastest)" => WaterMode::Basic,
            "Reflection" => WaterMode::Reflection,
            "Reflection + refraction (speed optimized)" => WaterMode::ReflectionRefractionSpeed,
            "Reflection + refraction (quality optimized)" => WaterMode::ReflectionRefractionQuality,
            _ => WaterMode::ReflectionRefractionSpeed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WaterMode::Basic => "Basic (fastest)",
            WaterMode::Reflection => "Reflection",
            WaterMode::ReflectionRefractionSpeed => "Reflection + refraction (speed optimized)",
            WaterMode::ReflectionRefractionQuality => "Reflection + refraction (quality optimized)",
        }
    }

    pub fn needs_reflection(&self) -> bool {
        !matches!(self, WaterMode::Basic)
    }

    pub fn needs_refraction(&self) -> bool {
        matches!(
            self,
            WaterMode::ReflectionRefractionSpeed | WaterMode::ReflectionRefractionQuality
        )
    }

    /// Which offscreen targets to render this frame: `(reflection, refraction)`.
    pub fn targets_for_frame(&self, frame: u64) -> (bool, bool) {
        match self {
            WaterMode::Basic => (false, false),
            WaterMode::Reflection => (true, false),
            WaterMode::ReflectionRefractionSpeed => {
                if frame % 2 == 0 {
                    (true, false)
                } else {
                    (false, true)
                }
            }
            WaterMode::ReflectionRefractionQuality => (true, true),
        }
    }

    /// Fragment entry point for the patch material. Submerged observers get
    /// the inverted-fresnel underside variant in the refracting modes.
    pub fn fragment_entry(&self, submerged: bool) -> &'static str {
        match self {
            WaterMode::Basic => "fs_basic",
            WaterMode::Reflection => "fs_reflect",
            WaterMode::ReflectionRefractionSpeed | WaterMode::ReflectionRefractionQuality => {
                if submerged {
                    "fs_underside"
                } else {
                    "fs_reflect_refract"
                }
            }
        }
    }

    /// Hard capability gate: modes beyond basic need GPU program support.
    /// Fails loudly at init; silent fallback would hide a user-visible
    /// misconfiguration.
    pub fn validate(&self, caps: &Capabilities) -> Result<(), WaterError> {
        if *self == WaterMode::Basic {
            return Ok(());
        }
        let missing = match (caps.vertex_programs, caps.fragment_programs) {
            (true, true) => return Ok(()),
            (false, true) => "vertex program",
            (true, false) => "fragment program",
            (false, false) => "vertex and fragment program",
        };
        Err(WaterError::CapabilityInsufficient {
            mode: *self,
            missing,
        })
    }
}
