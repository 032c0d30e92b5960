//! Terrain-side water settings.
//!
//! The terrain config exposes water as a small key/value surface. Keys not
//! listed here belong to other subsystems and are ignored.

/// Water settings consumed from the terrain config.
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Flat water height h0 in meters (world Y). Key: `WaterLine`.
    pub water_line: f32,
    /// Bottom plane Y in meters. Key: `WaterBottomLine`.
    pub water_bottom_line: f32,
    /// Whether wave trains are active. Key: `Waves`.
    pub waves: bool,
    /// Render mode selection string. Key: `Water effects`.
    pub water_effects: String,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            water_line: 5.0,
            water_bottom_line: -25.0,
            waves: true,
            water_effects: "Reflection + refraction (speed optimized)".to_string(),
        }
    }
}

impl TerrainParams {
    /// Parse `Key = value` lines, keeping defaults for absent keys.
    pub fn parse(text: &str) -> Self {
        let mut params = Self::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "WaterLine" => {
                    if let Ok(v) = value.parse() {
                        params.water_line = v;
                    }
                }
                "WaterBottomLine" => {
                    if let Ok(v) = value.parse() {
                        params.water_bottom_line = v;
                    }
                }
                "Waves" => {
                    params.waves = matches!(value.to_lowercase().as_str(), "yes" | "true" | "1");
                }
                "Water effects" => {
                    params.water_effects = value.to_string();
                }
                _ => {}
            }
        }

        params
    }
}
