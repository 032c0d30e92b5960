//! Command-line argument parsing.

use std::path::Path;

use clap::Parser;

use crate::params::{read_wave_config, RenderConfig, TerrainParams, WaveDef};
use crate::quality::WaterMode;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Waterline")]
#[command(about = "Ocean wave field and reflection-plane demo", long_about = None)]
pub struct Args {
    /// Wave train config (one train per line: wavelength, amplitude, max height, direction)
    #[arg(long, value_name = "FILE", default_value = "assets/waves.cfg")]
    pub waves: String,

    /// Terrain config with WaterLine / Waves / Water effects keys
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<String>,

    /// Water effects override: none, reflection, speed, quality
    #[arg(long, value_name = "MODE")]
    pub effects: Option<String>,

    /// Flat water height override (meters)
    #[arg(long, value_name = "METERS")]
    pub water_line: Option<f32>,

    /// Disable wave trains entirely
    #[arg(long)]
    pub flat: bool,

    /// Window width (pixels)
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, default_value = "720")]
    pub height: u32,
}

impl Args {
    /// Terrain-side water settings: file values first, then CLI overrides.
    pub fn terrain_params(&self) -> TerrainParams {
        let mut params = match &self.terrain {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => TerrainParams::parse(&text),
                Err(e) => {
                    eprintln!("Warning: could not read terrain config '{}': {}", path, e);
                    TerrainParams::default()
                }
            },
            None => TerrainParams::default(),
        };

        if let Some(h) = self.water_line {
            params.water_line = h;
        }
        if self.flat {
            params.waves = false;
        }
        if let Some(effects) = &self.effects {
            params.water_effects = match effects.to_lowercase().as_str() {
                "none" | "basic" => "None".to_string(),
                "reflection" => "Reflection".to_string(),
                "speed" => "Reflection + refraction (speed optimized)".to_string(),
                "quality" => "Reflection + refraction (quality optimized)".to_string(),
                _ => effects.clone(),
            };
        }

        println!(
            "Water effects: {}",
            WaterMode::parse(&params.water_effects).label()
        );
        params
    }

    /// Load the wave-train table.
    pub fn wave_defs(&self) -> Vec<WaveDef> {
        let defs = read_wave_config(Path::new(&self.waves));
        if defs.is_empty() {
            println!("No wave trains loaded from '{}'; water stays flat", self.waves);
        } else {
            println!("Loaded {} wave train(s) from '{}'", defs.len(), self.waves);
        }
        defs
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            ..RenderConfig::default()
        }
    }
}
