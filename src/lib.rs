//! Waterline library - Analytic ocean wave field with planar reflections

pub mod camera;
pub mod cli;
pub mod environment;
pub mod error;
pub mod params;
pub mod patch;
pub mod quality;
pub mod reflection;
pub mod rendering;
pub mod tracker;
pub mod water;
pub mod waves;
