//! Error types for the water subsystem.
//!
//! Only initialization can fail hard. Per-frame problems (a vertex buffer
//! whose size stopped matching the patch, a degenerate normal) are contained
//! where they happen and degrade visuals instead of propagating.

use std::fmt;

use crate::quality::WaterMode;

/// Errors that can abort water subsystem initialization.
#[derive(Debug)]
pub enum WaterError {
    /// The requested render mode needs GPU programs the hardware lacks.
    /// Raised at init and never degraded silently.
    CapabilityInsufficient {
        mode: WaterMode,
        missing: &'static str,
    },
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
}

impl fmt::Display for WaterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterError::CapabilityInsufficient { mode, missing } => write!(
                f,
                "Water mode '{}' requires {} support, which this hardware does not report",
                mode.label(),
                missing
            ),
            WaterError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            WaterError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."
            ),
            WaterError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            WaterError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            WaterError::Window(e) => write!(f, "Failed to create window: {}", e),
        }
    }
}

impl std::error::Error for WaterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WaterError::SurfaceCreation(e) => Some(e),
            WaterError::DeviceCreation(e) => Some(e),
            WaterError::EventLoop(e) => Some(e),
            WaterError::Window(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for WaterError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        WaterError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for WaterError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        WaterError::DeviceCreation(e)
    }
}

impl From<winit::error::EventLoopError> for WaterError {
    fn from(e: winit::error::EventLoopError) -> Self {
        WaterError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for WaterError {
    fn from(e: winit::error::OsError) -> Self {
        WaterError::Window(e)
    }
}
