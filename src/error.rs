//! Error types for the windowed backend.
//!
//! Every failure here is recoverable by design: the runner degrades to an
//! immediate, non-animated reveal rather than leaving content hidden.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running a windowed reveal.
#[derive(Debug)]
pub enum RevealError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RevealError::Window(e) => write!(f, "Failed to create window: {}", e),
            RevealError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::EventLoop(e) => Some(e),
            RevealError::Window(e) => Some(e),
            RevealError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RevealError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RevealError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RevealError {
    fn from(e: winit::error::OsError) -> Self {
        RevealError::Window(e)
    }
}

impl From<GpuError> for RevealError {
    fn from(e: GpuError) -> Self {
        RevealError::Gpu(e)
    }
}
