//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`JourneyError`] covers the fallible edges of the
//! application:
//! - GPU initialization failures
//! - Window and event loop errors
//! - Asset and settings loading errors
//!
//! Runtime scene logic (clicks, clip requests, camera easing) has no failure
//! modes; unknown clip names and out-of-range waypoints are logged and ignored.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, JourneyError>`.

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum JourneyError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create or configure the presentation surface.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(String),

    /// The OS refused to create the window.
    #[error("Failed to create window: {0}")]
    WindowCreateFailed(#[from] winit::error::OsError),

    /// Window system error.
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Settings were parsed but hold values the scene cannot run with.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for JourneyError {
    fn from(err: image::ImageError) -> Self {
        JourneyError::ImageDecodeError(err.to_string())
    }
}

impl From<gltf::Error> for JourneyError {
    fn from(err: gltf::Error) -> Self {
        JourneyError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, JourneyError>`.
pub type Result<T> = std::result::Result<T, JourneyError>;
