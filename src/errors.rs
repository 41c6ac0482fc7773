// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photobooth

use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Camera-related errors
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
    /// Relay board / serial link errors
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),
    /// Photo capture errors
    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Storage/filesystem errors
    #[error("Storage error: {0}")]
    Storage(String),
    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    /// Device could not be opened
    #[error("Failed to open {path}: {reason}")]
    OpenFailed { path: String, reason: String },
    /// Device negotiated a format other than the one requested
    #[error("Unsupported format: {0}")]
    InvalidFormat(String),
    /// Streaming could not be started
    #[error("Failed to start streaming: {0}")]
    StreamFailed(String),
}

/// Relay board link errors
#[derive(Debug, Clone, Error)]
pub enum HardwareError {
    /// Serial port could not be opened
    #[error("Failed to open serial port {port}: {reason}")]
    OpenFailed { port: String, reason: String },
    /// Port handle could not be cloned for the reader thread
    #[error("Failed to clone serial port: {0}")]
    CloneFailed(String),
    /// Write to the board failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// Photo capture errors
#[derive(Debug, Clone, Error)]
pub enum PhotoError {
    /// No frame available for capture
    #[error("No frame available for capture")]
    NoFrameAvailable,
    /// Frame buffer shorter than its declared geometry
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
    /// Encoding failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
    /// Save failed
    #[error("Save failed: {0}")]
    SaveFailed(String),
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}
