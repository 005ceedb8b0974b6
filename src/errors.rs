//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`PetError`] covers all failure modes including:
//! - Retargeting failures (a motion skeleton without a recognizable hips bone)
//! - Character session misuse (playing motion before an avatar is loaded)
//! - Asset loading and decoding errors
//!
//! Per-track resolution failures during retargeting are *not* errors: a bone
//! the target rig does not have simply produces no track.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, PetError>`.
//!
//! ```rust,ignore
//! use vrm_pet::errors::{PetError, Result};
//!
//! fn load_motion() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum PetError {
    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    /// None of the known names for the hips bone resolved in the motion skeleton.
    #[error("Reference bone not found in motion skeleton (tried: {})", tried.join(", "))]
    MissingReferenceBone {
        /// Bone names that were looked up, in order
        tried: Vec<String>,
    },

    /// A track identifier could not be split into `<node>.<property>`.
    #[error("Invalid track name: {0}")]
    InvalidTrackName(String),

    // ========================================================================
    // Character Session Errors
    // ========================================================================
    /// An operation needs an avatar but none is loaded.
    #[error("No avatar loaded")]
    NoAvatarLoaded,

    /// The motion asset contains no animation clip.
    #[error("No animation clip found in motion asset")]
    NoAnimationClip,

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The glTF document has neither a `VRMC_vrm` nor a `VRM` extension.
    #[error("VRM payload missing in file")]
    VrmPayloadMissing,

    /// The asset parsed but its content is inconsistent.
    #[error("Malformed asset: {0}")]
    MalformedAsset(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for PetError {
    fn from(err: gltf::Error) -> Self {
        PetError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, PetError>`.
pub type Result<T> = std::result::Result<T, PetError>;
