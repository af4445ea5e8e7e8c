//! Error types shared by every vQbit crate.

use thiserror::Error;

/// Result alias used across the vQbit crates.
pub type VQbitResult<T> = Result<T, VQbitError>;

/// Closed set of failures the vQbit core can surface.
///
/// Every variant is recoverable by the caller. Dimension mismatches between
/// states and operators are validated at the public boundary and reported as
/// [`VQbitError::InvalidDimension`] instead of panicking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VQbitError {
    /// Backend operation invoked before `configure`.
    #[error("engine not configured")]
    NotConfigured,

    /// GPU backend forced on a platform without a usable GPU implementation.
    #[error("GPU backend not available on this device")]
    GpuNotAvailable,

    /// Allocation for the requested dimension failed.
    #[error("out of memory allocating dimension {0}")]
    OutOfMemory(usize),

    /// Non-positive dimension, or state/operator dimension mismatch.
    #[error("invalid dimension: expected {expected}, got {got}")]
    InvalidDimension { expected: usize, got: usize },

    /// Evolution produced non-finite amplitudes.
    #[error("evolution failed: {0}")]
    EvolutionFailed(String),

    /// Collapse produced non-finite amplitudes.
    #[error("collapse failed: {0}")]
    CollapseFailed(String),

    /// No prior snapshot, or an attestation collaborator failed.
    #[error("receipt generation failed: {0}")]
    ReceiptGenerationFailed(String),
}
