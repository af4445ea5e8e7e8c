//! The stable backend contract.
//!
//! Every vQbit backend implements [`VQbitBackend`]; domain validators depend
//! on nothing else. This interface is the system's stability boundary — it
//! grows by addition only, never by breaking change.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vqbit_core::{VQbitResult, VQbitState, VirtueKind, VirtueScores};

/// Default dimension when neither config nor capability overrides it.
pub const DEFAULT_DIMENSION: usize = 8096;

/// Per-virtue weighting used by collapse policies.
///
/// The balanced default is an explicit constant, not a hidden global.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtueWeights {
    pub justice: f64,
    pub temperance: f64,
    pub prudence: f64,
    pub fortitude: f64,
}

impl VirtueWeights {
    /// Balanced weighting: 1.0 per virtue.
    pub const BALANCED: VirtueWeights = VirtueWeights {
        justice: 1.0,
        temperance: 1.0,
        prudence: 1.0,
        fortitude: 1.0,
    };

    /// Weight for one virtue.
    pub fn weight_for(&self, kind: VirtueKind) -> f64 {
        match kind {
            VirtueKind::Justice => self.justice,
            VirtueKind::Temperance => self.temperance,
            VirtueKind::Prudence => self.prudence,
            VirtueKind::Fortitude => self.fortitude,
        }
    }

    /// Collapse targets derived from the weights, clamped into score range.
    pub fn to_targets(&self) -> VirtueScores {
        VirtueKind::ALL
            .iter()
            .map(|&kind| (kind, self.weight_for(kind).clamp(0.0, 1.0)))
            .collect()
    }
}

impl Default for VirtueWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VQbitConfig {
    /// Amplitude-space dimension (must be positive).
    pub dimension: usize,
    /// Reproducibility seed; absent means system entropy.
    pub seed: Option<u64>,
    /// Hint that the caller would like GPU acceleration.
    pub use_gpu: bool,
    /// Default collapse weighting.
    pub virtue_weights: VirtueWeights,
    /// When true, the device-capability lookup overrides `dimension`.
    pub adaptive_dimension: bool,
}

impl Default for VQbitConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            seed: None,
            use_gpu: true,
            virtue_weights: VirtueWeights::BALANCED,
            adaptive_dimension: true,
        }
    }
}

/// One evolution request for [`VQbitBackend::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionUnit {
    pub hamiltonian_terms: Vec<HamiltonianTerm>,
    pub time_step: f64,
    pub iterations: u32,
}

impl Default for EvolutionUnit {
    fn default() -> Self {
        Self {
            hamiltonian_terms: Vec::new(),
            time_step: 0.01,
            iterations: 100,
        }
    }
}

/// Weighted Hamiltonian contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianTerm {
    pub kind: HamiltonianKind,
    pub coefficient: f64,
}

/// Vocabulary of Hamiltonian operators a backend may support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HamiltonianKind {
    Justice,
    Temperance,
    Prudence,
    Fortitude,
    Laplacian,
    Custom(String),
}

/// Measurement policy for [`VQbitBackend::collapse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsePolicy {
    pub virtue_weights: VirtueWeights,
    pub deterministic: bool,
    pub threshold: f64,
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        Self {
            virtue_weights: VirtueWeights::BALANCED,
            deterministic: false,
            threshold: 0.01,
        }
    }
}

/// Immutable result record of one backend operation.
///
/// The only channel carrying results out of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: VQbitState,
    pub virtue_scores: VirtueScores,
    pub coherence: f64,
    /// Scalar summary of the entanglement bookkeeping.
    pub entanglement: f64,
    pub timestamp: DateTime<Utc>,
    pub receipt_id: Option<String>,
}

/// Snapshot plus cryptographic attestation fields.
///
/// This core defines the shape only; hash, signature, and Merkle root are
/// produced by external collaborators (see [`crate::attest`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptBundle {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub inputs: Vec<u8>,
    pub outputs: Vec<u8>,
    pub canonical_form: Vec<u8>,
    pub hash: Vec<u8>,
    pub signature: Vec<u8>,
    pub merkle_root: Vec<u8>,
    pub engine_type: String,
    pub device_capability: String,
    pub deterministic: bool,
}

/// Backend introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub engine_type: String,
    pub dimension: usize,
    pub is_configured: bool,
    pub current_state: Option<VQbitState>,
    pub device: String,
    pub memory_usage: u64,
}

/// **Stable contract** — extend via new methods only, never break it.
///
/// One backend instance is a serialized single-writer unit: operations run
/// to completion before the next is accepted. Independent instances run
/// fully in parallel. No cancellation: a started step/collapse always
/// finishes; timeouts are the caller's concern.
#[async_trait]
pub trait VQbitBackend: Send + Sync {
    /// Applies a configuration. Idempotent for an identical config.
    async fn configure(&self, config: VQbitConfig) -> VQbitResult<()>;

    /// Performs one evolution step and snapshots the result.
    async fn step(&self, unit: &EvolutionUnit) -> VQbitResult<Snapshot>;

    /// Applies a virtue-guided collapse and snapshots the result.
    async fn collapse(&self, policy: &CollapsePolicy) -> VQbitResult<Snapshot>;

    /// Turns the latest snapshot into an attestable bundle.
    ///
    /// Fails with `NotConfigured` before `configure`, and with
    /// `ReceiptGenerationFailed` when no step/collapse has run yet.
    async fn receipt(&self) -> VQbitResult<ReceiptBundle>;

    /// Introspection.
    async fn status(&self) -> EngineStatus;

    /// Clears the last snapshot; the configuration is kept.
    async fn reset(&self) -> VQbitResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_weights_target_full_scores() {
        let targets = VirtueWeights::BALANCED.to_targets();
        for kind in VirtueKind::ALL {
            assert_eq!(targets[&kind], 1.0);
        }
    }

    #[test]
    fn test_targets_clamped_into_score_range() {
        let weights = VirtueWeights {
            justice: 2.5,
            temperance: -1.0,
            prudence: 0.3,
            fortitude: 1.0,
        };
        let targets = weights.to_targets();
        assert_eq!(targets[&VirtueKind::Justice], 1.0);
        assert_eq!(targets[&VirtueKind::Temperance], 0.0);
        assert_eq!(targets[&VirtueKind::Prudence], 0.3);
    }

    #[test]
    fn test_config_default_is_adaptive() {
        let config = VQbitConfig::default();
        assert_eq!(config.dimension, DEFAULT_DIMENSION);
        assert!(config.adaptive_dimension);
        assert!(config.seed.is_none());
    }
}
