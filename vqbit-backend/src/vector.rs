//! Vector (CPU) backend.

use std::collections::HashMap;

use chrono::Utc;
use num_complex::Complex64;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use crate::attest::AttestationSuite;
use crate::capability::DeviceCapability;
use crate::contract::{
    CollapsePolicy, EngineStatus, EvolutionUnit, ReceiptBundle, Snapshot, VQbitBackend,
    VQbitConfig,
};
use vqbit_core::{VQbitError, VQbitResult, VQbitState};
use vqbit_engine::{VQbitEngine, DEFAULT_COLLAPSE_STRENGTH};

/// Engine-type tag carried by snapshots, receipts and status.
const ENGINE_TYPE: &str = "vector";

/// Refuse absurd allocations up front instead of aborting in the allocator.
const MAX_DIMENSION: usize = 1 << 24;

/// CPU implementation of the backend contract.
///
/// All mutable state sits behind one `tokio::sync::Mutex`, which is the
/// contract's serialization guarantee: operations on an instance run to
/// completion one at a time, while independent instances share nothing.
pub struct VectorBackend {
    device: DeviceCapability,
    attestation: AttestationSuite,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: Option<VQbitConfig>,
    engine: Option<VQbitEngine>,
    last_snapshot: Option<Snapshot>,
}

impl VectorBackend {
    /// Builds an unconfigured backend for the given device.
    pub fn new(device: DeviceCapability, attestation: AttestationSuite) -> Self {
        Self {
            device,
            attestation,
            inner: Mutex::new(Inner {
                config: None,
                engine: None,
                last_snapshot: None,
            }),
        }
    }

    /// Dimension the config resolves to on this device.
    fn effective_dimension(&self, config: &VQbitConfig) -> usize {
        if config.adaptive_dimension {
            self.device.default_dimension()
        } else {
            config.dimension
        }
    }

    fn make_snapshot(state: VQbitState) -> Snapshot {
        // Scalar summary of the bookkeeping map; there are no dynamics in it.
        let entanglement = if state.entanglement().is_empty() {
            0.0
        } else {
            state.entanglement().len() as f64 / 10.0
        };

        Snapshot {
            virtue_scores: state.virtue_scores().clone(),
            coherence: state.coherence(),
            entanglement,
            timestamp: Utc::now(),
            receipt_id: None,
            state,
        }
    }
}

#[async_trait::async_trait]
impl VQbitBackend for VectorBackend {
    async fn configure(&self, config: VQbitConfig) -> VQbitResult<()> {
        let dimension = self.effective_dimension(&config);
        if dimension == 0 {
            return Err(VQbitError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }
        if dimension > MAX_DIMENSION {
            return Err(VQbitError::OutOfMemory(dimension));
        }

        let mut inner = self.inner.lock().await;
        if inner.config.as_ref() == Some(&config) {
            // Idempotent: an identical config leaves the engine untouched.
            return Ok(());
        }

        inner.engine = Some(VQbitEngine::new(dimension, config.seed)?);
        inner.config = Some(config);
        inner.last_snapshot = None;
        Ok(())
    }

    async fn step(&self, unit: &EvolutionUnit) -> VQbitResult<Snapshot> {
        let mut inner = self.inner.lock().await;
        let previous = inner.last_snapshot.as_ref().map(|s| s.state.clone());
        let engine = inner.engine.as_mut().ok_or(VQbitError::NotConfigured)?;

        debug!(
            time_step = unit.time_step,
            iterations = unit.iterations,
            terms = unit.hamiltonian_terms.len(),
            "evolution step"
        );

        // First step draws the working state from the engine RNG; later
        // steps evolve the current one by the unit's accumulated phase.
        let state = match previous {
            None => {
                // A fresh state carries placeholder scores until measured;
                // snapshots only ever report measured values.
                let state = engine.create_vqbit_state(None, HashMap::new())?;
                let virtue_scores = engine.measure_virtues(state.amplitudes())?;
                state.with_virtue_scores(virtue_scores)
            }
            Some(current) => {
                let theta = unit.time_step * unit.iterations as f64 * 0.1;
                let phase = Complex64::from_polar(1.0, theta);
                let amplitudes: Vec<Complex64> =
                    current.amplitudes().iter().map(|&a| a * phase).collect();
                if amplitudes.iter().any(|a| !a.re.is_finite() || !a.im.is_finite()) {
                    return Err(VQbitError::EvolutionFailed(
                        "phase rotation produced non-finite amplitudes".into(),
                    ));
                }
                let virtue_scores = engine.measure_virtues(&amplitudes)?;
                let coherence = vqbit_core::coherence_of(&amplitudes);
                VQbitState::new(
                    amplitudes,
                    coherence,
                    current.entanglement().clone(),
                    virtue_scores,
                    current.metadata().clone(),
                )
            }
        };

        let snapshot = Self::make_snapshot(state);
        inner.last_snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn collapse(&self, policy: &CollapsePolicy) -> VQbitResult<Snapshot> {
        let mut inner = self.inner.lock().await;
        let engine = inner.engine.as_mut().ok_or(VQbitError::NotConfigured)?;

        // Collapse corrections steer from the measured scores, not the
        // fresh state's placeholders.
        let state = engine.create_vqbit_state(None, HashMap::new())?;
        let virtue_scores = engine.measure_virtues(state.amplitudes())?;
        let state = state.with_virtue_scores(virtue_scores);

        let targets = policy.virtue_weights.to_targets();
        let collapsed = engine.apply_virtue_collapse(&state, &targets, DEFAULT_COLLAPSE_STRENGTH)?;

        debug!(deterministic = policy.deterministic, "virtue collapse");

        let snapshot = Self::make_snapshot(collapsed);
        inner.last_snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn receipt(&self) -> VQbitResult<ReceiptBundle> {
        let mut inner = self.inner.lock().await;
        let config = inner.config.clone().ok_or(VQbitError::NotConfigured)?;
        let snapshot = inner.last_snapshot.clone().ok_or_else(|| {
            VQbitError::ReceiptGenerationFailed("no operations performed yet".into())
        })?;

        let dimension = snapshot.state.dimension();
        let inputs = serde_json::to_vec(&json!({
            "dimension": dimension,
            "seed": config.seed,
        }))
        .map_err(|e| VQbitError::ReceiptGenerationFailed(e.to_string()))?;
        let outputs = serde_json::to_vec(&json!({
            "coherence": snapshot.coherence,
            "virtue_scores": snapshot.virtue_scores,
        }))
        .map_err(|e| VQbitError::ReceiptGenerationFailed(e.to_string()))?;

        let canonical_value = json!({
            "timestamp": snapshot.timestamp.to_rfc3339(),
            "dimension": dimension,
            "coherence": snapshot.coherence,
            "virtue_scores": snapshot.virtue_scores,
            "engine": ENGINE_TYPE,
        });

        // Collaborators do all cryptographic work; this core only routes
        // bytes between them.
        let canonical_form = self.attestation.canonical.canonicalize(&canonical_value)?;
        let hash = self.attestation.hasher.digest(&canonical_form)?;
        let signature = self.attestation.signer.sign(&hash)?;
        let inclusion = self.attestation.merkle.prove(&hash)?;

        let id = format!("vqr-{}", hex::encode(&hash[..hash.len().min(8)]));
        if let Some(snap) = inner.last_snapshot.as_mut() {
            snap.receipt_id = Some(id.clone());
        }

        Ok(ReceiptBundle {
            id,
            timestamp: snapshot.timestamp,
            inputs,
            outputs,
            canonical_form,
            hash,
            signature,
            merkle_root: inclusion.root,
            engine_type: ENGINE_TYPE.to_string(),
            device_capability: self.device.to_string(),
            deterministic: config.seed.is_some(),
        })
    }

    async fn status(&self) -> EngineStatus {
        let inner = self.inner.lock().await;
        let dimension = inner
            .engine
            .as_ref()
            .map(|e| e.dimension())
            .unwrap_or_default();

        EngineStatus {
            engine_type: ENGINE_TYPE.to_string(),
            dimension,
            is_configured: inner.config.is_some(),
            current_state: inner.last_snapshot.as_ref().map(|s| s.state.clone()),
            device: self.device.to_string(),
            memory_usage: (dimension * std::mem::size_of::<num_complex::Complex64>()) as u64,
        }
    }

    async fn reset(&self) -> VQbitResult<()> {
        let mut inner = self.inner.lock().await;
        inner.last_snapshot = None;
        Ok(())
    }
}
