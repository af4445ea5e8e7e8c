//! vQbit state: immutable amplitude snapshot with derived measures.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{VQbitError, VQbitResult};
use crate::rng::VirtueRng;
use crate::virtue::VirtueKind;

/// Tolerance on the normalization invariant Σ|ψᵢ|² ≈ 1.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Upper bound on indices visited by the coherence heuristic.
const COHERENCE_SAMPLE: usize = 1000;

/// Virtue kind → score in [0, 1].
///
/// `BTreeMap` iterates in `VirtueKind` declaration order, which collapse
/// relies on for reproducible floating-point accumulation.
pub type VirtueScores = BTreeMap<VirtueKind, f64>;

/// Entanglement bookkeeping: peer id → complex matrix.
///
/// Carried through every transformation untouched; no dynamics read it.
pub type EntanglementMap = HashMap<String, Vec<Vec<Complex64>>>;

/// Immutable snapshot of a virtual qubit.
///
/// A vQbit is a normalized complex amplitude vector plus derived measures:
/// a bounded coherence heuristic, per-virtue scores, and entanglement
/// bookkeeping. Transformations always produce a new state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VQbitState {
    amplitudes: Vec<Complex64>,
    coherence: f64,
    entanglement: EntanglementMap,
    virtue_scores: VirtueScores,
    metadata: HashMap<String, String>,
}

impl VQbitState {
    /// Assembles a state from already-computed parts.
    ///
    /// Callers are expected to hand in normalized amplitudes; the engine's
    /// construction paths all do.
    pub fn new(
        amplitudes: Vec<Complex64>,
        coherence: f64,
        entanglement: EntanglementMap,
        virtue_scores: VirtueScores,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            amplitudes,
            coherence,
            entanglement,
            virtue_scores,
            metadata,
        }
    }

    /// Merges extra metadata entries into the state, overwriting on key clash.
    pub fn with_metadata(mut self, extra: HashMap<String, String>) -> Self {
        self.metadata.extend(extra);
        self
    }

    /// Replaces the recorded virtue scores, e.g. after a fresh measurement.
    pub fn with_virtue_scores(mut self, virtue_scores: VirtueScores) -> Self {
        self.virtue_scores = virtue_scores;
        self
    }

    /// Equal superposition of all basis states: ψᵢ = 1/√N.
    ///
    /// Coherence is 1.0 (pure, maximally spread) and virtue scores start at
    /// the neutral 0.25 each.
    pub fn uniform_superposition(dimension: usize) -> VQbitResult<Self> {
        if dimension == 0 {
            return Err(VQbitError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }

        let amplitude = 1.0 / (dimension as f64).sqrt();
        let amplitudes = vec![Complex64::new(amplitude, 0.0); dimension];

        let mut metadata = HashMap::new();
        metadata.insert("type".to_string(), "uniform_superposition".to_string());

        Ok(Self {
            amplitudes,
            coherence: 1.0,
            entanglement: EntanglementMap::new(),
            virtue_scores: VirtueKind::neutral_scores(),
            metadata,
        })
    }

    /// Random superposition with independent U(−0.1, 0.1) real/imag draws,
    /// normalized so Σ|ψᵢ|² = 1.
    ///
    /// With a seed the state is reproducible; without one it is drawn from
    /// system entropy. Virtue scores stay neutral until measured.
    pub fn random_superposition(dimension: usize, seed: Option<u64>) -> VQbitResult<Self> {
        let mut rng = VirtueRng::from_optional_seed(seed);
        Self::random_superposition_with(dimension, &mut rng)
    }

    /// Random superposition drawn from a caller-owned generator.
    ///
    /// Draw order is fixed: real then imaginary, index by index.
    pub fn random_superposition_with(
        dimension: usize,
        rng: &mut VirtueRng,
    ) -> VQbitResult<Self> {
        if dimension == 0 {
            return Err(VQbitError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }

        let mut amplitudes = Vec::with_capacity(dimension);
        for _ in 0..dimension {
            let re = rng.uniform(-0.1, 0.1);
            let im = rng.uniform(-0.1, 0.1);
            amplitudes.push(Complex64::new(re, im));
        }

        if !normalize(&mut amplitudes) {
            // All draws collapsed to zero; fall back instead of dividing by it.
            return Self::uniform_superposition(dimension);
        }

        let coherence = coherence_of(&amplitudes);

        let mut metadata = HashMap::new();
        metadata.insert("type".to_string(), "random_superposition".to_string());

        Ok(Self {
            amplitudes,
            coherence,
            entanglement: EntanglementMap::new(),
            virtue_scores: VirtueKind::neutral_scores(),
            metadata,
        })
    }

    /// Dimension of the amplitude space.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Complex amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Coherence heuristic in [0, 1].
    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    /// Entanglement bookkeeping.
    pub fn entanglement(&self) -> &EntanglementMap {
        &self.entanglement
    }

    /// Per-virtue scores.
    pub fn virtue_scores(&self) -> &VirtueScores {
        &self.virtue_scores
    }

    /// Free-form metadata.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Whether Σ|ψᵢ|² is within [`NORM_TOLERANCE`] of 1.
    pub fn is_normalized(&self) -> bool {
        let norm_squared: f64 = self.amplitudes.iter().map(|a| a.norm_sqr()).sum();
        (norm_squared - 1.0).abs() < NORM_TOLERANCE
    }
}

/// Normalizes amplitudes in place so Σ|ψᵢ|² = 1.
///
/// Returns `false` when the vector has zero norm, in which case the caller
/// must substitute a defined default state instead of dividing by zero.
pub fn normalize(amplitudes: &mut [Complex64]) -> bool {
    let norm_squared: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
    if norm_squared <= 0.0 || !norm_squared.is_finite() {
        return false;
    }
    let factor = 1.0 / norm_squared.sqrt();
    for a in amplitudes.iter_mut() {
        *a *= factor;
    }
    true
}

/// Bounded coherence heuristic over the first min(N, 1000) indices.
///
/// Sums |ρᵢⱼ| = |ψᵢ ψⱼ*| over sampled pairs i < j and divides by the pair
/// count. Returns 0 for dimension ≤ 1. This is a cheap spread measure, not a
/// full-space density-matrix computation.
pub fn coherence_of(amplitudes: &[Complex64]) -> f64 {
    let n = amplitudes.len();
    if n <= 1 {
        return 0.0;
    }

    let sample = n.min(COHERENCE_SAMPLE);
    let mut sum = 0.0;
    for i in 0..sample {
        for j in (i + 1)..sample {
            sum += (amplitudes[i] * amplitudes[j].conj()).norm();
        }
    }

    let pairs = (sample * (sample - 1)) as f64 / 2.0;
    if pairs > 0.0 {
        sum / pairs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_superposition_is_normalized() {
        for dim in [1, 2, 3, 64, 513] {
            let state = VQbitState::uniform_superposition(dim).unwrap();
            assert_eq!(state.dimension(), dim);
            assert!(state.is_normalized(), "dim {dim} not normalized");
            assert_eq!(state.coherence(), 1.0);
        }
    }

    #[test]
    fn test_uniform_superposition_neutral_scores() {
        let state = VQbitState::uniform_superposition(16).unwrap();
        for kind in VirtueKind::ALL {
            assert_eq!(state.virtue_scores()[&kind], 0.25);
        }
    }

    #[test]
    fn test_random_superposition_is_normalized() {
        for dim in [1, 2, 128, 1024] {
            let state = VQbitState::random_superposition(dim, Some(42)).unwrap();
            assert!(state.is_normalized(), "dim {dim} not normalized");
        }
    }

    #[test]
    fn test_random_superposition_seed_reproducible() {
        let a = VQbitState::random_superposition(256, Some(7)).unwrap();
        let b = VQbitState::random_superposition(256, Some(7)).unwrap();
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            assert_eq!(x.re.to_bits(), y.re.to_bits());
            assert_eq!(x.im.to_bits(), y.im.to_bits());
        }
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            VQbitState::uniform_superposition(0),
            Err(VQbitError::InvalidDimension { .. })
        ));
        assert!(matches!(
            VQbitState::random_superposition(0, None),
            Err(VQbitError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_coherence_bounds() {
        let state = VQbitState::random_superposition(512, Some(3)).unwrap();
        let c = state.coherence();
        assert!((0.0..=1.0).contains(&c), "coherence {c} out of bounds");
    }

    #[test]
    fn test_coherence_trivial_dimension() {
        assert_eq!(coherence_of(&[]), 0.0);
        assert_eq!(coherence_of(&[Complex64::new(1.0, 0.0)]), 0.0);
    }

    #[test]
    fn test_coherence_of_basis_state_is_zero() {
        // A single occupied basis index has no off-diagonal weight.
        let mut amps = vec![Complex64::new(0.0, 0.0); 32];
        amps[4] = Complex64::new(1.0, 0.0);
        assert_eq!(coherence_of(&amps), 0.0);
    }

    #[test]
    fn test_normalize_zero_vector_reports_failure() {
        let mut amps = vec![Complex64::new(0.0, 0.0); 8];
        assert!(!normalize(&mut amps));
    }

    #[test]
    fn test_normalize_scales_to_unit_norm() {
        let mut amps = vec![Complex64::new(3.0, 4.0), Complex64::new(0.0, -2.0)];
        assert!(normalize(&mut amps));
        let norm: f64 = amps.iter().map(|a| a.norm_sqr()).sum();
        assert!((norm - 1.0).abs() < NORM_TOLERANCE);
    }
}
