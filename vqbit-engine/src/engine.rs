//! The vQbit orchestrator.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::problem::{OptimizationProblem, Solution};
use vqbit_core::{
    coherence_of, derive_substream_seed, normalize, stable_name_hash, VQbitError, VQbitResult,
    VQbitState, VirtueKind, VirtueOperators, VirtueRng, VirtueScores,
};

/// Default correction strength for virtue-guided collapse.
pub const DEFAULT_COLLAPSE_STRENGTH: f64 = 0.1;

/// Default time step for entangled evolution.
pub const DEFAULT_TIME_STEP: f64 = 0.1;

/// Substream id for the engine's state RNG; the operator recipes use 0–3.
const STATE_RNG_SUBSTREAM: u64 = 4;

/// Engine introspection summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub dimension: usize,
    pub initialized: bool,
    pub active_problems: usize,
    pub total_solutions: usize,
}

/// Serialized orchestrator over one fixed-dimension amplitude space.
///
/// Owns the virtue-operator bundle, a problem registry, and a solution
/// archive. An instance is a single-writer unit: calls run to completion
/// before the next is accepted (callers wrap it in a mutex or message queue
/// — see `vqbit-backend`). Independent instances share nothing.
#[derive(Debug, Clone)]
pub struct VQbitEngine {
    dimension: usize,
    operators: VirtueOperators,
    problems: HashMap<String, OptimizationProblem>,
    archive: HashMap<String, Vec<Solution>>,
    rng: VirtueRng,
    initialized: bool,
}

impl VQbitEngine {
    /// Builds an engine for one dimension, with optional reproducibility seed.
    ///
    /// The seed drives both the operator recipes and the engine's own state
    /// RNG through separate substreams, so the whole run replays from a
    /// single seed. Initialized is true from construction on; there is no
    /// partial-init recovery path.
    pub fn new(dimension: usize, seed: Option<u64>) -> VQbitResult<Self> {
        if dimension == 0 {
            return Err(VQbitError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }

        let operators = VirtueOperators::new(dimension, seed)?;
        let rng = VirtueRng::from_optional_seed(
            seed.map(|s| derive_substream_seed(s, STATE_RNG_SUBSTREAM)),
        );

        info!(dimension, seeded = seed.is_some(), "vQbit engine initialized");

        Ok(Self {
            dimension,
            operators,
            problems: HashMap::new(),
            archive: HashMap::new(),
            rng,
            initialized: true,
        })
    }

    /// Fixed amplitude-space dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The engine's operator bundle.
    pub fn operators(&self) -> &VirtueOperators {
        &self.operators
    }

    /// Always true after construction.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Creates a new vQbit state.
    ///
    /// With `initial_values` the classical variables are encoded into the
    /// amplitude space; without them a random superposition is drawn from
    /// the engine-owned RNG.
    pub fn create_vqbit_state(
        &mut self,
        initial_values: Option<&BTreeMap<String, f64>>,
        context: HashMap<String, String>,
    ) -> VQbitResult<VQbitState> {
        match initial_values {
            Some(values) => self.encode_classical_values(values, context),
            None => VQbitState::random_superposition_with(self.dimension, &mut self.rng)
                .map(|state| state.with_metadata(context)),
        }
    }

    /// Encodes classical variables into amplitude positions.
    ///
    /// Index = SipHash(name) mod dimension; amplitude = (value, sin(value·π)).
    /// Names are processed in sorted order and the last write wins on an
    /// index collision — documented information loss, kept for compatibility.
    /// A zero pre-normalization norm falls back to the uniform superposition.
    fn encode_classical_values(
        &self,
        values: &BTreeMap<String, f64>,
        context: HashMap<String, String>,
    ) -> VQbitResult<VQbitState> {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); self.dimension];

        for (name, &value) in values {
            let index = (stable_name_hash(name) % self.dimension as u64) as usize;
            let phase = value * std::f64::consts::PI;
            amplitudes[index] = Complex64::new(value, phase.sin());
        }

        if !normalize(&mut amplitudes) {
            return VQbitState::uniform_superposition(self.dimension);
        }

        let virtue_scores = self.operators.measure(&amplitudes)?;
        let coherence = coherence_of(&amplitudes);

        Ok(VQbitState::new(
            amplitudes,
            coherence,
            Default::default(),
            virtue_scores,
            context,
        ))
    }

    /// Measures all virtue scores for a raw amplitude buffer.
    pub fn measure_virtues(&self, amplitudes: &[Complex64]) -> VQbitResult<VirtueScores> {
        self.operators.measure(amplitudes)
    }

    /// Applies one virtue-guided perturbative correction toward the targets.
    ///
    /// For each targeted virtue, in fixed enumeration order, accumulates
    /// strength·(target − current)·V|ψ⟩ onto the amplitudes, then
    /// renormalizes and re-measures. Entanglement bookkeeping and metadata
    /// carry forward unchanged. This is a first-order correction, not a
    /// physical measurement collapse.
    pub fn apply_virtue_collapse(
        &self,
        state: &VQbitState,
        targets: &VirtueScores,
        strength: f64,
    ) -> VQbitResult<VQbitState> {
        if state.dimension() != self.dimension {
            return Err(VQbitError::InvalidDimension {
                expected: self.dimension,
                got: state.dimension(),
            });
        }

        let mut amplitudes = state.amplitudes().to_vec();

        // Fixed enumeration order keeps floating-point accumulation
        // reproducible across runs.
        for kind in VirtueKind::ALL {
            let Some(&target) = targets.get(&kind) else {
                continue;
            };
            let current = state.virtue_scores().get(&kind).copied().unwrap_or(0.5);
            let correction = target - current;

            let v_psi = self.operators.operator_for(kind).apply(state)?;
            let weight = strength * correction;
            for (a, &vp) in amplitudes.iter_mut().zip(&v_psi) {
                *a += weight * vp;
            }
        }

        if !all_finite(&amplitudes) {
            return Err(VQbitError::CollapseFailed(
                "correction produced non-finite amplitudes".into(),
            ));
        }

        if !normalize(&mut amplitudes) {
            // Corrections cancelled the state entirely; use the defined
            // default rather than dividing by zero.
            amplitudes = VQbitState::uniform_superposition(self.dimension)?
                .amplitudes()
                .to_vec();
        }

        let virtue_scores = self.operators.measure(&amplitudes)?;
        let coherence = coherence_of(&amplitudes);

        debug!(strength, "virtue collapse applied");

        Ok(VQbitState::new(
            amplitudes,
            coherence,
            state.entanglement().clone(),
            virtue_scores,
            state.metadata().clone(),
        ))
    }

    /// Evolves a set of states by one time step.
    ///
    /// No-op for fewer than two states. Otherwise every state receives the
    /// same global phase rotation e^{iθ}, θ = time_step·0.1, and its derived
    /// measures are recomputed. A pure global phase preserves |ψᵢ|² and every
    /// operator expectation, so virtue scores are mathematically unchanged:
    /// the states are not actually coupled (kept for contract compatibility).
    pub fn evolve_entangled_states(
        &self,
        states: &[VQbitState],
        time_step: f64,
    ) -> VQbitResult<Vec<VQbitState>> {
        if states.len() < 2 {
            return Ok(states.to_vec());
        }

        for state in states {
            if state.dimension() != self.dimension {
                return Err(VQbitError::InvalidDimension {
                    expected: self.dimension,
                    got: state.dimension(),
                });
            }
        }

        let theta = time_step * 0.1;
        let phase = Complex64::from_polar(1.0, theta);

        states
            .iter()
            .map(|state| {
                let amplitudes: Vec<Complex64> =
                    state.amplitudes().iter().map(|a| a * phase).collect();

                if !all_finite(&amplitudes) {
                    return Err(VQbitError::EvolutionFailed(
                        "phase rotation produced non-finite amplitudes".into(),
                    ));
                }

                let virtue_scores = self.operators.measure(&amplitudes)?;
                let coherence = coherence_of(&amplitudes);

                Ok(VQbitState::new(
                    amplitudes,
                    coherence,
                    state.entanglement().clone(),
                    virtue_scores,
                    state.metadata().clone(),
                ))
            })
            .collect()
    }

    /// Registers (or replaces) an optimization problem by id.
    pub fn register_problem(&mut self, problem: OptimizationProblem) {
        debug!(problem_id = %problem.id, "problem registered");
        self.problems.insert(problem.id.clone(), problem);
    }

    /// Registered problem by id, if any.
    pub fn get_problem(&self, problem_id: &str) -> Option<&OptimizationProblem> {
        self.problems.get(problem_id)
    }

    /// Archived solutions for a problem; empty for unknown ids.
    pub fn get_solutions(&self, problem_id: &str) -> &[Solution] {
        self.archive
            .get(problem_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Appends a solution to a problem's archive.
    ///
    /// The archive grows only through this call and is never auto-pruned.
    pub fn archive_solution(&mut self, problem_id: &str, solution: Solution) {
        self.archive
            .entry(problem_id.to_string())
            .or_default()
            .push(solution);
    }

    /// Introspection summary.
    pub fn status(&self) -> EngineSummary {
        EngineSummary {
            dimension: self.dimension,
            initialized: self.initialized,
            active_problems: self.problems.len(),
            total_solutions: self.archive.values().map(Vec::len).sum(),
        }
    }
}

fn all_finite(amplitudes: &[Complex64]) -> bool {
    amplitudes
        .iter()
        .all(|a| a.re.is_finite() && a.im.is_finite())
}
