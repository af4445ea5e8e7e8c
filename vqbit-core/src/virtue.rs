//! Virtue kinds and their Hermitian operators.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{VQbitError, VQbitResult};
use crate::rng::{derive_substream_seed, VirtueRng};
use crate::state::{VQbitState, VirtueScores};

/// Jitter amplitude on the justice diagonal.
const JUSTICE_JITTER: f64 = 0.01;
/// Standard deviation of the temperance diagonal.
const TEMPERANCE_STD_DEV: f64 = 0.1;
/// Lower bound and span of the prudence diagonal, keeping it in [0.1, 0.2].
const PRUDENCE_BASE: f64 = 0.1;
const PRUDENCE_SPAN: f64 = 0.1;
/// Fortitude diagonal value and nearest-neighbour coupling weight.
const FORTITUDE_DIAGONAL: f64 = 0.5;
const FORTITUDE_COUPLING: f64 = 0.1;

/// The four cardinal virtues used as scoring dimensions.
///
/// This is a closed set: collapse behaviour for every consumer is derived
/// from it, so all dispatch is by exhaustive `match`. Declaration order is
/// the fixed enumeration order (and the `Ord` order used by score maps).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VirtueKind {
    Justice,
    Temperance,
    Prudence,
    Fortitude,
}

impl VirtueKind {
    /// All kinds in fixed enumeration order.
    pub const ALL: [VirtueKind; 4] = [
        VirtueKind::Justice,
        VirtueKind::Temperance,
        VirtueKind::Prudence,
        VirtueKind::Fortitude,
    ];

    /// What the virtue promotes in a solution.
    pub fn description(&self) -> &'static str {
        match self {
            VirtueKind::Justice => "fairness and balanced distribution",
            VirtueKind::Temperance => "moderation and efficiency",
            VirtueKind::Prudence => "stability and long-term thinking",
            VirtueKind::Fortitude => "resilience and robustness",
        }
    }

    /// Substream id for seed derivation.
    fn substream(&self) -> u64 {
        match self {
            VirtueKind::Justice => 0,
            VirtueKind::Temperance => 1,
            VirtueKind::Prudence => 2,
            VirtueKind::Fortitude => 3,
        }
    }

    /// Neutral score map: 0.25 per virtue, used before any measurement.
    pub fn neutral_scores() -> VirtueScores {
        Self::ALL.iter().map(|&k| (k, 0.25)).collect()
    }
}

impl std::fmt::Display for VirtueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VirtueKind::Justice => "justice",
            VirtueKind::Temperance => "temperance",
            VirtueKind::Prudence => "prudence",
            VirtueKind::Fortitude => "fortitude",
        };
        write!(f, "{name}")
    }
}

/// One Hermitian operator over a fixed dimension.
///
/// Stored as a real diagonal plus a sparse list of off-diagonal entries.
/// Off-diagonal entries are built as symmetric conjugate pairs, so the
/// operator is Hermitian by construction and its expectation values are real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtueOperator {
    dimension: usize,
    diagonal: Vec<f64>,
    off_diagonal: Vec<(usize, usize, Complex64)>,
    kind: VirtueKind,
}

impl VirtueOperator {
    /// Builds the named recipe for (dimension, optional seed).
    ///
    /// Each kind draws from its own seed substream, so recipes are
    /// bit-reproducible per operator regardless of construction order.
    pub fn for_kind(
        kind: VirtueKind,
        dimension: usize,
        seed: Option<u64>,
    ) -> VQbitResult<Self> {
        if dimension == 0 {
            return Err(VQbitError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }

        let mut rng =
            VirtueRng::from_optional_seed(seed.map(|s| derive_substream_seed(s, kind.substream())));

        let op = match kind {
            VirtueKind::Justice => Self::justice(dimension, &mut rng),
            VirtueKind::Temperance => Self::temperance(dimension, &mut rng),
            VirtueKind::Prudence => Self::prudence(dimension, &mut rng),
            VirtueKind::Fortitude => Self::fortitude(dimension),
        };
        Ok(op)
    }

    /// Near-identity with weak jitter: diagonal 1.0 + U(−0.01, 0.01).
    fn justice(dimension: usize, rng: &mut VirtueRng) -> Self {
        let diagonal = (0..dimension)
            .map(|_| 1.0 + rng.uniform(-JUSTICE_JITTER, JUSTICE_JITTER))
            .collect();
        Self {
            dimension,
            diagonal,
            off_diagonal: Vec::new(),
            kind: VirtueKind::Justice,
        }
    }

    /// Moderation: diagonal N(0, 0.1) via Box–Muller.
    fn temperance(dimension: usize, rng: &mut VirtueRng) -> Self {
        let diagonal = (0..dimension)
            .map(|_| rng.normal(0.0, TEMPERANCE_STD_DEV))
            .collect();
        Self {
            dimension,
            diagonal,
            off_diagonal: Vec::new(),
            kind: VirtueKind::Temperance,
        }
    }

    /// Positive-definite stability: diagonal 0.1 + 0.1·|U(−1, 1)| ∈ [0.1, 0.2].
    fn prudence(dimension: usize, rng: &mut VirtueRng) -> Self {
        let diagonal = (0..dimension)
            .map(|_| PRUDENCE_BASE + PRUDENCE_SPAN * rng.uniform(-1.0, 1.0).abs())
            .collect();
        Self {
            dimension,
            diagonal,
            off_diagonal: Vec::new(),
            kind: VirtueKind::Prudence,
        }
    }

    /// Resilience via local coupling: constant 0.5 diagonal plus a symmetric
    /// tridiagonal 0.1 coupling. The only mixing operator.
    fn fortitude(dimension: usize) -> Self {
        let diagonal = vec![FORTITUDE_DIAGONAL; dimension];
        let coupling = Complex64::new(FORTITUDE_COUPLING, 0.0);

        let mut off_diagonal = Vec::with_capacity(2 * dimension.saturating_sub(1));
        for i in 0..dimension.saturating_sub(1) {
            off_diagonal.push((i, i + 1, coupling));
            off_diagonal.push((i + 1, i, coupling));
        }

        Self {
            dimension,
            diagonal,
            off_diagonal,
            kind: VirtueKind::Fortitude,
        }
    }

    /// Operator dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Real diagonal entries.
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    /// Sparse off-diagonal entries as (row, col, weight).
    pub fn off_diagonal(&self) -> &[(usize, usize, Complex64)] {
        &self.off_diagonal
    }

    /// Which virtue this operator scores.
    pub fn kind(&self) -> VirtueKind {
        self.kind
    }

    /// Applies the operator: |ψ'⟩ = V|ψ⟩.
    pub fn apply(&self, state: &VQbitState) -> VQbitResult<Vec<Complex64>> {
        self.apply_to(state.amplitudes())
    }

    /// Applies the operator to a raw amplitude buffer.
    pub fn apply_to(&self, amplitudes: &[Complex64]) -> VQbitResult<Vec<Complex64>> {
        if amplitudes.len() != self.dimension {
            return Err(VQbitError::InvalidDimension {
                expected: self.dimension,
                got: amplitudes.len(),
            });
        }

        let mut result: Vec<Complex64> = amplitudes
            .iter()
            .zip(&self.diagonal)
            .map(|(a, d)| a * d)
            .collect();

        for &(row, col, weight) in &self.off_diagonal {
            result[row] += weight * amplitudes[col];
        }

        Ok(result)
    }

    /// Real expectation value ⟨ψ|V|ψ⟩.
    pub fn expectation_value(&self, state: &VQbitState) -> VQbitResult<f64> {
        self.expectation_of(state.amplitudes())
    }

    /// Expectation value against a raw amplitude buffer.
    ///
    /// V is Hermitian, so the imaginary part cancels; only the real part is
    /// accumulated.
    pub fn expectation_of(&self, amplitudes: &[Complex64]) -> VQbitResult<f64> {
        let v_psi = self.apply_to(amplitudes)?;
        Ok(amplitudes
            .iter()
            .zip(&v_psi)
            .map(|(psi, vp)| psi.re * vp.re + psi.im * vp.im)
            .sum())
    }
}

/// The four fixed operators for one (dimension, seed).
///
/// Without a seed construction is non-reproducible; with one it is
/// bit-identical across runs and platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtueOperators {
    dimension: usize,
    justice: VirtueOperator,
    temperance: VirtueOperator,
    prudence: VirtueOperator,
    fortitude: VirtueOperator,
}

impl VirtueOperators {
    /// Builds all four operators for the given dimension and optional seed.
    pub fn new(dimension: usize, seed: Option<u64>) -> VQbitResult<Self> {
        Ok(Self {
            dimension,
            justice: VirtueOperator::for_kind(VirtueKind::Justice, dimension, seed)?,
            temperance: VirtueOperator::for_kind(VirtueKind::Temperance, dimension, seed)?,
            prudence: VirtueOperator::for_kind(VirtueKind::Prudence, dimension, seed)?,
            fortitude: VirtueOperator::for_kind(VirtueKind::Fortitude, dimension, seed)?,
        })
    }

    /// Dimension shared by the four operators.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Operator for a specific virtue.
    pub fn operator_for(&self, kind: VirtueKind) -> &VirtueOperator {
        match kind {
            VirtueKind::Justice => &self.justice,
            VirtueKind::Temperance => &self.temperance,
            VirtueKind::Prudence => &self.prudence,
            VirtueKind::Fortitude => &self.fortitude,
        }
    }

    /// Measures all virtue scores for a raw amplitude buffer.
    ///
    /// Each score is the operator expectation rescaled by (e + 1)/2 and
    /// clamped into [0, 1]; raw expectations usually sit in [−1, 1] but that
    /// is not guaranteed.
    pub fn measure(&self, amplitudes: &[Complex64]) -> VQbitResult<VirtueScores> {
        let mut scores = VirtueScores::new();
        for kind in VirtueKind::ALL {
            let expectation = self.operator_for(kind).expectation_of(amplitudes)?;
            scores.insert(kind, ((expectation + 1.0) / 2.0).clamp(0.0, 1.0));
        }
        Ok(scores)
    }
}
