//! # ⚛️ vqbit-core — vQbit States and Virtue Operators
//!
//! State model and operator algebra for quantum-inspired multi-objective
//! optimization. A vQbit is a normalized complex amplitude vector in a
//! high-dimensional space; four fixed Hermitian "virtue" operators score it
//! and steer perturbative corrections.
//!
//! ## Computational Complexity
//!
//! **Operator apply — O(N + E):**
//! - N = dimension (diagonal scale)
//! - E = sparse off-diagonal entries (2(N−1) for fortitude, 0 otherwise)
//!
//! **Expectation value — O(N + E):**
//! - One apply plus a real inner product
//!
//! **Coherence — O(min(N, 1000)²):**
//! - Pairwise sample over the first min(N, 1000) indices; a bounded
//!   heuristic, not a full density-matrix measure
//!
//! **Scalability:** dimensions 512–16384 are the observed operating range.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          vqbit-core                             │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  VQbitState (amplitudes + measures)       │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  VirtueOperators (justice, temperance,    │  │
//! │  │    prudence, fortitude)                   │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  VirtueRng (seeded / entropy)             │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use vqbit_core::{VQbitState, VirtueOperators};
//!
//! let operators = VirtueOperators::new(512, Some(42)).unwrap();
//! let state = VQbitState::random_superposition(512, Some(42)).unwrap();
//! let scores = operators.measure(state.amplitudes()).unwrap();
//! assert!(state.is_normalized());
//! assert_eq!(scores.len(), 4);
//! ```

pub mod error;
pub mod rng;
pub mod state;
pub mod virtue;

pub use error::{VQbitError, VQbitResult};
pub use rng::{derive_substream_seed, stable_name_hash, VirtueRng};
pub use state::{
    coherence_of, normalize, EntanglementMap, VQbitState, VirtueScores, NORM_TOLERANCE,
};
pub use virtue::{VirtueKind, VirtueOperator, VirtueOperators};
