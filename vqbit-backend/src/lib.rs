//! # 🔌 vqbit-backend — Backend Contract & Factory
//!
//! The stability boundary of the vQbit stack: one trait every backend
//! implements, a vector (CPU) implementation, a capability-driven selection
//! factory with graceful GPU→CPU fallback, and the attestation seams that
//! receipt generation drives.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 VQbitBackend (trait)                 │
//! │  configure / step / collapse / receipt / status      │
//! ├──────────────────────────────────────────────────────┤
//! │  factory::create ──► VectorBackend (CPU, serialized) │
//! │        │                     │                       │
//! │   DeviceCapability      VQbitEngine (vqbit-engine)   │
//! │        │                     │                       │
//! │   GPU gates (all must   AttestationSuite             │
//! │   pass, else fallback)  (external collaborators)     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```no_run
//! use vqbit_backend::{factory, CollapsePolicy, DeviceCapability, DeviceTier, VQbitConfig};
//! # use std::sync::Arc;
//! # use vqbit_backend::{AttestationSuite, CanonicalSerializer, ContentHasher, MerkleInclusion, MerkleProver, Signer};
//! # use vqbit_core::VQbitResult;
//! # struct Nop;
//! # impl CanonicalSerializer for Nop {
//! #     fn canonicalize(&self, v: &serde_json::Value) -> VQbitResult<Vec<u8>> {
//! #         Ok(serde_json::to_vec(v).unwrap())
//! #     }
//! # }
//! # impl ContentHasher for Nop {
//! #     fn digest(&self, b: &[u8]) -> VQbitResult<Vec<u8>> { Ok(b.to_vec()) }
//! # }
//! # impl Signer for Nop {
//! #     fn sign(&self, d: &[u8]) -> VQbitResult<Vec<u8>> { Ok(d.to_vec()) }
//! # }
//! # impl MerkleProver for Nop {
//! #     fn prove(&self, l: &[u8]) -> VQbitResult<MerkleInclusion> {
//! #         Ok(MerkleInclusion { root: l.to_vec(), path: Vec::new() })
//! #     }
//! # }
//!
//! # async fn demo() -> VQbitResult<()> {
//! let suite = AttestationSuite::new(Arc::new(Nop), Arc::new(Nop), Arc::new(Nop), Arc::new(Nop));
//! let device = DeviceCapability::new(DeviceTier::Desktop, false);
//! let config = VQbitConfig {
//!     seed: Some(42),
//!     adaptive_dimension: false,
//!     dimension: 256,
//!     ..VQbitConfig::default()
//! };
//!
//! let backend = factory::create(Some(config), None, device, suite).await?;
//! let snapshot = backend.collapse(&CollapsePolicy::default()).await?;
//! let receipt = backend.receipt().await?;
//! assert!(receipt.deterministic);
//! # Ok(())
//! # }
//! ```

pub mod attest;
pub mod capability;
pub mod contract;
pub mod factory;
pub mod vector;

pub use attest::{
    AttestationSuite, CanonicalSerializer, ContentHasher, MerkleInclusion, MerkleProver, Signer,
};
pub use capability::{DeviceCapability, DeviceTier};
pub use contract::{
    CollapsePolicy, EngineStatus, EvolutionUnit, HamiltonianKind, HamiltonianTerm, ReceiptBundle,
    Snapshot, VQbitBackend, VQbitConfig, VirtueWeights, DEFAULT_DIMENSION,
};
pub use factory::{create, default_config_for, select_backend, BackendKind};
pub use vector::VectorBackend;

// Callers of this crate almost always need the core types too.
pub use vqbit_core::{VQbitError, VQbitResult, VQbitState, VirtueKind, VirtueScores};
