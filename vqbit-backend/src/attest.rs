//! Attestation collaborator seams.
//!
//! Receipt generation needs canonical bytes, a content hash, a signature,
//! and a Merkle inclusion proof. None of that is implemented here: this core
//! consumes the collaborators as opaque services behind these traits, and the
//! hosting application wires in the real implementations.

use std::sync::Arc;

use vqbit_core::VQbitResult;

/// Deterministic byte encoding of a JSON value, independent of the key order
/// the value was assembled in.
pub trait CanonicalSerializer: Send + Sync {
    fn canonicalize(&self, value: &serde_json::Value) -> VQbitResult<Vec<u8>>;
}

/// Fixed-size content digest.
pub trait ContentHasher: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> VQbitResult<Vec<u8>>;
}

/// Fixed-size signature over a digest, using a key the collaborator holds.
pub trait Signer: Send + Sync {
    fn sign(&self, digest: &[u8]) -> VQbitResult<Vec<u8>>;
}

/// Merkle inclusion proof for a content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleInclusion {
    pub root: Vec<u8>,
    pub path: Vec<Vec<u8>>,
}

/// Builds inclusion proofs from content digests.
pub trait MerkleProver: Send + Sync {
    fn prove(&self, leaf: &[u8]) -> VQbitResult<MerkleInclusion>;
}

/// The collaborator bundle a backend drives during `receipt()`.
#[derive(Clone)]
pub struct AttestationSuite {
    pub canonical: Arc<dyn CanonicalSerializer>,
    pub hasher: Arc<dyn ContentHasher>,
    pub signer: Arc<dyn Signer>,
    pub merkle: Arc<dyn MerkleProver>,
}

impl AttestationSuite {
    pub fn new(
        canonical: Arc<dyn CanonicalSerializer>,
        hasher: Arc<dyn ContentHasher>,
        signer: Arc<dyn Signer>,
        merkle: Arc<dyn MerkleProver>,
    ) -> Self {
        Self {
            canonical,
            hasher,
            signer,
            merkle,
        }
    }
}

impl std::fmt::Debug for AttestationSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttestationSuite").finish_non_exhaustive()
    }
}
