//! # 🧭 vqbit-engine — vQbit Orchestration
//!
//! Serialized orchestrator over the `vqbit-core` state model: creates states
//! (random or encoded from classical variables), measures virtues, applies
//! virtue-guided collapse, evolves state sets, and tracks registered
//! optimization problems with their solution archives.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          VQbitEngine                            │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  State Creation + Classical Encoding      │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Virtue Measurement + Guided Collapse     │  │
//! │  └───────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────┐  │
//! │  │  Problem Registry + Solution Archive      │  │
//! │  └───────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```
//! use std::collections::HashMap;
//! use vqbit_engine::{VQbitEngine, DEFAULT_COLLAPSE_STRENGTH};
//! use vqbit_core::VirtueKind;
//!
//! let mut engine = VQbitEngine::new(256, Some(42)).unwrap();
//! let state = engine.create_vqbit_state(None, HashMap::new()).unwrap();
//!
//! let mut targets = VirtueKind::neutral_scores();
//! targets.insert(VirtueKind::Fortitude, 0.8);
//! let collapsed = engine
//!     .apply_virtue_collapse(&state, &targets, DEFAULT_COLLAPSE_STRENGTH)
//!     .unwrap();
//! assert!(collapsed.is_normalized());
//! ```

pub mod engine;
pub mod problem;

pub use engine::{
    EngineSummary, VQbitEngine, DEFAULT_COLLAPSE_STRENGTH, DEFAULT_TIME_STEP,
};
pub use problem::{
    Constraint, ConstraintKind, Objective, OptimizationDirection, OptimizationProblem, Solution,
    Variable,
};

// Callers of this crate almost always need the core types too.
pub use vqbit_core::{VQbitError, VQbitResult, VQbitState, VirtueKind, VirtueScores};

#[cfg(test)]
mod tests;
