//! Declarative optimization value types.
//!
//! These carry no behaviour: the engine registers problems and archives
//! solutions, and domain validators interpret them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use vqbit_core::{VQbitState, VirtueScores};

/// Multi-objective optimization problem definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationProblem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    /// Per-virtue weighting for this problem. Passed in explicitly; use
    /// [`vqbit_core::VirtueKind::neutral_scores`] for the balanced default.
    pub virtue_weights: VirtueScores,
}

/// Single objective with direction and weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
    pub direction: OptimizationDirection,
    pub weight: f64,
}

impl Objective {
    pub fn new(name: impl Into<String>, direction: OptimizationDirection) -> Self {
        Self {
            name: name.into(),
            direction,
            weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationDirection {
    Minimize,
    Maximize,
}

/// Bounded constraint on an objective or variable expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub bound: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "=")]
    Equal,
}

/// Decision variable with bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Candidate solution produced by an external caller and archived by the
/// engine, keyed by problem id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub variables: BTreeMap<String, f64>,
    pub objectives: BTreeMap<String, f64>,
    pub constraints: BTreeMap<String, f64>,
    pub virtue_scores: VirtueScores,
    pub state: VQbitState,
    pub metadata: HashMap<String, String>,
}
