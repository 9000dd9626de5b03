use serde::{Deserialize, Serialize};

/// A player's current move in the spatial Prisoner's Dilemma.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Cooperate,
    #[default]
    Defect,
}

impl Strategy {
    /// Enumeration order used by the best-response sweep. On exact utility
    /// ties the later entry wins, so Defect is the deterministic fallback.
    pub const ALL: [Strategy; 2] = [Strategy::Cooperate, Strategy::Defect];
}

/// 2x2 payoff lookup keyed by (own strategy, opponent strategy).
#[derive(Clone, Copy, Debug)]
pub struct PayoffMatrix {
    cells: [[f64; 2]; 2],
}

impl PayoffMatrix {
    /// The strict ordering `temptation > reward > punishment > sucker` is
    /// checked by [`crate::config::SimConfig::validate`] before a matrix is
    /// ever built.
    pub(crate) fn new(temptation: f64, reward: f64, punishment: f64, sucker: f64) -> Self {
        Self {
            cells: [[reward, sucker], [temptation, punishment]],
        }
    }

    pub fn get(&self, own: Strategy, opponent: Strategy) -> f64 {
        self.cells[own as usize][opponent as usize]
    }
}
