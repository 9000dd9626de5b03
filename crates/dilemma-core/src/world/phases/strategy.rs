use super::super::World;
use crate::payoff::Strategy;

impl World {
    /// Myopic best-response sweep: every occupied node adopts the strategy
    /// maximizing `(1-f)*own_payoff + f*avg_neighbor_payoff` over every
    /// hypothetical split of its neighborhood into cooperators and defectors.
    ///
    /// The sweep reads only the node's own friendliness and its total degree
    /// (never the neighbors' actual strategies), so nodes can be updated in
    /// place within one pass.
    pub(in crate::world) fn step_strategy_phase(&mut self) {
        for node in 0..self.population.node_count() {
            if !self.population.occupied[node] {
                continue;
            }
            let next = self.best_response(node);
            self.population.strategy[node] = next;
        }
    }

    fn best_response(&self, node: usize) -> Strategy {
        let degree = self.graph.degree(node);
        let friendliness = self.population.friendliness[node];
        let mut best = Strategy::Defect;
        let mut best_utility = f64::NEG_INFINITY;
        for strategy in Strategy::ALL {
            for cooperating in 0..=degree {
                let defecting = degree - cooperating;
                let own_payoff = self.payoff_matrix.get(strategy, Strategy::Cooperate)
                    * cooperating as f64
                    + self.payoff_matrix.get(strategy, Strategy::Defect) * defecting as f64;
                let neighbor_payoff = self.payoff_matrix.get(Strategy::Cooperate, strategy)
                    * cooperating as f64
                    + self.payoff_matrix.get(Strategy::Defect, strategy) * defecting as f64;
                let avg_neighbor_payoff = if degree > 0 {
                    neighbor_payoff / degree as f64
                } else {
                    0.0
                };
                let utility =
                    (1.0 - friendliness) * own_payoff + friendliness * avg_neighbor_payoff;
                // >= keeps the last-enumerated maximum, so exact ties resolve
                // toward Defect and toward larger cooperator counts.
                if utility >= best_utility {
                    best_utility = utility;
                    best = strategy;
                }
            }
        }
        best
    }
}
