use super::super::World;

impl World {
    /// Realized payoff: for each occupied node, the sum of matrix entries
    /// against each occupied neighbor's actual post-selection strategy.
    /// Unoccupied neighbors contribute nothing.
    pub(in crate::world) fn step_payoff_phase(&mut self) {
        for node in 0..self.population.node_count() {
            if !self.population.occupied[node] {
                continue;
            }
            let own = self.population.strategy[node];
            let total: f64 = self
                .graph
                .neighbors(node)
                .iter()
                .filter(|&&neighbor| self.population.occupied[neighbor])
                .map(|&neighbor| {
                    self.payoff_matrix
                        .get(own, self.population.strategy[neighbor])
                })
                .sum();
            self.population.payoff[node] = total;
        }
    }
}
