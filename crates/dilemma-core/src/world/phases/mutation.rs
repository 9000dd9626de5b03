use super::super::World;
use rand::Rng;

impl World {
    /// Perturb inherited friendliness for this generation's offspring.
    ///
    /// Each offspring mutates independently with probability
    /// `config.mutation`: the 0.8 branch resamples uniformly below the
    /// inherited value, the 0.2 branch uniformly above it. Untriggered
    /// offspring keep the inherited value unchanged.
    pub(in crate::world) fn step_mutation_phase(&mut self) {
        for index in 0..self.offspring_last_step.len() {
            let site = self.offspring_last_step[index];
            if self.rng.random::<f64>() >= self.config.mutation {
                continue;
            }
            let inherited = self.population.friendliness[site];
            let mutated = if self.rng.random::<f64>() < 0.8 {
                self.rng.random::<f64>() * inherited
            } else {
                inherited + self.rng.random::<f64>() * (1.0 - inherited)
            };
            self.population.friendliness[site] = mutated.clamp(0.0, 1.0);
        }
    }
}
