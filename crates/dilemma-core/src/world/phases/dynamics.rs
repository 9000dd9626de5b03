use super::super::{StepError, World};
use crate::payoff::Strategy;
use rand::Rng;
use std::collections::BTreeMap;

impl World {
    /// Shifted payoff used as reproductive weight. The fixed degree-8 offset
    /// keeps fitness non-negative on Moore lattices; on higher-degree graphs
    /// it can still go negative and is clamped at sampling time.
    pub fn fitness(&self, node: usize) -> f64 {
        self.population.payoff[node] - 8.0 * self.config.sucker
    }

    /// Independent Bernoulli death for every occupied node. Returns the newly
    /// vacated ids in ascending order.
    pub(in crate::world) fn step_death_phase(&mut self) -> Vec<usize> {
        let mut dead_sites = Vec::new();
        for node in 0..self.population.node_count() {
            if !self.population.occupied[node] {
                continue;
            }
            if self.rng.random::<f64>() < self.config.p_death {
                self.population.occupied[node] = false;
                dead_sites.push(node);
            }
        }
        self.deaths_last_step = dead_sites.len();
        self.total_deaths += dead_sites.len();
        dead_sites
    }

    /// Refill exactly `dead_sites.len()` sites with offspring of
    /// fitness-proportional parents.
    ///
    /// Parents are drawn with replacement, grouped into `(parent, count)`
    /// pairs, and processed in ascending parent id order against one shared
    /// empty-site pool. The order is part of the observable contract: an
    /// earlier parent can claim sites that would otherwise be nearest to a
    /// later one.
    pub(in crate::world) fn step_reproduction_phase(
        &mut self,
        dead_sites: &[usize],
    ) -> Result<(), StepError> {
        if dead_sites.is_empty() {
            return Ok(());
        }
        let alive = self.population.occupied_ids();
        if alive.is_empty() {
            return Err(StepError::PopulationCollapsed {
                required: dead_sites.len(),
            });
        }
        let weights: Vec<f64> = alive.iter().map(|&node| self.fitness(node).max(0.0)).collect();
        let mut births: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..dead_sites.len() {
            let parent = alive[sample_index(&mut self.rng, &weights)];
            *births.entry(parent).or_insert(0) += 1;
        }

        // Ascending-ordered pool shared across all parents, consumed in place.
        let mut empty_sites = self.population.empty_ids();
        for (parent, count) in births {
            self.place_offspring(parent, count, &mut empty_sites)?;
        }
        self.births_last_step = self.offspring_last_step.len();
        self.total_births += self.offspring_last_step.len();
        Ok(())
    }

    fn place_offspring(
        &mut self,
        parent: usize,
        count: usize,
        empty_sites: &mut Vec<usize>,
    ) -> Result<(), StepError> {
        if count > empty_sites.len() {
            return Err(StepError::CapacityExceeded {
                requested: count,
                available: empty_sites.len(),
            });
        }
        let n_local = binomial(&mut self.rng, count, self.config.local_reproduction);

        // Nearest reachable empty sites, ties broken by ascending id. An
        // unreachable shortfall spills into the random share so the refill
        // count is preserved.
        let distances = self.graph.shortest_path_lengths(parent, empty_sites);
        let mut reachable: Vec<(usize, usize)> = empty_sites
            .iter()
            .filter_map(|&site| distances.get(&site).map(|&dist| (dist, site)))
            .collect();
        reachable.sort_unstable();
        let local_sites: Vec<usize> = reachable
            .iter()
            .take(n_local)
            .map(|&(_, site)| site)
            .collect();
        for &site in &local_sites {
            remove_site(empty_sites, site);
            self.spawn(site, parent);
        }

        let n_random = count - local_sites.len();
        for _ in 0..n_random {
            if empty_sites.is_empty() {
                return Err(StepError::CapacityExceeded {
                    requested: n_random,
                    available: 0,
                });
            }
            let index = self.rng.random_range(0..empty_sites.len());
            let site = empty_sites.remove(index);
            self.spawn(site, parent);
        }
        Ok(())
    }

    /// Occupy `site` with a fresh agent inheriting `parent`'s (pre-mutation)
    /// friendliness. Strategy and payoff reset; the next generation's
    /// selection phase overwrites strategy before anything reads it.
    fn spawn(&mut self, site: usize, parent: usize) {
        self.population.occupied[site] = true;
        self.population.friendliness[site] = self.population.friendliness[parent];
        self.population.strategy[site] = Strategy::Defect;
        self.population.payoff[site] = 0.0;
        self.offspring_last_step.push(site);
    }
}

/// Draw one index proportionally to `weights`, falling back to a uniform
/// draw when every weight is zero.
fn sample_index<R: Rng>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..weights.len());
    }
    let mut target = rng.random::<f64>() * total;
    for (index, &weight) in weights.iter().enumerate() {
        target -= weight;
        if target < 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

/// Binomial(n, p) sampled as n Bernoulli draws; n never exceeds the death
/// count of one generation, so the loop stays short.
fn binomial<R: Rng>(rng: &mut R, n: usize, p: f64) -> usize {
    (0..n).filter(|_| rng.random::<f64>() < p).count()
}

fn remove_site(pool: &mut Vec<usize>, site: usize) {
    if let Ok(pos) = pool.binary_search(&site) {
        pool.remove(pos);
    }
}
