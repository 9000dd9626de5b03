use crate::payoff::Strategy;
use crate::world::World;
use serde::{Deserialize, Serialize};

/// Per-generation observables, sampled between steps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepMetrics {
    pub generation: usize,
    pub occupied_count: usize,
    pub cooperation_share: f64,
    pub mean_friendliness: f64,
    pub mean_fitness_cooperators: f64,
    pub mean_fitness_defectors: f64,
    pub birth_count: usize,
    pub death_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub final_occupied_count: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub total_births: usize,
    #[serde(default)]
    pub total_deaths: usize,
}

/// Aggregate the current population state into a [`StepMetrics`] sample.
///
/// Means are taken over occupied nodes only; a group with no members reports
/// zero rather than NaN.
pub fn collect_step_metrics(world: &World) -> StepMetrics {
    let occupied = world.occupied();
    let strategies = world.strategies();
    let friendliness = world.friendliness();

    let mut occupied_count = 0usize;
    let mut cooperators = 0usize;
    let mut friendliness_sum = 0.0;
    let mut fitness_sums = [0.0f64; 2];
    let mut group_counts = [0usize; 2];

    for node in 0..world.node_count() {
        if !occupied[node] {
            continue;
        }
        occupied_count += 1;
        friendliness_sum += friendliness[node];
        let group = strategies[node] as usize;
        fitness_sums[group] += world.fitness(node);
        group_counts[group] += 1;
        if strategies[node] == Strategy::Cooperate {
            cooperators += 1;
        }
    }

    let mean = |sum: f64, count: usize| if count > 0 { sum / count as f64 } else { 0.0 };
    StepMetrics {
        generation: world.generation(),
        occupied_count,
        cooperation_share: mean(cooperators as f64, occupied_count),
        mean_friendliness: mean(friendliness_sum, occupied_count),
        mean_fitness_cooperators: mean(
            fitness_sums[Strategy::Cooperate as usize],
            group_counts[Strategy::Cooperate as usize],
        ),
        mean_fitness_defectors: mean(
            fitness_sums[Strategy::Defect as usize],
            group_counts[Strategy::Defect as usize],
        ),
        birth_count: world.births_last_step(),
        death_count: world.deaths_last_step(),
    }
}
