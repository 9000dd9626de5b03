use crate::config::{SimConfig, SimConfigError};
use crate::graph::Graph;
use crate::metrics::{self, RunSummary};
use crate::payoff::{PayoffMatrix, Strategy};
use crate::population::Population;
use crate::rng;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// The simulation engine: a static graph, flat per-node population arrays,
/// and one seeded RNG stream.
///
/// Each call to [`World::step`] advances one generation through five phases
/// in fixed order: strategy selection, payoff computation, death,
/// reproduction, mutation. Every phase reads the complete state left by the
/// previous one.
pub struct World {
    graph: Graph,
    population: Population,
    config: SimConfig,
    payoff_matrix: PayoffMatrix,
    rng: ChaCha12Rng,
    generation: usize,
    births_last_step: usize,
    deaths_last_step: usize,
    total_births: usize,
    total_deaths: usize,
    /// Sites filled by the current generation's reproduction phase, in
    /// placement order. Consumed by the mutation phase.
    offspring_last_step: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
        }
    }
}

/// Fatal per-generation failures. Neither is retried internally; the step
/// aborts and the caller decides whether to restart the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// Every agent died while offspring are still required.
    PopulationCollapsed { required: usize },
    /// The empty-site pool ran out before all offspring were placed. Reaching
    /// this means the population-size invariant was already broken.
    CapacityExceeded { requested: usize, available: usize },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::PopulationCollapsed { required } => {
                write!(
                    f,
                    "population collapsed: {required} offspring required but no parent is alive"
                )
            }
            StepError::CapacityExceeded {
                requested,
                available,
            } => write!(
                f,
                "empty-site pool exhausted: {requested} sites requested, {available} available"
            ),
        }
    }
}

impl Error for StepError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
    Step(StepError),
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
            ExperimentError::Step(e) => write!(f, "{}", e),
        }
    }
}

impl From<StepError> for ExperimentError {
    fn from(err: StepError) -> Self {
        ExperimentError::Step(err)
    }
}

impl Error for ExperimentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExperimentError::Step(e) => Some(e),
            _ => None,
        }
    }
}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    /// Build a world over `graph`. Each node starts occupied with probability
    /// `occupation_frac` (one RNG draw per node in ascending id order),
    /// defecting, with `initial_friendliness` and zero payoff.
    pub fn new(graph: Graph, config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let payoff_matrix = PayoffMatrix::new(
            config.temptation,
            config.reward,
            config.punishment,
            config.sucker,
        );
        let mut rng = rng::create_rng(config.seed);
        let mut population = Population::new(graph.node_count(), config.initial_friendliness);
        for occupied in population.occupied.iter_mut() {
            *occupied = rng.random::<f64>() < config.occupation_frac;
        }
        Ok(Self {
            graph,
            population,
            config,
            payoff_matrix,
            rng,
            generation: 0,
            births_last_step: 0,
            deaths_last_step: 0,
            total_births: 0,
            total_deaths: 0,
            offspring_last_step: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn node_count(&self) -> usize {
        self.population.node_count()
    }

    pub fn occupied(&self) -> &[bool] {
        self.population.occupied()
    }

    pub fn strategies(&self) -> &[Strategy] {
        self.population.strategies()
    }

    pub fn friendliness(&self) -> &[f64] {
        self.population.friendliness()
    }

    pub fn payoffs(&self) -> &[f64] {
        self.population.payoffs()
    }

    pub fn occupied_count(&self) -> usize {
        self.population.occupied_count()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn births_last_step(&self) -> usize {
        self.births_last_step
    }

    pub fn deaths_last_step(&self) -> usize {
        self.deaths_last_step
    }

    /// Sites filled during the most recent generation, in placement order.
    pub fn last_offspring(&self) -> &[usize] {
        &self.offspring_last_step
    }

    /// Advance one generation. On error the step is aborted mid-phase and the
    /// world should be considered unusable for further stepping.
    pub fn step(&mut self) -> Result<(), StepError> {
        self.generation = self.generation.saturating_add(1);
        self.births_last_step = 0;
        self.deaths_last_step = 0;
        self.offspring_last_step.clear();

        self.step_strategy_phase();
        self.step_payoff_phase();
        let dead_sites = self.step_death_phase();
        self.step_reproduction_phase(&dead_sites)?;
        self.step_mutation_phase();
        Ok(())
    }

    /// Run `steps` generations, collecting a [`crate::metrics::StepMetrics`]
    /// sample every `sample_every` generations (and always for the final one).
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step()?;
            if step % sample_every == 0 || step == steps {
                samples.push(metrics::collect_step_metrics(self));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            final_occupied_count: self.population.occupied_count(),
            samples,
            total_births: self.total_births - births_before,
            total_deaths: self.total_deaths - deaths_before,
        })
    }
}

mod phases;
