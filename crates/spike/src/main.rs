use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dilemma_core::config::SimConfig;
use dilemma_core::graph::Graph;
use dilemma_core::world::World;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dilemma")]
#[command(about = "Spatial evolutionary Prisoner's Dilemma CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Lattice {
    /// 8-neighbour Moore lattice with periodic boundaries.
    Moore,
    /// 4-neighbour von Neumann lattice with periodic boundaries.
    VonNeumann,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation on a periodic lattice and print sampled stats as JSON lines
    Run {
        /// Path to config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lattice width
        #[arg(long, default_value_t = 30)]
        width: usize,

        /// Lattice height
        #[arg(long, default_value_t = 30)]
        height: usize,

        /// Neighborhood structure of the lattice
        #[arg(long, value_enum, default_value = "moore")]
        lattice: Lattice,

        /// Number of generations to run
        #[arg(long, default_value_t = 500)]
        steps: usize,

        /// Sample interval for printed stats
        #[arg(long, default_value_t = 10)]
        sample_every: usize,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

/// `width x height` torus where every node connects to its 8 nearest
/// neighbors (Moore neighborhood).
fn rectangular_graph(width: usize, height: usize) -> Result<Graph> {
    ensure!(
        width >= 3 && height >= 3,
        "lattice dimensions must be at least 3 for periodic wrapping"
    );
    let mut graph = Graph::new(width * height);
    for y in 0..height {
        for x in 0..width {
            let node = y * width + x;
            for dy in [-1i64, 0, 1] {
                for dx in [-1i64, 0, 1] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = (x as i64 + dx).rem_euclid(width as i64) as usize;
                    let ny = (y as i64 + dy).rem_euclid(height as i64) as usize;
                    graph.add_edge(node, ny * width + nx)?;
                }
            }
        }
    }
    Ok(graph)
}

/// `width x height` torus where every node connects to its 4 nearest
/// neighbors (von Neumann neighborhood).
fn four_neighbours_graph(width: usize, height: usize) -> Result<Graph> {
    ensure!(
        width >= 3 && height >= 3,
        "lattice dimensions must be at least 3 for periodic wrapping"
    );
    let mut graph = Graph::new(width * height);
    for y in 0..height {
        for x in 0..width {
            let node = y * width + x;
            graph.add_edge(node, y * width + (x + 1) % width)?;
            graph.add_edge(node, ((y + 1) % height) * width + x)?;
        }
    }
    Ok(graph)
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            let config: SimConfig = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(SimConfig::default()),
    }
}

fn run(
    config: Option<&PathBuf>,
    width: usize,
    height: usize,
    lattice: Lattice,
    steps: usize,
    sample_every: usize,
) -> Result<()> {
    let config = load_config(config)?;
    let graph = match lattice {
        Lattice::Moore => rectangular_graph(width, height)?,
        Lattice::VonNeumann => four_neighbours_graph(width, height)?,
    };
    let mut world = World::new(graph, config).context("failed to build world")?;
    let summary = world
        .try_run_experiment(steps, sample_every)
        .context("simulation failed")?;
    for sample in &summary.samples {
        println!("{}", serde_json::to_string(sample)?);
    }
    eprintln!(
        "ran {} generations: {} occupied, {} births, {} deaths",
        summary.steps, summary.final_occupied_count, summary.total_births, summary.total_deaths
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            width,
            height,
            lattice,
            steps,
            sample_every,
        } => run(config.as_ref(), width, height, lattice, steps, sample_every),
        Commands::DumpDefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moore_lattice_has_uniform_degree_eight() {
        let graph = rectangular_graph(5, 4).unwrap();
        assert_eq!(graph.node_count(), 20);
        for node in 0..graph.node_count() {
            assert_eq!(graph.degree(node), 8);
        }
    }

    #[test]
    fn von_neumann_lattice_has_uniform_degree_four() {
        let graph = four_neighbours_graph(5, 4).unwrap();
        for node in 0..graph.node_count() {
            assert_eq!(graph.degree(node), 4);
        }
    }

    #[test]
    fn tiny_lattices_are_rejected() {
        assert!(rectangular_graph(2, 5).is_err());
        assert!(four_neighbours_graph(5, 1).is_err());
    }

    #[test]
    fn run_conserves_population_on_a_moore_lattice() {
        let graph = rectangular_graph(6, 6).unwrap();
        let config = SimConfig {
            occupation_frac: 0.7,
            ..SimConfig::default()
        };
        let mut world = World::new(graph, config).unwrap();
        let initial = world.occupied_count();
        let summary = world.try_run_experiment(20, 5).unwrap();
        assert_eq!(summary.final_occupied_count, initial);
    }
}
