use crate::cmd::ImageArgs;
use crate::reports;
use clap::Args;
use segevo::config::{Config, FitnessMode};
use segevo::error::SegResult;
use segevo::evolution::{Evolution, EvolutionSummary, FrontMember};
use segevo::individual::Objectives;
use segevo::population::{ParetoStrategy, SelectionStrategy, WeightedSumStrategy};
use segevo::problem::ProblemInstance;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long, default_value_t = 42)]
    pub seed: u64,

    /// Wall-clock budget in seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    /// Print a JSON report instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    fitness_mode: FitnessMode,
    generations: usize,
    history: Vec<EvolutionSummary>,
    front: Vec<FrontMember>,
    fittest: FittestReport,
}

#[derive(Serialize)]
struct FittestReport {
    segments: usize,
    objectives: Objectives,
    scalar_fitness: f64,
    boundary_pixels: usize,
    segment_ids: Vec<usize>,
}

pub fn run(args: &RunArgs, config: Config, problem: Arc<ProblemInstance>) -> SegResult<()> {
    match config.evolution.fitness_mode {
        FitnessMode::Weighted => evolve(args, config, problem, WeightedSumStrategy::new()),
        FitnessMode::Pareto => evolve(args, config, problem, ParetoStrategy::new()),
    }
}

fn evolve<S: SelectionStrategy>(
    args: &RunArgs,
    config: Config,
    problem: Arc<ProblemInstance>,
    strategy: S,
) -> SegResult<()> {
    let generations = config.evolution.generations;
    let fitness_mode = config.evolution.fitness_mode;
    eprintln!(
        "🧬 Evolving {} individuals for {} generations ({} selection, seed {})",
        config.evolution.population_size,
        generations,
        strategy.name(),
        args.seed
    );

    let mut evolution = Evolution::new(problem.clone(), config, strategy, args.seed)?;
    if let Some(secs) = args.time {
        evolution = evolution.with_max_time(Duration::from_secs(secs));
    }
    evolution.initialize_population()?;

    let history = evolution.run(generations, |_: &EvolutionSummary| true)?;
    let front = evolution.front_members()?;

    let Some(mut fittest) = evolution.fittest().cloned() else {
        return Ok(());
    };
    let objectives = fittest.objectives();
    let scalar_fitness = fittest.scalar_fitness();
    let segmentation = fittest.segmentation();
    let report = RunReport {
        seed: args.seed,
        fitness_mode,
        generations: evolution.generation(),
        history,
        front,
        fittest: FittestReport {
            segments: segmentation.len(),
            objectives,
            scalar_fitness,
            boundary_pixels: segmentation.boundary_pixels(&problem).len(),
            segment_ids: segmentation.segment_ids().to_vec(),
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== 🏆 FINAL RESULT ===");
    println!("Generations: {}", report.generations);
    reports::print_history(&report.history);
    reports::print_front(&report.front);
    println!(
        "Fittest: {} segments | scalar {:.3} | {} boundary pixels",
        report.fittest.segments, report.fittest.scalar_fitness, report.fittest.boundary_pixels
    );
    reports::print_segment_map(problem.width(), &report.fittest.segment_ids);
    Ok(())
}
