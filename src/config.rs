use crate::error::{SegError, SegResult};
use clap::{parser::ValueSource, ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub evolution: EvolutionParams,
    #[command(flatten)]
    pub objectives: ObjectiveWeights,
    #[command(flatten)]
    pub seeding: SeedingParams,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMode {
    /// Prefix from parent A, suffix from parent B.
    SinglePoint,
    /// Each gene independently from parent A with `uniform_crossover_bias`.
    Uniform,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// Weighted sum of the three objectives, lower is better.
    Weighted,
    /// Raw objective vector ranked by fronts and crowding distance.
    Pareto,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    #[arg(long, default_value_t = 20)]
    pub population_size: usize,
    /// Seeded individuals generated before truncating to `population_size`.
    #[arg(long, default_value_t = 30)]
    pub initial_pool_size: usize,
    #[arg(long, default_value_t = 50)]
    pub generations: usize,
    #[arg(long, default_value_t = 0.2)]
    pub mutation_rate: f32,
    #[arg(long, default_value_t = 0.7)]
    pub crossover_rate: f32,
    #[arg(long, value_enum, default_value_t = CrossoverMode::Uniform)]
    pub crossover_mode: CrossoverMode,
    #[arg(long, default_value_t = 0.5)]
    pub uniform_crossover_bias: f32,
    #[arg(long, default_value_t = 2)]
    pub elites: usize,
    #[arg(long, default_value_t = 3)]
    pub tournament_size: usize,
    #[arg(long, default_value_t = 0.8)]
    pub tournament_pressure: f32,
    #[arg(long, value_enum, default_value_t = FitnessMode::Pareto)]
    pub fitness_mode: FitnessMode,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            initial_pool_size: 30,
            generations: 50,
            mutation_rate: 0.2,
            crossover_rate: 0.7,
            crossover_mode: CrossoverMode::Uniform,
            uniform_crossover_bias: 0.5,
            elites: 2,
            tournament_size: 3,
            tournament_pressure: 0.8,
            fitness_mode: FitnessMode::Pareto,
        }
    }
}

#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectiveWeights {
    #[arg(long, default_value_t = 1.0)]
    pub weight_edge: f64,
    #[arg(long, default_value_t = 10.0)]
    pub weight_connectivity: f64,
    #[arg(long, default_value_t = 1.0)]
    pub weight_deviation: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            weight_edge: 1.0,
            weight_connectivity: 10.0,
            weight_deviation: 1.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingParams {
    #[arg(long, default_value_t = 4)]
    pub min_initial_segments: usize,
    #[arg(long, default_value_t = 23)]
    pub max_initial_segments: usize,
    /// Only tree edges whose child subtree holds this many pixels may be cut.
    #[arg(long, default_value_t = 200)]
    pub min_seed_subtree: usize,
    /// Share of the heaviest eligible tree edges kept as cut candidates.
    #[arg(long, default_value_t = 0.05)]
    pub seed_edge_fraction: f32,
}

impl Default for SeedingParams {
    fn default() -> Self {
        Self {
            min_initial_segments: 4,
            max_initial_segments: 23,
            min_seed_subtree: 200,
            seed_edge_fraction: 0.05,
        }
    }
}

impl ObjectiveWeights {
    #[inline(always)]
    pub fn combine(&self, edge: f64, connectivity: f64, deviation: f64) -> f64 {
        self.weight_edge * edge
            + self.weight_connectivity * connectivity
            + self.weight_deviation * deviation
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SegResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> SegResult<()> {
        let evo = &self.evolution;
        if evo.population_size == 0 {
            return Err(SegError::Config("population_size must be positive".into()));
        }
        if evo.initial_pool_size < evo.population_size {
            return Err(SegError::Config(format!(
                "initial_pool_size ({}) is smaller than population_size ({})",
                evo.initial_pool_size, evo.population_size
            )));
        }
        if evo.elites >= evo.population_size {
            return Err(SegError::Config(format!(
                "elites ({}) must be smaller than population_size ({})",
                evo.elites, evo.population_size
            )));
        }
        if evo.tournament_size == 0 {
            return Err(SegError::Config("tournament_size must be positive".into()));
        }
        for (name, value) in [
            ("mutation_rate", evo.mutation_rate),
            ("crossover_rate", evo.crossover_rate),
            ("uniform_crossover_bias", evo.uniform_crossover_bias),
            ("tournament_pressure", evo.tournament_pressure),
            ("seed_edge_fraction", self.seeding.seed_edge_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SegError::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        let seeding = &self.seeding;
        if seeding.min_initial_segments == 0
            || seeding.min_initial_segments > seeding.max_initial_segments
        {
            return Err(SegError::Config(format!(
                "invalid initial segment bounds [{}, {}]",
                seeding.min_initial_segments, seeding.max_initial_segments
            )));
        }
        Ok(())
    }

    /// Overlays every value the user typed on the command line onto `self`,
    /// leaving file-provided values alone where the CLI only had defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(evolution.population_size);
        update_if_present!(evolution.initial_pool_size);
        update_if_present!(evolution.generations);
        update_if_present!(evolution.mutation_rate);
        update_if_present!(evolution.crossover_rate);
        update_if_present!(evolution.crossover_mode);
        update_if_present!(evolution.uniform_crossover_bias);
        update_if_present!(evolution.elites);
        update_if_present!(evolution.tournament_size);
        update_if_present!(evolution.tournament_pressure);
        update_if_present!(evolution.fitness_mode);

        update_if_present!(objectives.weight_edge);
        update_if_present!(objectives.weight_connectivity);
        update_if_present!(objectives.weight_deviation);

        update_if_present!(seeding.min_initial_segments);
        update_if_present!(seeding.max_initial_segments);
        update_if_present!(seeding.min_seed_subtree);
        update_if_present!(seeding.seed_edge_fraction);
    }
}
