use crate::config::Config;
use crate::error::{SegError, SegResult};
use crate::individual::{Individual, Objectives};
use crate::population::ranking::{crowding_distances, fast_non_dominated_sort};
use crate::population::{Population, SelectionStrategy};
use crate::problem::ProblemInstance;
use fastrand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EvolutionState {
    Uninitialized,
    Populated,
}

/// Snapshot taken after initialisation and after every generation.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionSummary {
    pub generation: usize,
    pub population_size: usize,
    pub average_fitness: f64,
    pub best_fitness: f64,
    pub first_front_size: usize,
    pub elapsed_ms: f64,
}

/// A member of the non-dominated front, as handed to reports.
#[derive(Debug, Clone, Serialize)]
pub struct FrontMember {
    pub index: usize,
    pub segments: usize,
    pub objectives: Objectives,
    pub crowding_distance: f64,
}

/// Receives a summary after each generation.
/// Returning `false` stops the run at that generation boundary.
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, summary: &EvolutionSummary) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&EvolutionSummary) -> bool + Send + Sync,
{
    fn on_generation(&self, summary: &EvolutionSummary) -> bool {
        self(summary)
    }
}

/// The generational loop, parametrised by how individuals are ranked.
pub struct Evolution<S: SelectionStrategy> {
    problem: Arc<ProblemInstance>,
    config: Config,
    strategy: S,
    population: Population,
    state: EvolutionState,
    generation: usize,
    rng: Rng,
    max_time: Option<Duration>,
    started: Instant,
}

impl<S: SelectionStrategy> Evolution<S> {
    pub fn new(problem: Arc<ProblemInstance>, config: Config, strategy: S, seed: u64) -> SegResult<Self> {
        config.validate()?;
        Ok(Self {
            problem,
            config,
            strategy,
            population: Population::default(),
            state: EvolutionState::Uninitialized,
            generation: 0,
            rng: Rng::with_seed(seed),
            max_time: None,
            started: Instant::now(),
        })
    }

    /// Wall-clock budget checked between generations by [`Evolution::run`].
    pub fn with_max_time(mut self, limit: Duration) -> Self {
        self.max_time = Some(limit);
        self
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn problem(&self) -> &ProblemInstance {
        &self.problem
    }

    /// Seeds `initial_pool_size` individuals from the color MST and keeps the
    /// best `population_size` of them. Allowed once.
    pub fn initialize_population(&mut self) -> SegResult<()> {
        if self.state != EvolutionState::Uninitialized {
            error!("initialize_population called twice; keeping the current population");
            return Err(SegError::AlreadyInitialized);
        }
        let timer = Instant::now();
        let pool_size = self.config.evolution.initial_pool_size;

        // Seeds drawn up front so the result does not depend on thread count.
        let seeds: Vec<u64> = (0..pool_size).map(|_| self.rng.u64(..)).collect();
        let problem = &self.problem;
        let config = &self.config;
        let individuals = seeds
            .into_par_iter()
            .map(|seed| -> SegResult<Individual> {
                let mut rng = Rng::with_seed(seed);
                let mut ind = Individual::seeded(problem.clone(), config, &mut rng)?;
                ind.evaluate();
                Ok(ind)
            })
            .collect::<SegResult<Vec<_>>>()?;

        let mut population = Population::new(individuals);
        self.strategy
            .truncate(&mut population, self.config.evolution.population_size)?;
        self.population = population;
        self.state = EvolutionState::Populated;
        self.started = Instant::now();

        info!(
            "🌱 Seeded {} individuals, kept {} ({} selection) in {:.2}s",
            pool_size,
            self.population.len(),
            self.strategy.name(),
            timer.elapsed().as_secs_f32()
        );
        Ok(())
    }

    /// Breeds one generation: tournament parents, crossover or copy,
    /// mutation, then insertion by the strategy.
    pub fn run_generation(&mut self) -> SegResult<EvolutionSummary> {
        if self.state != EvolutionState::Populated {
            error!("run_generation called before initialize_population; nothing to evolve");
            return Err(SegError::NotInitialized);
        }
        self.strategy.rank(&mut self.population)?;
        let offspring = self.breed_offspring()?;

        let params = &self.config.evolution;
        self.strategy
            .insert_offspring(&mut self.population, offspring, params)?;
        self.generation += 1;

        let summary = self.summary()?;
        info!(
            "Gen {:>4} | avg {:>12.3} | best {:>12.3} | front {:>3}",
            summary.generation, summary.average_fitness, summary.best_fitness, summary.first_front_size
        );
        Ok(summary)
    }

    /// `population_size - elites` children of the ranked population.
    fn breed_offspring(&mut self) -> SegResult<Vec<Individual>> {
        let params = &self.config.evolution;
        let elites = self.strategy.elites(params).min(params.population_size);
        let count = params.population_size - elites;
        let mut offspring = Vec::with_capacity(count);
        let mut mutations = 0;

        for _ in 0..count {
            let a = self.population.tournament(
                &self.strategy,
                params.tournament_size,
                params.tournament_pressure,
                &mut self.rng,
            )?;
            let parents = self.population.individuals();
            let mut child = if self.rng.f32() < params.crossover_rate {
                let b = self.population.tournament(
                    &self.strategy,
                    params.tournament_size,
                    params.tournament_pressure,
                    &mut self.rng,
                )?;
                parents[a].crossover(&parents[b], params, &mut self.rng)?
            } else {
                parents[a].clone()
            };
            if self.rng.f32() < params.mutation_rate && child.mutate(&mut self.rng) {
                mutations += 1;
            }
            offspring.push(child);
        }
        debug!("Bred {} offspring ({} mutated)", offspring.len(), mutations);
        Ok(offspring)
    }

    /// Runs up to `generations` generations, stopping early when the time
    /// budget runs out or `callback` declines to continue.
    pub fn run<CB: ProgressCallback>(
        &mut self,
        generations: usize,
        callback: CB,
    ) -> SegResult<Vec<EvolutionSummary>> {
        let start = Instant::now();
        let mut history = Vec::with_capacity(generations);
        for _ in 0..generations {
            if let Some(limit) = self.max_time {
                if start.elapsed() >= limit {
                    info!("⏱️  Time budget of {:?} reached", limit);
                    break;
                }
            }
            let summary = self.run_generation()?;
            let keep_going = callback.on_generation(&summary);
            history.push(summary);
            if !keep_going {
                info!("Run stopped by progress callback");
                break;
            }
        }
        Ok(history)
    }

    pub fn summary(&mut self) -> SegResult<EvolutionSummary> {
        if self.population.is_empty() {
            return Err(SegError::EmptyPopulation("no population to summarise".into()));
        }
        let scores = self.population.scalar_fitnesses();
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let best = scores.iter().copied().fold(f64::INFINITY, f64::min);
        Ok(EvolutionSummary {
            generation: self.generation,
            population_size: self.population.len(),
            average_fitness: average,
            best_fitness: best,
            first_front_size: self.first_front()?.len(),
            elapsed_ms: self.started.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Indices of the population's non-dominated individuals.
    pub fn first_front(&mut self) -> SegResult<Vec<usize>> {
        let objectives = self.population.objectives();
        let mut fronts = fast_non_dominated_sort(&objectives)?;
        Ok(fronts.swap_remove(0))
    }

    pub fn front_members(&mut self) -> SegResult<Vec<FrontMember>> {
        let objectives = self.population.objectives();
        let front = self.first_front()?;
        let crowding = crowding_distances(&objectives, &front)?;
        let mut members = Vec::with_capacity(front.len());
        for (&index, crowding_distance) in front.iter().zip(crowding) {
            let segments = match self.population.get_mut(index) {
                Some(ind) => ind.num_segments(),
                None => continue,
            };
            members.push(FrontMember {
                index,
                segments,
                objectives: objectives[index],
                crowding_distance,
            });
        }
        Ok(members)
    }

    /// Best individual under the active strategy.
    pub fn fittest(&self) -> Option<&Individual> {
        self.population.fittest(&self.strategy)
    }
}
