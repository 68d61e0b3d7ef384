pub mod objectives;
pub mod seeding;
pub mod variation;

pub use self::objectives::Objectives;

use crate::cache::CachedValue;
use crate::config::{Config, CrossoverMode, EvolutionParams, FitnessMode, ObjectiveWeights};
use crate::error::{SegError, SegResult};
use crate::problem::ProblemInstance;
use crate::segmentation::decode::decode_unchecked;
use crate::segmentation::{Direction, Genotype, Segmentation};
use fastrand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// What an individual is judged by, depending on the fitness mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Fitness {
    /// Weighted sum of the objectives, lower is better.
    Scalar(f64),
    /// The raw objectives, compared by Pareto dominance.
    Vector(Objectives),
}

/// One candidate segmentation.
///
/// Owns its genotype and every value derived from it. Decoding and objective
/// evaluation happen on first access and are cached until the genotype
/// changes. Cloning copies the caches, it never shares them.
#[derive(Debug, Clone)]
pub struct Individual {
    problem: Arc<ProblemInstance>,
    genotype: Genotype,
    mode: FitnessMode,
    weights: ObjectiveWeights,
    segmentation: CachedValue<Segmentation>,
    objectives: CachedValue<Objectives>,
    scalar: CachedValue<f64>,
}

impl Individual {
    pub fn new(
        problem: Arc<ProblemInstance>,
        genotype: Genotype,
        mode: FitnessMode,
        weights: ObjectiveWeights,
    ) -> SegResult<Self> {
        if genotype.len() != problem.num_pixels() {
            return Err(SegError::Validation(format!(
                "genotype has {} genes but the image has {} pixels",
                genotype.len(),
                problem.num_pixels()
            )));
        }
        Ok(Self {
            problem,
            genotype,
            mode,
            weights,
            segmentation: CachedValue::new(),
            objectives: CachedValue::new(),
            scalar: CachedValue::new(),
        })
    }

    /// A fresh individual seeded from the image's color MST.
    pub fn seeded(problem: Arc<ProblemInstance>, config: &Config, rng: &mut Rng) -> SegResult<Self> {
        let genotype = seeding::seed_genotype(&problem, &config.seeding, rng)?;
        Self::new(
            problem,
            genotype,
            config.evolution.fitness_mode,
            config.objectives,
        )
    }

    pub fn genotype(&self) -> &[Direction] {
        &self.genotype
    }

    pub fn problem(&self) -> &ProblemInstance {
        &self.problem
    }

    pub fn mode(&self) -> FitnessMode {
        self.mode
    }

    /// True when some derived value would have to be recomputed.
    pub fn needs_evaluation(&self) -> bool {
        self.segmentation.is_dirty() || self.objectives.is_dirty() || self.scalar.is_dirty()
    }

    pub fn segmentation(&mut self) -> &Segmentation {
        let Self {
            problem,
            genotype,
            segmentation,
            ..
        } = self;
        segmentation.get(|| decode_unchecked(genotype, problem))
    }

    pub fn objectives(&mut self) -> Objectives {
        let Self {
            problem,
            genotype,
            segmentation,
            objectives,
            ..
        } = self;
        let seg = segmentation.get(|| decode_unchecked(genotype, problem));
        *objectives.get(|| Objectives::evaluate(problem, seg))
    }

    /// Weighted objective sum, available in either mode.
    pub fn scalar_fitness(&mut self) -> f64 {
        if let Some(&s) = self.scalar.peek() {
            return s;
        }
        let o = self.objectives();
        let weights = self.weights;
        *self
            .scalar
            .get(|| weights.combine(o.edge_value, o.connectivity, o.overall_deviation))
    }

    pub fn fitness(&mut self) -> Fitness {
        match self.mode {
            FitnessMode::Weighted => Fitness::Scalar(self.scalar_fitness()),
            FitnessMode::Pareto => Fitness::Vector(self.objectives()),
        }
    }

    /// Fills every cache.
    pub fn evaluate(&mut self) {
        self.scalar_fitness();
    }

    /// Objectives if they are already computed.
    pub fn cached_objectives(&self) -> Option<Objectives> {
        self.objectives.peek().copied()
    }

    pub fn cached_scalar_fitness(&self) -> Option<f64> {
        self.scalar.peek().copied()
    }

    pub fn num_segments(&mut self) -> usize {
        self.segmentation().len()
    }

    pub fn same_segment(&mut self, a: usize, b: usize) -> bool {
        self.segmentation().same_segment(a, b)
    }

    /// Zero inside a segment, the color distance across segments.
    pub fn segment_distance(&mut self, a: usize, b: usize) -> f32 {
        if self.same_segment(a, b) {
            0.0
        } else {
            self.problem.distance(a, b)
        }
    }

    fn invalidate(&mut self) {
        self.segmentation.invalidate();
        self.objectives.invalidate();
        self.scalar.invalidate();
    }

    /// Redirects one random pixel. Returns whether the genotype changed.
    pub fn mutate(&mut self, rng: &mut Rng) -> bool {
        let changed = variation::mutate_genotype(&mut self.genotype, &self.problem, rng);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// A child mixing `self` (parent A) and `other` (parent B). The child
    /// starts with empty caches.
    pub fn crossover(
        &self,
        other: &Individual,
        params: &EvolutionParams,
        rng: &mut Rng,
    ) -> SegResult<Individual> {
        let genotype = match params.crossover_mode {
            CrossoverMode::SinglePoint => {
                variation::crossover_single_point(&self.genotype, &other.genotype, rng)?
            }
            CrossoverMode::Uniform => variation::crossover_uniform(
                &self.genotype,
                &other.genotype,
                params.uniform_crossover_bias,
                rng,
            )?,
        };
        Individual::new(self.problem.clone(), genotype, self.mode, self.weights)
    }
}
