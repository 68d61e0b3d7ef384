pub mod ranking;
pub mod strategy;

pub use self::ranking::ParetoRanking;
pub use self::strategy::{ParetoStrategy, SelectionStrategy, WeightedSumStrategy};

use crate::error::{SegError, SegResult};
use crate::individual::{Individual, Objectives};
use fastrand::Rng;
use rayon::prelude::*;

/// The working set of individuals. Ordering carries no meaning until a
/// [`SelectionStrategy`] has ranked it.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn get(&self, i: usize) -> Option<&Individual> {
        self.individuals.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut Individual> {
        self.individuals.get_mut(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    pub fn extend(&mut self, offspring: Vec<Individual>) {
        self.individuals.extend(offspring);
    }

    /// Keeps the individuals at `indices`, in that order.
    pub fn retain_indices(&mut self, indices: &[usize]) {
        let mut slots: Vec<Option<Individual>> =
            std::mem::take(&mut self.individuals).into_iter().map(Some).collect();
        self.individuals = indices.iter().filter_map(|&i| slots[i].take()).collect();
    }

    /// Decodes and scores every individual that needs it, in parallel.
    pub fn evaluate_all(&mut self) {
        self.individuals
            .par_iter_mut()
            .filter(|ind| ind.needs_evaluation())
            .for_each(|ind| ind.evaluate());
    }

    /// Objective vectors, evaluating first where needed.
    pub fn objectives(&mut self) -> Vec<Objectives> {
        self.evaluate_all();
        self.individuals
            .iter_mut()
            .map(|ind| ind.objectives())
            .collect()
    }

    pub fn scalar_fitnesses(&mut self) -> Vec<f64> {
        self.evaluate_all();
        self.individuals
            .iter_mut()
            .map(|ind| ind.scalar_fitness())
            .collect()
    }

    pub fn average_scalar_fitness(&mut self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let scores = self.scalar_fitnesses();
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }

    /// k-ary tournament. With probability `pressure` the winner is the best
    /// of `k` distinct draws under `strategy`, otherwise a random one of them.
    pub fn tournament<S: SelectionStrategy + ?Sized>(
        &self,
        strategy: &S,
        k: usize,
        pressure: f32,
        rng: &mut Rng,
    ) -> SegResult<usize> {
        if self.is_empty() {
            return Err(SegError::EmptyPopulation(
                "tournament on an empty population".into(),
            ));
        }
        let k = k.clamp(1, self.len());
        let mut pool: Vec<usize> = (0..self.len()).collect();
        for i in 0..k {
            let j = rng.usize(i..pool.len());
            pool.swap(i, j);
        }
        let entrants = &pool[..k];

        if rng.f32() < pressure {
            Ok(best_by(strategy, entrants))
        } else {
            Ok(entrants[rng.usize(..k)])
        }
    }

    /// Indices of the `count` best individuals, best first.
    pub fn best_indices<S: SelectionStrategy + ?Sized>(&self, strategy: &S, count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| strategy.compare(a, b).then_with(|| a.cmp(&b)));
        order.truncate(count);
        order
    }

    pub fn fittest<S: SelectionStrategy + ?Sized>(&self, strategy: &S) -> Option<&Individual> {
        let all: Vec<usize> = (0..self.len()).collect();
        if all.is_empty() {
            return None;
        }
        self.individuals.get(best_by(strategy, &all))
    }
}

fn best_by<S: SelectionStrategy + ?Sized>(strategy: &S, candidates: &[usize]) -> usize {
    let mut best = candidates[0];
    for &c in &candidates[1..] {
        if strategy.compare(c, best).is_lt() {
            best = c;
        }
    }
    best
}
