use crate::config::EvolutionParams;
use crate::error::{SegError, SegResult};
use crate::individual::Individual;
use crate::population::ranking::{select_survivors, ParetoRanking};
use crate::population::Population;
use std::cmp::Ordering;

/// How a population is ordered and how offspring get in.
///
/// `compare` answers for the population most recently passed to `rank`;
/// every method that changes the population re-ranks it before returning.
pub trait SelectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Individuals carried into the next generation unchanged.
    fn elites(&self, params: &EvolutionParams) -> usize;

    fn rank(&mut self, population: &mut Population) -> SegResult<()>;

    /// `Less` means the individual at `a` is preferred over the one at `b`.
    fn compare(&self, a: usize, b: usize) -> Ordering;

    /// Cuts `population` down to its best `target` members.
    fn truncate(&mut self, population: &mut Population, target: usize) -> SegResult<()> {
        self.rank(population)?;
        let keep = population.best_indices(&*self, target);
        population.retain_indices(&keep);
        self.rank(population)
    }

    fn insert_offspring(
        &mut self,
        population: &mut Population,
        offspring: Vec<Individual>,
        params: &EvolutionParams,
    ) -> SegResult<()>;
}

/// Single-objective mode: the weighted objective sum, lower is better, with
/// elitist generational replacement.
#[derive(Debug, Clone, Default)]
pub struct WeightedSumStrategy {
    scores: Vec<f64>,
}

impl WeightedSumStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, i: usize) -> f64 {
        self.scores[i]
    }
}

impl SelectionStrategy for WeightedSumStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn elites(&self, params: &EvolutionParams) -> usize {
        params.elites
    }

    fn rank(&mut self, population: &mut Population) -> SegResult<()> {
        if population.is_empty() {
            return Err(SegError::EmptyPopulation("nothing to rank".into()));
        }
        self.scores = population.scalar_fitnesses();
        Ok(())
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.scores[a].total_cmp(&self.scores[b])
    }

    /// The current elites plus every offspring form the next generation.
    fn insert_offspring(
        &mut self,
        population: &mut Population,
        offspring: Vec<Individual>,
        params: &EvolutionParams,
    ) -> SegResult<()> {
        self.rank(population)?;
        let elites = population.best_indices(&*self, self.elites(params));
        population.retain_indices(&elites);
        population.extend(offspring);
        self.truncate(population, params.population_size)
    }
}

/// NSGA-II: fronts by Pareto dominance, crowding distance within a front,
/// survivors chosen from parents and offspring together.
#[derive(Debug, Clone, Default)]
pub struct ParetoStrategy {
    ranking: ParetoRanking,
}

impl ParetoStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranking(&self) -> &ParetoRanking {
        &self.ranking
    }

    /// Indices of the non-dominated individuals.
    pub fn first_front(&self) -> &[usize] {
        self.ranking.first_front()
    }
}

impl SelectionStrategy for ParetoStrategy {
    fn name(&self) -> &'static str {
        "pareto"
    }

    /// Elites only shrink the offspring batch; every parent still competes
    /// in survivor selection.
    fn elites(&self, params: &EvolutionParams) -> usize {
        params.elites
    }

    fn rank(&mut self, population: &mut Population) -> SegResult<()> {
        self.ranking = ParetoRanking::compute(&population.objectives())?;
        Ok(())
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.ranking.compare(a, b)
    }

    fn truncate(&mut self, population: &mut Population, target: usize) -> SegResult<()> {
        let survivors = select_survivors(&population.objectives(), target)?;
        population.retain_indices(&survivors);
        self.rank(population)
    }

    fn insert_offspring(
        &mut self,
        population: &mut Population,
        offspring: Vec<Individual>,
        params: &EvolutionParams,
    ) -> SegResult<()> {
        population.extend(offspring);
        self.truncate(population, params.population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FitnessMode, ObjectiveWeights};
    use crate::problem::{ColorMode, ProblemInstance};
    use crate::segmentation::Direction;
    use std::sync::Arc;

    fn population(genotypes: Vec<Vec<Direction>>) -> Population {
        let pixels = [[0, 0, 0], [0, 0, 0], [250, 250, 250], [250, 250, 250]];
        let problem = Arc::new(ProblemInstance::from_rgb(2, 2, &pixels, ColorMode::Rgb).unwrap());
        Population::new(
            genotypes
                .into_iter()
                .map(|g| {
                    Individual::new(
                        problem.clone(),
                        g,
                        FitnessMode::Weighted,
                        ObjectiveWeights::default(),
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_weighted_prefers_lower_sum() {
        use Direction::*;
        // Top row dark, bottom row light. [Right, None, Right, None] matches it.
        let mut pop = population(vec![
            vec![None, None, None, None],
            vec![Right, None, Right, None],
        ]);
        let mut s = WeightedSumStrategy::new();
        s.rank(&mut pop).unwrap();
        assert_eq!(s.compare(1, 0), Ordering::Less);
        assert_eq!(pop.best_indices(&s, 1), vec![1]);
    }

    #[test]
    fn test_weighted_keeps_elites_and_offspring() {
        use Direction::*;
        let mut pop = population(vec![
            vec![None, None, None, None],
            vec![Right, None, Right, None],
            vec![Down, None, None, None],
        ]);
        let offspring = population(vec![vec![None; 4], vec![None; 4]])
            .individuals()
            .to_vec();
        let params = EvolutionParams {
            population_size: 3,
            elites: 1,
            ..EvolutionParams::default()
        };
        let mut s = WeightedSumStrategy::new();
        s.insert_offspring(&mut pop, offspring, &params).unwrap();

        assert_eq!(pop.len(), 3);
        let best = pop.fittest(&s).unwrap();
        assert_eq!(best.genotype(), &[Right, None, Right, None]);
    }

    #[test]
    fn test_both_strategies_honour_configured_elites() {
        let params = EvolutionParams {
            elites: 3,
            ..EvolutionParams::default()
        };
        assert_eq!(ParetoStrategy::new().elites(&params), 3);
        assert_eq!(WeightedSumStrategy::new().elites(&params), 3);
    }

    #[test]
    fn test_pareto_insert_returns_to_target_size() {
        let mut pop = population(vec![vec![Direction::None; 4]; 3]);
        let offspring = population(vec![vec![Direction::Right; 4]; 3])
            .individuals()
            .to_vec();
        let params = EvolutionParams {
            population_size: 3,
            ..EvolutionParams::default()
        };
        let mut s = ParetoStrategy::new();
        s.insert_offspring(&mut pop, offspring, &params).unwrap();
        assert_eq!(pop.len(), 3);
        assert_eq!(s.ranking().len(), 3);
        assert!(!s.first_front().is_empty());
    }

    #[test]
    fn test_ranking_empty_population_fails() {
        let mut pop = Population::default();
        assert!(WeightedSumStrategy::new().rank(&mut pop).is_err());
        assert!(ParetoStrategy::new().rank(&mut pop).is_err());
    }
}
