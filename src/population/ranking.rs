use crate::error::{SegError, SegResult};
use crate::individual::Objectives;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::debug;

/// `a` is no worse than `b` on every objective and strictly better on one.
#[inline(always)]
pub fn dominates(a: &Objectives, b: &Objectives) -> bool {
    let (a, b) = (a.as_array(), b.as_array());
    let mut strictly_better = false;
    for k in 0..Objectives::COUNT {
        if a[k] > b[k] {
            return false;
        }
        if a[k] < b[k] {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Splits `objectives` into Pareto fronts, best first. Each front lists
/// indices into `objectives`; every index appears in exactly one front.
pub fn fast_non_dominated_sort(objectives: &[Objectives]) -> SegResult<Vec<Vec<usize>>> {
    if objectives.is_empty() {
        return Err(SegError::EmptyPopulation(
            "cannot sort an empty set into fronts".into(),
        ));
    }
    let n = objectives.len();
    let mut dominated_by_count = vec![0usize; n];
    let mut dominates_set: Vec<Vec<usize>> = vec![Vec::new(); n];

    for p in 0..n {
        for q in (p + 1)..n {
            if dominates(&objectives[p], &objectives[q]) {
                dominates_set[p].push(q);
                dominated_by_count[q] += 1;
            } else if dominates(&objectives[q], &objectives[p]) {
                dominates_set[q].push(p);
                dominated_by_count[p] += 1;
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&p| dominated_by_count[p] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &p in &current {
            for &q in &dominates_set[p] {
                dominated_by_count[q] -= 1;
                if dominated_by_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }
    Ok(fronts)
}

/// Crowding distance of each member of `front`, aligned with `front`.
///
/// Per objective the extreme members get `+inf` and interior members add the
/// normalised gap between their neighbours. Objectives on which the whole
/// front agrees contribute nothing.
pub fn crowding_distances(objectives: &[Objectives], front: &[usize]) -> SegResult<Vec<f64>> {
    if front.is_empty() {
        return Err(SegError::EmptyPopulation(
            "cannot compute crowding distance of an empty front".into(),
        ));
    }
    let len = front.len();
    let mut distance = vec![0.0f64; len];
    let mut order: Vec<usize> = (0..len).collect();

    for k in 0..Objectives::COUNT {
        let value = |slot: usize| objectives[front[slot]].as_array()[k];
        order.sort_by(|&a, &b| value(a).total_cmp(&value(b)).then_with(|| a.cmp(&b)));

        let min = value(order[0]);
        let max = value(order[len - 1]);
        distance[order[0]] = f64::INFINITY;
        distance[order[len - 1]] = f64::INFINITY;
        if max == min {
            continue;
        }
        let span = max - min;
        for w in 1..len.saturating_sub(1) {
            let slot = order[w];
            distance[slot] += (value(order[w + 1]) - value(order[w - 1])) / span;
        }
    }
    Ok(distance)
}

/// Front membership and crowding distance for a whole population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParetoRanking {
    fronts: Vec<Vec<usize>>,
    front_of: Vec<usize>,
    crowding: Vec<f64>,
}

impl ParetoRanking {
    pub fn compute(objectives: &[Objectives]) -> SegResult<Self> {
        let timer = Instant::now();
        let fronts = fast_non_dominated_sort(objectives)?;
        let mut front_of = vec![0; objectives.len()];
        let mut crowding = vec![0.0; objectives.len()];
        for (f, front) in fronts.iter().enumerate() {
            let distances = crowding_distances(objectives, front)?;
            for (&i, d) in front.iter().zip(distances) {
                front_of[i] = f;
                crowding[i] = d;
            }
        }
        debug!(
            "Ranked {} individuals into {} fronts in {:.2} ms",
            objectives.len(),
            fronts.len(),
            timer.elapsed().as_secs_f64() * 1000.0
        );
        Ok(Self {
            fronts,
            front_of,
            crowding,
        })
    }

    pub fn len(&self) -> usize {
        self.front_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front_of.is_empty()
    }

    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.fronts
    }

    pub fn first_front(&self) -> &[usize] {
        self.fronts.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn front_of(&self, i: usize) -> usize {
        self.front_of[i]
    }

    pub fn crowding(&self, i: usize) -> f64 {
        self.crowding[i]
    }

    /// `Less` means `a` is preferred: lower front, then larger crowding
    /// distance.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.front_of[a]
            .cmp(&self.front_of[b])
            .then_with(|| self.crowding[b].total_cmp(&self.crowding[a]))
    }

    /// Index of the preferred member of `candidates`, earliest on ties.
    pub fn best_of(&self, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .reduce(|best, c| if self.compare(c, best) == Ordering::Less { c } else { best })
    }
}

/// Picks `target` survivors from `objectives` one at a time: take the best
/// remaining individual, then re-rank whatever is left. Returns indices in
/// the order they were taken.
pub fn select_survivors(objectives: &[Objectives], target: usize) -> SegResult<Vec<usize>> {
    if objectives.is_empty() {
        return Err(SegError::EmptyPopulation(
            "no candidates to select survivors from".into(),
        ));
    }
    let mut remaining: Vec<usize> = (0..objectives.len()).collect();
    let mut chosen = Vec::with_capacity(target.min(objectives.len()));

    while chosen.len() < target && !remaining.is_empty() {
        let subset: Vec<Objectives> = remaining.iter().map(|&i| objectives[i]).collect();
        let ranking = ParetoRanking::compute(&subset)?;
        let all: Vec<usize> = (0..subset.len()).collect();
        let Some(best) = ranking.best_of(&all) else {
            break;
        };
        chosen.push(remaining.remove(best));
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(e: f64, c: f64, d: f64) -> Objectives {
        Objectives {
            edge_value: e,
            connectivity: c,
            overall_deviation: d,
        }
    }

    #[test]
    fn test_dominance_is_strict() {
        let a = obj(1.0, 1.0, 1.0);
        let b = obj(1.0, 2.0, 1.0);
        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert!(!dominates(&a, &a));
        assert!(!dominates(&obj(0.0, 3.0, 0.0), &b));
    }

    #[test]
    fn test_fronts_peel_in_order() {
        let objs = [
            obj(3.0, 3.0, 3.0),
            obj(1.0, 1.0, 1.0),
            obj(2.0, 2.0, 2.0),
            obj(0.5, 4.0, 1.0),
        ];
        let fronts = fast_non_dominated_sort(&objs).unwrap();
        assert_eq!(fronts, vec![vec![1, 3], vec![2], vec![0]]);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            fast_non_dominated_sort(&[]),
            Err(SegError::EmptyPopulation(_))
        ));
        assert!(crowding_distances(&[obj(0.0, 0.0, 0.0)], &[]).is_err());
        assert!(select_survivors(&[], 3).is_err());
    }

    #[test]
    fn test_crowding_interior_and_boundaries() {
        let objs = [
            obj(0.0, 4.0, 1.0),
            obj(1.0, 3.0, 1.0),
            obj(4.0, 0.0, 1.0),
        ];
        let d = crowding_distances(&objs, &[0, 1, 2]).unwrap();
        assert!(d[0].is_infinite() && d[2].is_infinite());
        // Edge: (4 - 0) / 4, connectivity: (4 - 0) / 4, deviation constant.
        assert!((d[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_front_has_no_nan() {
        let objs = vec![obj(1.0, 1.0, 1.0); 4];
        let d = crowding_distances(&objs, &[0, 1, 2, 3]).unwrap();
        assert!(d.iter().all(|x| !x.is_nan()));
        assert_eq!(d[1], 0.0);
    }

    #[test]
    fn test_comparator_prefers_front_then_crowding() {
        let objs = [
            obj(0.0, 4.0, 1.0),
            obj(1.0, 3.0, 1.0),
            obj(4.0, 0.0, 1.0),
            obj(5.0, 5.0, 5.0),
        ];
        let r = ParetoRanking::compute(&objs).unwrap();
        assert_eq!(r.first_front(), &[0, 1, 2]);
        assert_eq!(r.compare(1, 3), Ordering::Less);
        assert_eq!(r.compare(0, 1), Ordering::Less);
        assert_eq!(r.best_of(&[3, 1]), Some(1));
    }

    #[test]
    fn test_survivors_come_from_the_best_fronts() {
        let objs = [
            obj(9.0, 9.0, 9.0),
            obj(0.0, 4.0, 1.0),
            obj(4.0, 0.0, 1.0),
            obj(8.0, 8.0, 8.0),
        ];
        let mut survivors = select_survivors(&objs, 3).unwrap();
        survivors.sort_unstable();
        assert_eq!(survivors, vec![1, 2, 3]);
    }

    #[test]
    fn test_survivors_are_re_ranked_after_each_pick() {
        // One front along a trade-off line: edge and deviation rise while
        // connectivity falls.
        let objs: Vec<Objectives> = [0.0, 4.0, 5.0, 6.0, 10.0]
            .iter()
            .map(|&e| obj(e, 10.0 - e, e))
            .collect();

        // A single ranking keeps both extremes and the two widest interiors.
        let ranking = ParetoRanking::compute(&objs).unwrap();
        assert!((ranking.crowding(2) - 0.6).abs() < 1e-12);
        let mut bulk: Vec<usize> = (0..objs.len()).collect();
        bulk.sort_by(|&a, &b| ranking.compare(a, b).then_with(|| a.cmp(&b)));
        bulk.truncate(4);
        bulk.sort_unstable();
        assert_eq!(bulk, vec![0, 1, 3, 4]);

        // Taking 0 makes 1 a boundary, taking 1 makes 2 one, and so on.
        let survivors = select_survivors(&objs, 4).unwrap();
        assert_eq!(survivors, vec![0, 1, 2, 3]);
        assert_ne!(survivors, bulk);
    }
}
