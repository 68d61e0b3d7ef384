use crate::config::SeedingParams;
use crate::error::{SegError, SegResult};
use crate::graph::{minimum_spanning_tree, Tree};
use crate::problem::ProblemInstance;
use crate::segmentation::{Direction, Genotype};
use fastrand::Rng;

/// Every tree node points at its parent; the root and detached nodes are
/// segment roots.
pub fn genotype_from_tree(tree: &Tree, problem: &ProblemInstance) -> Genotype {
    let mut genotype = vec![Direction::None; tree.len()];
    for (child, parent) in tree.edges() {
        genotype[child] = problem.direction_between(child, parent);
    }
    genotype
}

/// A plausible starting segmentation: the color MST from a random pixel,
/// cut at a few of its heaviest edges.
///
/// Only edges above a subtree of at least `min_seed_subtree` pixels are
/// eligible, so cuts never split off specks. The heaviest
/// `seed_edge_fraction` of those (at least one) form the pool, and
/// `segments - 1` of them are cut, with `segments` drawn uniformly from
/// the configured bounds, which must not be inverted.
pub fn seed_genotype(
    problem: &ProblemInstance,
    params: &SeedingParams,
    rng: &mut Rng,
) -> SegResult<Genotype> {
    if params.min_initial_segments > params.max_initial_segments {
        return Err(SegError::Config(format!(
            "invalid initial segment bounds [{}, {}]",
            params.min_initial_segments, params.max_initial_segments
        )));
    }
    let start = rng.usize(..problem.num_pixels());
    let tree = minimum_spanning_tree(problem.graph(), start)?;
    let mut genotype = genotype_from_tree(&tree, problem);

    let sizes = tree.subtree_sizes();
    let mut candidates: Vec<(usize, f32)> = tree
        .edges()
        .filter(|&(child, _)| sizes[child] + 1 >= params.min_seed_subtree)
        .map(|(child, parent)| (child, problem.graph().weight(child, parent).unwrap_or(0.0)))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if !candidates.is_empty() {
        let keep = ((candidates.len() as f32 * params.seed_edge_fraction) as usize).max(1);
        candidates.truncate(keep);
    }

    let segments = rng.usize(params.min_initial_segments..=params.max_initial_segments);
    let cuts = segments.saturating_sub(1).min(candidates.len());
    // Partial Fisher-Yates: the first `cuts` slots end up a random sample.
    for i in 0..cuts {
        let j = rng.usize(i..candidates.len());
        candidates.swap(i, j);
        genotype[candidates[i].0] = Direction::None;
    }

    Ok(genotype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ColorMode;
    use crate::segmentation::decode;

    #[test]
    fn test_tree_genotype_decodes_to_one_segment() {
        let pixels: Vec<[u8; 3]> = (0..20).map(|i| [i as u8 * 10, 0, 0]).collect();
        let p = ProblemInstance::from_rgb(5, 4, &pixels, ColorMode::Rgb).unwrap();
        let tree = minimum_spanning_tree(p.graph(), 7).unwrap();
        let g = genotype_from_tree(&tree, &p);

        assert_eq!(g[7], Direction::None);
        assert_eq!(g.iter().filter(|&&d| d == Direction::None).count(), 1);
        assert_eq!(decode(&g, &p).unwrap().len(), 1);
    }

    #[test]
    fn test_seeding_cuts_at_the_color_edge() {
        // Left half black, right half white: the only heavy MST edge crosses
        // the middle.
        let (w, h) = (8, 4);
        let pixels: Vec<[u8; 3]> = (0..w * h)
            .map(|i| if i % w < w / 2 { [0, 0, 0] } else { [255, 255, 255] })
            .collect();
        let p = ProblemInstance::from_rgb(w, h, &pixels, ColorMode::Rgb).unwrap();
        let params = SeedingParams {
            min_initial_segments: 2,
            max_initial_segments: 2,
            min_seed_subtree: 1,
            seed_edge_fraction: 0.0,
        };

        let mut rng = Rng::with_seed(5);
        for _ in 0..10 {
            let g = seed_genotype(&p, &params, &mut rng).unwrap();
            let s = decode(&g, &p).unwrap();
            assert_eq!(s.len(), 2);
            for i in 0..w * h {
                let j = if i % w < w / 2 { 0 } else { w - 1 };
                assert!(s.same_segment(i, j));
            }
        }
    }

    #[test]
    fn test_inverted_segment_bounds_are_an_error() {
        let pixels = vec![[10, 20, 30]; 6];
        let p = ProblemInstance::from_rgb(3, 2, &pixels, ColorMode::Rgb).unwrap();
        let params = SeedingParams {
            min_initial_segments: 5,
            max_initial_segments: 2,
            ..SeedingParams::default()
        };
        let mut rng = Rng::with_seed(1);
        assert!(matches!(
            seed_genotype(&p, &params, &mut rng),
            Err(SegError::Config(_))
        ));
    }
}
