use crate::error::{SegError, SegResult};
use crate::problem::ProblemInstance;
use crate::segmentation::{Direction, Genotype};
use fastrand::Rng;
use strum::IntoEnumIterator;

/// Points one random pixel somewhere new: a root or any cardinal
/// direction that stays on the grid, never its current direction.
///
/// Returns `false` when the pixel has no alternative (a 1x1 image).
pub fn mutate_genotype(genotype: &mut [Direction], problem: &ProblemInstance, rng: &mut Rng) -> bool {
    if genotype.is_empty() {
        return false;
    }
    let pixel = rng.usize(..genotype.len());
    let current = genotype[pixel];

    let mut options = [Direction::None; 5];
    let mut count = 0;
    for dir in Direction::iter() {
        let usable = dir == Direction::None || problem.neighbor(pixel, dir).is_some();
        if usable && dir != current {
            options[count] = dir;
            count += 1;
        }
    }
    if count == 0 {
        return false;
    }
    genotype[pixel] = options[rng.usize(..count)];
    true
}

fn check_lengths(a: &[Direction], b: &[Direction]) -> SegResult<()> {
    if a.len() != b.len() {
        return Err(SegError::Validation(format!(
            "crossover parents differ in length ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

/// Genes `[0, k)` from `a`, the rest from `b`, for a uniform `k`.
pub fn crossover_single_point(a: &[Direction], b: &[Direction], rng: &mut Rng) -> SegResult<Genotype> {
    check_lengths(a, b)?;
    if a.is_empty() {
        return Ok(Vec::new());
    }
    let k = rng.usize(..a.len());
    let mut child = Vec::with_capacity(a.len());
    child.extend_from_slice(&a[..k]);
    child.extend_from_slice(&b[k..]);
    Ok(child)
}

/// Each gene from `a` with probability `bias`, otherwise from `b`.
pub fn crossover_uniform(
    a: &[Direction],
    b: &[Direction],
    bias: f32,
    rng: &mut Rng,
) -> SegResult<Genotype> {
    check_lengths(a, b)?;
    Ok(a.iter()
        .zip(b)
        .map(|(&ga, &gb)| if rng.f32() < bias { ga } else { gb })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ColorMode;

    fn blank(w: usize, h: usize) -> ProblemInstance {
        ProblemInstance::from_rgb(w, h, &vec![[0, 0, 0]; w * h], ColorMode::Rgb).unwrap()
    }

    #[test]
    fn test_mutation_always_changes_a_gene() {
        let p = blank(4, 4);
        let mut rng = Rng::with_seed(7);
        for _ in 0..200 {
            let mut g = vec![Direction::None; 16];
            assert!(mutate_genotype(&mut g, &p, &mut rng));
            let changed: Vec<usize> = (0..16).filter(|&i| g[i] != Direction::None).collect();
            assert_eq!(changed.len(), 1);
            let i = changed[0];
            assert!(p.neighbor(i, g[i]).is_some(), "mutation pointed off grid");
        }
    }

    #[test]
    fn test_mutation_can_make_a_root() {
        // On a 2x1 strip each pixel's only alternative is to become a root.
        let p = blank(2, 1);
        let mut rng = Rng::with_seed(11);
        for _ in 0..50 {
            let mut g = vec![Direction::Right, Direction::Left];
            assert!(mutate_genotype(&mut g, &p, &mut rng));
            assert_eq!(g.iter().filter(|&&d| d == Direction::None).count(), 1);
        }
    }

    #[test]
    fn test_single_pixel_cannot_mutate() {
        let p = blank(1, 1);
        let mut g = vec![Direction::None];
        assert!(!mutate_genotype(&mut g, &p, &mut Rng::with_seed(1)));
        assert_eq!(g, vec![Direction::None]);
    }

    #[test]
    fn test_uniform_bias_extremes() {
        let a = vec![Direction::Up; 10];
        let b = vec![Direction::Down; 10];
        let mut rng = Rng::with_seed(3);
        assert_eq!(crossover_uniform(&a, &b, 1.0, &mut rng).unwrap(), a);
        assert_eq!(crossover_uniform(&a, &b, 0.0, &mut rng).unwrap(), b);
    }

    #[test]
    fn test_single_point_is_prefix_then_suffix() {
        let a = vec![Direction::Left; 9];
        let b = vec![Direction::Right; 9];
        let child = crossover_single_point(&a, &b, &mut Rng::with_seed(11)).unwrap();
        let k = child.iter().take_while(|&&d| d == Direction::Left).count();
        assert!(child[k..].iter().all(|&d| d == Direction::Right));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let mut rng = Rng::with_seed(0);
        let a = vec![Direction::None; 3];
        let b = vec![Direction::None; 4];
        assert!(crossover_single_point(&a, &b, &mut rng).is_err());
        assert!(crossover_uniform(&a, &b, 0.5, &mut rng).is_err());
    }
}
