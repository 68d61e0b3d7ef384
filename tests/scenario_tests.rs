use rstest::rstest;
use segevo::config::{FitnessMode, ObjectiveWeights};
use segevo::graph::minimum_spanning_tree;
use segevo::individual::seeding::genotype_from_tree;
use segevo::individual::Individual;
use segevo::problem::{color_distance, ColorMode, ProblemInstance};
use segevo::segmentation::{decode, Direction};
use std::sync::Arc;

fn individual(problem: ProblemInstance, genotype: Vec<Direction>) -> Individual {
    Individual::new(
        Arc::new(problem),
        genotype,
        FitnessMode::Pareto,
        ObjectiveWeights::default(),
    )
    .unwrap()
}

#[test]
fn test_uniform_3x3_is_one_flawless_segment() {
    let p = ProblemInstance::from_rgb(3, 3, &[[90, 140, 30]; 9], ColorMode::Rgb).unwrap();
    let tree = minimum_spanning_tree(p.graph(), 0).unwrap();
    assert_eq!(tree.total_weight(p.graph()), 0.0);

    let genotype = genotype_from_tree(&tree, &p);
    assert_eq!(genotype[0], Direction::None);

    let mut ind = individual(p, genotype);
    assert_eq!(ind.num_segments(), 1);
    assert_eq!(ind.segmentation().segments()[0].len(), 9);

    let o = ind.objectives();
    assert_eq!(o.edge_value, 0.0);
    assert_eq!(o.connectivity, 0.0);
    assert_eq!(o.overall_deviation, 0.0);
}

#[test]
fn test_uniform_3x3_pointing_at_origin() {
    // Row 0 points left, the rest point up: every chain reaches pixel 0.
    use Direction::*;
    let p = ProblemInstance::from_rgb(3, 3, &[[10, 10, 10]; 9], ColorMode::Hsb).unwrap();
    let mut ind = individual(p, vec![None, Left, Left, Up, Up, Up, Up, Up, Up]);
    assert_eq!(ind.num_segments(), 1);
    let o = ind.objectives();
    assert_eq!(o.as_array(), [0.0, 0.0, 0.0]);
}

#[rstest]
#[case(ColorMode::Rgb, [200, 30, 30], [20, 20, 220])]
#[case(ColorMode::Hsb, [200, 30, 30], [20, 20, 220])]
#[case(ColorMode::Rgb, [0, 0, 0], [255, 255, 255])]
fn test_two_color_column_split(#[case] mode: ColorMode, #[case] a: [u8; 3], #[case] b: [u8; 3]) {
    use Direction::*;
    // Pixels 0 and 2 are color A, 1 and 3 color B.
    let p = ProblemInstance::from_rgb(2, 2, &[a, b, a, b], mode).unwrap();
    let d_ab = color_distance(&mode.convert(a), &mode.convert(b)) as f64;

    let mut ind = individual(p, vec![None, None, Up, Up]);
    assert_eq!(ind.num_segments(), 2);
    assert!(ind.same_segment(0, 2));
    assert!(ind.same_segment(1, 3));
    assert!(!ind.same_segment(0, 1));

    let o = ind.objectives();
    assert!(o.overall_deviation.abs() < 1e-9);
    assert!((o.edge_value - 2.0 * d_ab).abs() < 1e-4);
}

#[test]
fn test_same_segment_is_symmetric_with_zero_distance() {
    use Direction::*;
    let pixels: Vec<[u8; 3]> = (0..12).map(|i| [i as u8 * 20, 100, 50]).collect();
    let p = ProblemInstance::from_rgb(4, 3, &pixels, ColorMode::Rgb).unwrap();
    let genotype = vec![
        Right, Right, None, Left, //
        Up, None, Left, Up, //
        Right, Up, Down, None,
    ];
    let mut ind = individual(p, genotype);
    for i in 0..12 {
        for j in 0..12 {
            assert_eq!(ind.same_segment(i, j), ind.same_segment(j, i));
            if ind.same_segment(i, j) {
                assert_eq!(ind.segment_distance(i, j), 0.0);
            }
        }
    }
}

#[test]
fn test_mutation_is_reflected_in_objectives() {
    use Direction::*;
    let p = ProblemInstance::from_rgb(2, 2, &[[0, 0, 0], [0, 0, 0], [255, 0, 0], [255, 0, 0]], ColorMode::Rgb)
        .unwrap();
    let mut ind = individual(p, vec![Right, None, Right, None]);
    assert_eq!(ind.objectives().overall_deviation, 0.0);

    let mut rng = fastrand::Rng::with_seed(1);
    let mut changed = false;
    while !changed {
        changed = ind.mutate(&mut rng);
    }
    assert!(ind.needs_evaluation());
    let after = ind.objectives();

    let fresh = decode(ind.genotype(), ind.problem()).unwrap();
    assert_eq!(ind.segmentation(), &fresh);
    let recomputed = segevo::individual::Objectives::evaluate(ind.problem(), &fresh);
    assert_eq!(after, recomputed);
    assert_ne!(ind.genotype(), &[Right, None, Right, None]);
}
