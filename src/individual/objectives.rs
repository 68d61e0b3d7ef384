use crate::problem::{color_distance, ProblemInstance};
use crate::segmentation::Segmentation;
use serde::{Deserialize, Serialize};

/// The three segmentation criteria. All are minimised.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Objectives {
    pub edge_value: f64,
    pub connectivity: f64,
    pub overall_deviation: f64,
}

impl Objectives {
    pub const COUNT: usize = 3;

    pub fn evaluate(problem: &ProblemInstance, segmentation: &Segmentation) -> Self {
        Self {
            edge_value: edge_value(problem, segmentation),
            connectivity: connectivity(problem, segmentation),
            overall_deviation: overall_deviation(problem, segmentation),
        }
    }

    #[inline(always)]
    pub fn as_array(&self) -> [f64; Self::COUNT] {
        [self.edge_value, self.connectivity, self.overall_deviation]
    }
}

/// Color distance summed over 4-adjacent pixel pairs that straddle a segment
/// boundary. Each pair is counted once.
pub fn edge_value(problem: &ProblemInstance, segmentation: &Segmentation) -> f64 {
    let mut total = 0.0;
    for i in 0..problem.num_pixels() {
        let ring = problem.neighbors4(i);
        // Right and down cover every unordered pair exactly once.
        for j in [ring[1], ring[2]].into_iter().flatten() {
            if !segmentation.same_segment(i, j) {
                total += problem.distance(i, j) as f64;
            }
        }
    }
    total
}

/// Sum of `1 / rank` over every pixel's 8-neighbours that sit in another
/// segment, with rank taken from the fixed neighbour enumeration.
pub fn connectivity(problem: &ProblemInstance, segmentation: &Segmentation) -> f64 {
    let mut total = 0.0;
    for i in 0..problem.num_pixels() {
        for (slot, n) in problem.neighbors8(i).iter().enumerate() {
            if let Some(j) = *n {
                if !segmentation.same_segment(i, j) {
                    total += 1.0 / (slot + 1) as f64;
                }
            }
        }
    }
    total
}

/// Distance of every pixel to its segment's mean color, summed.
pub fn overall_deviation(problem: &ProblemInstance, segmentation: &Segmentation) -> f64 {
    segmentation
        .segments()
        .iter()
        .map(|segment| {
            let centroid = segment.centroid(problem);
            segment
                .pixels
                .iter()
                .map(|&p| color_distance(problem.color_of(p), &centroid) as f64)
                .sum::<f64>()
        })
        .sum()
}
