use crate::error::{SegError, SegResult};
use crate::problem::{Color, ProblemInstance};
use crate::segmentation::Direction;

const UNASSIGNED: usize = usize::MAX;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: usize,
    pub pixels: Vec<usize>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Mean color of the segment's pixels.
    pub fn centroid(&self, problem: &ProblemInstance) -> Color {
        if self.pixels.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0f64; 3];
        for &p in &self.pixels {
            for (acc, &c) in sum.iter_mut().zip(problem.color_of(p)) {
                *acc += c as f64;
            }
        }
        let n = self.pixels.len() as f64;
        sum.map(|s| (s / n) as f32)
    }
}

/// A genotype decoded into disjoint segments covering every pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    segment_ids: Vec<usize>,
    segments: Vec<Segment>,
}

impl Segmentation {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment id of every pixel, row-major.
    pub fn segment_ids(&self) -> &[usize] {
        &self.segment_ids
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline(always)]
    pub fn segment_of(&self, pixel: usize) -> usize {
        self.segment_ids[pixel]
    }

    #[inline(always)]
    pub fn same_segment(&self, a: usize, b: usize) -> bool {
        self.segment_ids[a] == self.segment_ids[b]
    }

    /// Pixels with at least one 4-neighbour in a different segment.
    pub fn boundary_pixels(&self, problem: &ProblemInstance) -> Vec<usize> {
        (0..self.segment_ids.len())
            .filter(|&i| {
                problem
                    .neighbors4(i)
                    .iter()
                    .flatten()
                    .any(|&j| !self.same_segment(i, j))
            })
            .collect()
    }

    pub fn centroids(&self, problem: &ProblemInstance) -> Vec<Color> {
        self.segments.iter().map(|s| s.centroid(problem)).collect()
    }
}

/// Follows each pixel's pointer chain until it ends at a root, runs off the
/// grid, joins an already labelled pixel, or loops back on itself. Roots,
/// grid exits and loops open a new segment; joins inherit the existing id.
///
/// Runs in linear time with an explicit chain buffer, so arbitrarily long
/// pointer chains cannot exhaust the stack.
pub fn decode(genotype: &[Direction], problem: &ProblemInstance) -> SegResult<Segmentation> {
    let n = problem.num_pixels();
    if genotype.len() != n {
        return Err(SegError::Validation(format!(
            "genotype has {} genes but the image has {} pixels",
            genotype.len(),
            n
        )));
    }
    Ok(decode_unchecked(genotype, problem))
}

/// [`decode`] for callers that already guarantee one gene per pixel.
pub(crate) fn decode_unchecked(genotype: &[Direction], problem: &ProblemInstance) -> Segmentation {
    let n = genotype.len();
    let mut segment_ids = vec![UNASSIGNED; n];
    // Start pixel (+1) of the traversal that last walked through each pixel.
    let mut visited_by = vec![0usize; n];
    let mut chain = Vec::new();
    let mut next_id = 0;

    for start in 0..n {
        if segment_ids[start] != UNASSIGNED {
            continue;
        }
        let stamp = start + 1;
        chain.clear();

        let mut current = start;
        let id = loop {
            if segment_ids[current] != UNASSIGNED {
                break segment_ids[current];
            }
            if visited_by[current] == stamp {
                next_id += 1;
                break next_id - 1;
            }
            visited_by[current] = stamp;
            chain.push(current);
            match problem.neighbor(current, genotype[current]) {
                Some(next) => current = next,
                None => {
                    next_id += 1;
                    break next_id - 1;
                }
            }
        };

        for &p in &chain {
            segment_ids[p] = id;
        }
    }

    let mut segments: Vec<Segment> = (0..next_id)
        .map(|id| Segment {
            id,
            pixels: Vec::new(),
        })
        .collect();
    for (pixel, &id) in segment_ids.iter().enumerate() {
        segments[id].pixels.push(pixel);
    }

    Segmentation {
        segment_ids,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ColorMode;
    use Direction::*;

    fn blank(w: usize, h: usize) -> ProblemInstance {
        ProblemInstance::from_rgb(w, h, &vec![[0, 0, 0]; w * h], ColorMode::Rgb).unwrap()
    }

    #[test]
    fn test_all_roots_give_one_segment_per_pixel() {
        let p = blank(3, 2);
        let s = decode(&[None; 6], &p).unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(s.segment_ids(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_chain_into_root() {
        let p = blank(3, 1);
        let s = decode(&[Right, Right, None], &p).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.same_segment(0, 2));
    }

    #[test]
    fn test_two_cycle_becomes_one_segment() {
        let p = blank(2, 1);
        let s = decode(&[Right, Left], &p).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.segments()[0].pixels, vec![0, 1]);
    }

    #[test]
    fn test_four_cycle_with_tail() {
        // Loop 0 -> 1 -> 4 -> 3 -> 0, tail 5 -> 2 -> 1.
        let p = blank(3, 2);
        let g = [Right, Down, Left, Up, Left, Up];
        let s = decode(&g, &p).unwrap();
        assert_eq!(s.len(), 1);
        assert!(s.segment_ids().iter().all(|&id| id == 0));
    }

    #[test]
    fn test_off_grid_pointer_acts_as_root() {
        let p = blank(2, 2);
        let s = decode(&[Up, Left, Down, Right], &p).unwrap();
        // 0 up: off grid. 1 left -> 0. 2 down: off grid. 3 right: off grid.
        assert_eq!(s.len(), 3);
        assert!(s.same_segment(0, 1));
        assert!(!s.same_segment(2, 3));
    }

    #[test]
    fn test_boundary_pixels() {
        let p = blank(2, 2);
        let s = decode(&[Down, Down, None, None], &p).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.boundary_pixels(&p), vec![0, 1, 2, 3]);

        let whole = decode(&[Right, Down, Right, None], &p).unwrap();
        assert!(whole.boundary_pixels(&p).is_empty());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let p = blank(2, 2);
        assert!(decode(&[None; 3], &p).is_err());
    }
}
