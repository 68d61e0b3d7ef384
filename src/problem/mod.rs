pub mod synthetic;

pub use self::synthetic::SyntheticPattern;

use crate::error::{SegError, SegResult};
use crate::graph::WeightedGraph;
use crate::segmentation::Direction;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::debug;

pub type Color = [f32; 3];

/// 8-neighbour offsets `(dx, dy)` in the order connectivity ranks them.
/// Rank of a neighbour is its position here plus one.
pub const NEIGHBOR_OFFSETS_8: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Channels kept on their 0..=255 scale.
    Rgb,
    /// Hue, saturation and brightness, each in [0, 1].
    #[default]
    Hsb,
}

impl ColorMode {
    pub fn convert(self, rgb: [u8; 3]) -> Color {
        match self {
            ColorMode::Rgb => [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32],
            ColorMode::Hsb => rgb_to_hsb(rgb),
        }
    }
}

fn rgb_to_hsb([r, g, b]: [u8; 3]) -> Color {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    let brightness = max / 255.0;
    let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };
    if saturation == 0.0 {
        return [0.0, 0.0, brightness];
    }

    let span = max - min;
    let rc = (max - r) / span;
    let gc = (max - g) / span;
    let bc = (max - b) / span;
    let sector = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let mut hue = sector / 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }
    [hue, saturation, brightness]
}

#[inline(always)]
pub fn color_distance(a: &Color, b: &Color) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// An image prepared for segmentation: per-pixel colors, fixed neighbour
/// tables and the 4-connected color-distance graph.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    width: usize,
    height: usize,
    color_mode: ColorMode,
    colors: Vec<Color>,
    /// Indexed by [`Direction::cardinal_index`].
    neighbors4: Vec<[Option<usize>; 4]>,
    /// Ordered as [`NEIGHBOR_OFFSETS_8`].
    neighbors8: Vec<[Option<usize>; 8]>,
    graph: WeightedGraph,
}

impl ProblemInstance {
    pub fn from_rgb(
        width: usize,
        height: usize,
        pixels: &[[u8; 3]],
        color_mode: ColorMode,
    ) -> SegResult<Self> {
        let colors = pixels.iter().map(|&p| color_mode.convert(p)).collect();
        Self::from_colors(width, height, colors, color_mode)
    }

    /// Builds an instance from colors already expressed in `color_mode`.
    pub fn from_colors(
        width: usize,
        height: usize,
        colors: Vec<Color>,
        color_mode: ColorMode,
    ) -> SegResult<Self> {
        if width == 0 || height == 0 {
            return Err(SegError::Validation(format!(
                "image must be non-empty, got {}x{}",
                width, height
            )));
        }
        if colors.len() != width * height {
            return Err(SegError::Validation(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width * height,
                width,
                height,
                colors.len()
            )));
        }

        let n = width * height;
        let at = |x: i64, y: i64| -> Option<usize> {
            if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                None
            } else {
                Some(y as usize * width + x as usize)
            }
        };

        let mut neighbors4 = Vec::with_capacity(n);
        let mut neighbors8 = Vec::with_capacity(n);
        for i in 0..n {
            let (x, y) = ((i % width) as i64, (i / width) as i64);
            neighbors4.push([at(x, y - 1), at(x + 1, y), at(x, y + 1), at(x - 1, y)]);
            let mut ring = [None; 8];
            for (slot, &(dx, dy)) in ring.iter_mut().zip(NEIGHBOR_OFFSETS_8.iter()) {
                *slot = at(x + dx, y + dy);
            }
            neighbors8.push(ring);
        }

        let mut graph = WeightedGraph::new(n);
        for (i, ring) in neighbors4.iter().enumerate() {
            // Right and down only, so each adjacent pair is added once.
            for j in [ring[1], ring[2]].into_iter().flatten() {
                graph.add_edge(i, j, color_distance(&colors[i], &colors[j]));
            }
        }
        debug!(
            "Prepared {}x{} image ({}) with {} graph edges",
            width,
            height,
            color_mode,
            graph.num_edges()
        );

        Ok(Self {
            width,
            height,
            color_mode,
            colors,
            neighbors4,
            neighbors8,
            graph,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_pixels(&self) -> usize {
        self.colors.len()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[inline(always)]
    pub fn color_of(&self, i: usize) -> &Color {
        &self.colors[i]
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[inline(always)]
    pub fn distance(&self, i: usize, j: usize) -> f32 {
        color_distance(&self.colors[i], &self.colors[j])
    }

    /// Cardinal neighbours, `None` where the grid ends.
    #[inline(always)]
    pub fn neighbors4(&self, i: usize) -> &[Option<usize>; 4] {
        &self.neighbors4[i]
    }

    #[inline(always)]
    pub fn neighbors8(&self, i: usize) -> &[Option<usize>; 8] {
        &self.neighbors8[i]
    }

    /// Pixel reached by following `dir` from `i`, if it stays on the grid.
    #[inline(always)]
    pub fn neighbor(&self, i: usize, dir: Direction) -> Option<usize> {
        dir.cardinal_index().and_then(|k| self.neighbors4[i][k])
    }

    /// Direction leading from `src` to `dst`; `None` unless they are
    /// 4-adjacent.
    pub fn direction_between(&self, src: usize, dst: usize) -> Direction {
        Direction::CARDINAL
            .into_iter()
            .find(|&d| self.neighbor(src, d) == Some(dst))
            .unwrap_or(Direction::None)
    }

    pub fn pixel_to_pos(&self, i: usize) -> (usize, usize) {
        (i % self.width, i / self.width)
    }

    pub fn pos_to_pixel(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }
}
