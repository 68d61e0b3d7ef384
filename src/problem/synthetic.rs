use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Procedural test images, so runs need no image decoder.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    /// Vertical stripes of random solid colors.
    Bands,
    /// Two random colors in a checkerboard of square cells.
    Checker,
    /// Horizontal brightness ramp with a random tint.
    Gradient,
}

impl SyntheticPattern {
    /// Row-major RGB pixels. The same seed always gives the same image.
    pub fn render(self, width: usize, height: usize, seed: u64) -> Vec<[u8; 3]> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut random_color = || [rng.u8(..), rng.u8(..), rng.u8(..)];

        match self {
            SyntheticPattern::Bands => {
                let bands = 4.min(width.max(1));
                let palette: Vec<[u8; 3]> = (0..bands).map(|_| random_color()).collect();
                (0..width * height)
                    .map(|i| palette[(i % width) * bands / width])
                    .collect()
            }
            SyntheticPattern::Checker => {
                let cell = (width.min(height) / 4).max(1);
                let (a, b) = (random_color(), random_color());
                (0..width * height)
                    .map(|i| {
                        let (x, y) = (i % width, i / width);
                        if (x / cell + y / cell) % 2 == 0 {
                            a
                        } else {
                            b
                        }
                    })
                    .collect()
            }
            SyntheticPattern::Gradient => {
                let tint = random_color();
                let span = (width.max(2) - 1) as f32;
                (0..width * height)
                    .map(|i| {
                        let t = (i % width) as f32 / span;
                        tint.map(|c| (c as f32 * t).round() as u8)
                    })
                    .collect()
            }
        }
    }
}
