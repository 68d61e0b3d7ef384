pub mod inspect;
pub mod run;

use clap::Args;
use segevo::problem::{ColorMode, SyntheticPattern};

/// The synthetic image a command works on.
#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    #[arg(short, long, value_enum, default_value_t = SyntheticPattern::Bands)]
    pub pattern: SyntheticPattern,

    #[arg(short = 'W', long, default_value_t = 48)]
    pub width: usize,

    #[arg(short = 'H', long, default_value_t = 32)]
    pub height: usize,

    /// Seed for the image colors, independent of the evolution seed.
    #[arg(long, default_value_t = 7)]
    pub image_seed: u64,

    #[arg(long, value_enum, default_value_t = ColorMode::Hsb)]
    pub color_mode: ColorMode,
}
