use crate::cmd::ImageArgs;
use crate::reports;
use clap::Args;
use segevo::config::Config;
use segevo::error::SegResult;
use segevo::individual::Individual;
use segevo::problem::ProblemInstance;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long, default_value_t = 42)]
    pub seed: u64,

    /// How many seeded individuals to score.
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
}

pub fn run(args: &InspectArgs, config: &Config, problem: Arc<ProblemInstance>) -> SegResult<()> {
    println!("\n🔎 === SEEDED INDIVIDUALS === 🔎");
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut rows = Vec::with_capacity(args.count);
    let mut first_map = None;

    for i in 0..args.count {
        let mut ind = Individual::seeded(problem.clone(), config, &mut rng)?;
        let objectives = ind.objectives();
        let scalar = ind.scalar_fitness();
        let segments = ind.num_segments();
        if i == 0 {
            first_map = Some(ind.segmentation().segment_ids().to_vec());
        }
        rows.push((segments, objectives, scalar));
    }

    reports::print_seed_report(&rows);
    if let Some(ids) = first_map {
        reports::print_segment_map(problem.width(), &ids);
    }
    Ok(())
}
