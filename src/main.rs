use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use segevo::config::Config;
use segevo::error::SegResult;
use segevo::problem::ProblemInstance;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with evolution, objective and seeding settings.
    /// Flags given on the command line win over the file.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve segmentations of a synthetic image.
    Run(cmd::run::RunArgs),
    /// Seed individuals and score them without evolving.
    Inspect(cmd::inspect::InspectArgs),
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}:", context);
    eprintln!("   {}", err);
    process::exit(1);
}

fn resolve_config(path: Option<&str>, cli_config: &Config, sub_matches: &ArgMatches) -> SegResult<Config> {
    let config = match path {
        Some(path) => {
            eprintln!("📂 Loading config from: {}", path);
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, sub_matches);
            file_config
        }
        None => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    // 1. Raw matches tell user input apart from defaults
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // 2. Logging goes to stderr so --json output stays clean
    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    // 3. Subcommand config + image, and the matches they were parsed from
    let (cli_config, image, name) = match &cli.command {
        Commands::Run(args) => (&args.config, &args.image, "run"),
        Commands::Inspect(args) => (&args.config, &args.image, "inspect"),
    };
    let Some(sub_matches) = matches.subcommand_matches(name) else {
        fail("Missing subcommand arguments", name);
    };

    let config = resolve_config(cli.config.as_deref(), cli_config, sub_matches)
        .unwrap_or_else(|e| fail("Invalid configuration", e));

    // 4. Build the problem instance
    let pixels = image.pattern.render(image.width, image.height, image.image_seed);
    let problem = ProblemInstance::from_rgb(image.width, image.height, &pixels, image.color_mode)
        .map(Arc::new)
        .unwrap_or_else(|e| fail("Could not prepare image", e));
    eprintln!(
        "🖼️  {} image {}x{} ({})",
        image.pattern, image.width, image.height, image.color_mode
    );

    // 5. Execute
    let result = match &cli.command {
        Commands::Run(args) => cmd::run::run(args, config, problem),
        Commands::Inspect(args) => cmd::inspect::run(args, &config, problem),
    };
    if let Err(e) = result {
        fail("Run failed", e);
    }
}
