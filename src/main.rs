use anyhow::Context;
use clap::Parser;
use tradelane::adapter::inbound::cli::command::{Cli, Commands};
use tradelane::adapter::inbound::cli::output::{self, OutputConfig};
use tradelane::adapter::inbound::cli::{reach, route, warm};
use tradelane::infrastructure::config::Config;
use tradelane::infrastructure::universe::load_universe;
use tradelane::infrastructure::MarketCore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = run(&cli).await {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Load configuration for the CLI. A missing file yields the defaults.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)
            .with_context(|| format!("failed to load {}", cli.config.display()))?
    } else {
        output::note(&format!("{} not found, using defaults", cli.config.display()));
        Config::parse_toml("")?
    };

    match output::verbosity() {
        0 => {}
        1 => config.logging.level = "debug".into(),
        _ => config.logging.level = "trace".into(),
    }
    if output::is_json() {
        config.logging.format = "json".into();
    }
    Ok(config)
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    config.init_logging();

    match &cli.command {
        Commands::Reach(args) => {
            let universe = load_universe(&config.universe_path)
                .with_context(|| format!("failed to load {}", config.universe_path))?;
            reach::execute(&universe, args);
        }
        Commands::Route(args) => {
            let universe = load_universe(&config.universe_path)
                .with_context(|| format!("failed to load {}", config.universe_path))?;
            route::execute(&universe, args);
        }
        Commands::Warm(args) => {
            let core = MarketCore::bootstrap(&config)?;
            warm::execute(&core.orders, &core.history, args).await;
        }
    }
    Ok(())
}
