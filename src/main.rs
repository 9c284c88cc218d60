use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tapzone::config::Config;
use tracing::{info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; explicit command-line values still win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Simulate(cmd::simulate::SimulateArgs),
    Inspect(cmd::inspect::InspectArgs),
}

fn resolve_config(path: &Option<String>, cli_config: &Config, sub_matches: &ArgMatches) -> Config {
    let Some(path) = path else {
        return cli_config.clone();
    };

    info!("⚖️  Loading config from: {}", path);
    let mut config = Config::load_from_file(path).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });
    config.merge_from_cli(cli_config, sub_matches);
    config
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing TapZone...");

    // Config args live inside the subcommand's matches, not the root.
    let (cli_config, sub_matches) = match &cli.command {
        Commands::Simulate(args) => (&args.config, matches.subcommand_matches("simulate")),
        Commands::Inspect(args) => (&args.config, matches.subcommand_matches("inspect")),
    };
    let Some(sub_matches) = sub_matches else {
        eprintln!("❌ missing subcommand arguments");
        process::exit(2);
    };

    let config = resolve_config(&cli.config, cli_config, sub_matches);
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Simulate(args) => cmd::simulate::run(args, config),
        Commands::Inspect(args) => cmd::inspect::run(args, config),
    };

    if let Err(e) = result {
        eprintln!("\n❌ FATAL: {}", e);
        process::exit(1);
    }
}
