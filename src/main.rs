use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use kanaviz::config::VizConfig;
use kanaviz::loader;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file providing base settings; explicit flags win.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Show(cmd::show::ShowArgs),
    Browse(cmd::browse::BrowseArgs),
    Summary(cmd::summary::SummaryArgs),
}

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let (cli_config, sub_name) = match &cli.command {
        Commands::Show(args) => (&args.config, "show"),
        Commands::Browse(args) => (&args.config, "browse"),
        Commands::Summary(args) => (&args.config, "summary"),
    };

    let config = match &cli.config {
        Some(path) => {
            info!("⚙️  Loading settings from: {}", path);
            let mut base = VizConfig::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(2);
            });
            if let Some(sub_matches) = matches.subcommand_matches(sub_name) {
                base.merge_from_cli(cli_config, sub_matches);
            }
            base
        }
        None => cli_config.clone(),
    };

    let loaded = match loader::load(&config.data, &config.load_options()).await {
        Ok(data) => data,
        Err(e) => {
            error!("❌ FATAL: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Show(args) => cmd::show::run(&args, &config, loaded),
        Commands::Browse(_) => cmd::browse::run(&config, loaded).await,
        Commands::Summary(_) => cmd::summary::run(&config, &loaded),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
