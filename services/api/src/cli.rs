use crate::seed::{run_seed, run_stats, SeedArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use platewise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Platewise Backend",
    about = "Run and inspect the Platewise marketing site backend from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load sample vacancies, applications, and leads into the database
    Seed(SeedArgs),
    /// Print the careers stats snapshot for the configured database
    Stats(StatsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed(args) => run_seed(args).await,
        Command::Stats(args) => run_stats(args).await,
    }
}
