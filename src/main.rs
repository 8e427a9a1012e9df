use clap::Parser;
use spreadwatch::cli::{self, Cli, Commands, RunArgs};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Run(args)) => cli::run::execute(&cli, args).await,
        Some(Commands::Scan(args)) => cli::scan::execute(&cli, args).await,
        None => cli::run::execute(&cli, &RunArgs::default()).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
