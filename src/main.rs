mod channels;
mod telemetry;
mod upstream;
mod web;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;

use crate::web::Config;

#[derive(Parser)]
#[command(name = "space-relay")]
#[command(about = "Space data aggregation and live telemetry relay")]
struct Cli {
    /// YAML configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP and telemetry server
    Serve,
    /// Query one upstream feed and print the normalized result
    Fetch { feed: FeedArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedArg {
    Iss,
    Weather,
    Neos,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Everything runs interleaved on one thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Serve => runtime.block_on(serve(config)),
        Commands::Fetch { feed } => runtime.block_on(fetch(config, feed)),
    }
}

async fn serve(config: Config) -> ExitCode {
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn fetch(config: Config, feed: FeedArg) -> ExitCode {
    let adapters = config.adapters();

    let result = match feed {
        FeedArg::Iss => adapters
            .position()
            .await
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
        FeedArg::Weather => adapters
            .weather()
            .await
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
        FeedArg::Neos => adapters
            .near_objects()
            .await
            .and_then(|r| Ok(serde_json::to_string_pretty(&r)?)),
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Fetch failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
