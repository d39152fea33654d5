use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use blue_green_edge::event::{CloudFrontEvent, EventType};
use blue_green_edge::fallback::HttpIndexFetcher;
use blue_green_edge::handlers;

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Invoke a blue/green edge interceptor against an event document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one interceptor on the first record of an event and print the result
    Invoke {
        /// Interception point to run
        #[arg(value_enum)]
        stage: Stage,

        /// Event JSON file (reads stdin when omitted)
        #[arg(short, long)]
        event: Option<PathBuf>,

        /// Scheme for the fallback document fetch
        #[arg(long, default_value = "https")]
        scheme: String,

        /// Send the fallback fetch to this host:port instead of the viewer host
        #[arg(long)]
        authority: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Stage {
    ViewerRequest,
    OriginRequest,
    OriginResponse,
}

impl From<Stage> for EventType {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::ViewerRequest => EventType::ViewerRequest,
            Stage::OriginRequest => EventType::OriginRequest,
            Stage::OriginResponse => EventType::OriginResponse,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blue_green_edge=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Invoke {
            stage,
            event,
            scheme,
            authority,
        } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let event: CloudFrontEvent = serde_json::from_str(&raw)?;

            let mut fetcher = HttpIndexFetcher::new().with_scheme(scheme);
            if let Some(authority) = authority {
                fetcher = fetcher.with_authority(authority);
            }

            let outcome = handlers::invoke(stage.into(), event, &fetcher).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
