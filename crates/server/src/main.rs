use anyhow::Context;
use clap::{Parser, ValueEnum};
use ephemq::{CommandEngine, Config};
use ephemq_server::Handler;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Transport {
    Rpc,
    Http,
}

#[cfg(feature = "http")]
const DEFAULT_TRANSPORT: &str = "http";
#[cfg(not(feature = "http"))]
const DEFAULT_TRANSPORT: &str = "rpc";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, value_enum, default_value = DEFAULT_TRANSPORT)]
    transport: Transport,

    /// TOML file with `[normalize]` and `[engine]` tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Engine executable; overrides `engine.program` from the config file
    #[arg(short, long)]
    engine: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ephemq_server=info,ephemq=info,info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(program) = args.engine {
        config = config.with_engine_program(program);
    }

    let engine = CommandEngine::from_config(&config.engine)
        .context("no engine configured; pass --engine or set engine.program")?;
    info!("Using engine {}", engine.program().display());

    let handler = Handler::new(Arc::new(engine), config.normalize);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match args.transport {
        Transport::Rpc => ephemq_server::run_server(listener, handler, Box::pin(shutdown)).await?,
        #[cfg(feature = "http")]
        Transport::Http => {
            ephemq_server::transport::http::run_server(listener, handler, shutdown).await?
        }
        #[cfg(not(feature = "http"))]
        Transport::Http => anyhow::bail!("built without the `http` feature; use --transport rpc"),
    }

    Ok(())
}
