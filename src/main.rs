use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plutotv_proxy::{
    config::Config,
    jobs,
    sources::PlutoClient,
    web::{self, AppState},
};

#[derive(Parser)]
#[command(name = "plutotv-proxy")]
#[command(version)]
#[command(about = "Pluto TV playlist and XMLTV guide aggregation service")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("plutotv_proxy={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let refresh_interval = config.refresh_interval()?;
    info!(
        "Aggregating regions [{}], refreshing every {}",
        config.provider.regions.join(", "),
        config.provider.refresh_interval
    );

    let client = Arc::new(PlutoClient::new(config.provider.clone()));
    let guides = Arc::new(jobs::GuideStore::new());

    tokio::spawn(jobs::run(
        client.clone(),
        guides.clone(),
        refresh_interval,
    ));

    let state = AppState {
        client,
        guides,
        config: Arc::new(config.clone()),
    };
    web::serve(state, &config.web.host, config.web.port).await
}
