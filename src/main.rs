use clap::Parser;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use webserver::config::Config;
use webserver::server;

/// Serves fileX.html and imageX.jpg from one directory over HTTP/1.1
#[derive(Debug, Parser)]
#[command(name = "webserver", version)]
struct Cli {
    /// Log verbosity: 0 error, 1 warn, 2 info, 3 debug, 4 trace
    #[arg(short = 'd', long = "debug-level", default_value_t = 2)]
    debug_level: u8,

    /// YAML configuration file
    #[arg(short, long, env = "WEBSERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Preferred port, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

fn level_for(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level_for(cli.debug_level))
        .init();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
