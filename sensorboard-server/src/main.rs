use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use miette::Result;
use sensorboard_server::{Server, ServerConfig};
use tokio_graceful_shutdown::Toplevel;

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Sensor board simulator with a TCP host link")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the host link listens on, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Main loop tick in milliseconds, overrides the config file
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Only step after the host pulled the second table half
    #[arg(long)]
    lockstep: bool,
}

impl Cli {
    fn server_config(&self) -> Result<ServerConfig, sensorboard_server::ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.lockstep {
            config.scan.lockstep = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let config = cli.server_config()?;
    log::debug!("Configuration: {:?}", config);
    let server = Server::new(&config)?;

    Toplevel::new(move |s| async move {
        server.start(&s);
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_millis(1000))
    .await
    .map_err(Into::into)
}
