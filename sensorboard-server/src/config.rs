//! Server configuration
//!
//! Loaded from a JSON file, every field optional:
//!
//! ```json
//! {
//!   "listen": "127.0.0.1:4800",
//!   "tickMs": 20,
//!   "scan": { "interval": 2, "range": 90, "threshold": 20 },
//!   "world": {
//!     "dropEvery": 50,
//!     "targets": [ { "bearing": 10, "distance": 320, "width": 6 } ]
//!   }
//! }
//! ```
//!
//! Command line flags override the file.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use sensorboard_core::ScanConfig;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:4800";
pub const DEFAULT_TICK_MS: u64 = 20;

/// Something the simulated LIDAR can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// True bearing of the target centre in degrees
    pub bearing: u16,
    /// Distance in cm
    pub distance: u16,
    /// Angular width in degrees
    pub width: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    pub targets: Vec<Target>,
    /// Fail every n-th sensor read, never if absent or zero
    pub drop_every: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub listen: String,
    pub tick_ms: u64,
    pub scan: ScanConfig,
    pub world: WorldConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: DEFAULT_LISTEN.to_string(),
            tick_ms: DEFAULT_TICK_MS,
            scan: ScanConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ServerError::ConfigRead(path.to_path_buf(), e))?;
        let config: ServerConfig = serde_json::from_str(&contents)
            .map_err(|e| ServerError::ConfigParse(path.to_path_buf(), e))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        self.scan.validate()?;
        self.listen_addr()?;
        if self.tick_ms == 0 {
            return Err(ServerError::TickInterval);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listen
            .parse()
            .map_err(|_| ServerError::ListenAddress(self.listen.clone()))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
