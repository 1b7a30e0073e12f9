use crate::seed::DEFAULT_PROFILE_NAME;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Monk Mode habit-tracking dashboard server
#[derive(Parser, Debug, Clone)]
#[command(name = "monk_mode")]
#[command(about = "Personal habit-tracking dashboard backed by a single JSON document")]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// File holding the persisted document
    #[arg(long, env = "APP_DATA_PATH", default_value = "data/state.json")]
    pub data_path: PathBuf,

    /// Profile name written into a freshly seeded document
    #[arg(long, env = "PROFILE_NAME", default_value = DEFAULT_PROFILE_NAME)]
    pub profile_name: String,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
