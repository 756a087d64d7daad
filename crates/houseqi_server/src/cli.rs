//! Command-line interface for the houseqi server.

use clap::Parser;
use houseqi::Variant;
use std::net::IpAddr;

/// Houseqi - shared game state server for drop xiangqi
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "houseqi")]
#[command(about = "Serves one drop xiangqi game over HTTP and server-sent events", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Port to bind to
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOUSEQI_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Board layout: `table` (two boards) or `single`
    #[arg(long, env = "HOUSEQI_VARIANT", default_value_t = Variant::Table)]
    pub variant: Variant,

    /// Snapshots queued per client before it is disconnected
    #[arg(long, env = "HOUSEQI_SUBSCRIBER_BUFFER", default_value_t = 32)]
    pub subscriber_buffer: usize,

    /// Seconds between keep-alive comments on the event stream
    #[arg(long, env = "HOUSEQI_KEEP_ALIVE_SECS", default_value_t = 15)]
    pub keep_alive_secs: u64,
}
