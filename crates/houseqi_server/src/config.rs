//! Server configuration.

use crate::actor::ActorConfig;
use crate::cli::Cli;
use crate::error::ConfigError;
use derive_getters::Getters;
use derive_new::new;
use houseqi::Variant;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::{debug, instrument};

/// Validated settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct ServerConfig {
    /// Address to listen on.
    host: IpAddr,
    /// Port to listen on.
    port: u16,
    /// Board layout of the hosted game.
    variant: Variant,
    /// Snapshots queued per subscriber before eviction.
    subscriber_buffer: usize,
    /// Interval between event-stream keep-alive comments.
    keep_alive: Duration,
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Channel sizes for the state actor.
    pub fn actor_config(&self) -> ActorConfig {
        ActorConfig {
            subscriber_buffer: self.subscriber_buffer,
            ..ActorConfig::default()
        }
    }

    /// Rejects settings the server cannot run with.
    #[instrument(skip(self))]
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.subscriber_buffer == 0 {
            return Err(ConfigError::new("subscriber buffer must be at least 1"));
        }
        if self.keep_alive.is_zero() {
            return Err(ConfigError::new("keep-alive interval must be at least 1 second"));
        }
        debug!(config = ?self, "Configuration validated");
        Ok(self)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            variant: Variant::Table,
            subscriber_buffer: 32,
            keep_alive: Duration::from_secs(15),
        }
    }
}

impl TryFrom<Cli> for ServerConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Self::new(
            cli.host,
            cli.port,
            cli.variant,
            cli.subscriber_buffer,
            Duration::from_secs(cli.keep_alive_secs),
        )
        .validate()
    }
}
