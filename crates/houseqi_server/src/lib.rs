//! Houseqi server library.
//!
//! Hosts one drop xiangqi game and keeps any number of clients in sync.
//!
//! # Architecture
//!
//! - **Actor**: a single task owns the game state; moves, registrations and
//!   unregistrations are messages to it.
//! - **Subscription**: a client's bounded queue of snapshots, detached on drop.
//! - **HTTP**: axum adapters that decode moves and relay snapshots as
//!   server-sent events.
//!
//! # Example
//!
//! ```no_run
//! use houseqi::{GameState, Variant};
//! use houseqi_server::{ActorConfig, AppState, StateActor, router};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (actor, _task) = StateActor::spawn(GameState::new(Variant::Table), ActorConfig::default());
//! let app = router(AppState::new(actor, Duration::from_secs(15)));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod actor;
mod cli;
mod config;
mod error;
mod http;
mod subscription;
mod wire;

pub use actor::{ActorConfig, ActorError, ActorHandle, Snapshot, StateActor, SubscriberId};
pub use cli::Cli;
pub use config::ServerConfig;
pub use error::{ConfigError, ServerError};
pub use http::{AppState, router};
pub use subscription::Subscription;
pub use wire::{CoordinateBody, FROM_RESERVE, MoveBody, ON_BOARD, WireError};
