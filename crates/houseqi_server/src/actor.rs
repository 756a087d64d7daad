//! The game state actor.
//!
//! One task owns the [`GameState`] and the set of subscribers. Moves,
//! registrations and unregistrations arrive on separate channels and are
//! handled one at a time in a single loop, so every subscriber sees the same
//! sequence of snapshots and never a half-applied move.
//!
//! Fan-out never waits on a subscriber. Each subscriber has its own bounded
//! queue; one that falls a full queue behind is dropped and its stream ends.

use crate::subscription::Subscription;
use derive_more::Display;
use houseqi::{GameState, Move, MoveError, MoveErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Identifies one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{}", _0)]
pub struct SubscriberId(u64);

/// Immutable view of the game at one point in its history.
///
/// Every subscriber receives clones of the same `Arc`, so they all
/// serialize identical bytes.
#[derive(Debug, Clone)]
pub struct Snapshot {
    sequence: u64,
    state: Arc<GameState>,
}

impl Snapshot {
    fn new(sequence: u64, state: GameState) -> Self {
        Self {
            sequence,
            state: Arc::new(state),
        }
    }

    /// Number of moves applied before this snapshot was taken.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The captured game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Serializes the game state as compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.state.as_ref())
    }
}

/// Failure reported to a caller of [`ActorHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ActorError {
    /// The move was refused and nothing changed.
    #[display("{}", _0)]
    Rejected(MoveError),
    /// The actor task has stopped.
    #[display("Game state actor is not running")]
    Closed,
}

impl std::error::Error for ActorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActorError::Rejected(e) => Some(e),
            ActorError::Closed => None,
        }
    }
}

/// Capacities of the actor's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorConfig {
    /// Snapshots queued per subscriber before it is evicted.
    pub subscriber_buffer: usize,
    /// Pending commands per inbound channel.
    pub command_buffer: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: 32,
            command_buffer: 64,
        }
    }
}

#[derive(Debug)]
struct MoveCommand {
    mv: Move,
    reply: oneshot::Sender<Result<Snapshot, MoveError>>,
}

#[derive(Debug)]
enum Query {
    Snapshot(oneshot::Sender<Snapshot>),
    SubscriberCount(oneshot::Sender<usize>),
}

#[derive(Debug)]
struct Registration {
    id: SubscriberId,
    sender: mpsc::Sender<Snapshot>,
    ack: oneshot::Sender<()>,
}

/// Cheap, cloneable access to a running actor.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    moves: mpsc::Sender<MoveCommand>,
    registrations: mpsc::Sender<Registration>,
    unregistrations: mpsc::UnboundedSender<SubscriberId>,
    queries: mpsc::Sender<Query>,
    next_id: Arc<AtomicU64>,
    subscriber_buffer: usize,
}

impl ActorHandle {
    /// Applies a move and returns the snapshot it produced.
    ///
    /// The snapshot has already been offered to every subscriber when this
    /// returns.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub async fn submit(&self, mv: Move) -> Result<Snapshot, ActorError> {
        let (reply, response) = oneshot::channel();
        self.moves
            .send(MoveCommand { mv, reply })
            .await
            .map_err(|_| ActorError::Closed)?;
        response
            .await
            .map_err(|_| ActorError::Closed)?
            .map_err(ActorError::Rejected)
    }

    /// Subscribes to snapshots.
    ///
    /// The current snapshot is already queued on the subscription when this
    /// returns.
    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<Subscription, ActorError> {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.subscriber_buffer);
        let (ack, acked) = oneshot::channel();
        self.registrations
            .send(Registration { id, sender, ack })
            .await
            .map_err(|_| ActorError::Closed)?;
        acked.await.map_err(|_| ActorError::Closed)?;
        debug!(subscriber = %id, "Subscription ready");
        Ok(Subscription::new(id, receiver, self.unregistrations.clone()))
    }

    /// Removes a subscriber. Unknown ids are ignored.
    #[instrument(skip(self, id), fields(subscriber = %id))]
    pub fn unregister(&self, id: SubscriberId) {
        // A closed actor has no subscribers left to remove.
        let _ = self.unregistrations.send(id);
    }

    /// The current snapshot, without changing anything.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Snapshot, ActorError> {
        let (reply, response) = oneshot::channel();
        self.query(Query::Snapshot(reply)).await?;
        response.await.map_err(|_| ActorError::Closed)
    }

    /// Number of currently registered subscribers.
    #[instrument(skip(self))]
    pub async fn subscriber_count(&self) -> Result<usize, ActorError> {
        let (reply, response) = oneshot::channel();
        self.query(Query::SubscriberCount(reply)).await?;
        response.await.map_err(|_| ActorError::Closed)
    }

    async fn query(&self, query: Query) -> Result<(), ActorError> {
        self.queries.send(query).await.map_err(|_| ActorError::Closed)
    }
}

/// Owner of the game state. Runs until every [`ActorHandle`] is dropped.
#[derive(Debug)]
pub struct StateActor {
    game: GameState,
    current: Snapshot,
    subscribers: HashMap<SubscriberId, mpsc::Sender<Snapshot>>,
    moves: mpsc::Receiver<MoveCommand>,
    registrations: mpsc::Receiver<Registration>,
    unregistrations: mpsc::UnboundedReceiver<SubscriberId>,
    queries: mpsc::Receiver<Query>,
}

impl StateActor {
    /// Creates an actor and the handle that talks to it.
    pub fn new(game: GameState, config: ActorConfig) -> (Self, ActorHandle) {
        let command_buffer = config.command_buffer.max(1);
        let (moves_tx, moves) = mpsc::channel(command_buffer);
        let (registrations_tx, registrations) = mpsc::channel(command_buffer);
        let (unregistrations_tx, unregistrations) = mpsc::unbounded_channel();
        let (queries_tx, queries) = mpsc::channel(command_buffer);

        let handle = ActorHandle {
            moves: moves_tx,
            registrations: registrations_tx,
            unregistrations: unregistrations_tx,
            queries: queries_tx,
            next_id: Arc::new(AtomicU64::new(0)),
            subscriber_buffer: config.subscriber_buffer.max(1),
        };
        let actor = Self {
            current: Snapshot::new(0, game.clone()),
            game,
            subscribers: HashMap::new(),
            moves,
            registrations,
            unregistrations,
            queries,
        };
        (actor, handle)
    }

    /// Creates an actor and runs it on a new task.
    #[instrument(skip(game))]
    pub fn spawn(game: GameState, config: ActorConfig) -> (ActorHandle, JoinHandle<()>) {
        let (actor, handle) = Self::new(game, config);
        (handle, tokio::spawn(actor.run()))
    }

    /// Processes events until all senders are gone.
    ///
    /// Pending registrations and unregistrations are handled before
    /// pending moves, so a move is only broadcast to subscribers that were
    /// attached when it was applied.
    pub async fn run(mut self) {
        info!(variant = %self.game.variant(), "State actor started");
        loop {
            tokio::select! {
                biased;
                Some(id) = self.unregistrations.recv() => self.unregister(id),
                Some(registration) = self.registrations.recv() => self.register(registration),
                Some(command) = self.moves.recv() => self.apply(command),
                Some(query) = self.queries.recv() => self.answer(query),
                else => break,
            }
        }
        info!(sequence = self.current.sequence(), "State actor stopped");
    }

    #[instrument(skip(self, registration), fields(subscriber = %registration.id))]
    fn register(&mut self, registration: Registration) {
        let Registration { id, sender, ack } = registration;
        if sender.try_send(self.current.clone()).is_err() {
            warn!("Subscriber went away before its first snapshot");
            return;
        }
        self.subscribers.insert(id, sender);
        info!(subscribers = self.subscribers.len(), "Client added");
        // The caller may have given up waiting; the subscriber stays until it
        // unregisters or its queue closes.
        let _ = ack.send(());
    }

    fn answer(&self, query: Query) {
        // A caller that stopped waiting needs no answer.
        let _ = match query {
            Query::Snapshot(reply) => reply.send(self.current.clone()).map_err(drop),
            Query::SubscriberCount(reply) => reply.send(self.subscribers.len()).map_err(drop),
        };
    }

    #[instrument(skip(self))]
    fn unregister(&mut self, id: SubscriberId) {
        if self.subscribers.remove(&id).is_some() {
            info!(
                subscriber = %id,
                subscribers = self.subscribers.len(),
                "Removed client"
            );
        } else {
            debug!(subscriber = %id, "Unregister for unknown subscriber ignored");
        }
    }

    #[instrument(skip(self, command), fields(mv = %command.mv))]
    fn apply(&mut self, command: MoveCommand) {
        let MoveCommand { mv, reply } = command;
        let result = match self.game.apply(&mv) {
            Ok(outcome) => {
                self.current = Snapshot::new(self.current.sequence() + 1, self.game.clone());
                info!(
                    board = mv.board,
                    sequence = self.current.sequence(),
                    captured = ?outcome.captured,
                    transferred = ?outcome.transferred,
                    "Move applied"
                );
                self.broadcast();
                Ok(self.current.clone())
            }
            Err(e) => {
                match e.kind() {
                    MoveErrorKind::InvalidInput => warn!(error = %e, "Move rejected"),
                    MoveErrorKind::Invariant => error!(error = %e, "Game state invariant broken"),
                }
                Err(e)
            }
        };
        let _ = reply.send(result);
    }

    fn broadcast(&mut self) {
        let snapshot = &self.current;
        self.subscribers.retain(|id, sender| match sender.try_send(snapshot.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(subscriber = %id, "Subscriber queue full, evicting");
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(subscriber = %id, "Subscriber closed, removing");
                false
            }
        });
        debug!(
            subscribers = self.subscribers.len(),
            sequence = snapshot.sequence(),
            "Snapshot broadcast"
        );
    }
}
