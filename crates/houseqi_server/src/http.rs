//! HTTP adapters in front of the state actor.
//!
//! - `POST /moves` decodes a move and forwards it to the actor.
//! - `GET /` streams every snapshot as a server-sent event.
//! - `GET /state` returns the current snapshot once.

use crate::actor::{ActorHandle, Snapshot};
use crate::error::ServerError;
use crate::wire::MoveBody;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use futures::{Stream, StreamExt};
use houseqi::Move;
use std::convert::Infallible;
use std::time::Duration;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    actor: ActorHandle,
    keep_alive: Duration,
}

impl AppState {
    /// Wraps an actor handle.
    pub fn new(actor: ActorHandle, keep_alive: Duration) -> Self {
        Self { actor, keep_alive }
    }
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(stream_state))
        .route("/moves", post(submit_move))
        .route("/state", get(current_state))
        .layer(middleware::map_response(allow_any_origin))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Accepts a move.
///
/// The body is read as JSON whatever its content type: browsers posting
/// with `mode: 'no-cors'` send `text/plain`.
#[instrument(skip(state, body), fields(len = body.len()))]
async fn submit_move(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    let body: MoveBody = serde_json::from_slice(&body).map_err(ServerError::Decode)?;
    let mv = Move::try_from(body)?;
    let snapshot = state.actor.submit(mv).await?;
    info!(mv = %mv, sequence = snapshot.sequence(), "Move accepted");
    Ok(StatusCode::NO_CONTENT)
}

/// Streams snapshots until the client disconnects.
///
/// Dropping the response stream drops the subscription, which unregisters
/// it from the actor.
#[instrument(skip(state))]
async fn stream_state(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let subscription = state.actor.register().await?;
    let subscriber = subscription.id();
    info!(%subscriber, "Event stream opened");

    let events = subscription
        .into_stream()
        .filter_map(move |snapshot| async move { snapshot_event(&snapshot, subscriber) })
        .map(Ok);

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

fn snapshot_event(snapshot: &Snapshot, subscriber: impl std::fmt::Display) -> Option<Event> {
    match snapshot.to_json() {
        Ok(json) => Some(Event::default().data(json)),
        Err(e) => {
            error!(%subscriber, error = %e, sequence = snapshot.sequence(), "Skipping snapshot");
            None
        }
    }
}

/// Returns the current game state as JSON.
#[instrument(skip(state))]
async fn current_state(State(state): State<AppState>) -> Result<Response, ServerError> {
    let snapshot = state.actor.snapshot().await?;
    let json = snapshot.to_json().map_err(ServerError::Encode)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}
