//! Tests for the HTTP adapters.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use houseqi::{GameState, Move, Side, Square, Variant};
use houseqi_server::{ActorConfig, ActorHandle, AppState, MoveBody, StateActor, router};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

fn app(variant: Variant) -> (Router, ActorHandle) {
    let (actor, _task) = StateActor::spawn(GameState::new(variant), ActorConfig::default());
    let app = router(AppState::new(actor.clone(), Duration::from_secs(15)));
    (app, actor)
}

fn post_move(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/moves")
        .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
        .body(body.into())
        .expect("valid request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Reads the next server-sent event and returns its JSON payload.
async fn next_event(body: &mut Body) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .expect("event arrives")
        .expect("stream open")
        .expect("frame readable");
    let data = frame.into_data().expect("data frame");
    let text = std::str::from_utf8(&data).expect("utf-8 event");
    assert!(text.ends_with("\n\n"), "event is terminated: {text:?}");
    let payload = text
        .strip_prefix("data: ")
        .expect("data field")
        .trim_end();
    serde_json::from_str(payload).expect("event payload is JSON")
}

#[tokio::test]
async fn test_post_move_applies_and_returns_no_content() {
    let (app, actor) = app(Variant::Table);
    let body = json!({
        "table": 0,
        "from": { "location": 0, "x": 6, "y": 0 },
        "to": { "location": 0, "x": 5, "y": 0 }
    });

    let response = app
        .oneshot(post_move(body.to_string()))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let snapshot = actor.snapshot().await.expect("actor running");
    assert_eq!(snapshot.sequence(), 1);
    assert_eq!(snapshot.state().boards()[0].turn(), Side::Black);
}

#[tokio::test]
async fn test_single_board_body_defaults_table_and_location() {
    let (app, _actor) = app(Variant::Single);
    let body = json!({ "from": { "x": 6, "y": 0 }, "to": { "x": 5, "y": 0 } });

    let response = app
        .clone()
        .oneshot(post_move(body.to_string()))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get("/state")).await.expect("request handled");
    assert_eq!(response.status(), StatusCode::OK);
    let state = body_json(response).await;
    assert!(state.is_object(), "single variant is one board object");
    assert_eq!(state["turn"], "b");
    assert_eq!(state["previous"], json!([[5, 0], [6, 0]]));
    assert_eq!(state["position"][6][0], "");
    assert_eq!(state["position"][5][0], "rP");
}

#[tokio::test]
async fn test_drop_body_uses_reserve_location() {
    let (app, actor) = app(Variant::Table);
    actor
        .submit(Move::on_board(0, Square::new(7, 1), Square::new(0, 1)))
        .await
        .expect("capture accepted");

    let body = MoveBody::from(Move::drop_from(1, Side::Red, 0, Square::new(4, 4)));
    assert_eq!(body.from.location, 1);
    let response = app
        .oneshot(post_move(serde_json::to_string(&body).expect("serializes")))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let snapshot = actor.snapshot().await.expect("actor running");
    assert!(snapshot.state().boards()[1].reserve(Side::Red).is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, actor) = app(Variant::Table);
    let response = app
        .oneshot(post_move("{\"from\": "))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert_eq!(actor.snapshot().await.expect("running").sequence(), 0);
}

#[tokio::test]
async fn test_invalid_references_are_unprocessable() {
    let bodies = [
        // Off the grid.
        json!({ "from": { "x": 10, "y": 0 }, "to": { "x": 5, "y": 0 } }),
        // Negative coordinate.
        json!({ "from": { "x": -1, "y": 0 }, "to": { "x": 5, "y": 0 } }),
        // Empty source square.
        json!({ "from": { "x": 4, "y": 4 }, "to": { "x": 5, "y": 0 } }),
        // Empty reserve.
        json!({ "from": { "location": 1, "x": 0, "y": 0 }, "to": { "x": 5, "y": 0 } }),
        // Unknown side.
        json!({ "from": { "location": 1, "x": 2, "y": 0 }, "to": { "x": 5, "y": 0 } }),
        // Unknown location tag.
        json!({ "from": { "location": 7, "x": 6, "y": 0 }, "to": { "x": 5, "y": 0 } }),
        // Reserve destination.
        json!({ "from": { "x": 6, "y": 0 }, "to": { "location": 1, "x": 0, "y": 0 } }),
        // Missing board.
        json!({ "table": 2, "from": { "x": 6, "y": 0 }, "to": { "x": 5, "y": 0 } }),
    ];

    let (app, actor) = app(Variant::Table);
    for body in bodies {
        let response = app
            .clone()
            .oneshot(post_move(body.to_string()))
            .await
            .expect("request handled");
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "for {body}"
        );
        assert!(body_json(response).await["error"].is_string());
    }

    let snapshot = actor.snapshot().await.expect("actor running");
    assert_eq!(snapshot.sequence(), 0);
    assert_eq!(snapshot.state(), &GameState::new(Variant::Table));
}

#[tokio::test]
async fn test_state_endpoint_returns_table() {
    let (app, _actor) = app(Variant::Table);
    let response = app.oneshot(get("/state")).await.expect("request handled");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let state = body_json(response).await;
    assert_eq!(state.as_array().map(Vec::len), Some(2));
    assert_eq!(state[1]["red_drops"], json!([]));
}

#[tokio::test]
async fn test_event_stream_pushes_initial_and_move_snapshots() {
    let (app, actor) = app(Variant::Table);
    let response = app
        .clone()
        .oneshot(get("/"))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );

    let mut body = response.into_body();
    let initial = next_event(&mut body).await;
    assert_eq!(initial[0]["turn"], "r");
    assert_eq!(initial[0]["position"][6][0], "rP");

    let move_body = json!({
        "table": 0,
        "from": { "location": 0, "x": 6, "y": 0 },
        "to": { "location": 0, "x": 5, "y": 0 }
    });
    let response = app
        .oneshot(post_move(move_body.to_string()))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let update = next_event(&mut body).await;
    assert_eq!(update[0]["turn"], "b");
    assert_eq!(update[0]["previous"], json!([[5, 0], [6, 0]]));
    assert_eq!(update[1]["turn"], "r");

    assert_eq!(actor.subscriber_count().await, Ok(1));
    drop(body);
    assert_eq!(actor.subscriber_count().await, Ok(0));
}
