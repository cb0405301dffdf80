use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use classroom_live::{build_router, config::Config, AppState};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_server(config: Config) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(Arc::new(AppState::new(config)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Connect and consume the `connected` greeting, returning the assigned connection id.
async fn connect(addr: SocketAddr) -> (Client, String) {
    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let greeting = recv(&mut client).await;
    assert_eq!(greeting["event"], "connected");
    let id = greeting["data"]["connectionId"].as_str().unwrap().to_string();
    (client, id)
}

async fn send(client: &mut Client, frame: Value) {
    client.send(Message::Text(frame.to_string().into())).await.unwrap();
}

async fn recv(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(FRAME_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

async fn recv_event(client: &mut Client, event: &str) -> Value {
    let frame = recv(client).await;
    assert_eq!(frame["event"], event, "unexpected frame {frame}");
    frame["data"].clone()
}

#[tokio::test]
async fn classroom_session_runs_from_join_to_end() {
    let addr = spawn_server(Config::default()).await;
    let (mut c1, id1) = connect(addr).await;
    let (mut c2, id2) = connect(addr).await;

    send(&mut c1, json!({"event": "join-room", "data": 42})).await;
    assert_eq!(recv_event(&mut c1, "participant-count").await, 1);

    send(&mut c2, json!({"event": "join-room", "data": "42"})).await;
    assert_eq!(recv_event(&mut c1, "participant-count").await, 2);
    assert_eq!(recv_event(&mut c2, "participant-count").await, 2);

    send(&mut c1, json!({"event": "start-session", "data": "42"})).await;
    for client in [&mut c1, &mut c2] {
        let started = recv_event(client, "session-started").await;
        assert_eq!(started["status"], "active");
        assert_eq!(started["results"], json!({}));
        let mut participants: Vec<String> = serde_json::from_value(started["participants"].clone()).unwrap();
        participants.sort();
        let mut expected = vec![id1.clone(), id2.clone()];
        expected.sort();
        assert_eq!(participants, expected);
        assert_eq!(recv_event(client, "session-updated").await["id"], started["id"]);
    }

    send(&mut c1, json!({"event": "submit-response", "data": {"activityId": "42", "response": {"choice": "A"}}})).await;
    for client in [&mut c1, &mut c2] {
        let received = recv_event(client, "response-received").await;
        assert_eq!(received["participantId"], id1);
        assert_eq!(received["response"], json!({"choice": "A"}));
        assert_eq!(received["totalResponses"], 1);
    }

    send(&mut c2, json!({"event": "submit-response", "data": {"activityId": "42", "response": {"choice": "B"}}})).await;
    assert_eq!(recv_event(&mut c1, "response-received").await["totalResponses"], 2);
    assert_eq!(recv_event(&mut c2, "response-received").await["totalResponses"], 2);

    send(&mut c1, json!({"event": "pause-session", "data": "42"})).await;
    assert_eq!(recv_event(&mut c1, "session-updated").await["status"], "paused");
    assert_eq!(recv_event(&mut c2, "session-updated").await["status"], "paused");

    // Rejected while paused: only the sender hears about it.
    send(&mut c1, json!({"event": "submit-response", "data": {"activityId": "42", "response": "late"}})).await;
    let error = recv_event(&mut c1, "error").await;
    assert_eq!(error["code"], "invalid-transition");
    assert_eq!(error["event"], "submit-response");

    // Start while paused resumes with results intact.
    send(&mut c1, json!({"event": "start-session", "data": "42"})).await;
    let resumed = recv_event(&mut c2, "session-updated").await;
    assert_eq!(resumed["status"], "active");
    assert_eq!(resumed["results"][&id1]["response"], json!({"choice": "A"}));
    assert_eq!(resumed["results"][&id2]["response"], json!({"choice": "B"}));
    recv_event(&mut c1, "session-updated").await;

    send(&mut c1, json!({"event": "end-session", "data": "42"})).await;
    let ended = recv_event(&mut c2, "session-ended").await;
    assert_eq!(ended["status"], "completed");
    let started_at: DateTime<Utc> = serde_json::from_value(ended["startedAt"].clone()).unwrap();
    let ended_at: DateTime<Utc> = serde_json::from_value(ended["endedAt"].clone()).unwrap();
    assert!(ended_at >= started_at);
    assert_eq!(recv_event(&mut c2, "session-updated").await["status"], "completed");
    recv_event(&mut c1, "session-ended").await;
    recv_event(&mut c1, "session-updated").await;

    send(&mut c2, json!({"event": "submit-response", "data": {"activityId": "42", "response": "after"}})).await;
    assert_eq!(recv_event(&mut c2, "error").await["code"], "invalid-transition");

    // c1 sees nothing from c2's rejected submit; its next frame answers its own ping.
    send(&mut c1, json!({"event": "ping"})).await;
    assert!(recv_event(&mut c1, "pong").await["date"].is_string());
}

#[tokio::test]
async fn late_joiner_syncs_with_session_status() {
    let addr = spawn_server(Config::default()).await;
    let (mut instructor, _) = connect(addr).await;
    let (mut late, _) = connect(addr).await;

    send(&mut late, json!({"event": "get-session-status", "data": "9"})).await;
    assert!(recv_event(&mut late, "session-status").await.is_null());

    send(&mut instructor, json!({"event": "join-room", "data": "9"})).await;
    recv_event(&mut instructor, "participant-count").await;
    send(&mut instructor, json!({"event": "start-session", "data": "9"})).await;
    recv_event(&mut instructor, "session-started").await;
    recv_event(&mut instructor, "session-updated").await;

    send(&mut late, json!({"event": "get-session-status", "data": 9})).await;
    let snapshot = recv_event(&mut late, "session-updated").await;
    assert_eq!(snapshot["activityId"], "9");
    assert_eq!(snapshot["status"], "active");

    // The unicast reply does not reach the instructor.
    send(&mut instructor, json!({"event": "ping"})).await;
    recv_event(&mut instructor, "pong").await;
}

#[tokio::test]
async fn disconnect_updates_every_joined_room() {
    let addr = spawn_server(Config::default()).await;
    let (mut watcher_a, _) = connect(addr).await;
    let (mut watcher_b, _) = connect(addr).await;
    let (mut leaver, _) = connect(addr).await;

    send(&mut watcher_a, json!({"event": "join-room", "data": "a"})).await;
    recv_event(&mut watcher_a, "participant-count").await;
    send(&mut watcher_b, json!({"event": "join-room", "data": "b"})).await;
    recv_event(&mut watcher_b, "participant-count").await;

    send(&mut leaver, json!({"event": "join-room", "data": "a"})).await;
    recv_event(&mut leaver, "participant-count").await;
    assert_eq!(recv_event(&mut watcher_a, "participant-count").await, 2);
    send(&mut leaver, json!({"event": "join-room", "data": "b"})).await;
    recv_event(&mut leaver, "participant-count").await;
    assert_eq!(recv_event(&mut watcher_b, "participant-count").await, 2);

    leaver.close(None).await.unwrap();
    drop(leaver);

    assert_eq!(recv_event(&mut watcher_a, "participant-count").await, 1);
    assert_eq!(recv_event(&mut watcher_b, "participant-count").await, 1);
}

#[tokio::test]
async fn malformed_frames_get_an_error_reply() {
    let addr = spawn_server(Config::default()).await;
    let (mut client, _) = connect(addr).await;

    client.send(Message::Text("{not json".to_string().into())).await.unwrap();
    assert_eq!(recv_event(&mut client, "error").await["code"], "malformed-payload");

    send(&mut client, json!({"event": "join-room"})).await;
    let error = recv_event(&mut client, "error").await;
    assert_eq!(error["code"], "malformed-payload");
    assert_eq!(error["event"], "join-room");

    // The connection keeps working after a rejected frame.
    send(&mut client, json!({"event": "join-room", "data": "x"})).await;
    assert_eq!(recv_event(&mut client, "participant-count").await, 1);
}

#[tokio::test]
async fn strict_start_refuses_to_wipe_a_live_session() {
    let config = Config { strict_session_start: true, ..Config::default() };
    let addr = spawn_server(config).await;
    let (mut instructor, _) = connect(addr).await;

    send(&mut instructor, json!({"event": "join-room", "data": "s"})).await;
    recv_event(&mut instructor, "participant-count").await;
    send(&mut instructor, json!({"event": "start-session", "data": "s"})).await;
    recv_event(&mut instructor, "session-started").await;
    recv_event(&mut instructor, "session-updated").await;

    send(&mut instructor, json!({"event": "start-session", "data": "s"})).await;
    let error = recv_event(&mut instructor, "error").await;
    assert_eq!(error["code"], "invalid-transition");
    assert_eq!(error["event"], "start-session");

    send(&mut instructor, json!({"event": "resume-session", "data": "s"})).await;
    assert_eq!(recv_event(&mut instructor, "error").await["event"], "resume-session");
}
