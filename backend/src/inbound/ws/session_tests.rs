//! WebSocket session handler tests.

use super::*;
use crate::domain::ports::FixtureSpotsQuery;
use crate::domain::{Category, Spot, ViewportSettings};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle, http::header};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message as ClientFrame};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

fn dog_park() -> Spot {
    Spot {
        id: "way/42".to_owned(),
        name: "ドッグラン".to_owned(),
        category: Category::DogPark,
        lat: 35.2,
        lng: 139.2,
        address: None,
        phone: None,
        website: None,
        opening_hours: None,
        tags: Default::default(),
    }
}

#[fixture]
async fn start_ws_server() -> (String, Server) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let ws_state = WsState::new(
        Arc::new(FixtureSpotsQuery::new(vec![dog_park()])),
        ViewportSettings {
            debounce: Duration::from_millis(20),
            ..ViewportSettings::default()
        },
        Vec::new(),
    );
    let server = HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(ws_state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let url = format!("http://{addr}");
    (url, server)
}

#[fixture]
async fn ws_client(#[future] start_ws_server: (String, Server)) -> (Socket, ServerHandle) {
    let (url, server) = start_ws_server.await;
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let (_resp, socket) = awc::Client::default()
        .ws(format!("{url}/ws"))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await
        .expect("websocket connect");

    (socket, handle)
}

/// Next JSON text frame, answering pings so the session stays alive.
async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(payload) => socket
                .send(ClientFrame::Pong(payload))
                .await
                .expect("send pong"),
            Frame::Pong(_) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

/// Read snapshots until one matches `phase`.
async fn snapshot_in_phase(socket: &mut Socket, phase: &str) -> Value {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let value = next_json(socket).await;
            if value["type"] == "snapshot" && value["phase"] == phase {
                return value;
            }
        }
    })
    .await
    .expect("snapshot in expected phase")
}

async fn send_json(socket: &mut Socket, value: &Value) {
    socket
        .send(ClientFrame::Text(value.to_string().into()))
        .await
        .expect("send text");
}

#[rstest]
#[actix_rt::test]
async fn sends_initial_idle_snapshot(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    let value = next_json(&mut socket).await;
    assert_eq!(value["type"], "snapshot");
    assert_eq!(value["phase"], "idle");
    assert_eq!(value["sequence"], 0);
    assert_eq!(value["count"], 0);
}

#[rstest]
#[actix_rt::test]
async fn viewport_frames_yield_spots(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    snapshot_in_phase(&mut socket, "idle").await;

    send_json(
        &mut socket,
        &json!({"type": "viewport", "south": 35.0, "west": 139.0, "north": 35.5, "east": 139.5}),
    )
    .await;

    let settled = snapshot_in_phase(&mut socket, "idle").await;
    assert_eq!(settled["sequence"], 1);
    assert_eq!(settled["count"], 1);
    assert_eq!(settled["spots"][0]["id"], "way/42");
}

#[rstest]
#[actix_rt::test]
async fn oversized_viewport_reports_error_phase(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    snapshot_in_phase(&mut socket, "idle").await;

    send_json(
        &mut socket,
        &json!({"type": "viewport", "south": 35.0, "west": 139.0, "north": 36.0, "east": 139.5}),
    )
    .await;

    let failed = snapshot_in_phase(&mut socket, "error").await;
    assert_eq!(failed["error"]["code"], "viewport_too_large");
    assert_eq!(failed["count"], 0);
}

#[rstest]
#[actix_rt::test]
async fn inverted_viewport_is_rejected_without_closing(
    #[future] ws_client: (Socket, ServerHandle),
) {
    let (mut socket, _server) = ws_client.await;
    snapshot_in_phase(&mut socket, "idle").await;

    send_json(
        &mut socket,
        &json!({"type": "viewport", "south": 35.5, "west": 139.0, "north": 35.0, "east": 139.5}),
    )
    .await;

    let rejected = next_json(&mut socket).await;
    assert_eq!(rejected["type"], "rejected");
    assert_eq!(rejected["code"], "invalid_request");

    send_json(
        &mut socket,
        &json!({"type": "viewport", "south": 35.0, "west": 139.0, "north": 35.5, "east": 139.5}),
    )
    .await;
    let settled = snapshot_in_phase(&mut socket, "idle").await;
    assert_eq!(settled["count"], 1);
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    snapshot_in_phase(&mut socket, "idle").await;
    socket
        .send(ClientFrame::Text("not-json".into()))
        .await
        .expect("send text");

    let reason = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match socket.next().await.expect("response frame").expect("frame") {
                Frame::Close(reason) => return reason,
                Frame::Ping(_) | Frame::Pong(_) => {}
                other => panic!("expected close frame, got {other:?}"),
            }
        }
    })
    .await
    .expect("close frame");
    assert_eq!(reason.expect("reason").code, CloseCode::Policy);
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(
    #[future] ws_client: (Socket, ServerHandle),
) {
    let (mut socket, _server) = ws_client.await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            match frame.expect("frame") {
                Frame::Ping(_) | Frame::Pong(_) | Frame::Text(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
