//! Per-connection signaling loop: decode inbound frames and forward them

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::TurnConfig;

use super::hub::{deliver, Hub, Peer, PeerInfo};
use super::messages::{ClientMessage, ServerMessage};
use super::types::{ConnectParams, Role, SignalError};

/// Removes the peer from the registry when the connection loop exits,
/// whatever the exit path, and tears down its socket writer.
struct ConnectionGuard {
    hub: Arc<Hub>,
    info: PeerInfo,
    writer: JoinHandle<()>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.hub.unregister(&self.info);
        self.writer.abort();
    }
}

/// Runs one accepted WebSocket connection to completion.
pub async fn handle_socket(
    socket: WebSocket,
    hub: Arc<Hub>,
    turn: TurnConfig,
    params: ConnectParams,
) {
    let info = PeerInfo {
        id: params.id,
        name: params.name,
        role: Role::from_param(&params.role),
        channel: params.channel,
    };

    let (mut sender, mut receiver) = socket.split();

    // All outbound frames funnel through this queue so registry operations
    // never block on a slow socket. The writer task owns the sink.
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    hub.register(Peer {
        info: info.clone(),
        tx: tx.clone(),
    });
    let _guard = ConnectionGuard {
        hub: Arc::clone(&hub),
        info: info.clone(),
        writer,
    };

    // TURN credentials go out before any inbound traffic is processed.
    deliver(&tx, &ServerMessage::Config { turn });

    while let Some(next) = receiver.next().await {
        let msg = match next {
            Ok(msg) => msg,
            Err(e) => {
                log::info!("read error: {}", e);
                break;
            }
        };
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(inbound) => route_message(&hub, &info, inbound),
                Err(e) => {
                    log::info!("read error: {}", e);
                    break;
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
}

/// Dispatches one inbound frame per its `type` discriminator. Unknown types
/// are logged and ignored; an absent target simply drops the frame.
pub fn route_message(hub: &Hub, sender: &PeerInfo, msg: ClientMessage) {
    match msg.kind.as_str() {
        "raise_hand" => forward(
            hub.send_to_teacher(&ServerMessage::RaiseHand {
                id: sender.id.clone(),
                name: sender.name.clone(),
                channel: sender.channel.clone(),
            }),
            "raise_hand",
        ),
        "offer" => forward(
            hub.send_to_teacher(&ServerMessage::Offer {
                from: sender.id.clone(),
                sdp: msg.sdp,
            }),
            "offer",
        ),
        "answer" => forward(
            hub.send_to_student(&msg.to, &ServerMessage::Answer { sdp: msg.sdp }),
            "answer",
        ),
        "ice" => {
            let payload = ServerMessage::Ice {
                candidate: msg.candidate,
                from: sender.id.clone(),
            };
            if msg.to == "teacher" {
                forward(hub.send_to_teacher(&payload), "ice");
            } else {
                forward(hub.send_to_student(&msg.to, &payload), "ice");
            }
        }
        "allow" => forward(hub.send_to_student(&msg.to, &ServerMessage::Allowed), "allow"),
        "mute" => {
            forward(hub.send_to_student(&msg.to, &ServerMessage::Mute), "mute");
            // The teacher drops the muted student from its raised-hand list.
            forward(
                hub.send_to_teacher(&ServerMessage::RemoveFromRaisedHands { id: msg.to }),
                "mute",
            );
        }
        other => log::info!("unknown message type: {}", other),
    }
}

fn forward(result: Result<(), SignalError>, kind: &str) {
    if let Err(e) = result {
        log::debug!("{} not delivered: {}", kind, e);
    }
}
