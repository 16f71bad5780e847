//! Connection registry: the single teacher slot and the student map

use std::collections::HashMap;

use axum::extract::ws::Message;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use super::messages::{ServerMessage, StudentInfo, UpdateAction};
use super::types::{Role, SignalError};

/// Identity of a connected peer, retained by its connection loop after the
/// send handle has moved into the registry.
#[derive(Debug, Clone)]
pub struct PeerInfo {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub channel: String,
}

impl PeerInfo {
    fn roster_entry(&self) -> StudentInfo {
        StudentInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            channel: self.channel.clone(),
        }
    }
}

/// A registered peer: identity plus the exclusive outbound send handle.
/// The handle is only ever written through registry operations.
pub struct Peer {
    pub info: PeerInfo,
    pub tx: UnboundedSender<Message>,
}

#[derive(Default)]
struct HubState {
    teacher: Option<Peer>,
    students: HashMap<String, Peer>,
}

impl HubState {
    fn notify_teacher(&self, msg: &ServerMessage) {
        if let Some(teacher) = &self.teacher {
            deliver(&teacher.tx, msg);
        }
    }

    fn send_roster_to_teacher(&self) {
        let Some(teacher) = &self.teacher else {
            return;
        };
        let students = self
            .students
            .values()
            .map(|s| s.info.roster_entry())
            .collect();
        deliver(&teacher.tx, &ServerMessage::ConnectedStudents { students });
    }
}

/// Authoritative membership state. At most one teacher at a time; student
/// identities are unique with last-writer-wins replacement. Every access
/// goes through the one mutex, so registrations, removals and the
/// notifications they trigger never interleave.
#[derive(Default)]
pub struct Hub {
    state: Mutex<HubState>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a peer. A new teacher silently displaces any previous one
    /// and immediately receives the full student roster; a new student
    /// overwrites any prior entry under the same identity and the teacher
    /// is told about the arrival.
    pub fn register(&self, peer: Peer) {
        let mut state = self.state.lock();
        match peer.info.role {
            Role::Teacher => {
                log::info!("Teacher connected: {}", peer.info.name);
                state.teacher = Some(peer);
                state.send_roster_to_teacher();
            }
            Role::Student => {
                log::info!("Student connected: {}", peer.info.id);
                let update = ServerMessage::StudentUpdate {
                    action: UpdateAction::Connected,
                    id: peer.info.id.clone(),
                    name: peer.info.name.clone(),
                    channel: peer.info.channel.clone(),
                };
                state.students.insert(peer.info.id.clone(), peer);
                state.notify_teacher(&update);
            }
        }
    }

    /// Removes a peer. A departing student additionally triggers the
    /// teacher-side cleanup pair: a disconnect update followed by a
    /// raised-hand removal, exactly once, in that order.
    pub fn unregister(&self, info: &PeerInfo) {
        let mut state = self.state.lock();
        match info.role {
            Role::Teacher => {
                state.teacher = None;
                log::info!("Teacher disconnected");
            }
            Role::Student => {
                state.students.remove(&info.id);
                log::info!("Student disconnected: {}", info.id);
                state.notify_teacher(&ServerMessage::StudentUpdate {
                    action: UpdateAction::Disconnected,
                    id: info.id.clone(),
                    name: info.name.clone(),
                    channel: info.channel.clone(),
                });
                state.notify_teacher(&ServerMessage::RemoveFromRaisedHands {
                    id: info.id.clone(),
                });
            }
        }
    }

    pub fn send_to_teacher(&self, msg: &ServerMessage) -> Result<(), SignalError> {
        let state = self.state.lock();
        match &state.teacher {
            Some(teacher) => {
                deliver(&teacher.tx, msg);
                Ok(())
            }
            None => Err(SignalError::NoTeacherConnected),
        }
    }

    pub fn send_to_student(&self, id: &str, msg: &ServerMessage) -> Result<(), SignalError> {
        let state = self.state.lock();
        match state.students.get(id) {
            Some(student) => {
                deliver(&student.tx, msg);
                Ok(())
            }
            None => Err(SignalError::StudentNotFound),
        }
    }
}

/// Serializes and enqueues one outbound frame. A closed channel means the
/// peer's connection is already going away; the frame is dropped without
/// retry.
pub(crate) fn deliver(tx: &UnboundedSender<Message>, msg: &ServerMessage) {
    match serde_json::to_string(msg) {
        Ok(text) => {
            if tx.send(Message::Text(text)).is_err() {
                log::debug!("peer channel closed, dropping outbound frame");
            }
        }
        Err(e) => log::warn!("failed to serialize outbound frame: {}", e),
    }
}
