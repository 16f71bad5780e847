//! One-teacher / many-students WebSocket signaling relay

mod hub;
mod messages;
mod router;
mod server;
mod types;

pub use hub::{Hub, Peer, PeerInfo};
pub use messages::{ClientMessage, ServerMessage, StudentInfo, UpdateAction};
pub use router::{handle_socket, route_message};
pub use server::{build_router, AppState};
pub use types::{ConnectParams, Role, SignalError};
