//! formgate-gateway — WebSocket control plane for formgate
//!
//! Clients hold a persistent WebSocket over which they exchange JSON
//! messages with a per-connection session: pings, named tool calls
//! that drive the session's form, and free-form echo. Form changes fan
//! out to every live connection as `form_update` events, and a small
//! HTTP surface exposes health plus per-session form status and reset.

pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;

pub use formgate_core::SubmitPolicy;
pub use registry::{Broadcaster, ConnectionId, ConnectionRegistry, Session};
pub use server::{ServerConfig, ServerHandle, start};
