//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound side:
//!     listener.rs (bind listen address)
//!     → connection.rs (per-connection tracking for graceful drain)
//!     → Hand off to HTTP layer
//!
//! Backend side:
//!     HTTP client pool
//!     → unix.rs (dial the fixed Unix socket with a timeout)
//! ```
//!
//! # Design Decisions
//! - No admission control beyond the OS accept backlog
//! - Each connection tracked for graceful shutdown
//! - The backend destination is fixed at startup

pub mod connection;
pub mod listener;
pub mod unix;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{bind, parse_listen_address, ListenerError};
pub use unix::UnixConnector;
