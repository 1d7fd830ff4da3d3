//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper http1 connection, Axum router, timeouts)
//!     → gateway.rs (method gate, header stripping, authorization, query rewrite)
//!     → client.rs (pooled client over the backend Unix socket)
//!     → backend response relayed verbatim
//!
//! Rejections (405 / 403 / 502) come from response.rs; request IDs from request.rs.
//! ```

pub mod client;
pub mod gateway;
pub mod request;
pub mod response;
pub mod server;

pub use client::{BackendClient, TransportError};
pub use gateway::GatewayState;
pub use request::{RequestId, RequestIdGenerator};
pub use response::Rejection;
pub use server::GatewayServer;
