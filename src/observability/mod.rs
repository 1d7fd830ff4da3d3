//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (req_id, method, path, ...)
//!     → logging.rs subscriber (JSON or pretty, filtered by RUST_LOG)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID on every per-request event
//! - Rejections logged at warn for audit; transport failures at error

pub mod logging;

pub use logging::init_logging;
