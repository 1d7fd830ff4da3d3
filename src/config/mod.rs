//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → crate::cli (flag / environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, validate, ConfigError};
pub use schema::{
    BackendConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, PolicyConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
