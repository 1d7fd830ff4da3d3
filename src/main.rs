//! Docker Socket Proxy
//!
//! Exposes the Docker engine API over TCP, filtered by a JSON policy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────────┐
//!                     │                 DOCKER SOCKET PROXY                   │
//!                     │                                                       │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ──────────────────┼─▶│   net    │──▶│   http   │──▶│ security gates   │   │
//!                     │  │ listener │   │  server  │   │ method / headers │   │
//!                     │  └──────────┘   └──────────┘   └────────┬─────────┘   │
//!                     │                                         │             │
//!                     │                                         ▼             │
//!                     │                                ┌──────────────────┐   │
//!                     │                                │ policy           │   │
//!                     │                                │ authorizer       │   │
//!                     │                                └────────┬─────────┘   │
//!                     │                                         │             │
//!                     │                                         ▼             │
//!   Client Response   │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ◀─────────────────┼──│ relay    │◀──│ backend  │◀──│ unix socket      │◀──┼── Docker
//!                     │  │ verbatim │   │ client   │   │ connector        │   │   Engine
//!                     │  └──────────┘   └──────────┘   └──────────────────┘   │
//!                     └───────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use docker_socket_proxy::cli::{self, Cli};
use docker_socket_proxy::lifecycle::startup;
use docker_socket_proxy::observability;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    observability::init_logging(&config.observability);

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {e}");
        if let Some(usage) = cli::usage_hint(&e) {
            eprintln!("\n{usage}");
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
