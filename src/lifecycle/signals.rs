//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGTERM and SIGINT handlers at startup
//! - Resolve when either arrives so shutdown can begin

use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};

/// Installed termination signal handlers.
pub struct TerminationSignals {
    terminate: Signal,
    interrupt: Signal,
}

impl TerminationSignals {
    /// Register the handlers. Fails only if the OS refuses registration.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next termination signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        }
    }
}
