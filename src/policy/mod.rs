//! Authorization policy subsystem.
//!
//! # Data Flow
//! ```text
//! policy.json
//!     → mod.rs (read & deserialize into Policy)
//!     → authorizer.rs (compile patterns into deny/allow matchers)
//!     → Authorizer (immutable, shared via Arc with every request task)
//! ```
//!
//! # Design Decisions
//! - Policy is loaded once at startup; there is no reload
//! - Group names only organize the document, they carry no runtime meaning
//! - Pattern validation happens when the Authorizer is built, so a bad
//!   pattern stops the process before it serves traffic

pub mod authorizer;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use authorizer::{normalize_path, Authorizer, Decision};

/// Errors raised while loading or compiling a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read policy file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed policy document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pattern {pattern:?} in {origin}: {source}")]
    Pattern {
        origin: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Declarative allow/deny rules for request paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Allow patterns, bundled by group name.
    pub groups: BTreeMap<String, Vec<String>>,

    /// Patterns denied regardless of any group.
    pub global_deny: Vec<String>,
}

impl Policy {
    /// Parse a policy document.
    ///
    /// The top level must be a JSON object. Derived struct deserialization
    /// would also accept a positional array, which is not a valid policy.
    pub fn from_json(document: &str) -> Result<Self, PolicyError> {
        let object: Map<String, Value> = serde_json::from_str(document)?;
        Ok(Policy::deserialize(Value::Object(object))?)
    }

    /// Total number of allow and deny patterns in the document.
    pub fn pattern_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum::<usize>() + self.global_deny.len()
    }
}

/// Load a policy document from disk.
pub fn load_policy(path: &Path) -> Result<Policy, PolicyError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PolicyError::NotFound(path.to_path_buf()),
        _ => PolicyError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let policy = Policy::from_json(&content)?;

    tracing::info!(
        path = %path.display(),
        groups = policy.groups.len(),
        global_deny = policy.global_deny.len(),
        "Policy loaded"
    );

    Ok(policy)
}
