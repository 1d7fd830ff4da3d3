//! Path authorization against compiled policy rules.
//!
//! # Responsibilities
//! - Compile policy patterns into deny and allow matchers
//! - Normalize request paths (API version prefix, trailing separators)
//! - Decide allow/deny for a request path
//!
//! # Design Decisions
//! - Deny rules are evaluated first and any match rejects
//! - Nothing is allowed unless a rule allows it (closed policy)
//! - Patterns are NOT implicitly anchored. `^/containers/json` without `$`
//!   also allows `/containers/json/anything`; policy authors own anchoring.

use regex::Regex;

use super::{Policy, PolicyError};

/// Docker's ping endpoint, allowed outside any group.
const PING_PATTERN: &str = r"^/_ping$";

const GLOBAL_DENY_ORIGIN: &str = "global_deny";
const BUILTIN_ORIGIN: &str = "builtin";

/// A compiled policy pattern and where it came from.
#[derive(Debug, Clone)]
pub struct Rule {
    origin: String,
    regex: Regex,
}

impl Rule {
    fn compile(origin: &str, pattern: &str) -> Result<Self, PolicyError> {
        let regex = Regex::new(pattern).map_err(|source| PolicyError::Pattern {
            origin: origin.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            origin: origin.to_string(),
            regex,
        })
    }

    /// Group name, `global_deny`, or `builtin`.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Outcome of evaluating a path against the policy.
#[derive(Debug, Clone, Copy)]
pub enum Decision<'a> {
    /// A deny rule matched.
    Denied(&'a Rule),
    /// No deny rule matched and an allow rule did.
    Allowed(&'a Rule),
    /// No rule matched at all.
    NoMatch,
}

impl Decision<'_> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }

    /// The rule that produced this decision, if any.
    pub fn rule(&self) -> Option<&Rule> {
        match self {
            Decision::Denied(rule) | Decision::Allowed(rule) => Some(*rule),
            Decision::NoMatch => None,
        }
    }
}

/// Compiled, immutable policy evaluator.
///
/// Holds no mutable state after construction, so one instance can be shared
/// behind an `Arc` by every request task without locking.
#[derive(Debug, Clone)]
pub struct Authorizer {
    denied: Vec<Rule>,
    allowed: Vec<Rule>,
}

impl Authorizer {
    /// Compile a policy. Fails on the first invalid pattern.
    pub fn new(policy: &Policy) -> Result<Self, PolicyError> {
        let denied = policy
            .global_deny
            .iter()
            .map(|pattern| Rule::compile(GLOBAL_DENY_ORIGIN, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let mut allowed = policy
            .groups
            .iter()
            .flat_map(|(group, patterns)| patterns.iter().map(move |p| (group, p)))
            .map(|(group, pattern)| Rule::compile(group, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        allowed.push(Rule::compile(BUILTIN_ORIGIN, PING_PATTERN)?);

        tracing::debug!(
            denied = denied.len(),
            allowed = allowed.len(),
            "Authorizer compiled"
        );

        Ok(Self { denied, allowed })
    }

    /// Evaluate a raw request path.
    pub fn decide(&self, path: &str) -> Decision<'_> {
        let normalized = normalize_path(path);

        if let Some(rule) = self.denied.iter().find(|r| r.matches(&normalized)) {
            return Decision::Denied(rule);
        }

        match self.allowed.iter().find(|r| r.matches(&normalized)) {
            Some(rule) => Decision::Allowed(rule),
            None => Decision::NoMatch,
        }
    }

    pub fn is_allowed(&self, path: &str) -> bool {
        self.decide(path).is_allowed()
    }

    pub fn denied_rules(&self) -> &[Rule] {
        &self.denied
    }

    pub fn allowed_rules(&self) -> &[Rule] {
        &self.allowed
    }
}

/// Normalize a request path for policy matching.
///
/// Strips leading `/v<major>.<minor>` segments and trailing `/` characters.
/// The result is never empty and `normalize_path(normalize_path(p)) ==
/// normalize_path(p)` holds for every input.
pub fn normalize_path(path: &str) -> String {
    let mut rest = path;
    while let Some(stripped) = strip_version_segment(rest) {
        rest = stripped;
    }

    match rest.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Returns the remainder if `path` starts with a whole `/v<digits>.<digits>` segment.
fn strip_version_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/v")?;
    let end = rest.find('/').unwrap_or(rest.len());
    let (major, minor) = rest[..end].split_once('.')?;

    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (numeric(major) && numeric(minor)).then(|| &rest[end..])
}
