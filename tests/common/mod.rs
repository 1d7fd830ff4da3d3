//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use docker_socket_proxy::config::GatewayConfig;
use docker_socket_proxy::policy::{Authorizer, Policy};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

/// A request head as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.query().unwrap_or_default().as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Fake Docker engine listening on a Unix socket in a temp directory.
pub struct MockBackend {
    socket_path: PathBuf,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    connections: Arc<AtomicUsize>,
    _dir: TempDir,
}

#[allow(dead_code)]
impl MockBackend {
    /// Backend answering `200 OK` with body `[]`.
    pub async fn start() -> Self {
        Self::start_with(200, "[]").await
    }

    /// Backend answering every request with the given status and body.
    pub async fn start_with(status: u16, body: &'static str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let recorded = Arc::clone(&requests);
        let accepted = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                accepted.fetch_add(1, Ordering::SeqCst);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    serve(socket, status, body, recorded).await;
                });
            }
        });

        Self {
            socket_path,
            requests,
            connections,
            _dir: dir,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The single request received so far.
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one backend request: {requests:?}");
        requests.into_iter().next().unwrap()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve(
    mut socket: UnixStream,
    status: u16,
    body: &'static str,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let request = RecordedRequest {
        method: request_line.next().unwrap_or_default().to_string(),
        target: request_line.next().unwrap_or_default().to_string(),
        headers: lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect(),
    };
    let is_head = request.method == "HEAD";
    recorded.lock().unwrap().push(request);

    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nX-Backend: mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    if !is_head {
        response.push_str(body);
    }
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Config pointing at `socket_path` with short timeouts.
#[allow(dead_code)]
pub fn test_config(socket_path: &Path) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.backend.socket_path = socket_path.to_path_buf();
    config.timeouts.dial_secs = 2;
    config.timeouts.shutdown_grace_secs = 2;
    config
}

#[allow(dead_code)]
pub fn authorizer(document: &str) -> Arc<Authorizer> {
    Arc::new(Authorizer::new(&Policy::from_json(document).unwrap()).unwrap())
}

/// Policy used by most gateway tests.
#[allow(dead_code)]
pub const TEST_POLICY: &str = r#"{
    "groups": {
        "CONTAINERS": ["^/containers/json$"],
        "EVENTS": ["^/events$"],
        "SYSTEM": ["^/info$", "^/version$"]
    },
    "global_deny": ["^/containers/[a-f0-9]{64}/attach"]
}"#;

/// What a [`HangingBackend`] observed on one of its connections.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    HeadReceived,
    Closed,
}

/// Engine that reads request heads but never answers.
#[allow(dead_code)]
pub struct HangingBackend {
    socket_path: PathBuf,
    events: mpsc::UnboundedReceiver<BackendEvent>,
    _dir: TempDir,
}

#[allow(dead_code)]
impl HangingBackend {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket_path).unwrap();
        let (tx, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(hold(socket, tx.clone()));
            }
        });

        Self {
            socket_path,
            events,
            _dir: dir,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Next observed event, or `None` if nothing happens within five seconds.
    pub async fn next_event(&mut self) -> Option<BackendEvent> {
        tokio::time::timeout(Duration::from_secs(5), self.events.recv())
            .await
            .ok()
            .flatten()
    }
}

async fn hold(mut socket: UnixStream, events: mpsc::UnboundedSender<BackendEvent>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let mut head_seen = false;
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if !head_seen && buf.windows(4).any(|w| w == b"\r\n\r\n") {
            head_seen = true;
            let _ = events.send(BackendEvent::HeadReceived);
        }
    }
    let _ = events.send(BackendEvent::Closed);
}
