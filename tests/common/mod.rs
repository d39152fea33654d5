//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use blue_green_edge::{EdgeConfig, EdgeServer, Shutdown};

/// A request seen by a mock origin.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct OriginHit {
    pub path: String,
    pub host: Option<String>,
}

pub type Hits = Arc<Mutex<Vec<OriginHit>>>;

/// Start a mock origin answering `f(path) -> (status, body)`.
#[allow(dead_code)]
pub async fn start_programmable_origin<F>(f: F) -> (SocketAddr, Hits)
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorded = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let recorded = recorded.clone();
                    tokio::spawn(async move {
                        serve_one(socket, f.as_ref(), &recorded).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

async fn serve_one<F>(mut socket: TcpStream, f: &F, hits: &Hits)
where
    F: Fn(&str) -> (u16, String),
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_string();
    let mut lines = head.lines();
    let path = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let host = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("host"))
        .map(|(_, value)| value.trim().to_string());

    hits.lock().unwrap().push(OriginHit {
        path: path.clone(),
        host,
    });

    let (status, body) = f(&path);
    let status_text = match status {
        200 => "200 OK",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start an edge emulator in front of `origin` whose fallback fetches loop
/// back to the edge itself. Returns the edge address and its shutdown handle.
#[allow(dead_code)]
pub async fn start_edge(origin: SocketAddr) -> (SocketAddr, Shutdown) {
    start_edge_with(origin, |_| {}).await
}

/// As `start_edge`, with a hook to adjust the configuration.
#[allow(dead_code)]
pub async fn start_edge_with<F>(origin: SocketAddr, adjust: F) -> (SocketAddr, Shutdown)
where
    F: FnOnce(&mut EdgeConfig),
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = EdgeConfig::default();
    config.listener.bind_address = addr.to_string();
    config.origin.endpoint = format!("http://{}", origin);
    config.fallback.scheme = "http".into();
    config.fallback.authority = Some(addr.to_string());
    config.fallback.timeout_secs = Some(5);
    adjust(&mut config);

    let shutdown = Shutdown::new();
    let server = EdgeServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never reuses connections or consults system proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
