//! In-process HTTP/1.1 stub for integration tests.
//!
//! Routes match on method and path prefix (query included). Every request
//! is recorded so tests can assert which services were, or were not, called.
//! Header values may contain `{origin}`, replaced by the server's own origin.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned response for a method + path prefix.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub prefix: &'static str,
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
}

impl Route {
    pub fn new(method: &'static str, prefix: &'static str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            prefix,
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn get(prefix: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self::new("GET", prefix, 200, body)
    }

    pub fn post(prefix: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST", prefix, 200, body)
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

pub struct StubServer {
    origin: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let origin = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let log = requests.clone();
        let base = origin.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                let routes = routes.clone();
                let base = base.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, &routes, &log, &base).await;
                });
            }
        });

        Self { origin, requests }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path starts with `prefix`.
    pub fn hits(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: &[Route],
    log: &Mutex<Vec<RecordedRequest>>,
    origin: &str,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    // Headers
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    // Body
    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let route = routes
        .iter()
        .filter(|r| r.method == method && path.starts_with(r.prefix))
        .max_by_key(|r| r.prefix.len());

    log.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body,
    });

    let (status, extra, payload) = match route {
        Some(r) => (r.status, r.headers.clone(), r.body.clone()),
        None => (404, Vec::new(), b"not found".to_vec()),
    };

    let mut response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Length: {}\r\nConnection: close\r\n",
        payload.len()
    );
    for (name, value) in extra {
        response.push_str(&format!("{name}: {}\r\n", value.replace("{origin}", origin)));
    }
    response.push_str("\r\n");

    stream.write_all(response.as_bytes()).await?;
    stream.write_all(&payload).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Two-item trending feed.
pub const TRENDING_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:ht="https://trends.google.com/trending/rss">
  <channel>
    <title>Daily Search Trends</title>
    <item>
      <title>Solar eclipse</title>
      <ht:approx_traffic>500000+</ht:approx_traffic>
    </item>
    <item>
      <title><![CDATA[Champions League final]]></title>
    </item>
  </channel>
</rss>"#;

pub const FEED_TITLES: [&str; 2] = ["Solar eclipse", "Champions League final"];
