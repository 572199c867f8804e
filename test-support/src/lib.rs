//! Loopback HTTP stubs shared by the workspace's client tests.
//!
//! Each stub binds `127.0.0.1:0`, answers a fixed list of responses, one per
//! connection and in order, and hands back the raw text of every request it
//! saw. Responses carry `connection: close`, so a client opens a fresh
//! connection for each call.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One canned response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    status_line: &'static str,
    content_type: &'static str,
    body: String,
}

impl StubResponse {
    /// `application/json` response, as GitHub sends.
    pub fn json(status_line: &'static str, body: impl Into<String>) -> Self {
        Self {
            status_line,
            content_type: "application/json",
            body: body.into(),
        }
    }

    /// `text/plain` response, as the analysis service sends.
    pub fn text(status_line: &'static str, body: impl Into<String>) -> Self {
        Self {
            status_line,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    fn render(&self) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            self.status_line,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

/// Serves `responses` in order and returns the base URL (trailing slash)
/// plus a task yielding the requests received.
pub async fn serve(responses: Vec<StubResponse>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::with_capacity(responses.len());
        for response in responses {
            let (mut sock, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut sock).await);
            sock.write_all(response.render().as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
        }
        requests
    });

    (format!("http://{addr}/"), handle)
}

/// Serves a single response; the task yields the one request.
pub async fn serve_once(response: StubResponse) -> (String, JoinHandle<String>) {
    let (url, all) = serve(vec![response]).await;
    let handle = tokio::spawn(async move { all.await.unwrap().remove(0) });
    (url, handle)
}

async fn read_request(sock: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = sock.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
