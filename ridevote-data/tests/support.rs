//! Shared helpers for `ridevote-data` integration tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// A request captured by [`MockService`].
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    /// First line, e.g. `POST /v1beta/models/m:generateContent HTTP/1.1`.
    pub request_line: String,
    /// Header names lower-cased, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: String,
}

impl RecordedRequest {
    /// Value of header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.as_str())
    }
}

/// One-shot HTTP server on a random local port.
pub struct MockService {
    base_url: String,
    requests: Receiver<RecordedRequest>,
}

impl MockService {
    /// Answer the next request with `status` and a JSON `body`.
    pub fn respond_with(status: u16, payload: impl Into<String>) -> Self {
        let body = payload.into();
        Self::spawn(move |mut stream, request| {
            let reason = if status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            if let Err(err) = stream.write_all(response.as_bytes()).and_then(|()| stream.flush()) {
                panic!("mock service failed to answer: {err}");
            }
            request
        })
    }

    /// Accept the next request and never answer within `hold`.
    pub fn stall_for(hold: Duration) -> Self {
        Self::spawn(move |stream, request| {
            thread::sleep(hold);
            drop(stream);
            request
        })
    }

    fn spawn<F>(handler: F) -> Self
    where
        F: FnOnce(TcpStream, RecordedRequest) -> RecordedRequest + Send + 'static,
    {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .unwrap_or_else(|err| panic!("failed to bind mock service: {err}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("failed to read mock address: {err}"));
        let (sender, requests) = mpsc::channel();
        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let request = read_request(&stream);
            // The receiver is gone once the test has finished with the mock.
            sender.send(handler(stream, request)).ok();
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Root URL of the server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The captured request, waiting up to five seconds for it.
    pub fn received(&self) -> RecordedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .unwrap_or_else(|err| panic!("mock service saw no request: {err}"))
    }
}

fn read_request(stream: &TcpStream) -> RecordedRequest {
    let mut reader = BufReader::new(stream);
    let mut recorded = RecordedRequest::default();
    let mut line = String::new();
    if reader.read_line(&mut line).is_err() {
        return recorded;
    }
    recorded.request_line = line.trim_end().to_owned();

    let mut content_length = 0_usize;
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((raw_name, raw_value)) = trimmed.split_once(':') {
            let name = raw_name.trim().to_ascii_lowercase();
            let value = raw_value.trim().to_owned();
            if name == "content-length" {
                content_length = value.parse().unwrap_or(0);
            }
            recorded.headers.push((name, value));
        }
    }

    let mut body = vec![0_u8; content_length];
    if reader.read_exact(&mut body).is_ok() {
        recorded.body = String::from_utf8_lossy(&body).into_owned();
    }
    recorded
}

/// Wrap `text` as the single part of a `generateContent` answer.
pub fn model_answer(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}
