//! Minimal plain-HTTP stub of the storage service API for session tests

#![allow(dead_code)]

use reqwest::Url;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    /// Path plus query, as sent on the request line
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

type Handler = dyn Fn(&ReceivedRequest) -> (u16, String) + Send + Sync;

pub struct StubServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubServer {
    /// Serve every connection with `handler` on a background thread
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&ReceivedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = received.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = handler.clone();
                let log = log.clone();
                thread::spawn(move || serve(stream, handler.as_ref(), &log));
            }
        });

        Self { addr, received }
    }

    /// Plain-HTTP API root of this stub
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api/v1", self.addr)).unwrap()
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<ReceivedRequest> {
        self.received()
            .into_iter()
            .filter(|r| r.method == "GET")
            .collect()
    }
}

/// Handler that accepts any login with `token` and delegates GETs
pub fn with_login<F>(token: &'static str, get: F) -> impl Fn(&ReceivedRequest) -> (u16, String)
where
    F: Fn(&ReceivedRequest) -> (u16, String),
{
    move |req| {
        if req.method == "POST" && req.path() == "/api/v1/auth/token" {
            (200, format!("{}\n", token))
        } else {
            get(req)
        }
    }
}

fn serve(stream: TcpStream, handler: &Handler, log: &Mutex<Vec<ReceivedRequest>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    let request = ReceivedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    log.lock().unwrap().push(request.clone());

    let (status, body) = handler(&request);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
