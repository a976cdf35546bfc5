//! Shared test fixtures for the shop SDK integration tests.
//!
//! Provides scripted catalog sources that count how often they are hit,
//! sample catalog documents in both field casings, a recording payment
//! gateway, and a scripted HTTP server on loopback.

#![allow(dead_code)]

use elysian_shop::checkout::{PaymentGateway, PaymentOutcome};
use elysian_shop::error::{Result, ShopError};
use elysian_shop::models::OrderPayload;
use elysian_shop::source::CatalogSource;
use serde_json::{json, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// StubSource
// ---------------------------------------------------------------------------

/// A catalog source that either answers with a fixed document or fails,
/// recording every call.
pub struct StubSource {
    name: String,
    answer: Option<Value>,
    pub calls: Arc<AtomicUsize>,
}

impl StubSource {
    pub fn ok(name: &str, document: Value) -> Self {
        Self {
            name: name.to_string(),
            answer: Some(document),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            answer: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl CatalogSource for StubSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn fetch(&self) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Some(doc) => Ok(doc.clone()),
            None => Err(ShopError::Status {
                url: self.name.clone(),
                status: 503,
            }),
        }
    }
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub fn excluded() -> Vec<String> {
    vec!["keys".to_string(), "Кейсы".to_string()]
}

// ---------------------------------------------------------------------------
// Sample documents
// ---------------------------------------------------------------------------

/// Backend-style records with capitalized field names.
pub fn backend_document() -> Value {
    json!([
        {
            "Id": 1,
            "Category": "privileges",
            "Title": "VIP",
            "Price": 500,
            "Description": "Доступ к /kit vip каждый день"
        },
        {
            "Id": 2,
            "Category": "currency",
            "Title": "1000 монет",
            "Price": 150,
            "Image": "img/coins.png"
        },
        {
            "Id": 3,
            "Category": "keys",
            "Subcategory": "Ключи",
            "Title": "Ключ от кейса",
            "Price": 99
        },
        {
            "Id": 4,
            "Category": "Кейсы",
            "Title": "Легендарный кейс",
            "Price": 299
        }
    ])
}

/// Snapshot-style document wrapping lower-camel-case records.
pub fn snapshot_document() -> Value {
    json!({
        "products": [
            { "category": "privileges", "title": "Premium", "price": 900, "badge": "Выгодно" },
            { "category": "misc", "title": "Смена ника", "price": 50 },
            { "category": "keys", "title": "Ключ", "price": 10 }
        ]
    })
}

/// Records covering every catalog section, including subcategorized keys.
pub fn display_document() -> Value {
    json!([
        { "id": "p1", "category": "privileges", "title": "VIP", "price": 500 },
        { "id": "k1", "category": "keys", "subcategory": "Обычные", "title": "Ключ x1", "price": 50, "backgroundColor": "#223344" },
        { "id": "c1", "category": "currency", "title": "100 монет", "price": 20 },
        { "id": "k2", "category": "keys", "subcategory": "Редкие", "title": "Редкий ключ", "price": 150 },
        { "id": "k3", "category": "keys", "subcategory": "Обычные", "title": "Ключ x5", "price": 200 },
        { "id": "k4", "category": "keys", "title": "Ключ без группы", "price": 5 },
        { "id": "m1", "category": "misc", "title": "Смена ника", "price": 50 },
        { "id": "x1", "category": "weapons", "title": "Меч", "price": 10 }
    ])
}

/// Write a JSON document to a temp file with the given suffix.
pub fn snapshot_file(document: &Value, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", document).unwrap();
    file.flush().unwrap();
    file
}

// ---------------------------------------------------------------------------
// RecordingGateway
// ---------------------------------------------------------------------------

/// Payment gateway that records every order and answers from a script.
pub struct RecordingGateway {
    pub orders: Mutex<Vec<OrderPayload>>,
    answer: Mutex<Vec<Result<PaymentOutcome>>>,
}

impl RecordingGateway {
    /// Answers are consumed front to back; once exhausted, every call
    /// redirects to `https://pay.example/ok`.
    pub fn scripted(answers: Vec<Result<PaymentOutcome>>) -> Arc<Self> {
        Arc::new(Self {
            orders: Mutex::new(Vec::new()),
            answer: Mutex::new(answers),
        })
    }

    pub fn redirecting() -> Arc<Self> {
        Self::scripted(Vec::new())
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

impl PaymentGateway for RecordingGateway {
    fn pay(&self, order: &OrderPayload) -> Result<PaymentOutcome> {
        self.orders.lock().unwrap().push(order.clone());
        let mut answers = self.answer.lock().unwrap();
        if answers.is_empty() {
            Ok(PaymentOutcome::Redirect("https://pay.example/ok".to_string()))
        } else {
            answers.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

/// One-connection-at-a-time HTTP/1.1 server answering from a script.
///
/// Answers are used in order; the last one repeats once the script runs
/// out. Every request (request line, headers and body) is recorded.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(answers: Vec<(u16, &str)>) -> Self {
        Self::start_delayed(answers, Duration::ZERO)
    }

    /// Like [`start`](Self::start), but every answer waits `delay` first.
    pub fn start_delayed(answers: Vec<(u16, &str)>, delay: Duration) -> Self {
        let answers: Vec<(u16, String)> = answers
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        thread::spawn(move || {
            for (n, stream) in listener.incoming().enumerate() {
                let Ok(mut stream) = stream else { continue };
                recorded.lock().unwrap().push(read_request(&mut stream));
                thread::sleep(delay);
                let (status, body) = answers
                    .get(n)
                    .or(answers.last())
                    .cloned()
                    .unwrap_or((200, "{}".to_string()));
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { base_url, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            return String::from_utf8_lossy(&buf).into_owned();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
