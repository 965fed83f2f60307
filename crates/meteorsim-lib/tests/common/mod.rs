//! Shared test fixtures: a minimal HTTP stub standing in for the upstream
//! catalog so engine tests run hermetically.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A single-body HTTP stub. Every request receives the same JSON payload;
/// hits are counted so tests can assert on cache behavior.
pub struct StubCatalog {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubCatalog {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Spawn a stub catalog returning `body` for every request.
pub fn spawn_stub(body: String) -> StubCatalog {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    let hits = Arc::new(AtomicUsize::new(0));
    let thread_hits = Arc::clone(&hits);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let body = body.clone();
            let hits = Arc::clone(&thread_hits);
            thread::spawn(move || {
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let mut buffer = [0u8; 4096];
                let mut request = Vec::new();
                // GET requests carry no body; headers end at the blank line.
                loop {
                    match stream.read(&mut buffer) {
                        Ok(0) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buffer[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                hits.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            });
        }
    });

    StubCatalog {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// A catalog record in the upstream wire shape.
pub fn apophis_record() -> serde_json::Value {
    serde_json::json!({
        "id": "2099942",
        "name": "99942 Apophis (2004 MN4)",
        "is_potentially_hazardous_asteroid": true,
        "estimated_diameter": {
            "meters": {
                "estimated_diameter_min": 310.0,
                "estimated_diameter_max": 680.0
            }
        },
        "close_approach_data": [
            {
                "close_approach_date": "2029-04-13",
                "relative_velocity": { "kilometers_per_second": "7.42" },
                "miss_distance": { "kilometers": "31664.5" }
            }
        ],
        "orbital_data": { "eccentricity": "0.1914" }
    })
}
