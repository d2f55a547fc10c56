//! Test support: a fake collector.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use collector_bridge::TrapperConfig;

pub use crate::log_capture::LogCapture;

/// A collector on an ephemeral local port.
///
/// Records every envelope it receives and answers each one with a fixed reply.
pub struct FakeCollector {
    port: u16,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl FakeCollector {
    pub fn start(reply: &'static [u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let log = Arc::clone(&received);
        let count = Arc::clone(&connections);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                count.fetch_add(1, Ordering::SeqCst);

                let mut envelope = Vec::new();
                let mut buffer = [0u8; 512];
                while !envelope.ends_with(b"</req>") {
                    match stream.read(&mut buffer) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => envelope.extend_from_slice(&buffer[..n]),
                    }
                }

                log.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&envelope).into_owned());
                let _ = stream.write_all(reply);
            }
        });

        Self {
            port,
            received,
            connections,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Trapper configuration pointing at this collector.
    pub fn config(&self, host: &str) -> TrapperConfig {
        TrapperConfig::new("127.0.0.1", host)
            .with_port(self.port)
            .with_connect_timeout(Duration::from_secs(2))
            .with_io_timeout(Duration::from_secs(2))
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` envelopes arrived, or give up after `timeout`.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        loop {
            let received = self.received();
            if received.len() >= count || Instant::now() >= deadline {
                return received;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Base64 the way the envelope does it.
pub fn b64(text: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.encode(text)
}
