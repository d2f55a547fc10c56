//! Collector envelope encoding and acknowledgement parsing.
//!
//! ```text
//! request:  <req><host>B64</host><key>B64</key><data>B64</data></req>
//! response: "OK"
//! ```

use std::fmt;
use std::io::{self, Read};

use base64::{engine::general_purpose::STANDARD, Engine};

use super::Item;

/// Size of the buffer a reply is read into.
pub const REPLY_BUFFER_SIZE: usize = 1024;

const KEY_OPEN: &str = "</host><key>";
const DATA_OPEN: &str = "</key><data>";
const TAIL: &str = "</data></req>";

/// Builds envelopes for one reporting host.
///
/// The host segment is encoded once up front; every item shares it.
#[derive(Clone, Debug)]
pub struct EnvelopeEncoder {
    head: String,
}

impl EnvelopeEncoder {
    pub fn new(host: &str) -> Self {
        Self {
            head: format!("<req><host>{}", STANDARD.encode(host)),
        }
    }

    /// Encode an item. A missing value is sent as empty data.
    pub fn encode(&self, item: &Item) -> Envelope {
        let key = STANDARD.encode(item.key());
        let data = STANDARD.encode(item.value().unwrap_or(""));

        let mut text =
            String::with_capacity(self.head.len() + key.len() + data.len() + 40);
        text.push_str(&self.head);
        text.push_str(KEY_OPEN);
        text.push_str(&key);
        text.push_str(DATA_OPEN);
        text.push_str(&data);
        text.push_str(TAIL);

        Envelope { text }
    }
}

/// An encoded request ready for transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    text: String,
}

impl Envelope {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The raw bytes the collector answered with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    bytes: Vec<u8>,
}

impl Reply {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Perform a single read of at most `REPLY_BUFFER_SIZE` bytes.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buffer = [0u8; REPLY_BUFFER_SIZE];
        let read = reader.read(&mut buffer)?;
        Ok(Self::new(&buffer[..read]))
    }

    /// True only for exactly the two bytes `OK`.
    pub fn is_ack(&self) -> bool {
        self.bytes == b"OK"
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}
