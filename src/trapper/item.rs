/// One data point queued for delivery to the collector.
///
/// Items are created once when a producer calls `send` and consumed exactly
/// once by the sender worker. A missing value is transmitted as empty data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    key: String,
    value: Option<String>,
}

impl Item {
    /// Create an item carrying a value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Create an item without a value.
    pub fn without_value(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Create an item from an optional value.
    pub fn from_option(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
