use std::io;

use thiserror::Error;

/// Failure to deliver one item to the collector.
///
/// The sender worker logs these and moves on to the next item; producers
/// never see them.
#[derive(Debug, Error)]
pub enum SendError {
    /// The collector address could not be resolved or connected to.
    #[error("cannot reach collector at {address}: {source}")]
    Connectivity {
        address: String,
        #[source]
        source: io::Error,
    },
    /// The connection was open but writing the envelope or reading the reply failed.
    #[error("exchange with collector at {address} failed: {source}")]
    Protocol {
        address: String,
        #[source]
        source: io::Error,
    },
}

impl SendError {
    pub fn address(&self) -> &str {
        match self {
            SendError::Connectivity { address, .. } | SendError::Protocol { address, .. } => {
                address
            }
        }
    }
}

/// Failure to start a trapper.
#[derive(Debug, Error)]
pub enum TrapperError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("cannot start background thread: {0}")]
    Spawn(#[from] io::Error),
}
