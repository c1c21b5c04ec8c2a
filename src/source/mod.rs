//! Stream sources and the contract the pipeline drives them through
mod config;
mod context;
mod edgex;

pub use config::{ConfigError, EdgexConfig, Options};
pub use context::{CancelHandle, StreamContext};
pub use edgex::{EdgexSource, LifecycleState};

use flume::Sender;
use thiserror::Error;

use crate::data_mgmt::SourceTuple;
use crate::interfaces::bus::BusError;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to connect to edgex message bus: {0}")]
    Connect(#[source] BusError),
    #[error("failed to subscribe to edgex message bus topic '{topic}': {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: BusError,
    },
    #[error("failed to close edgex subscription: {0}")]
    Close(#[source] BusError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A source feeding tuples into a stream pipeline
///
/// `open` runs the receive loop on the calling thread until the source is
/// closed or the context is cancelled; `close` may be called from any other
/// thread to stop it.
pub trait Source: Send + Sync {
    fn configure(&mut self, options: &Options) -> Result<(), SourceError>;

    fn open(
        &self,
        ctx: &StreamContext,
        consumer: Sender<SourceTuple>,
        errors: Sender<SourceError>,
    );

    fn close(&self) -> Result<(), SourceError>;
}
