use thiserror::Error;

/// One message delivered by the bus; each frame holds one serialized event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BusMessage {
    pub frames: Vec<Vec<u8>>,
}

impl BusMessage {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self { frames }
    }

    pub fn single(frame: impl Into<Vec<u8>>) -> Self {
        Self {
            frames: vec![frame.into()],
        }
    }
}

#[derive(Error, Debug)]
pub enum BusError {
    #[error("invalid bus URI: {0}")]
    InvalidUri(#[from] url::ParseError),
    #[error("unsupported bus protocol '{0}'")]
    UnsupportedProtocol(String),
    #[error("bus URI '{0}' has no host")]
    MissingHost(String),
    #[error("subscription to '{0}' was rejected")]
    SubscriptionRejected(String),
    #[error("bus client is not connected")]
    NotConnected,
    #[error("bus connection closed")]
    Closed,
    #[error(transparent)]
    MqttClient(#[from] rumqttc::ClientError),
    #[error(transparent)]
    MqttConnection(#[from] rumqttc::ConnectionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Subscriber side of the message bus
///
/// Methods take `&self` so that `close` can be called from another thread
/// while `receive` is blocked; closing must unblock a pending `receive`
/// with an error.
pub trait BusClient: Send + Sync {
    fn dial(&self, uri: &str) -> Result<(), BusError>;

    fn set_subscription_filter(&self, topic: &str) -> Result<(), BusError>;

    /// Block until the next message arrives
    fn receive(&self) -> Result<BusMessage, BusError>;

    fn close(&self) -> Result<(), BusError>;
}
