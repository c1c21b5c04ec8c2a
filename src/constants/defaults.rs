pub const LOG_LEVEL: &str = "INFO";

pub const PROTOCOL: &str = "tcp";
pub const SERVER: &str = "localhost";
pub const PORT: u16 = 5563;
pub const TOPIC: &str = "";

pub const MQTT_CLIENT_PREFIX: &str = "edgex-bridge";
pub const MQTT_REQUEST_CAP: usize = 10;
