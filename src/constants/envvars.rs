pub const LOG_LEVEL: &str = "LOG_LEVEL";

pub const EDGEX_PROTOCOL: &str = "EDGEX_PROTOCOL";
pub const EDGEX_SERVER: &str = "EDGEX_SERVER";
pub const EDGEX_PORT: &str = "EDGEX_PORT";
pub const EDGEX_TOPIC: &str = "EDGEX_TOPIC";
