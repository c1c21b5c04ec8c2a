// Option keys understood by the source configuration
pub const PROTOCOL: &str = "protocol";
pub const SERVER: &str = "server";
pub const PORT: &str = "port";
pub const TOPIC: &str = "topic";

// Event-level metadata keys, merged into the tuple metadata
pub const META_ID: &str = "id";
pub const META_DEVICE: &str = "device";
pub const META_CREATED: &str = "created";
pub const META_MODIFIED: &str = "modified";
pub const META_ORIGIN: &str = "origin";
pub const META_PUSHED: &str = "pushed";
