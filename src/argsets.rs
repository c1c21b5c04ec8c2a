use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct SubscribeArgs {
    pub config: Option<PathBuf>,
    pub protocol: Option<String>,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub topic: Option<String>,
}
