mod argsets;
mod command;

use anyhow::{anyhow, Result};
use edgex_bridge::helpers::{init_logging, load_dotenv};

const CMD_SUBSCRIBE: &str = "subscribe";

fn main() -> Result<()> {
    let dotenv_loaded = load_dotenv();
    init_logging();
    if dotenv_loaded {
        log::debug!("Loaded local .env");
    }

    let mut args = pico_args::Arguments::from_env();
    match args.subcommand()?.as_deref() {
        Some(CMD_SUBSCRIBE) => {
            let subscribe_args = argsets::SubscribeArgs {
                config: args.opt_value_from_str("--config")?,
                protocol: args.opt_value_from_str("--protocol")?,
                server: args.opt_value_from_str("--server")?,
                port: args.opt_value_from_str("--port")?,
                topic: args.opt_value_from_str("--topic")?,
            };
            let unused = args.finish();
            if !unused.is_empty() {
                return Err(anyhow!("Unexpected arguments: {:?}", unused));
            }
            command::subscribe(subscribe_args)
        }
        _ => Err(anyhow!("Subcommand must be 'subscribe'")),
    }
}
