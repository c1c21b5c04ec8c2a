use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use edgex_bridge::constants::{envvars, keys};
use edgex_bridge::source::{EdgexSource, Options, Source, StreamContext};

use crate::argsets::SubscribeArgs;

const TUPLE_BUFFER: usize = 100;

/// Run the EdgeX source and print every tuple as a JSON line on stdout
pub fn subscribe(args: SubscribeArgs) -> Result<()> {
    let options = resolve_options(&args)?;

    let mut source = EdgexSource::default();
    source.configure(&options)?;
    log::info!(
        "Starting edgex source on {} (topic '{}')",
        source.config().uri(),
        source.config().topic
    );
    let source = Arc::new(source);

    let (ctx, cancel) = StreamContext::new();
    let (tuple_tx, tuple_rx) = flume::bounded(TUPLE_BUFFER);
    let (err_tx, err_rx) = flume::unbounded();

    let worker = {
        let source = source.clone();
        thread::spawn(move || source.open(&ctx, tuple_tx, err_tx))
    };

    let mut out = io::stdout().lock();
    let mut write_result = Ok(());
    for tuple in tuple_rx.iter() {
        write_result = serde_json::to_string(&tuple)
            .map_err(anyhow::Error::from)
            .and_then(|line| writeln!(out, "{line}").map_err(Into::into));
        if write_result.is_err() {
            break;
        }
    }

    if write_result.is_err() {
        cancel.cancel();
        source.close()?;
    }
    worker
        .join()
        .map_err(|_| anyhow!("edgex source worker panicked"))?;

    if let Ok(err) = err_rx.try_recv() {
        return Err(err.into());
    }
    write_result
}

/// Merge options from the environment, the options file and the flags,
/// later ones taking precedence
fn resolve_options(args: &SubscribeArgs) -> Result<Options> {
    let mut options = options_from_env();

    if let Some(path) = &args.config {
        options.extend(options_from_file(path)?);
    }

    if let Some(protocol) = &args.protocol {
        options.insert(keys::PROTOCOL.into(), Value::from(protocol.as_str()));
    }
    if let Some(server) = &args.server {
        options.insert(keys::SERVER.into(), Value::from(server.as_str()));
    }
    if let Some(port) = args.port {
        options.insert(keys::PORT.into(), Value::from(port));
    }
    if let Some(topic) = &args.topic {
        options.insert(keys::TOPIC.into(), Value::from(topic.as_str()));
    }

    Ok(options)
}

fn options_from_file(path: &Path) -> Result<Options> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read options file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("options file {} is not a JSON object", path.display()))
}

fn options_from_env() -> Options {
    let mut options = Options::new();
    for (var, key) in [
        (envvars::EDGEX_PROTOCOL, keys::PROTOCOL),
        (envvars::EDGEX_SERVER, keys::SERVER),
        (envvars::EDGEX_PORT, keys::PORT),
        (envvars::EDGEX_TOPIC, keys::TOPIC),
    ] {
        let Ok(raw) = env::var(var) else {
            continue;
        };
        // A port that does not parse is passed on as text and rejected by the config
        let value = match (key, raw.parse::<i64>()) {
            (keys::PORT, Ok(port)) => Value::from(port),
            _ => Value::from(raw),
        };
        options.insert(key.into(), value);
    }
    options
}
