use std::fmt;
use std::sync::Arc;

use flume::{Receiver, Sender};
use log::{Level, Log, Metadata, Record};

const LOG_TARGET: &str = "edgex_bridge::source";

/// Capabilities a source gets from the pipeline running it: a logger and a
/// cancellation signal
#[derive(Clone)]
pub struct StreamContext {
    logger: Arc<dyn Log>,
    done: Receiver<()>,
}

/// Fires the cancellation signal of the contexts it was created with
///
/// Cancellation happens on [`CancelHandle::cancel`] or when the handle is
/// dropped, whichever comes first.
pub struct CancelHandle {
    tx: Sender<()>,
}

impl CancelHandle {
    pub fn cancel(self) {
        drop(self.tx);
    }
}

impl StreamContext {
    /// Context logging through the global `log` logger
    pub fn new() -> (Self, CancelHandle) {
        Self::with_logger(Arc::new(GlobalLogger))
    }

    pub fn with_logger(logger: Arc<dyn Log>) -> (Self, CancelHandle) {
        let (tx, rx) = flume::bounded(0);
        (Self { logger, done: rx }, CancelHandle { tx })
    }

    /// Receiver that completes (disconnects) once the context is cancelled
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }

    pub fn is_cancelled(&self) -> bool {
        self.done.is_disconnected()
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder()
            .level(level)
            .target(LOG_TARGET)
            .build();
        if !self.logger.enabled(&metadata) {
            return;
        }
        self.logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }
}

impl fmt::Debug for StreamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Forwards to whatever logger the binary installed (env_logger)
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}
