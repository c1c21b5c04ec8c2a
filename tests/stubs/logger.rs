use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};

/// Logger keeping every line, for asserting on what a source reported
#[derive(Default)]
pub struct CaptureLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureLogger {
    pub fn lines(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.lines(level).iter().any(|msg| msg.contains(needle))
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}
