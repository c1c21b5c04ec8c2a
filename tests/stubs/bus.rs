use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use edgex_bridge::interfaces::{BusClient, BusError, BusMessage};
use flume::{Receiver, Sender};

type Delivery = Result<BusMessage, BusError>;

#[derive(Default)]
struct Shared {
    dialed: Mutex<Option<String>>,
    filter: Mutex<Option<String>>,
    closes: AtomicUsize,
}

/// Bus client fed by the test through a [`BusHandle`]
///
/// `receive` blocks until the test pushes a message or an error; `close`
/// queues a `Closed` error so a blocked `receive` returns.
pub struct ScriptedBus {
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    shared: Arc<Shared>,
    fail_dial: bool,
    fail_subscribe: bool,
    fail_close: bool,
    dial_gate: Option<Receiver<()>>,
}

#[derive(Clone)]
pub struct BusHandle {
    tx: Sender<Delivery>,
    shared: Arc<Shared>,
}

impl ScriptedBus {
    pub fn new() -> (Self, BusHandle) {
        let (tx, rx) = flume::unbounded();
        let shared = Arc::new(Shared::default());
        let handle = BusHandle {
            tx: tx.clone(),
            shared: shared.clone(),
        };
        let bus = Self {
            tx,
            rx,
            shared,
            fail_dial: false,
            fail_subscribe: false,
            fail_close: false,
            dial_gate: None,
        };
        (bus, handle)
    }

    pub fn failing_dial(mut self) -> Self {
        self.fail_dial = true;
        self
    }

    pub fn failing_subscribe(mut self) -> Self {
        self.fail_subscribe = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// `dial` blocks until the returned sender fires or is dropped
    pub fn gated_dial(mut self) -> (Self, Sender<()>) {
        let (tx, rx) = flume::bounded(1);
        self.dial_gate = Some(rx);
        (self, tx)
    }
}

impl BusClient for ScriptedBus {
    fn dial(&self, uri: &str) -> Result<(), BusError> {
        *self.shared.dialed.lock().unwrap() = Some(uri.to_string());
        if let Some(gate) = &self.dial_gate {
            let _ = gate.recv();
        }
        if self.fail_dial {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into());
        }
        Ok(())
    }

    fn set_subscription_filter(&self, topic: &str) -> Result<(), BusError> {
        *self.shared.filter.lock().unwrap() = Some(topic.to_string());
        if self.fail_subscribe {
            return Err(BusError::SubscriptionRejected(topic.to_string()));
        }
        Ok(())
    }

    fn receive(&self) -> Result<BusMessage, BusError> {
        self.rx.recv().unwrap_or(Err(BusError::Closed))
    }

    fn close(&self) -> Result<(), BusError> {
        self.shared.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(io::Error::other("socket already gone").into());
        }
        let _ = self.tx.send(Err(BusError::Closed));
        Ok(())
    }
}

impl BusHandle {
    pub fn push(&self, msg: BusMessage) {
        self.tx.send(Ok(msg)).unwrap();
    }

    pub fn push_frame(&self, frame: impl Into<Vec<u8>>) {
        self.push(BusMessage::single(frame));
    }

    pub fn push_error(&self, err: BusError) {
        self.tx.send(Err(err)).unwrap();
    }

    pub fn dialed(&self) -> Option<String> {
        self.shared.dialed.lock().unwrap().clone()
    }

    pub fn filter(&self) -> Option<String> {
        self.shared.filter.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }
}
