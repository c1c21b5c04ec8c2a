use std::sync::atomic::{AtomicU8, Ordering};

use flume::Sender;

use crate::data_mgmt::{infer_value, Event, SourceTuple};
use crate::interfaces::bus::BusClient;
use crate::interfaces::mqtt::MqttBus;

use super::{EdgexConfig, Options, Source, SourceError, StreamContext};

/// Longest payload prefix quoted when a frame fails to decode
const MAX_LOGGED_PAYLOAD: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Unconnected = 0,
    Subscribed = 1,
    Closed = 2,
}

impl LifecycleState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => LifecycleState::Subscribed,
            2 => LifecycleState::Closed,
            _ => LifecycleState::Unconnected,
        }
    }
}

/// Source reading EdgeX events off the message bus
///
/// Every frame is decoded into an [`Event`]; its named readings become one
/// [`SourceTuple`], values typed by [`infer_value`].
pub struct EdgexSource {
    client: Box<dyn BusClient>,
    config: EdgexConfig,
    state: AtomicU8,
}

impl EdgexSource {
    pub fn new(client: Box<dyn BusClient>) -> Self {
        Self {
            client,
            config: EdgexConfig::default(),
            state: AtomicU8::new(LifecycleState::Unconnected as u8),
        }
    }

    pub fn config(&self) -> &EdgexConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn receive_loop(&self, ctx: &StreamContext, consumer: &Sender<SourceTuple>) {
        loop {
            let msg = match self.client.receive() {
                Ok(msg) => msg,
                Err(e) => {
                    if self.state() != LifecycleState::Subscribed {
                        ctx.info(format_args!("Successfully closed edgex subscription."));
                        return;
                    }
                    ctx.warn(format_args!("Error while receiving edgex events: {e}"));
                    continue;
                }
            };

            for frame in &msg.frames {
                let Some(tuple) = decode_frame(ctx, frame) else {
                    continue;
                };
                if !emit(ctx, consumer, tuple) {
                    return;
                }
            }
        }
    }
}

impl Default for EdgexSource {
    fn default() -> Self {
        Self::new(Box::new(MqttBus::new()))
    }
}

impl Source for EdgexSource {
    fn configure(&mut self, options: &Options) -> Result<(), SourceError> {
        self.config = EdgexConfig::from_options(options)?;
        Ok(())
    }

    fn open(
        &self,
        ctx: &StreamContext,
        consumer: Sender<SourceTuple>,
        errors: Sender<SourceError>,
    ) {
        if self.state() == LifecycleState::Closed {
            ctx.info(format_args!("The edgex source is already closed, not connecting."));
            return;
        }
        if let Err(e) = self.client.dial(&self.config.uri()) {
            let err = SourceError::Connect(e);
            ctx.error(format_args!("{err}"));
            let _ = errors.send(err);
            return;
        }
        ctx.info(format_args!(
            "The connection to edgex messagebus is established successfully."
        ));

        if let Err(e) = self.client.set_subscription_filter(&self.config.topic) {
            let err = SourceError::Subscribe {
                topic: self.config.topic.clone(),
                source: e,
            };
            ctx.error(format_args!("{err}"));
            let _ = errors.send(err);
            return;
        }
        let subscribed = self.state.compare_exchange(
            LifecycleState::Unconnected as u8,
            LifecycleState::Subscribed as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if subscribed.is_err() {
            // close() ran while connecting and left the client to us
            match self.client.close() {
                Ok(()) => ctx.info(format_args!("Successfully closed edgex subscription.")),
                Err(e) => ctx.warn(format_args!("Failed to close edgex subscription: {e}")),
            }
            return;
        }
        ctx.info(format_args!(
            "Successfully subscribed to edgex messagebus topic '{}'.",
            self.config.topic
        ));

        self.receive_loop(ctx, &consumer);
    }

    /// Stop the subscription
    ///
    /// The state becomes `Closed` before the client is closed, so the
    /// receive error this provokes in the loop is read as a shutdown. Before
    /// `open` has subscribed only the state changes; `open` then tears the
    /// connection down itself instead of entering the loop.
    fn close(&self) -> Result<(), SourceError> {
        let previous = self
            .state
            .swap(LifecycleState::Closed as u8, Ordering::SeqCst);
        if LifecycleState::from_u8(previous) == LifecycleState::Subscribed {
            self.client.close().map_err(SourceError::Close)?;
        }
        Ok(())
    }
}

fn decode_frame(ctx: &StreamContext, frame: &[u8]) -> Option<SourceTuple> {
    let event = match Event::from_frame(frame) {
        Ok(event) => event,
        Err(e) => {
            let quoted = &frame[..frame.len().min(MAX_LOGGED_PAYLOAD)];
            ctx.warn(format_args!(
                "payload {} unmarshal fail: {e}",
                String::from_utf8_lossy(quoted)
            ));
            return None;
        }
    };
    ctx.debug(format_args!(
        "receive message {} from device {}",
        String::from_utf8_lossy(frame),
        event.device
    ));
    tuple_from_event(ctx, &event)
}

/// Build the tuple for an event; `None` when no reading carries a name
fn tuple_from_event(ctx: &StreamContext, event: &Event) -> Option<SourceTuple> {
    let mut tuple = SourceTuple::new();
    for reading in &event.readings {
        if reading.name.is_empty() {
            ctx.warn(format_args!("The name of readings should not be empty!"));
            continue;
        }
        let (kind, value) = infer_value(&reading.value);
        ctx.debug(format_args!(
            "name {} with type {kind} is {value}",
            reading.name
        ));
        tuple.set_value(reading.name.clone(), value);
        tuple.set_reading_meta(reading);
    }

    if !tuple.has_values() {
        ctx.warn(format_args!(
            "No readings are processed for the event, so ignore it."
        ));
        return None;
    }
    tuple.set_event_meta(event);
    Some(tuple)
}

/// Hand a tuple downstream unless cancelled first; false ends the loop
fn emit(ctx: &StreamContext, consumer: &Sender<SourceTuple>, tuple: SourceTuple) -> bool {
    flume::Selector::new()
        .send(consumer, tuple, |res| match res {
            Ok(()) => {
                ctx.debug(format_args!("send data to device node"));
                true
            }
            Err(_) => {
                ctx.warn(format_args!("Downstream consumer is gone, stopping."));
                false
            }
        })
        .recv(ctx.done(), |_| false)
        .wait()
}
