use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rumqttc::{
    Client, Connection, Event, MqttOptions, Outgoing, Packet, QoS, SubscribeReasonCode,
};
use url::Url;

use crate::constants::defaults;

use super::bus::{BusClient, BusError, BusMessage};

const SCHEME_TCP: &str = "tcp";
const SCHEME_MQTT: &str = "mqtt";
const WILDCARD_TOPIC: &str = "#";

pub fn get_rand_client_id(prefix: Option<&str>) -> String {
    const RAND_ID_BYTES: usize = 3;
    let randhex = hex::encode(rand::random::<[u8; RAND_ID_BYTES]>());

    if let Some(pref) = prefix {
        format!("{pref}-{randhex}")
    } else {
        randhex
    }
}

/// Empty topic subscribes to everything
pub fn topic_filter(topic: &str) -> &str {
    if topic.is_empty() {
        WILDCARD_TOPIC
    } else {
        topic
    }
}

/// EdgeX message bus client over MQTT
///
/// The client handle and the event-loop connection sit behind separate
/// locks: `receive` holds the connection while blocked, `close` only needs
/// the client.
pub struct MqttBus {
    client_prefix: String,
    client: Mutex<Option<Client>>,
    connection: Mutex<Option<Connection>>,
    pending: Mutex<VecDeque<BusMessage>>,
}

impl MqttBus {
    pub fn new() -> Self {
        Self::with_client_prefix(defaults::MQTT_CLIENT_PREFIX)
    }

    pub fn with_client_prefix(prefix: impl Into<String>) -> Self {
        Self {
            client_prefix: prefix.into(),
            client: Mutex::new(None),
            connection: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
        }
    }
}

impl Default for MqttBus {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Split a bus URI into the broker host and port
pub fn broker_address(uri: &str) -> Result<(String, u16), BusError> {
    let url = Url::parse(uri)?;
    match url.scheme() {
        SCHEME_TCP | SCHEME_MQTT => {}
        other => return Err(BusError::UnsupportedProtocol(other.to_string())),
    }
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| BusError::MissingHost(uri.to_string()))?;
    Ok((host.to_string(), url.port().unwrap_or(defaults::PORT)))
}

impl BusClient for MqttBus {
    fn dial(&self, uri: &str) -> Result<(), BusError> {
        let (host, port) = broker_address(uri)?;
        let client_id = get_rand_client_id(Some(&self.client_prefix));
        log::info!("Establishing MQTT connection to {host}:{port} as {client_id}");

        let mut mqttoptions = MqttOptions::new(client_id, host, port);
        // Keep the subscription on the broker across the event loop's reconnects
        mqttoptions.set_clean_session(false);
        let (client, mut connection) = Client::new(mqttoptions, defaults::MQTT_REQUEST_CAP);

        loop {
            match connection.recv() {
                Ok(Ok(Event::Incoming(Packet::ConnAck(ack)))) => {
                    log::debug!("Connected: {:?}", ack);
                    break;
                }
                Ok(Ok(notification)) => log::trace!("Notification = {:?}", notification),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(BusError::Closed),
            }
        }

        *lock(&self.client) = Some(client);
        *lock(&self.connection) = Some(connection);
        Ok(())
    }

    fn set_subscription_filter(&self, topic: &str) -> Result<(), BusError> {
        let filter = topic_filter(topic);
        log::info!("Subscribing to {}", filter);
        lock(&self.client)
            .as_mut()
            .ok_or(BusError::NotConnected)?
            .subscribe(filter, QoS::AtMostOnce)?;

        let mut guard = lock(&self.connection);
        let connection = guard.as_mut().ok_or(BusError::NotConnected)?;
        loop {
            match connection.recv() {
                Ok(Ok(Event::Incoming(Packet::SubAck(ack)))) => {
                    if ack
                        .return_codes
                        .iter()
                        .any(|code| matches!(code, SubscribeReasonCode::Failure))
                    {
                        return Err(BusError::SubscriptionRejected(filter.to_string()));
                    }
                    return Ok(());
                }
                // Retained or queued messages may overtake the acknowledgement
                Ok(Ok(Event::Incoming(Packet::Publish(p)))) => {
                    lock(&self.pending).push_back(BusMessage::single(p.payload.to_vec()));
                }
                Ok(Ok(notification)) => log::trace!("Notification = {:?}", notification),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(BusError::Closed),
            }
        }
    }

    fn receive(&self) -> Result<BusMessage, BusError> {
        if let Some(msg) = lock(&self.pending).pop_front() {
            return Ok(msg);
        }

        let mut guard = lock(&self.connection);
        let connection = guard.as_mut().ok_or(BusError::NotConnected)?;
        loop {
            match connection.recv() {
                Ok(Ok(Event::Incoming(Packet::Publish(p)))) => {
                    log::trace!("Received {} bytes on {}", p.payload.len(), p.topic);
                    return Ok(BusMessage::single(p.payload.to_vec()));
                }
                Ok(Ok(Event::Outgoing(Outgoing::Disconnect))) => return Err(BusError::Closed),
                Ok(Ok(notification)) => log::trace!("Notification = {:?}", notification),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(BusError::Closed),
            }
        }
    }

    fn close(&self) -> Result<(), BusError> {
        if let Some(mut client) = lock(&self.client).take() {
            log::debug!("Disconnecting MQTT client");
            client.disconnect()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rand_client_id() {
        let id = get_rand_client_id(Some("edgex"));
        assert!(id.starts_with("edgex-"));
        assert_eq!(id.len(), "edgex-".len() + 6);
        assert_eq!(get_rand_client_id(None).len(), 6);
    }

    #[test]
    fn test_topic_filter() {
        assert_eq!(topic_filter(""), "#");
        assert_eq!(topic_filter("edgex/events/#"), "edgex/events/#");
    }

    #[test]
    fn test_broker_address() {
        assert_eq!(
            broker_address("tcp://localhost:5563").unwrap(),
            ("localhost".to_string(), 5563)
        );
        assert_eq!(
            broker_address("mqtt://10.0.0.2:1883").unwrap(),
            ("10.0.0.2".to_string(), 1883)
        );
    }

    #[test]
    fn test_broker_address_rejects_other_protocols() {
        assert!(matches!(
            broker_address("ipc://localhost:5563"),
            Err(BusError::UnsupportedProtocol(p)) if p == "ipc"
        ));
        assert!(matches!(
            broker_address("not a uri"),
            Err(BusError::InvalidUri(_))
        ));
    }

    #[test]
    fn test_receive_before_dial() {
        let bus = MqttBus::new();
        assert!(matches!(bus.receive(), Err(BusError::NotConnected)));
        assert!(matches!(
            bus.set_subscription_filter(""),
            Err(BusError::NotConnected)
        ));
        assert!(bus.close().is_ok());
    }

    #[test]
    fn test_dial_unreachable_broker() {
        // Nothing listens on port 1 of the loopback interface
        let bus = MqttBus::new();
        assert!(bus.dial("tcp://127.0.0.1:1").is_err());
    }
}
