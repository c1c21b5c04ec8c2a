pub mod bus;
pub mod mqtt;

pub use bus::{BusClient, BusError, BusMessage};
pub use mqtt::MqttBus;
