use serde::{Deserialize, Deserializer, Serialize};

/// A single telemetry value as published on the EdgeX message bus
///
/// Every field is optional on the wire; anything missing or `null` decodes to
/// its empty/zero value. Timestamps are epoch milliseconds.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Reading {
    #[serde(alias = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(alias = "Value", deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(alias = "Created", deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(alias = "Modified", deserialize_with = "null_as_default")]
    pub modified: i64,
    #[serde(alias = "Origin", deserialize_with = "null_as_default")]
    pub origin: i64,
    #[serde(alias = "Pushed", deserialize_with = "null_as_default")]
    pub pushed: i64,
    #[serde(alias = "Device", deserialize_with = "null_as_default")]
    pub device: String,
}

/// Telemetry envelope carrying the readings of one device
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Event {
    #[serde(alias = "Id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(alias = "Device", deserialize_with = "null_as_default")]
    pub device: String,
    #[serde(alias = "Created", deserialize_with = "null_as_default")]
    pub created: i64,
    #[serde(alias = "Modified", deserialize_with = "null_as_default")]
    pub modified: i64,
    #[serde(alias = "Origin", deserialize_with = "null_as_default")]
    pub origin: i64,
    #[serde(alias = "Pushed", deserialize_with = "null_as_default")]
    pub pushed: i64,
    #[serde(alias = "Readings", deserialize_with = "null_as_default")]
    pub readings: Vec<Reading>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    pub fn from_frame(frame: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(frame)
    }
}
