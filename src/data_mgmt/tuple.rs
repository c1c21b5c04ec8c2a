use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::keys;

use super::models::{Event, Reading};
use super::value::RtValue;

/// Provenance of a single reading
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ReadingMeta {
    pub id: String,
    pub created: i64,
    pub modified: i64,
    pub origin: i64,
    pub pushed: i64,
    pub device: String,
}

impl From<&Reading> for ReadingMeta {
    fn from(r: &Reading) -> Self {
        Self {
            id: r.id.clone(),
            created: r.created,
            modified: r.modified,
            origin: r.origin,
            pushed: r.pushed,
            device: r.device.clone(),
        }
    }
}

/// Entry of the tuple metadata map
///
/// Reading names map to [`ReadingMeta`]; the event-level keys (`id`,
/// `device`, `created`, ...) map to plain text or timestamps.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MetaValue {
    Reading(ReadingMeta),
    Text(String),
    Timestamp(i64),
}

/// Record handed to the downstream pipeline, one per processed event
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SourceTuple {
    pub message: BTreeMap<String, RtValue>,
    pub meta: BTreeMap<String, MetaValue>,
}

impl SourceTuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&mut self, name: String, value: RtValue) {
        self.message.insert(name, value);
    }

    pub fn set_reading_meta(&mut self, reading: &Reading) {
        self.meta
            .insert(reading.name.clone(), MetaValue::Reading(reading.into()));
    }

    /// Merge the event-level provenance into the metadata map
    ///
    /// Applied after the readings, so a reading named like one of the event
    /// keys loses its metadata entry to the event value.
    pub fn set_event_meta(&mut self, event: &Event) {
        let entries = [
            (keys::META_ID, MetaValue::Text(event.id.clone())),
            (keys::META_PUSHED, MetaValue::Timestamp(event.pushed)),
            (keys::META_DEVICE, MetaValue::Text(event.device.clone())),
            (keys::META_CREATED, MetaValue::Timestamp(event.created)),
            (keys::META_MODIFIED, MetaValue::Timestamp(event.modified)),
            (keys::META_ORIGIN, MetaValue::Timestamp(event.origin)),
        ];
        for (key, value) in entries {
            self.meta.insert(key.to_string(), value);
        }
    }

    pub fn has_values(&self) -> bool {
        !self.message.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&RtValue> {
        self.message.get(name)
    }

    pub fn reading_meta(&self, name: &str) -> Option<&ReadingMeta> {
        match self.meta.get(name) {
            Some(MetaValue::Reading(meta)) => Some(meta),
            _ => None,
        }
    }
}
