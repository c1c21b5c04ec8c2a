use serde_json::json;

pub const EXAMPLE_FRAME: &str = r#"{"id":"e1","device":"sensor1","readings":[{"name":"temp","value":"42"},{"name":"","value":"ignored"}]}"#;

pub const MALFORMED_FRAME: &str = r#"{"id":"e2","device":"sensor1","readings":[{"name":"temp""#;

pub const UNNAMED_READINGS_FRAME: &str =
    r#"{"id":"e3","device":"sensor1","readings":[{"name":"","value":"1"},{"value":"2"}]}"#;

pub const FULL_FRAME: &str = r#"
{
    "id": "8b2e4ea6-0a48-4ae5-8e44-0c4a5a0e8e0c",
    "device": "Random-Integer-Device",
    "created": 1594975851910,
    "modified": 1594975851910,
    "origin": 1594975851908000000,
    "pushed": 0,
    "readings": [
        {
            "id": "a1d7e7c3-6f1c-4c66-9d63-e8c2a4e4f5a1",
            "created": 1594975851910,
            "modified": 1594975851910,
            "origin": 1594975851908000000,
            "pushed": 0,
            "device": "Random-Integer-Device",
            "name": "Int8",
            "value": "-93"
        },
        {
            "id": "b2e8f8d4-7a2d-5d77-ae74-f9d3b5f5a6b2",
            "created": 1594975851911,
            "device": "Random-Integer-Device",
            "name": "Float32",
            "value": "1.5"
        },
        {
            "device": "Random-Integer-Device",
            "name": "Bool",
            "value": "true"
        },
        {
            "device": "Random-Integer-Device",
            "name": "Label",
            "value": "hello"
        }
    ]
}
"#;

/// Frame for an event whose readings are given as (name, value) pairs
pub fn event_frame(id: &str, device: &str, readings: &[(&str, &str)]) -> Vec<u8> {
    let readings: Vec<_> = readings
        .iter()
        .map(|(name, value)| json!({"name": name, "value": value, "device": device}))
        .collect();
    serde_json::to_vec(&json!({"id": id, "device": device, "readings": readings})).unwrap()
}
