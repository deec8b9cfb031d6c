//! The editable substrate record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The two user-editable fields of `substrate1`.
///
/// Writing a record replaces the whole object at the fixed path, so any
/// other field the original record carried is dropped. Values are kept as
/// whatever JSON the caller sent. A field left as `None` is omitted from the
/// written object entirely; an explicit `null` is written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstrateRecord {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub thickness: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub material: Option<Value>,
}

impl SubstrateRecord {
    pub fn new(thickness: impl Into<Value>, material: impl Into<Value>) -> Self {
        Self {
            thickness: Some(thickness.into()),
            material: Some(material.into()),
        }
    }
}

/// Deserialize a key that is present (including `null`) as `Some`.
///
/// Use with `#[serde(default)]` so that only an absent key becomes `None`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
