pub mod ai;
pub mod application;
pub mod interview;
pub mod profile;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    String(String),
    Int(i64),
    Null(()),
}

impl RawId {
    fn into_option(self) -> Option<String> {
        match self {
            RawId::String(s) => Some(s),
            RawId::Int(i) => Some(i.to_string()),
            RawId::Null(()) => None,
        }
    }
}

/// Ids are compared as strings; some backends hand them out as numbers.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default())
}

pub(crate) fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawId::deserialize(deserializer)?
        .into_option()
        .filter(|id| !id.is_empty()))
}
