// this file contains definitions for the JSON types encountered in the map server's raw_data snapshot

use std::collections::BTreeMap;
use std::{fs, path::Path};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::FinderError;

/// the `raw_data` response the map page polls, as far as the finder lists need it
#[derive(Deserialize, Default, Debug)]
pub struct JsonSnapshot {
    #[serde(default, deserialize_with = "records")]
    pub pokestops: Vec<JsonPokestop>,
    #[serde(default, deserialize_with = "records")]
    pub gyms: Vec<JsonGym>,
}

impl JsonSnapshot {
    pub fn from_file(path: &Path) -> Result<Self, FinderError> {
        let text = fs::read_to_string(path).map_err(|source| FinderError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FinderError::Deserialize {
            context: path.display().to_string(),
            source,
        })
    }
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct JsonPokestop {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// epoch milliseconds; anything truthy means the stop is lured
    pub lure_expiration: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pokemon: Vec<Value>,
    pub quest: Option<JsonQuest>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct JsonQuest {
    /// reward type; the server stores it under `type`
    #[serde(rename = "type")]
    pub reward_type: Option<Value>,
    pub quest_text: Option<String>,
    pub reward_text: Option<String>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct JsonGym {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_id: u8,
    pub slots_available: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_in_battle: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_ex_raid_eligible: bool,
    pub raid: Option<JsonRaid>,
}

#[derive(Deserialize, Default, Debug, Clone)]
pub struct JsonRaid {
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: i64,
    /// epoch milliseconds
    pub start: Option<i64>,
    /// epoch milliseconds
    pub end: Option<i64>,
    pub pokemon_id: Option<u16>,
    pub form: Option<i64>,
}

/// JavaScript truthiness, which is how the page decides whether a loosely-typed field is "set"
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// the server sends each collection as an object keyed by id; older payloads use a plain array
#[derive(Deserialize)]
#[serde(untagged)]
enum Records<T> {
    Keyed(BTreeMap<String, T>),
    Listed(Vec<T>),
}

fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Records<T>>::deserialize(deserializer)? {
        Some(Records::Keyed(map)) => map.into_values().collect(),
        Some(Records::Listed(list)) => list,
        None => Vec::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
