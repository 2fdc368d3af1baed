// 💾 Instance - a named, persisted priority-list configuration
//
// The data blob is opaque JSON owned by the caller. The only field this
// crate reads or writes is `pokemon_ids`; everything else is carried through.

use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only instance type the editor lists
pub const INSTANCE_TYPE: &str = "pokemon_iv";

/// Blob field holding the ordered id list
pub const POKEMON_IDS_KEY: &str = "pokemon_ids";

/// Row of the instance list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

impl Instance {
    pub fn summary(&self) -> InstanceSummary {
        InstanceSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Older rows hold the blob as a JSON-encoded string; decode it once more.
pub fn normalize_blob(blob: Value) -> Result<Value, ClientError> {
    match blob {
        Value::String(raw) => {
            serde_json::from_str(&raw).map_err(|err| ClientError::Decode(err.to_string()))
        }
        other => Ok(other),
    }
}

/// Extract `pokemon_ids`. Numeric ids are accepted and stringified.
pub fn pokemon_ids(blob: &Value) -> Result<Vec<String>, ClientError> {
    let ids = blob
        .get(POKEMON_IDS_KEY)
        .and_then(Value::as_array)
        .ok_or(ClientError::MissingPokemonIds)?;

    ids.iter()
        .map(|id| match id {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(ClientError::MissingPokemonIds),
        })
        .collect()
}

/// Overlay `pokemon_ids` onto an existing blob, keeping every other field.
/// A non-object blob is replaced by a fresh object.
pub fn with_pokemon_ids(blob: Value, ids: &[String]) -> Value {
    let mut object = match blob {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    object.insert(POKEMON_IDS_KEY.to_string(), Value::from(ids.to_vec()));
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_double_encoded_blob() {
        let legacy = Value::String(r#"{"pokemon_ids":["3","1"]}"#.to_string());
        assert_eq!(normalize_blob(legacy).unwrap(), json!({"pokemon_ids": ["3", "1"]}));

        let plain = json!({"pokemon_ids": ["1"]});
        assert_eq!(normalize_blob(plain.clone()).unwrap(), plain);

        assert!(normalize_blob(Value::String("not json".into())).is_err());
    }

    #[test]
    fn test_pokemon_ids_extraction() {
        assert_eq!(
            pokemon_ids(&json!({"pokemon_ids": ["3", 1, "2"]})).unwrap(),
            vec!["3", "1", "2"]
        );
        assert!(matches!(
            pokemon_ids(&json!({"other": true})),
            Err(ClientError::MissingPokemonIds)
        ));
        assert!(pokemon_ids(&json!({"pokemon_ids": [null]})).is_err());
    }

    #[test]
    fn test_overlay_preserves_other_fields() {
        let blob = json!({"pokemon_ids": ["1"], "min_iv": 90, "notify": {"discord": true}});
        let merged = with_pokemon_ids(blob, &["2".to_string(), "1".to_string()]);

        assert_eq!(
            merged,
            json!({"pokemon_ids": ["2", "1"], "min_iv": 90, "notify": {"discord": true}})
        );
        assert_eq!(
            with_pokemon_ids(Value::Null, &["1".to_string()]),
            json!({"pokemon_ids": ["1"]})
        );
    }

    #[test]
    fn test_instance_type_field_name() {
        let instance = Instance {
            id: 7,
            name: "Hundos".to_string(),
            kind: INSTANCE_TYPE.to_string(),
            data: json!({}),
        };
        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(value["type"], "pokemon_iv");
        assert_eq!(instance.summary(), InstanceSummary { id: 7, name: "Hundos".to_string() });
    }
}
