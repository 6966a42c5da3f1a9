use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ScriptValue>),
    Map(BTreeMap<String, ScriptValue>),
}

impl ScriptValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ScriptValue]> {
        match self {
            Self::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ScriptValue>> {
        match self {
            Self::Map(values) => Some(values),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn serializes_untagged_json_shapes() {
        let value = ScriptValue::Map(BTreeMap::from([
            ("flag".to_string(), ScriptValue::Bool(true)),
            ("missing".to_string(), ScriptValue::Null),
            (
                "names".to_string(),
                ScriptValue::List(vec![
                    ScriptValue::String("a".to_string()),
                    ScriptValue::Number(2.0),
                ]),
            ),
        ]));
        let encoded = serde_json::to_string(&value).expect("value should serialize");
        assert_eq!(encoded, r#"{"flag":true,"missing":null,"names":["a",2.0]}"#);
    }

    #[test]
    fn deserializes_untagged_json_shapes() {
        let value: ScriptValue = serde_json::from_str(r#"{"n":null,"xs":[1,"two",false]}"#)
            .expect("json should deserialize");
        let map = value.as_map().expect("top-level value should be a map");
        assert!(map["n"].is_null());
        let list = map["xs"].as_list().expect("xs should be a list");
        assert_eq!(list[0].as_number(), Some(1.0));
        assert_eq!(list[1].as_string(), Some("two"));
        assert_eq!(list[2].as_bool(), Some(false));
    }

    #[test]
    fn reports_type_names() {
        assert_eq!(ScriptValue::Null.type_name(), "null");
        assert_eq!(ScriptValue::Bool(false).type_name(), "boolean");
        assert_eq!(ScriptValue::Number(1.5).type_name(), "number");
        assert_eq!(ScriptValue::String(String::new()).type_name(), "string");
        assert_eq!(ScriptValue::List(Vec::new()).type_name(), "list");
        assert_eq!(ScriptValue::Map(BTreeMap::new()).type_name(), "map");
    }
}
