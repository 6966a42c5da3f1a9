use serde::{Deserialize, Serialize};

use crate::value::ScriptValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    pub container: Option<ScriptValue>,
    pub context: Option<ScriptValue>,
    pub namespace: Option<ScriptValue>,
    pub script: Option<ScriptValue>,
    pub traverse_subpath: Option<ScriptValue>,
    pub state: Option<ScriptValue>,
}

impl Bindings {
    pub const SLOT_NAMES: [&'static str; 6] = [
        "container",
        "context",
        "namespace",
        "script",
        "traverse_subpath",
        "state",
    ];

    // A recognized slot always yields a value, Null when nothing was bound.
    pub fn slot(&self, name: &str) -> Option<ScriptValue> {
        let slot = match name {
            "container" => &self.container,
            "context" => &self.context,
            "namespace" => &self.namespace,
            "script" => &self.script,
            "traverse_subpath" => &self.traverse_subpath,
            "state" => &self.state,
            _ => return None,
        };
        Some(slot.clone().unwrap_or(ScriptValue::Null))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GlobalAccess {
    Injected,
    SlotOrLiteral { target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureParam {
    pub name: String,
    pub default: ScriptValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<SignatureParam>,
    pub catch_all: Option<String>,
}

impl Signature {
    pub fn declares(&self, name: &str) -> bool {
        self.params.iter().any(|param| param.name == name)
    }
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn unset_slots_resolve_to_null() {
        let bindings = Bindings::default();
        for name in Bindings::SLOT_NAMES {
            assert_eq!(bindings.slot(name), Some(ScriptValue::Null));
        }
    }

    #[test]
    fn set_slots_resolve_to_their_values() {
        let bindings = Bindings {
            context: Some(ScriptValue::String("here".to_string())),
            ..Bindings::default()
        };
        assert_eq!(
            bindings.slot("context"),
            Some(ScriptValue::String("here".to_string()))
        );
    }

    #[test]
    fn unknown_names_are_not_slots() {
        let bindings = Bindings::default();
        assert_eq!(bindings.slot("contents"), None);
        assert_eq!(bindings.slot(""), None);
    }

    #[test]
    fn signature_declares_checks_parameter_names_only() {
        let signature = Signature {
            params: vec![SignatureParam {
                name: "pfoo".to_string(),
                default: ScriptValue::Null,
            }],
            catch_all: Some("rest".to_string()),
        };
        assert!(signature.declares("pfoo"));
        assert!(!signature.declares("rest"));
        assert!(!signature.declares("pbar"));
    }
}
