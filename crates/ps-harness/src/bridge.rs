use std::collections::BTreeMap;

use ps_core::ScriptValue;
use rhai::{Array, Dynamic, ImmutableString, Map, FLOAT, INT};

use crate::error::PageScriptError;

pub(crate) fn value_to_dynamic(value: &ScriptValue) -> Dynamic {
    match value {
        ScriptValue::Null => Dynamic::UNIT,
        ScriptValue::Bool(value) => Dynamic::from_bool(*value),
        ScriptValue::Number(value) => Dynamic::from_float(*value as FLOAT),
        ScriptValue::String(value) => Dynamic::from(value.clone()),
        ScriptValue::List(values) => {
            let mut array = Array::new();
            for value in values {
                array.push(value_to_dynamic(value));
            }
            Dynamic::from_array(array)
        }
        ScriptValue::Map(values) => {
            let mut map = Map::new();
            for (key, value) in values {
                map.insert(key.clone().into(), value_to_dynamic(value));
            }
            Dynamic::from_map(map)
        }
    }
}

pub(crate) fn dynamic_to_value(value: Dynamic) -> Result<ScriptValue, PageScriptError> {
    if value.is::<()>() {
        return Ok(ScriptValue::Null);
    }
    if value.is::<bool>() {
        return Ok(ScriptValue::Bool(value.cast::<bool>()));
    }
    if value.is::<INT>() {
        return Ok(ScriptValue::Number(value.cast::<INT>() as f64));
    }
    if value.is::<FLOAT>() {
        return Ok(ScriptValue::Number(value.cast::<FLOAT>()));
    }
    if value.is::<ImmutableString>() {
        return Ok(ScriptValue::String(value.cast::<ImmutableString>().to_string()));
    }
    if value.is::<Array>() {
        let array = value.cast::<Array>();
        let mut out = Vec::with_capacity(array.len());
        for item in array {
            out.push(dynamic_to_value(item)?);
        }
        return Ok(ScriptValue::List(out));
    }
    if value.is::<Map>() {
        let map = value.cast::<Map>();
        let mut out = BTreeMap::new();
        for (key, value) in map {
            out.insert(key.to_string(), dynamic_to_value(value)?);
        }
        return Ok(ScriptValue::Map(out));
    }

    Err(PageScriptError::UnsupportedValue {
        type_name: value.type_name().to_string(),
    })
}

pub(crate) fn value_to_rhai_literal(value: &ScriptValue) -> String {
    match value {
        ScriptValue::Null => "()".to_string(),
        ScriptValue::Bool(value) => value.to_string(),
        ScriptValue::Number(value) => {
            if value.fract().abs() < f64::EPSILON {
                (*value as i64).to_string()
            } else {
                value.to_string()
            }
        }
        ScriptValue::String(value) => quote_string(value),
        ScriptValue::List(values) => format!(
            "[{}]",
            values
                .iter()
                .map(value_to_rhai_literal)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ScriptValue::Map(values) => {
            let entries = values
                .iter()
                .map(|(key, value)| {
                    format!("{}: {}", quote_string(key), value_to_rhai_literal(value))
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("#{{{}}}", entries)
        }
    }
}

fn quote_string(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
            .replace('\0', "\\0")
    )
}

#[cfg(test)]
mod bridge_tests {
    use super::*;

    #[test]
    fn unit_results_become_null() {
        assert_eq!(
            dynamic_to_value(Dynamic::UNIT).expect("unit should convert"),
            ScriptValue::Null
        );
    }

    #[test]
    fn integers_and_floats_both_become_numbers() {
        assert_eq!(
            dynamic_to_value(Dynamic::from_int(3)).expect("int should convert"),
            ScriptValue::Number(3.0)
        );
        assert_eq!(
            dynamic_to_value(Dynamic::from_float(2.5)).expect("float should convert"),
            ScriptValue::Number(2.5)
        );
    }

    #[test]
    fn containers_round_trip_through_dynamic() {
        let value = ScriptValue::Map(BTreeMap::from([
            (
                "xs".to_string(),
                ScriptValue::List(vec![ScriptValue::Null, ScriptValue::Bool(true)]),
            ),
            ("s".to_string(), ScriptValue::String("hi".to_string())),
        ]));
        let round_tripped =
            dynamic_to_value(value_to_dynamic(&value)).expect("round trip should convert");
        assert_eq!(round_tripped, value);
    }

    #[test]
    fn function_pointers_are_unsupported() {
        let pointer = rhai::FnPtr::new("callback").expect("fn pointer should build");
        let err = dynamic_to_value(Dynamic::from(pointer))
            .expect_err("fn pointer should not convert");
        assert!(matches!(err, PageScriptError::UnsupportedValue { .. }));
    }

    #[test]
    fn literals_collapse_whole_floats_to_integers() {
        assert_eq!(value_to_rhai_literal(&ScriptValue::Number(2.0)), "2");
        assert_eq!(value_to_rhai_literal(&ScriptValue::Number(2.5)), "2.5");
    }

    #[test]
    fn literals_render_null_and_containers() {
        assert_eq!(value_to_rhai_literal(&ScriptValue::Null), "()");
        assert_eq!(
            value_to_rhai_literal(&ScriptValue::List(vec![
                ScriptValue::Number(1.0),
                ScriptValue::String("a".to_string()),
            ])),
            "[1, \"a\"]"
        );
        assert_eq!(
            value_to_rhai_literal(&ScriptValue::Map(BTreeMap::from([(
                "k".to_string(),
                ScriptValue::Bool(false),
            )]))),
            "#{\"k\": false}"
        );
    }

    #[test]
    fn literals_escape_quotes_and_control_characters() {
        assert_eq!(
            value_to_rhai_literal(&ScriptValue::String("a\"b\\c\nd".to_string())),
            "\"a\\\"b\\\\c\\nd\""
        );
    }
}
