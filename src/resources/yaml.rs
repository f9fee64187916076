//! YAML to property tree conversion
//!
//! YAML documents are parsed with `serde_yaml` and converted into the common
//! JSON-shaped tree. Tagged values (CloudFormation short forms such as
//! `!Ref Bucket`) become single-key maps in their long form.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use serde_yaml::value::TaggedValue;

/// Convert a YAML value into a property tree
pub(crate) fn to_property_tree(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => number(&n),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            Value::Array(items.into_iter().map(to_property_tree).collect())
        }
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_text(key), to_property_tree(value));
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => {
            let TaggedValue { tag, value: inner } = *tagged;
            let tag = tag.to_string();
            let name = tag.trim_start_matches('!');
            let long_form = intrinsic_name(name);
            let converted = if long_form == "Fn::GetAtt" {
                // `!GetAtt Bucket.Arn` is shorthand for ["Bucket", "Arn"]
                match inner {
                    YamlValue::String(s) => match s.split_once('.') {
                        Some((resource, attribute)) => Value::Array(vec![
                            Value::String(resource.to_string()),
                            Value::String(attribute.to_string()),
                        ]),
                        None => Value::String(s),
                    },
                    other => to_property_tree(other),
                }
            } else {
                to_property_tree(inner)
            };
            let mut map = Map::new();
            map.insert(long_form, converted);
            Value::Object(map)
        }
    }
}

fn number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn key_text(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_json::to_string(&to_property_tree(other)).unwrap_or_default(),
    }
}

/// `Ref` and `Condition` keep their name; everything else gets the `Fn::` prefix
fn intrinsic_name(tag: &str) -> String {
    match tag {
        "Ref" | "Condition" => tag.to_string(),
        other => format!("Fn::{}", other),
    }
}
