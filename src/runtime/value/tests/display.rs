use crate::runtime::value::{ScriptValue, ValueType};

#[test]
fn test_display_primitives() {
    assert_eq!(ScriptValue::Undefined.to_string(), "undefined");
    assert_eq!(ScriptValue::Null.to_string(), "null");
    assert_eq!(ScriptValue::Bool(false).to_string(), "false");
    assert_eq!(ScriptValue::Int(-3).to_string(), "-3");
    assert_eq!(ScriptValue::Float(1.5).to_string(), "1.5");
}

#[test]
fn test_display_string_is_bare() {
    assert_eq!(ScriptValue::from("abc").to_string(), "abc");
}

#[test]
fn test_display_list() {
    let list = ScriptValue::from(vec![ScriptValue::Int(1), ScriptValue::from("two")]);
    assert_eq!(list.to_string(), "[1, two]");
    assert_eq!(ScriptValue::List(vec![]).to_string(), "[]");
}

#[test]
fn test_value_type_display() {
    assert_eq!(ValueType::String.to_string(), "string");
    assert_eq!(ValueType::Undefined.to_string(), "undefined");
}

#[test]
fn test_display_function() {
    let func = crate::runtime::value::ScriptFunction::new("on_change", |_| ScriptValue::Undefined);
    let value = ScriptValue::from(func);
    assert_eq!(value.to_string(), "[function on_change]");
    assert_eq!(value.value_type(), ValueType::Function);
}
