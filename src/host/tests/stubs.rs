use crate::host::stubs::{EchoUrlFetcher, MemoryThings, RecordingGreeter};
use crate::host::{Greeter, ThingRegistry, UrlFetcher};
use crate::runtime::value::ScriptValue;
use crate::runtime::HostError;

#[test]
fn test_echo_fetcher_formats_any_value() {
    let fetcher = EchoUrlFetcher;
    assert_eq!(
        fetcher.get_url(&ScriptValue::from("http://x")).unwrap(),
        ScriptValue::from("get_url http://x")
    );
}

#[test]
fn test_custom_greeting() {
    let greeter = RecordingGreeter::new("hi");
    assert_eq!(greeter.hello("bob").unwrap(), ScriptValue::from("hi bob"));
    greeter.hello("ann").unwrap();
    assert_eq!(greeter.greeted(), vec!["bob".to_string(), "ann".to_string()]);
}

#[test]
fn test_cmd_on_unknown_thing_is_refused() {
    let things = MemoryThings::default();
    assert_eq!(
        things.cmd_thing_state("ghost", "on", 0, ScriptValue::Bool(true)),
        Ok(false)
    );
    assert_eq!(
        things.get_thing_state("ghost", "on", 0),
        Err(HostError::UnknownThing("ghost".to_string()))
    );
}

#[test]
fn test_missing_state_is_undefined() {
    let things = MemoryThings::default();
    things.set_state("lamp", "on", 1, ScriptValue::Bool(false));
    assert_eq!(things.get_thing_state("lamp", "on", 0), Ok(ScriptValue::Undefined));
    assert_eq!(things.get_thing_state("lamp", "on", 1), Ok(ScriptValue::Bool(false)));
}
