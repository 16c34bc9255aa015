//! End-to-end runs of the hello script through the public API

use std::rc::Rc;
use std::time::Instant;

use ohx_script::host::stubs::{FailingUrlFetcher, RecordingGreeter};
use ohx_script::runtime::value::ScriptValue;
use ohx_script::script::RecordingConsole;
use ohx_script::util::config::{parse_config, HostConfig};
use ohx_script::{bindings_from_config, run_hello};

fn quick_config() -> HostConfig {
    let mut config = HostConfig::default();
    config.script.delay_ms = 20;
    config.script.a_string = "abc-import".to_string();
    config
}

#[test]
fn test_run_ends_with_timeout() {
    let config = quick_config();
    let console = Rc::new(RecordingConsole::new());

    let started = Instant::now();
    let report = run_hello(&config, &bindings_from_config(&config), console.clone()).unwrap();

    assert!(started.elapsed().as_millis() >= 20);
    assert_eq!(report.output, ScriptValue::from("timeout"));
    assert_eq!(report.describe(), "bfalse,ffalse,ifalse,strue,timeout");
    assert_eq!(report.stats.timers_fired, 1);
    assert_eq!(report.stats.outstanding(), 0);
    assert_eq!(
        console.lines(),
        vec![
            "get_url:  get_url 17",
            "hello friend",
            "notifyOnThingStatesChange notifyOnThingStatesChange thing_id false",
            "Hello World abc-import",
            "timeout",
        ]
    );
}

#[test]
fn test_configured_greeting() {
    let config = parse_config("[script]\ndelay_ms = 0\n[host]\ngreeting = \"hi\"\n").unwrap();
    let console = Rc::new(RecordingConsole::new());
    run_hello(&config, &bindings_from_config(&config), console.clone()).unwrap();
    assert_eq!(console.lines()[1], "hi friend");
}

#[test]
fn test_greeter_sees_friend() {
    let config = quick_config();
    let greeter = Rc::new(RecordingGreeter::default());
    let bindings = bindings_from_config(&config).with_greeter(greeter.clone());

    run_hello(&config, &bindings, Rc::new(RecordingConsole::new())).unwrap();
    assert_eq!(greeter.greeted(), vec!["friend".to_string()]);
}

#[test]
fn test_failing_collaborator_aborts_run() {
    let config = quick_config();
    let console = Rc::new(RecordingConsole::new());
    let bindings =
        bindings_from_config(&config).with_url_fetcher(Rc::new(FailingUrlFetcher::new("boom")));

    let err = run_hello(&config, &bindings, console.clone()).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Hello script failed"), "{}", chain);
    assert!(chain.contains("get_url failed: boom"), "{}", chain);
    assert!(console.lines().is_empty());
}
