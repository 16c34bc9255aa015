use std::rc::Rc;

use crate::host::HostBindings;
use crate::runtime::hostfunc::HostFunctionRegistry;
use crate::runtime::scheduler::Scheduler;
use crate::runtime::value::ScriptValue;
use crate::runtime::HostError;
use crate::script::{format_line, Console, ModuleImports, OutputSlot, RecordingConsole, ScriptContext};

#[test]
fn test_output_slot_starts_null() {
    let slot = OutputSlot::default();
    assert_eq!(slot.get(), ScriptValue::Null);
    assert_eq!(slot.describe(), "bfalse,ffalse,ifalse,sfalse,null");
}

#[test]
fn test_output_slot_read_right_after_write() {
    let slot = OutputSlot::default();
    slot.set(ScriptValue::from("abc"));
    assert_eq!(slot.get(), ScriptValue::from("abc"));
    assert_eq!(slot.describe(), "bfalse,ffalse,ifalse,strue,abc");
}

#[test]
fn test_output_slot_clones_share_cell() {
    let slot = OutputSlot::default();
    let other = slot.clone();
    other.set(ScriptValue::Int(3));
    assert_eq!(slot.get(), ScriptValue::Int(3));
    assert_eq!(slot.describe(), "bfalse,ffalse,itrue,sfalse,3");
}

#[test]
fn test_imports() {
    let imports = ModuleImports::new().with("a_string", "from module");
    assert_eq!(imports.get("a_string"), ScriptValue::from("from module"));
    assert_eq!(imports.get("missing"), ScriptValue::Undefined);
}

#[test]
fn test_format_line_joins_with_spaces() {
    let line = format_line(&[
        ScriptValue::from("get_url: "),
        ScriptValue::from("get_url 17"),
    ]);
    assert_eq!(line, "get_url:  get_url 17");
    assert_eq!(format_line(&[]), "");
}

#[test]
fn test_recording_console() {
    let console = RecordingConsole::new();
    console.log(&[ScriptValue::from("Hello World"), ScriptValue::Int(1)]);
    assert_eq!(console.lines(), vec!["Hello World 1".to_string()]);
}

#[test]
fn test_context_dispatches_to_globals() {
    let console = Rc::new(RecordingConsole::new());
    let ctx = ScriptContext::new(Scheduler::new(), HostBindings::stubs().registry(), console.clone())
        .with_imports(ModuleImports::new().with("a_string", "x"));

    assert_eq!(ctx.import("a_string"), ScriptValue::from("x"));
    assert_eq!(ctx.call("ruletype", &[]), Ok(ScriptValue::from("condition")));
    ctx.log(&[ScriptValue::from("logged")]);
    assert_eq!(console.lines(), vec!["logged".to_string()]);
}

#[test]
fn test_context_without_globals() {
    let ctx = ScriptContext::new(
        Scheduler::new(),
        HostFunctionRegistry::new(),
        Rc::new(RecordingConsole::new()),
    );
    assert_eq!(
        ctx.call("hello", &[ScriptValue::from("friend")]),
        Err(HostError::UndefinedFunction("hello".to_string()))
    );
}
