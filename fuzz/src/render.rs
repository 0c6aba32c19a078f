#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, Vec<(&str, &str)>, Value, bool)| {
    let (root, globals, value, ignore_undefined) = data;
    let mut engine = stash::Engine::new();
    for (name, source) in globals {
        engine.register_global_template(name, source);
    }
    engine.set_max_depth(16);
    let result = engine
        .compile(root)
        .render(&value)
        .ignore_undefined(ignore_undefined)
        .to_string();
    if let Err(err) = result {
        // Only the depth limit can fail a render of plain data.
        assert!(err.is_max_depth(), "{:?}", err);
    }
});
