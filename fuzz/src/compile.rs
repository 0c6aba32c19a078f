#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let engine = stash::Engine::new();
    let template = engine.compile(data);
    assert_eq!(template.source(), data);
    // Malformed directives are kept as text, so rendering may only fail by
    // nesting too deeply.
    if let Err(err) = template.render_from(&stash::Value::None).to_string() {
        assert!(err.is_max_depth(), "{:?}", err);
    }
});
