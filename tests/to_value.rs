#![cfg(feature = "serde")]

use std::collections::BTreeMap;

use serde::Serialize;

use stash::{to_value, value, Engine, Value};

#[derive(Serialize)]
struct Page {
    title: String,
    draft: bool,
    tags: Vec<&'static str>,
    author: Option<Author>,
    kind: Kind,
}

#[derive(Serialize)]
struct Author {
    name: &'static str,
    posts: u32,
}

#[derive(Serialize)]
enum Kind {
    Article,
    Link { href: &'static str },
}

#[test]
fn to_value_struct() {
    let page = Page {
        title: "Hello".into(),
        draft: false,
        tags: vec!["a", "b"],
        author: Some(Author { name: "Jane", posts: 3 }),
        kind: Kind::Article,
    };
    assert_eq!(
        to_value(page).unwrap(),
        value! {
            title: "Hello",
            draft: false,
            tags: ["a", "b"],
            author: { name: "Jane", posts: 3 },
            kind: "Article",
        }
    );
}

#[test]
fn to_value_struct_variant_and_missing_option() {
    let page = Page {
        title: String::new(),
        draft: true,
        tags: Vec::new(),
        author: None,
        kind: Kind::Link { href: "/x" },
    };
    assert_eq!(
        to_value(page).unwrap(),
        value! {
            title: "",
            draft: true,
            tags: [],
            author: None,
            kind: { Link: { href: "/x" } },
        }
    );
}

#[test]
fn to_value_numbers() {
    assert_eq!(to_value(-5_i8).unwrap(), Value::Integer(-5));
    assert_eq!(to_value(2.5_f32).unwrap(), Value::Float(2.5));
    assert_eq!(to_value(i64::MAX as u64).unwrap(), Value::Integer(i64::MAX));
    assert_eq!(to_value(u64::MAX).unwrap(), Value::Float(u64::MAX as f64));
}

#[test]
fn to_value_integer_map_keys_become_strings() {
    let map = BTreeMap::from([(1, "a"), (2, "b")]);
    assert_eq!(to_value(map).unwrap(), Value::from([("1", "a"), ("2", "b")]));
}

#[test]
fn to_value_optional_map_keys_fail() {
    let map = BTreeMap::from([(Some("a"), "b")]);
    assert_eq!(
        to_value(map).unwrap_err().to_string(),
        "key must be a string"
    );
}

#[test]
fn to_value_evaluates_host_values() {
    let data = value! {
        name: (Value::from_fn(|| Ok(Value::from("computed")))),
        items: (Value::from_iter_fn(|| vec![Value::from(1), Value::from(2)])),
    };
    assert_eq!(
        to_value(&data).unwrap(),
        value! { name: "computed", items: [1, 2] }
    );
}

#[test]
fn to_value_host_value_error() {
    let data = value! { broken: (Value::from_fn(|| Err("database is down".into()))) };
    assert_eq!(
        to_value(&data).unwrap_err().to_string(),
        "database is down"
    );
}

#[test]
fn to_value_empty_collections_render_falsy() {
    #[derive(Serialize)]
    struct Data {
        list: Vec<u8>,
        map: BTreeMap<String, u8>,
    }
    let result = Engine::new()
        .compile("{{if list}}L{{else}}-{{end}}{{if map}}M{{else}}-{{end}}")
        .render(Data {
            list: Vec::new(),
            map: BTreeMap::new(),
        })
        .to_string()
        .unwrap();
    assert_eq!(result, "--");
}
