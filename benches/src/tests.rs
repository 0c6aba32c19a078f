use crate::context::{Context, User};
use crate::{Engine, Handlebars, Stash};

fn context() -> Context {
    let user = |name: &str, age, is_disabled| User {
        name: name.to_owned(),
        age,
        is_disabled,
        bio: String::from("{{name}} ({{age}}) of {{../../title}}"),
    };
    Context {
        title: "My awesome webpage!".to_owned(),
        users: vec![
            user("Nancy Wheeler", 17, false),
            user("Steve Harrington", 18, false),
            user("Billy Hargrove", 19, true),
        ],
    }
}

fn render<'a, E: Engine<'a>>(engine: &mut E, source: &'a str) -> String {
    engine.add_template("bench", source);
    engine.render("bench", &context())
}

#[test]
fn engines_agree() {
    let hbs = render(
        &mut Handlebars::new(),
        include_str!("../benchdata/handlebars.html"),
    );
    let stash = render(&mut Stash::new(), include_str!("../benchdata/stash.html"));
    assert_eq!(hbs, stash);
    assert!(stash.contains("<li>Steve Harrington (18)</li>"));
    assert!(!stash.contains("Billy"));
}

#[test]
fn stash_recursive() {
    let result = render(
        &mut Stash::new(),
        include_str!("../benchdata/recursive.html"),
    );
    assert_eq!(
        result,
        "<ul>\
         <li>Nancy Wheeler (17) of My awesome webpage!</li>\
         <li>Steve Harrington (18) of My awesome webpage!</li>\
         <li>Billy Hargrove (19) of My awesome webpage!</li>\
         </ul>\n"
    );
}
