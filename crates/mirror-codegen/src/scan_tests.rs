use indoc::indoc;

use crate::scan::scan;
use crate::test_utils::{catalog, config};

#[test]
fn keeps_visible_types_under_prefix() {
    let catalog = catalog(indoc! {r#"
        {"types": [
            { "name": "org.example.Zeta", "kind": "class" },
            { "name": "org.example.Alpha", "kind": "interface", "visibility": "package" },
            { "name": "org.example.Hidden", "kind": "class", "visibility": "private" },
            { "name": "org.example.Gen", "kind": "class", "synthetic": true },
            { "name": "org.example.Alpha$1", "kind": "class", "anonymous": true, "enclosing": "org.example.Alpha" },
            { "name": "org.other.Outside", "kind": "class" }
        ]}
    "#});

    let names: Vec<_> = scan(&catalog, &config())
        .into_iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["org.example.Alpha", "org.example.Zeta"]);
}

#[test]
fn nested_types_need_a_kept_enclosing_chain() {
    let catalog = catalog(indoc! {r#"
        {"types": [
            { "name": "org.example.Outer", "kind": "class" },
            { "name": "org.example.Outer$Inner", "kind": "class", "enclosing": "org.example.Outer" },
            { "name": "org.example.Secret", "kind": "class", "visibility": "private" },
            { "name": "org.example.Secret$Leak", "kind": "class", "enclosing": "org.example.Secret" },
            { "name": "org.example.Secret$Leak$Deeper", "kind": "class", "enclosing": "org.example.Secret$Leak" }
        ]}
    "#});

    let names: Vec<_> = scan(&catalog, &config())
        .into_iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["org.example.Outer", "org.example.Outer$Inner"]);
}

#[test]
fn subpackages_are_included() {
    let catalog = catalog(r#"{"types": [
        { "name": "org.example.deep.pkg.Thing", "kind": "record" },
        { "name": "org.examples.NotIt", "kind": "class" }
    ]}"#);

    let found = scan(&catalog, &config());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "org.example.deep.pkg.Thing");
}
