use std::collections::HashMap;

use weft::{Error, Value, compile};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn does_not_touch_text_without_markers() {
    init_logs();
    let tmpl = compile("|| |    |").unwrap();
    assert_eq!(tmpl.render_empty().unwrap(), "|| |    |");
}

#[test]
fn errors_on_unterminated_marker() {
    // The closing brace is single, so the marker never terminates.
    let err = compile("{{test|< 5}").unwrap_err();
    assert!(matches!(err, Error::UnterminatedMarker(_)));
}

#[test]
fn errors_on_invalid_filter_segment() {
    // Rejected for its syntax alone, before any filter lookup could happen.
    let err = compile("{{test|< 5}}").unwrap_err();
    assert!(matches!(err, Error::InvalidFilterSyntax(_)));
}

#[test]
fn executes_basic_functions() {
    let mut tmpl = compile("{{test|mod6}}").unwrap();

    tmpl.register_filter("mod6", |v, _| match v {
        Value::F64(n) => Value::F64(n % 6.0),
        Value::I64(n) => Value::I64(n % 6),
        other => other,
    });

    let output = tmpl.render(&HashMap::from([("test", 15.5)])).unwrap();

    assert_eq!(output, "3.5");
}

#[test]
fn executes_complex_functions() {
    let mut tmpl = compile("testing this out {{test|reverse}}").unwrap();

    tmpl.register_filter("reverse", |v, _| match v {
        Value::Str(s) => Value::Str(s.chars().rev().collect()),
        other => other,
    });

    let output = tmpl.render(&HashMap::from([("test", "tart")])).unwrap();

    assert_eq!(output, "testing this out trat");
}

#[test]
fn executes_functions_with_arguments() {
    let mut tmpl = compile("{{test|concat 'lol' 'hi' 'how' 'are' 'you'}}").unwrap();

    tmpl.register_filter("concat", |v, args| {
        let mut s = v.to_text();
        for arg in args {
            s.push(' ');
            s.push_str(&arg.to_text());
        }
        Value::Str(s)
    });

    let output = tmpl.render(&HashMap::from([("test", "hmm")])).unwrap();

    assert_eq!(output, "hmm lol hi how are you");
}

#[test]
fn executes_an_object_filter() {
    let mut tmpl = compile("{{test|obj}}").unwrap();

    tmpl.register_filter("obj", |v, _| {
        v.get("tmp").cloned().unwrap_or(Value::Null)
    });

    let ctx = HashMap::from([("test", HashMap::from([("tmp", "test")]))]);
    let output = tmpl.render(&ctx).unwrap();

    assert_eq!(output, "test");
}

#[test]
fn chains_left_to_right() {
    let mut tmpl = compile("{{test|addWord 'try'|reverse}}").unwrap();

    tmpl.register_filter("addWord", |v, args| {
        Value::Str(format!("{}{}", v.to_text(), args[0].to_text()))
    });
    tmpl.register_filter("reverse", |v, _| match v {
        Value::Str(s) => Value::Str(s.chars().rev().collect()),
        other => other,
    });

    let output = tmpl.render(&HashMap::from([("test", "prop")])).unwrap();

    // "prop" + "try" first, then reversed.
    assert_eq!(output, "yrtporp");
}

#[test]
fn supports_dots_in_filter_names() {
    let mut tmpl = compile("{{'test.txt'|removeExt}}").unwrap();

    tmpl.register_filter("removeExt", |v, _| match v {
        Value::Str(s) => match s.rsplit_once('.') {
            Some((stem, _)) => Value::Str(stem.to_string()),
            None => Value::Str(s),
        },
        other => other,
    });

    let output = tmpl.render_empty().unwrap();

    assert_eq!(output, "test");
}

#[test]
fn works_with_number_types() {
    let mut tmpl = compile("{{test|add 5}}").unwrap();

    tmpl.register_filter("add", |v, args| match (v, &args[0]) {
        (Value::I64(a), Value::I64(b)) => Value::I64(a + b),
        (Value::F64(a), Value::F64(b)) => Value::F64(a + b),
        (other, _) => other,
    });

    let output = tmpl.render(&HashMap::from([("test", 1)])).unwrap();

    assert_eq!(output, "6");
}

#[test]
fn renders_templates_inside_filters() {
    let mut tmpl = compile("{%each item%} {{.|render}} {%endeach%}").unwrap();

    tmpl.register_filter("render", |v, _| {
        let inner = compile("Name: {{name}}").unwrap();
        let ctx = HashMap::from([("name", v.to_text())]);
        Value::Str(inner.render(&ctx).unwrap())
    });

    let ctx = HashMap::from([("item", vec!["hi", "you", "own"])]);
    let output = tmpl.render(&ctx).unwrap();

    assert_eq!(output, " Name: hi  Name: you  Name: own ");
}

#[test]
fn unknown_filter_fails_the_render() {
    let tmpl = compile("{{test|nope}}").unwrap();
    let err = tmpl.render(&HashMap::from([("test", 1)])).unwrap_err();
    assert!(matches!(err, Error::UnknownFilter(_)));
}

#[test]
fn rejects_path_filter_arguments() {
    let err = compile("{{test|concat other.path}}").unwrap_err();
    assert!(matches!(err, Error::InvalidFilterArgument(_)));
}
