use rawsql::{
    Bindings, ClientConfig, Dialect, DialectClient, RawError, RawStatement, TimeoutOptions, Value,
    list, named, raw,
};
use std::collections::HashMap;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("rawsql=trace")
        .with_test_writer()
        .try_init();
}

fn sqlite() -> RawStatement {
    RawStatement::with_client(Arc::new(DialectClient::for_dialect(Dialect::Sqlite)))
}

#[test]
fn compiled_statement_serializes_for_the_execution_layer() {
    init_tracing();
    let stmt = raw("update t set ?? = ? where id = ?", vec![
        Value::from("status"),
        Value::from("done"),
        Value::from(42),
    ])
    .timeout(250, TimeoutOptions::cancel())
    .unwrap()
    .options([("nest_tables", true)])
    .compile()
    .unwrap();

    let json = serde_json::to_value(&stmt).unwrap();
    assert_eq!(json["method"], "raw");
    assert_eq!(json["sql"], r#"update t set "status" = $1 where id = $2"#);
    assert_eq!(json["bindings"], serde_json::json!(["done", 42]));
    assert_eq!(json["options"], serde_json::json!({ "nest_tables": true }));
    assert_eq!(json["timeout"], 250);
    assert_eq!(json["cancel_on_timeout"], true);
    assert_eq!(json["uid"], stmt.uid.to_string());
}

#[test]
fn debug_statements_compile_with_a_subscriber_installed() {
    init_tracing();
    let stmt = raw("select ?", 1).debug(true).compile().unwrap();
    assert_eq!(stmt.sql, "select $1");

    let err = raw("select :x", named([("y", 1)]))
        .debug(true)
        .compile()
        .unwrap_err();
    assert!(err.is_undefined_binding());
}

#[test]
fn sqlite_named_bindings_from_hash_map() {
    let mut values = HashMap::new();
    values.insert("table", Value::from("users"));
    values.insert("id", Value::from(5));

    let stmt = sqlite()
        .set("select * from :table: where id = :id", values)
        .compile()
        .unwrap();
    assert_eq!(stmt.sql, "select * from `users` where id = ?");
    assert_eq!(stmt.bindings, vec![Value::Int(5)]);
}

#[test]
fn json_object_bindings_are_named() {
    let serde_json::Value::Object(map) = serde_json::json!({ "name": "alice", "age": 30 }) else {
        unreachable!()
    };
    let stmt = raw("insert into people (name, age) values (:name, :age)", map)
        .compile()
        .unwrap();
    assert_eq!(stmt.sql, "insert into people (name, age) values ($1, $2)");
    assert_eq!(stmt.bindings, vec![Value::from("alice"), Value::Int(30)]);
}

#[test]
fn array_binding_is_one_parameter_inside_a_sequence() {
    let stmt = raw("select * from t where id = any(?)", vec![list([1, 2, 3])])
        .compile()
        .unwrap();
    assert_eq!(stmt.sql, "select * from t where id = any($1)");
    assert_eq!(stmt.bindings.len(), 1);
    assert_eq!(stmt.params_ref().len(), 1);
}

#[test]
fn errors_are_the_documented_kinds() {
    assert!(matches!(
        raw("?", Vec::<Value>::new()).compile(),
        Err(RawError::BindingCountMismatch {
            expected: 0,
            actual: 1
        })
    ));

    let no_cancel = DialectClient::new(
        ClientConfig::new()
            .dialect(Dialect::Sqlite)
            .no_truncate(),
    );
    let err = RawStatement::with_client(Arc::new(no_cancel))
        .timeout(10, TimeoutOptions::cancel())
        .unwrap_err();
    assert!(err.is_cancel_unsupported());
}

#[test]
fn bindings_shape_is_fixed_at_set_time() {
    let stmt = raw("select ?", 1);
    assert_eq!(stmt.bindings(), &Bindings::Positional(vec![Value::Int(1)]));
    assert_eq!(stmt.template(), "select ?");
}

#[test]
fn display_rendering_uses_client_dialect() {
    let text = sqlite()
        .set("select * from ?? where flag = ? and data = ?", vec![
            Value::from("t"),
            Value::from(false),
            Value::from(vec![0xff_u8]),
        ])
        .to_query_string()
        .unwrap();
    assert_eq!(text, "select * from `t` where flag = false and data = X'ff'");
}
