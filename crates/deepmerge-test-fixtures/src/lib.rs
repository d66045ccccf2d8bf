//! Test fixtures for deepmerge testing
//!
//! Provides the `merge_objects` scenario table shared by the runtime and CLI
//! tests, plus argument files laid out in temporary directories.

use deepmerge_core::{Type, Value};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// One `merge_objects` call and the result it must produce.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub args: Vec<Value>,
    pub want: Value,
}

fn s(v: &str) -> Value {
    Value::string(v)
}

fn scenario(name: &'static str, args: Vec<Value>, want: Value) -> Scenario {
    Scenario { name, args, want }
}

/// Every successful `merge_objects` scenario.
pub fn scenarios() -> Vec<Scenario> {
    vec![
        scenario("one argument, not object", vec![s("hello")], s("hello")),
        scenario(
            "one argument, empty object",
            vec![Value::empty_record()],
            Value::empty_record(),
        ),
        scenario(
            "one argument, non-empty object",
            vec![Value::record([("a", Value::bool(true))])],
            Value::record([("a", Value::bool(true))]),
        ),
        // Type gets erased for simplicity's sake
        scenario(
            "one argument, null",
            vec![Value::Null(Type::String)],
            Value::null(),
        ),
        scenario(
            "one argument, completely unknown",
            vec![Value::dynamic()],
            Value::dynamic(),
        ),
        // Known because the type says there are no attributes
        scenario(
            "one argument, unknown value of empty object type",
            vec![Value::unknown(Type::empty_record())],
            Value::empty_record(),
        ),
        scenario(
            "one argument, unknown value of non-empty object type",
            vec![Value::unknown(Type::record([("a", Type::String)]))],
            Value::record([("a", Value::unknown(Type::String))]),
        ),
        // Maps are never returned
        scenario(
            "one argument, empty map",
            vec![Value::empty_map(Type::String)],
            Value::empty_record(),
        ),
        scenario(
            "one argument, non-empty map",
            vec![Value::map([("a", Value::bool(true))])],
            Value::record([("a", Value::bool(true))]),
        ),
        scenario(
            "two objects, disjoint attributes",
            vec![
                Value::record([("a", s("a value"))]),
                Value::record([("b", s("b value"))]),
            ],
            Value::record([("a", s("a value")), ("b", s("b value"))]),
        ),
        scenario(
            "two objects, additional attributes",
            vec![
                Value::record([("a", s("a value 1"))]),
                Value::record([("a", s("a value 2")), ("b", s("b value"))]),
            ],
            Value::record([("a", s("a value 2")), ("b", s("b value"))]),
        ),
        scenario(
            "two objects, fewer attributes",
            vec![
                Value::record([("a", s("a value 1")), ("b", s("b value"))]),
                Value::record([("a", s("a value 2"))]),
            ],
            Value::record([("a", s("a value 2")), ("b", s("b value"))]),
        ),
        scenario(
            "object into map",
            vec![
                Value::map([("a", s("a value 1")), ("b", s("b value"))]),
                Value::record([("a", s("a value 2"))]),
            ],
            Value::record([("a", s("a value 2")), ("b", s("b value"))]),
        ),
        scenario(
            "map into object",
            vec![
                Value::record([("a", s("a value 1")), ("b", s("b value"))]),
                Value::map([("a", s("a value 2"))]),
            ],
            Value::record([("a", s("a value 2")), ("b", s("b value"))]),
        ),
        scenario(
            "map into map",
            vec![
                Value::map([("a", s("a value 1")), ("b", s("b value"))]),
                Value::map([("a", s("a value 2"))]),
            ],
            Value::record([("a", s("a value 2")), ("b", s("b value"))]),
        ),
        scenario(
            "nested objects",
            vec![
                Value::record([(
                    "nested",
                    Value::record([("a", s("a value 1")), ("b", s("b value 1"))]),
                )]),
                Value::record([("nested", Value::record([("a", s("a value 2"))]))]),
            ],
            Value::record([(
                "nested",
                Value::record([("a", s("a value 2")), ("b", s("b value 1"))]),
            )]),
        ),
        scenario(
            "nested maps",
            vec![
                Value::record([(
                    "nested",
                    Value::map([("a", s("a value 1")), ("b", s("b value 1"))]),
                )]),
                Value::record([("nested", Value::map([("a", s("a value 2"))]))]),
            ],
            Value::record([(
                "nested",
                Value::record([("a", s("a value 2")), ("b", s("b value 1"))]),
            )]),
        ),
        // Element types differ, but both maps become records while merging
        scenario(
            "nested objects in maps",
            vec![
                Value::map([(
                    "nested",
                    Value::record([("a", s("a value 1")), ("b", s("b value 1"))]),
                )]),
                Value::map([("nested", Value::record([("a", s("a value 2"))]))]),
            ],
            Value::record([(
                "nested",
                Value::record([("a", s("a value 2")), ("b", s("b value 1"))]),
            )]),
        ),
        scenario(
            "two objects, first unknown",
            vec![
                Value::unknown(Type::record([("a", Type::String), ("b", Type::String)])),
                Value::record([("b", s("b value"))]),
            ],
            Value::record([("a", Value::unknown(Type::String)), ("b", s("b value"))]),
        ),
        scenario(
            "two objects, second unknown",
            vec![
                Value::record([("a", s("a value")), ("b", s("b value"))]),
                Value::unknown(Type::record([("a", Type::String)])),
            ],
            Value::record([("a", Value::unknown(Type::String)), ("b", s("b value"))]),
        ),
        scenario(
            "unknown map into object",
            vec![
                Value::record([("a", s("a value")), ("b", s("b value"))]),
                Value::unknown(Type::map(Type::String)),
            ],
            Value::dynamic(),
        ),
        scenario(
            "object into unknown map",
            vec![
                Value::unknown(Type::map(Type::String)),
                Value::record([("a", s("a value")), ("b", s("b value"))]),
            ],
            Value::dynamic(),
        ),
        // The outer object stays predictable, its nested attribute does not
        scenario(
            "nested unknown map into nested object",
            vec![
                Value::record([(
                    "nested",
                    Value::record([("a", s("a value 1")), ("b", s("b value 1"))]),
                )]),
                Value::record([("nested", Value::unknown(Type::map(Type::String)))]),
            ],
            Value::record([("nested", Value::dynamic())]),
        ),
        scenario(
            "null wipes earlier objects",
            vec![Value::record([("a", s("a value"))]), Value::Null(Type::empty_record())],
            Value::null(),
        ),
        scenario(
            "object after null starts fresh",
            vec![Value::null(), Value::record([("a", s("a value"))])],
            Value::record([("a", s("a value"))]),
        ),
    ]
}

/// Fixture categories
pub enum FixtureType {
    /// Three plain JSON/YAML layers of a service configuration
    LayeredConfig,
    /// Typed-JSON arguments containing unknown values
    TypedUnknowns,
}

/// Argument files laid out in a temporary directory
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Write the fixture files and return them in argument order.
    pub fn setup(&mut self, fixture_type: FixtureType) -> Vec<PathBuf> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let files = match fixture_type {
            FixtureType::LayeredConfig => self.setup_layered_config(&path),
            FixtureType::TypedUnknowns => self.setup_typed_unknowns(&path),
        };

        self.temp_dir = Some(dir);
        files
    }

    fn setup_layered_config(&self, base: &Path) -> Vec<PathBuf> {
        let defaults = base.join("defaults.json");
        fs::write(
            &defaults,
            serde_json::to_string_pretty(&layered_defaults()).unwrap(),
        )
        .unwrap();

        let environment = base.join("production.yaml");
        fs::write(
            &environment,
            r#"service:
  replicas: 3
  labels:
    env: prod
"#,
        )
        .unwrap();

        let overrides = base.join("overrides.json");
        fs::write(
            &overrides,
            r#"{"service": {"image": "app:v2", "debug": null}}"#,
        )
        .unwrap();

        vec![defaults, environment, overrides]
    }

    fn setup_typed_unknowns(&self, base: &Path) -> Vec<PathBuf> {
        let known = base.join("known.json");
        fs::write(
            &known,
            r#"{"record": {"nested": {"record": {"a": {"string": "a1"}, "b": {"string": "b1"}}}}}"#,
        )
        .unwrap();

        let unknown = base.join("unknown.json");
        fs::write(
            &unknown,
            r#"{"record": {"nested": {"unknown": {"map": "string"}}, "id": {"unknown": "string"}}}"#,
        )
        .unwrap();

        vec![known, unknown]
    }
}

/// First layer of [`FixtureType::LayeredConfig`]
pub fn layered_defaults() -> serde_json::Value {
    json!({
        "service": {
            "image": "app:v1",
            "replicas": 1,
            "debug": true,
            "labels": {"team": "platform"}
        },
        "ports": [80]
    })
}

/// Plain JSON result of merging the [`FixtureType::LayeredConfig`] layers
pub fn layered_expected() -> serde_json::Value {
    json!({
        "service": {
            "image": "app:v2",
            "replicas": 3,
            "debug": null,
            "labels": {"team": "platform", "env": "prod"}
        },
        "ports": [80]
    })
}
