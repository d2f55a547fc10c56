#![allow(dead_code)]

use std::sync::Arc;

use collector_bridge::management::{
    BoxError, CompositeValue, DynamicObject, InMemoryRegistry, Management, ParamKind, Value,
};

pub use crate::log_capture::LogCapture;

/// A management service over a fresh in-memory registry.
pub fn management() -> (Management, InMemoryRegistry) {
    let registry = InMemoryRegistry::new();
    (Management::for_registry(Arc::new(registry.clone())), registry)
}

/// `app:type=Nested` with `A = {B = {C = 42}}`.
pub fn nested() -> DynamicObject {
    DynamicObject::new("Nested").constant(
        "A",
        CompositeValue::new("Outer").with("B", CompositeValue::new("Inner").with("C", 42i32)),
    )
}

/// `foo(int)`, `foo(int, int)`, `baz(int)` and a failing `boom()`.
pub fn calculator() -> DynamicObject {
    DynamicObject::new("Calculator")
        .operation("foo", &[ParamKind::Int], |args| {
            Ok(Value::from(format!("one:{}", args[0])))
        })
        .operation("foo", &[ParamKind::Int, ParamKind::Int], |args| {
            match (&args[0], &args[1]) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
                _ => Err(BoxError::from("unexpected argument kinds")),
            }
        })
        .operation("baz", &[ParamKind::Int], |_| Ok(Value::Null))
        .operation("boom", &[], |_| Err(BoxError::from("exploded")))
}
