use std::sync::Arc;

use collector_bridge::management::{
    DynamicObject, InMemoryRegistry, Management, ManagementError, MarkerLocator, Registry,
    ResolutionFailure, Value,
};

use crate::support::{management, nested};

#[test]
fn resolves_nested_paths() {
    let (management, _) = management();
    management.register(Arc::new(nested()), "app:type=Nested");

    assert_eq!(
        management.query("app:type=Nested", "A.B.C").unwrap(),
        Some("42".to_string())
    );
    assert_eq!(
        management.query("app:type=Nested", "A.B").unwrap(),
        Some("Inner{C=42}".to_string())
    );
}

#[test]
fn missing_intermediate_field_is_a_resolution_error() {
    let (management, _) = management();
    management.register(Arc::new(nested()), "app:type=Nested");

    match management.query("app:type=Nested", "A.X.C") {
        Err(ManagementError::Resolution {
            reason: ResolutionFailure::MissingField { field, .. },
            ..
        }) => assert_eq!(field, "X"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn unknown_object_and_malformed_name_are_distinct() {
    let (management, _) = management();

    assert!(matches!(
        management.query("app:type=Absent", "A"),
        Err(ManagementError::Resolution {
            reason: ResolutionFailure::Registry(_),
            ..
        })
    ));
    assert!(matches!(
        management.query("not a name", "A"),
        Err(ManagementError::Resolution {
            reason: ResolutionFailure::MalformedName(_),
            ..
        })
    ));
}

#[test]
fn null_attribute_resolves_to_none() {
    let (management, _) = management();
    management.register(
        Arc::new(DynamicObject::new("Cache").constant("LastError", Value::Null)),
        "app:type=Cache",
    );

    assert_eq!(management.query("app:type=Cache", "LastError").unwrap(), None);
}

#[test]
fn live_attributes_are_read_on_every_query() {
    use std::sync::atomic::{AtomicI64, Ordering};

    let (management, _) = management();
    let hits = Arc::new(AtomicI64::new(0));
    let counter = Arc::clone(&hits);
    management.register(
        Arc::new(DynamicObject::new("Counter").getter("Hits", move || {
            Value::Long(counter.fetch_add(1, Ordering::SeqCst))
        })),
        "app:type=Counter",
    );

    assert_eq!(management.query("app:type=Counter", "Hits").unwrap(), Some("0".into()));
    assert_eq!(management.query("app:type=Counter", "Hits").unwrap(), Some("1".into()));
}

#[test]
fn registry_choice_follows_runtime_markers() {
    let platform = InMemoryRegistry::new();
    let container = InMemoryRegistry::new();
    container
        .register(
            Arc::new(DynamicObject::new("Server").constant("Name", "container")),
            "app:type=Server".parse().unwrap(),
        )
        .unwrap();
    platform
        .register(
            Arc::new(DynamicObject::new("Server").constant("Name", "platform")),
            "app:type=Server".parse().unwrap(),
        )
        .unwrap();

    let management = Management::new(
        MarkerLocator::new(Arc::new(platform.clone()))
            .with_alternate("container.home", Arc::new(container) as Arc<dyn Registry>),
    );

    assert_eq!(
        management.query("app:type=Server", "Name").unwrap(),
        Some("platform".into())
    );

    platform.set_property("container.home", "/opt/container");

    assert_eq!(
        management.query("app:type=Server", "Name").unwrap(),
        Some("container".into())
    );
}
