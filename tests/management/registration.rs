use std::sync::Arc;

use collector_bridge::management::{
    DynamicObject, InMemoryRegistry, Management, MarkerLocator, Registry,
};

use crate::support::{management, nested, LogCapture};

#[test]
fn registering_twice_logs_and_returns_none() {
    let (management, registry) = management();
    let logs = LogCapture::default();

    let (first, second) = logs.run(|| {
        (
            management.register(Arc::new(nested()), "app:type=Nested"),
            management.register(Arc::new(nested()), "app:type=Nested"),
        )
    });

    assert_eq!(first.unwrap().type_name, "Nested");
    assert!(second.is_none());
    assert_eq!(registry.len(), 1);

    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].contains("unable to register"));
}

#[test]
fn unregister_failures_are_suppressed() {
    let (management, registry) = management();
    let logs = LogCapture::default();

    logs.run(|| {
        management.register(Arc::new(nested()), "app:type=Nested");
        management.unregister("app:type=Nested");
        management.unregister("app:type=Nested");
    });

    assert!(registry.is_empty());
    assert_eq!(logs.warnings().len(), 1);
}

#[test]
fn registration_uses_the_located_registry() {
    let platform = InMemoryRegistry::new().with_property("container.home", "/srv");
    let container = InMemoryRegistry::new();
    let management = Management::new(
        MarkerLocator::new(Arc::new(platform.clone()))
            .with_alternate("container.home", Arc::new(container.clone()) as Arc<dyn Registry>),
    );

    management.register(Arc::new(DynamicObject::new("Worker")), "app:type=Worker");

    assert!(platform.is_empty());
    assert_eq!(container.len(), 1);
}
