use std::sync::Arc;

use collector_bridge::management::{DynamicObject, ManagementError, ParamKind, Value};

use crate::support::{calculator, management};

fn setup() -> collector_bridge::management::Management {
    let (management, _) = management();
    management.register(Arc::new(calculator()), "app:type=Calculator");
    management
}

#[test]
fn overload_is_chosen_by_argument_count() {
    let management = setup();

    assert_eq!(
        management.invoke("app:type=Calculator", "foo", "[5,6]").unwrap(),
        "11"
    );
    assert_eq!(
        management.invoke("app:type=Calculator", "foo", "[5]").unwrap(),
        "one:5"
    );
}

#[test]
fn operation_names_match_case_insensitively() {
    let management = setup();

    assert_eq!(
        management.invoke("app:type=Calculator", "FOO", "[1, 2]").unwrap(),
        "3"
    );
}

#[test]
fn unknown_operation_is_not_found() {
    let management = setup();

    assert!(matches!(
        management.invoke("app:type=Calculator", "bar", "[1]"),
        Err(ManagementError::OperationNotFound { .. })
    ));
}

#[test]
fn wrong_argument_count_is_a_mismatch() {
    let management = setup();

    match management.invoke("app:type=Calculator", "baz", "[1,2]") {
        Err(ManagementError::ArgumentCountMismatch { declared, given, .. }) => {
            assert_eq!(declared, vec![1]);
            assert_eq!(given, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn null_result_is_rendered_as_text() {
    let management = setup();

    assert_eq!(
        management.invoke("app:type=Calculator", "baz", "[7]").unwrap(),
        "null"
    );
}

#[test]
fn unparseable_argument_is_a_coercion_error() {
    let management = setup();

    assert!(matches!(
        management.invoke("app:type=Calculator", "foo", "[five]"),
        Err(ManagementError::ArgumentCoercion { index: 0, .. })
    ));
}

#[test]
fn malformed_argument_list_is_rejected() {
    let management = setup();

    assert!(matches!(
        management.invoke("app:type=Calculator", "foo", "5"),
        Err(ManagementError::MalformedArguments { .. })
    ));
}

#[test]
fn failing_operation_reports_invocation_error() {
    let management = setup();

    let err = management
        .invoke("app:type=Calculator", "boom", "[]")
        .unwrap_err();
    assert!(matches!(err, ManagementError::Invocation { .. }));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn every_parameter_kind_is_converted() {
    let (management, _) = management();
    let echo = DynamicObject::new("Echo").operation(
        "all",
        &[
            ParamKind::Long,
            ParamKind::Int,
            ParamKind::Text,
            ParamKind::Bool,
            ParamKind::Float,
            ParamKind::Double,
        ],
        |args| {
            let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
            Ok(Value::from(rendered.join("|")))
        },
    );
    management.register(Arc::new(echo), "app:type=Echo");

    assert_eq!(
        management
            .invoke("app:type=Echo", "all", "[9000000000,7,hello,TRUE,1.5,2.25]")
            .unwrap(),
        "9000000000|7|hello|true|1.5|2.25"
    );
    assert_eq!(
        management
            .invoke("app:type=Echo", "all", "[1,2,x,yes,0.5,0.5]")
            .unwrap(),
        "1|2|x|false|0.5|0.5"
    );
}
