use crate::{
    executor::{Arguments, ResolveInfo, Variables},
    schema::meta::{Field, ObjectMeta, Type},
    schema::model::SchemaType,
    value::{Object, Value},
};

fn test_schema() -> SchemaType {
    SchemaType::new(
        ObjectMeta::new("TestType")
            .field(
                Field::new("a", Type::named("String").non_null())
                    .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                        Ok(Value::scalar("a"))
                    }),
            )
            .field(
                Field::new("b", Type::named("String").non_null())
                    .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                        Ok(Value::scalar("b"))
                    }),
            ),
    )
}

fn run_variable_query<F>(query: &str, variables: Variables, f: F)
where
    F: Fn(&Object),
{
    let schema = test_schema();
    let (result, errs) = crate::execute_sync(query, None, &schema, &variables, &Value::Null)
        .expect("execution failed");

    assert_eq!(errs, vec![]);

    let obj = result.as_object_value().expect("result is not an object");
    f(obj);
}

fn run_query<F>(query: &str, f: F)
where
    F: Fn(&Object),
{
    run_variable_query(query, Variables::new(), f);
}

#[test]
fn scalar_include_true() {
    run_query("{ a, b @include(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), Some(&Value::scalar("b")));
    });
}

#[test]
fn scalar_include_false() {
    run_query("{ a, b @include(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn scalar_skip_false() {
    run_query("{ a, b @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), Some(&Value::scalar("b")));
    });
}

#[test]
fn scalar_skip_true() {
    run_query("{ a, b @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn fragment_spread_include_true() {
    run_query(
        "{ a, ...Frag @include(if: true) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
            assert_eq!(result.get_field_value("b"), Some(&Value::scalar("b")));
        },
    );
}

#[test]
fn fragment_spread_include_false() {
    run_query(
        "{ a, ...Frag @include(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn fragment_spread_skip_true() {
    run_query(
        "{ a, ...Frag @skip(if: true) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}

#[test]
fn inline_fragment_include_false() {
    run_query("{ a, ... on TestType @include(if: false) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn inline_fragment_skip_true() {
    run_query("{ a, ... on TestType @skip(if: true) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn anonymous_inline_fragment_skip_true() {
    run_query("{ a, ... @skip(if: true) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn scalar_include_true_skip_true() {
    run_query("{ a, b @include(if: true) @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn scalar_include_true_skip_false() {
    run_query("{ a, b @include(if: true) @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), Some(&Value::scalar("b")));
    });
}

#[test]
fn scalar_include_false_skip_false() {
    run_query("{ a, b @include(if: false) @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&Value::scalar("a")));
        assert_eq!(result.get_field_value("b"), None);
    });
}

#[test]
fn include_driven_by_variables() {
    let variables = [("yes".to_owned(), Value::scalar(true))]
        .into_iter()
        .collect();
    run_variable_query(
        "query Q($yes: Boolean!) { a, b @include(if: $yes) }",
        variables,
        |result| {
            assert_eq!(result.get_field_value("b"), Some(&Value::scalar("b")));
        },
    );

    let variables = [("yes".to_owned(), Value::scalar(false))]
        .into_iter()
        .collect();
    run_variable_query(
        "query Q($yes: Boolean!) { a, b @include(if: $yes) }",
        variables,
        |result| {
            assert_eq!(result.get_field_value("b"), None);
        },
    );
}
