use pretty_assertions::assert_eq;

use crate::{
    GraphQLError,
    executor::{
        Arguments, ExecutionError, FieldArguments, Next, PathSegment, ResolveInfo, ResolverError,
        Variables,
    },
    schema::meta::{Field, ObjectMeta, Type},
    value::Value,
};

use super::dummy::{self, obj};

fn run(query: &str) -> (Value, Vec<ExecutionError>) {
    run_with_variables(query, Variables::new())
}

fn run_with_variables(query: &str, variables: Variables) -> (Value, Vec<ExecutionError>) {
    let schema = dummy::dummy_schema();
    crate::execute_sync(query, None, &schema, &variables, &Value::Null)
        .expect("execution failed")
}

#[test]
fn fields_aliases_and_arguments() {
    let (result, errs) = run(
        "{ cheese(id: 1) { id flavor similar: similarCheese(source: [SHEEP]) { id flavor } } }",
    );

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "cheese",
            obj(vec![
                ("id", Value::scalar(1)),
                ("flavor", Value::scalar("Brie")),
                (
                    "similar",
                    obj(vec![
                        ("id", Value::scalar(3)),
                        ("flavor", Value::scalar("Manchego")),
                    ]),
                ),
            ]),
        )]),
    );
}

#[test]
fn fragment_spreads_and_inline_fragments_merge() {
    let (result, errs) = run(
        "{ cheese(id: 2) {
             ... on Cheese { flavor }
             ...Origin
             ... on Cheese { flavor origin }
           } }
         fragment Origin on Cheese { origin }",
    );

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "cheese",
            obj(vec![
                ("flavor", Value::scalar("Gouda")),
                ("origin", Value::scalar("Netherlands")),
            ]),
        )]),
    );
}

#[test]
fn duplicate_keys_merge_their_child_selections() {
    let (result, errs) = run("{ cheese(id: 1) { id } cheese(id: 1) { flavor } }");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "cheese",
            obj(vec![
                ("id", Value::scalar(1)),
                ("flavor", Value::scalar("Brie")),
            ]),
        )]),
    );
}

#[test]
fn typename_reports_the_concrete_type() {
    let (result, errs) = run("{ __typename cheese(id: 1) { __typename } }");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![
            ("__typename", Value::scalar("Query")),
            ("cheese", obj(vec![("__typename", Value::scalar("Cheese"))])),
        ]),
    );
}

#[test]
fn lists_of_objects_resolve_in_order() {
    let (result, errs) = run("{ fromSource(source: COW) { flavor } }");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "fromSource",
            Value::list(vec![
                obj(vec![("flavor", Value::scalar("Brie"))]),
                obj(vec![("flavor", Value::scalar("Gouda"))]),
            ]),
        )]),
    );
}

#[test]
fn enums_coerce_to_their_names() {
    let (result, errs) = run("{ cheese(id: 3) { source } }");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![("cheese", obj(vec![("source", Value::scalar("SHEEP"))]))]),
    );
}

#[test]
fn variables_substitute_with_declared_defaults() {
    let (result, errs) = run_with_variables(
        "query Pick($id: Int = 2) { cheese(id: $id) { flavor } }",
        Variables::new(),
    );
    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![("cheese", obj(vec![("flavor", Value::scalar("Gouda"))]))]),
    );

    let variables = [("id".to_owned(), Value::scalar(3))].into_iter().collect();
    let (result, errs) = run_with_variables(
        "query Pick($id: Int = 2) { cheese(id: $id) { flavor } }",
        variables,
    );
    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "cheese",
            obj(vec![("flavor", Value::scalar("Manchego"))]),
        )]),
    );
}

#[test]
fn interface_positions_resolve_their_concrete_type() {
    let (result, errs) = run(
        "{ favoriteEdible { __typename fatContent ... on Milk { flavors } } }",
    );

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "favoriteEdible",
            obj(vec![
                ("__typename", Value::scalar("Milk")),
                ("fatContent", Value::scalar(0.04)),
                (
                    "flavors",
                    Value::list(vec![
                        Value::scalar("Natural"),
                        Value::scalar("Chocolate"),
                        Value::scalar("Strawberry"),
                    ]),
                ),
            ]),
        )]),
    );
}

#[test]
fn union_fragments_contribute_only_the_matching_branch() {
    let (result, errs) = run(
        "{ dairyProduct { ... on Cheese { flavor } ... on Milk { id } } }",
    );

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "dairyProduct",
            obj(vec![("flavor", Value::scalar("Brie"))]),
        )]),
    );
}

#[test]
fn execution_error_nulls_the_field_and_is_recorded() {
    let (result, errs) = run("{ executionError cheese(id: 1) { id } }");

    assert_eq!(
        result,
        obj(vec![
            ("executionError", Value::Null),
            ("cheese", obj(vec![("id", Value::scalar(1))])),
        ]),
    );
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].error().message(), "There was an execution error");
    assert_eq!(errs[0].path(), [PathSegment::from("executionError")]);
}

#[test]
fn null_in_non_null_position_nulls_the_nearest_nullable_ancestor() {
    let (result, errs) = run("{ cheese(id: 1) { id brokenFlavor } }");

    assert_eq!(result, obj(vec![("cheese", Value::Null)]));
    assert_eq!(errs.len(), 1);
    assert_eq!(
        errs[0].error().message(),
        "Cannot return null for non-nullable field brokenFlavor",
    );
    assert_eq!(
        errs[0].path(),
        [
            PathSegment::from("cheese"),
            PathSegment::from("brokenFlavor"),
        ],
    );
}

#[test]
fn null_bubbling_past_the_root_nulls_data() {
    let (result, errs) = run("{ importantCheese { id } }");

    assert_eq!(result, Value::Null);
    assert_eq!(errs.len(), 1);
}

#[test]
fn inapplicable_fragments_contribute_nothing() {
    let (result, errs) = run("{ favoriteEdible { ... on Cheese { flavor } fatContent } }");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "favoriteEdible",
            obj(vec![("fatContent", Value::scalar(0.04))]),
        )]),
    );
}

#[test]
fn undefined_field_is_fatal() {
    let schema = dummy::dummy_schema();
    let result = crate::execute_sync("{ nope }", None, &schema, &Variables::new(), &Value::Null);
    assert!(matches!(
        result,
        Err(GraphQLError::UndefinedField { .. }),
    ));
}

#[test]
fn unknown_fragment_is_fatal() {
    let schema = dummy::dummy_schema();
    let result = crate::execute_sync(
        "{ ...Missing }",
        None,
        &schema,
        &Variables::new(),
        &Value::Null,
    );
    assert!(matches!(result, Err(GraphQLError::UnknownFragment(_))));
}

#[test]
fn fatal_resolver_error_aborts_the_query() {
    let schema = dummy::dummy_schema();
    let result = crate::execute_sync(
        "{ error cheese(id: 1) { id } }",
        None,
        &schema,
        &Variables::new(),
        &Value::Null,
    );
    assert!(matches!(result, Err(GraphQLError::Aborted(_))));
}

#[test]
fn middleware_wraps_and_short_circuits_field_resolution() {
    let mut schema = dummy::dummy_schema();
    schema.add_middleware(|args: &FieldArguments<'_, '_>, next: &Next<'_, '_>| {
        if args.field.name.as_str() == "flavor" {
            return Ok(Value::scalar("Intercepted"));
        }
        next.run(args)
    });

    let (result, errs) = crate::execute_sync(
        "{ cheese(id: 1) { id flavor } }",
        None,
        &schema,
        &Variables::new(),
        &Value::Null,
    )
    .expect("execution failed");

    assert_eq!(errs, vec![]);
    assert_eq!(
        result,
        obj(vec![(
            "cheese",
            obj(vec![
                ("id", Value::scalar(1)),
                ("flavor", Value::scalar("Intercepted")),
            ]),
        )]),
    );
}

#[test]
fn middleware_errors_follow_the_resolver_error_protocol() {
    let mut schema = dummy::dummy_schema();
    schema.add_middleware(|args: &FieldArguments<'_, '_>, next: &Next<'_, '_>| {
        if args.field.name.as_str() == "origin" {
            return Err(ResolverError::execution("origin is classified"));
        }
        next.run(args)
    });

    let (result, errs) = crate::execute_sync(
        "{ cheese(id: 1) { id origin } }",
        None,
        &schema,
        &Variables::new(),
        &Value::Null,
    )
    .expect("execution failed");

    // `origin` is non-null, so the error nulls the whole cheese.
    assert_eq!(result, obj(vec![("cheese", Value::Null)]));
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].error().message(), "origin is classified");
}

#[test]
fn mutations_run_through_the_same_machinery() {
    let mut schema = dummy::dummy_schema();
    schema.set_mutation(ObjectMeta::new("Mutation").field(
        Field::new("bumpCounter", Type::named("Int").non_null()).resolver(
            |_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| Ok(Value::scalar(1)),
        ),
    ));

    let (result, errs) = crate::execute_sync(
        "mutation { bumpCounter }",
        None,
        &schema,
        &Variables::new(),
        &Value::Null,
    )
    .expect("execution failed");

    assert_eq!(errs, vec![]);
    assert_eq!(result, obj(vec![("bumpCounter", Value::scalar(1))]));
}
