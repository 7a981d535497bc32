//! A small dairy schema shared by the executor test suites.

use crate::{
    executor::{Arguments, ResolveInfo, ResolverError},
    schema::meta::{
        Argument, EnumMeta, Field, InterfaceMeta, MetaType, ObjectMeta, Type, UnionMeta,
    },
    schema::model::SchemaType,
    value::Value,
};

pub(crate) fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(entries.into_iter().collect())
}

pub(crate) fn cheese(id: i32, flavor: &str, origin: &str, source: &str) -> Value {
    obj(vec![
        ("__typename", Value::scalar("Cheese")),
        ("id", Value::scalar(id)),
        ("flavor", Value::scalar(flavor)),
        ("origin", Value::scalar(origin)),
        ("source", Value::scalar(source)),
        ("fatContent", Value::scalar(0.3)),
    ])
}

pub(crate) fn all_cheeses() -> Vec<Value> {
    vec![
        cheese(1, "Brie", "France", "COW"),
        cheese(2, "Gouda", "Netherlands", "COW"),
        cheese(3, "Manchego", "Spain", "SHEEP"),
    ]
}

fn property(value: &Value, key: &str) -> Option<Value> {
    value.as_object_value()?.get_field_value(key).cloned()
}

fn cheese_by_id(id: i32) -> Option<Value> {
    all_cheeses()
        .into_iter()
        .find(|c| property(c, "id").as_ref().and_then(Value::as_int_value) == Some(id))
}

fn cheeses_by_source(source: &str) -> Vec<Value> {
    all_cheeses()
        .into_iter()
        .filter(|c| property(c, "source").as_ref().and_then(Value::as_string_value) == Some(source))
        .collect()
}

pub(crate) fn milk() -> Value {
    obj(vec![
        ("__typename", Value::scalar("Milk")),
        ("id", Value::scalar("1")),
        ("fatContent", Value::scalar(0.04)),
        (
            "flavors",
            Value::list(vec![
                Value::scalar("Natural"),
                Value::scalar("Chocolate"),
                Value::scalar("Strawberry"),
            ]),
        ),
    ])
}

pub(crate) fn dummy_schema() -> SchemaType {
    let cheese_type = ObjectMeta::new("Cheese")
        .interface("Edible")
        .field(Field::new("id", Type::named("Int").non_null()))
        .field(Field::new("flavor", Type::named("String").non_null()))
        .field(Field::new("origin", Type::named("String").non_null()))
        .field(Field::new("source", Type::named("CheeseSource").non_null()))
        .field(Field::new("fatContent", Type::named("Float").non_null()))
        .field(
            Field::new("similarCheese", Type::named("Cheese"))
                .argument(Argument::new(
                    "source",
                    Type::named("CheeseSource").non_null().list(),
                ))
                .resolver(|_: &Value, args: &Arguments, _: &ResolveInfo<'_, '_>| {
                    let wanted = match args.get("source") {
                        Some(Value::List(sources)) => sources
                            .first()
                            .and_then(Value::as_string_value)
                            .map(str::to_owned),
                        Some(other) => other.as_string_value().map(str::to_owned),
                        None => None,
                    };
                    Ok(wanted
                        .and_then(|source| cheeses_by_source(&source).into_iter().next())
                        .unwrap_or(Value::Null))
                }),
        )
        .field(
            Field::new("brokenFlavor", Type::named("String").non_null())
                .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| Ok(Value::Null)),
        );

    let query = ObjectMeta::new("Query")
        .field(
            Field::new("cheese", Type::named("Cheese"))
                .argument(Argument::new("id", Type::named("Int").non_null()))
                .resolver(|_: &Value, args: &Arguments, _: &ResolveInfo<'_, '_>| {
                    Ok(args
                        .get("id")
                        .and_then(Value::as_int_value)
                        .and_then(cheese_by_id)
                        .unwrap_or(Value::Null))
                }),
        )
        .field(
            Field::new("cheeses", Type::named("Cheese").non_null().list().non_null())
                .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                    Ok(Value::list(all_cheeses()))
                }),
        )
        .field(
            Field::new("fromSource", Type::named("Cheese").non_null().list())
                .argument(Argument::new(
                    "source",
                    Type::named("CheeseSource").non_null(),
                ))
                .resolver(|_: &Value, args: &Arguments, _: &ResolveInfo<'_, '_>| {
                    let source = args
                        .get("source")
                        .and_then(Value::as_string_value)
                        .unwrap_or_default()
                        .to_owned();
                    Ok(Value::list(cheeses_by_source(&source)))
                }),
        )
        .field(
            Field::new("favoriteEdible", Type::named("Edible"))
                .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| Ok(milk())),
        )
        .field(
            Field::new("dairyProduct", Type::named("DairyProduct")).resolver(
                |_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                    Ok(cheese_by_id(1).unwrap_or(Value::Null))
                },
            ),
        )
        .field(
            Field::new("importantCheese", Type::named("Cheese").non_null())
                .resolver(|_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| Ok(Value::Null)),
        )
        .field(
            Field::new("error", Type::named("String")).resolver(
                |_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                    Err(ResolverError::fatal("This error was raised on purpose"))
                },
            ),
        )
        .field(
            Field::new("executionError", Type::named("String")).resolver(
                |_: &Value, _: &Arguments, _: &ResolveInfo<'_, '_>| {
                    Err(ResolverError::execution("There was an execution error"))
                },
            ),
        );

    let mut schema = SchemaType::new(query);
    schema.add_type(MetaType::Object(cheese_type));
    schema.add_type(MetaType::Object(
        ObjectMeta::new("Milk")
            .interface("Edible")
            .field(Field::new("id", Type::named("ID").non_null()))
            .field(Field::new("fatContent", Type::named("Float").non_null()))
            .field(Field::new(
                "flavors",
                Type::named("String").non_null().list(),
            )),
    ));
    schema.add_type(MetaType::Interface(
        InterfaceMeta::new("Edible")
            .field(Field::new("fatContent", Type::named("Float").non_null())),
    ));
    schema.add_type(MetaType::Union(UnionMeta::new(
        "DairyProduct",
        ["Cheese", "Milk"],
    )));
    schema.add_type(MetaType::Enum(
        EnumMeta::new("CheeseSource")
            .value("COW")
            .value("SHEEP")
            .value("GOAT"),
    ));
    schema
}
