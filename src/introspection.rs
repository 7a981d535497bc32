//! Minimal schema introspection, surfaced as ordinary synthetic fields.
//!
//! The query root gains `__schema` and `__type` fields whose resolvers
//! render schema metadata into plain response values; sub-selections over
//! them run through the regular property-lookup resolution.

use crate::{
    schema::meta::{Argument, Field, MetaType, ObjectMeta, Type},
    schema::model::SchemaType,
    value::{Object, Value},
};

/// The object types backing introspection selections.
pub(crate) fn meta_types() -> Vec<MetaType> {
    vec![
        MetaType::Object(
            ObjectMeta::new("__Schema")
                .field(Field::new("queryType", Type::named("__Type").non_null()))
                .field(Field::new("mutationType", Type::named("__Type")))
                .field(Field::new(
                    "types",
                    Type::named("__Type").non_null().list().non_null(),
                ))
                .field(Field::new(
                    "directives",
                    Type::named("__Directive").non_null().list().non_null(),
                )),
        ),
        MetaType::Object(
            ObjectMeta::new("__Type")
                .field(Field::new("kind", Type::named("String").non_null()))
                .field(Field::new("name", Type::named("String")))
                .field(Field::new("description", Type::named("String")))
                .field(Field::new("fields", Type::named("__Field").non_null().list()))
                .field(Field::new("ofType", Type::named("__Type")))
                .field(Field::new(
                    "enumValues",
                    Type::named("__EnumValue").non_null().list(),
                )),
        ),
        MetaType::Object(
            ObjectMeta::new("__Field")
                .field(Field::new("name", Type::named("String").non_null()))
                .field(Field::new("description", Type::named("String")))
                .field(Field::new("type", Type::named("__Type").non_null())),
        ),
        MetaType::Object(
            ObjectMeta::new("__EnumValue")
                .field(Field::new("name", Type::named("String").non_null()))
                .field(Field::new("description", Type::named("String"))),
        ),
        MetaType::Object(
            ObjectMeta::new("__Directive")
                .field(Field::new("name", Type::named("String").non_null()))
                .field(Field::new(
                    "locations",
                    Type::named("String").non_null().list().non_null(),
                )),
        ),
    ]
}

/// The synthetic `__schema` field added to the query root.
pub(crate) fn schema_field() -> Field {
    Field::new("__schema", Type::named("__Schema").non_null())
        .resolver(|_, _, info| Ok(schema_to_value(info.schema)))
}

/// The synthetic `__type(name:)` field added to the query root.
pub(crate) fn type_field() -> Field {
    Field::new("__type", Type::named("__Type"))
        .argument(Argument::new("name", Type::named("String").non_null()))
        .resolver(|_, args, info| {
            let rendered = args
                .get("name")
                .and_then(Value::as_string_value)
                .and_then(|name| info.schema.type_by_name(name))
                .map(|meta| type_to_value(meta, info.schema))
                .unwrap_or(Value::Null);
            Ok(rendered)
        })
}

fn schema_to_value(schema: &SchemaType) -> Value {
    let mut obj = Object::with_capacity(4);
    obj.add_field(
        "queryType",
        named_type_ref(schema.concrete_query_type()),
    );
    obj.add_field(
        "mutationType",
        schema
            .concrete_mutation_type()
            .map(named_type_ref)
            .unwrap_or(Value::Null),
    );
    obj.add_field(
        "types",
        Value::list(
            schema
                .type_list()
                .map(|meta| type_to_value(meta, schema))
                .collect(),
        ),
    );
    obj.add_field(
        "directives",
        Value::list(schema.directive_list().map(directive_to_value).collect()),
    );
    Value::Object(obj)
}

/// Renders one registered type with its full field and value lists.
fn type_to_value(meta: &MetaType, schema: &SchemaType) -> Value {
    let mut obj = Object::with_capacity(6);
    obj.add_field("kind", Value::scalar(meta.type_kind().to_string()));
    obj.add_field("name", Value::scalar(meta.name()));
    obj.add_field(
        "description",
        meta.description()
            .map(|d| Value::scalar(d.as_str()))
            .unwrap_or(Value::Null),
    );
    match meta {
        MetaType::Object(ObjectMeta { fields, .. }) => {
            obj.add_field(
                "fields",
                Value::list(
                    fields
                        .iter()
                        .filter(|f| !f.name.starts_with("__"))
                        .map(|f| field_to_value(f, schema))
                        .collect(),
                ),
            );
        }
        MetaType::Interface(interface) => {
            obj.add_field(
                "fields",
                Value::list(
                    interface
                        .fields
                        .iter()
                        .map(|f| field_to_value(f, schema))
                        .collect(),
                ),
            );
        }
        MetaType::Enum(enum_meta) => {
            obj.add_field(
                "enumValues",
                Value::list(
                    enum_meta
                        .values
                        .iter()
                        .map(|v| {
                            let mut value = Object::with_capacity(2);
                            value.add_field("name", Value::scalar(v.name.as_str()));
                            value.add_field(
                                "description",
                                v.description
                                    .as_ref()
                                    .map(|d| Value::scalar(d.as_str()))
                                    .unwrap_or(Value::Null),
                            );
                            Value::Object(value)
                        })
                        .collect(),
                ),
            );
        }
        _ => {}
    }
    Value::Object(obj)
}

fn field_to_value(field: &Field, schema: &SchemaType) -> Value {
    let mut obj = Object::with_capacity(3);
    obj.add_field("name", Value::scalar(field.name.as_str()));
    obj.add_field(
        "description",
        field
            .description
            .as_ref()
            .map(|d| Value::scalar(d.as_str()))
            .unwrap_or(Value::Null),
    );
    obj.add_field("type", type_literal_to_value(&field.field_type, schema));
    Value::Object(obj)
}

/// Renders a type literal as a shallow reference: wrappers chain through
/// `ofType`, the named core carries its kind and name.
fn type_literal_to_value(ty: &Type, schema: &SchemaType) -> Value {
    let mut obj = Object::with_capacity(3);
    match ty {
        Type::NonNull(inner) => {
            obj.add_field("kind", Value::scalar("NON_NULL"));
            obj.add_field("name", Value::Null);
            obj.add_field("ofType", type_literal_to_value(inner, schema));
        }
        Type::List(inner) => {
            obj.add_field("kind", Value::scalar("LIST"));
            obj.add_field("name", Value::Null);
            obj.add_field("ofType", type_literal_to_value(inner, schema));
        }
        Type::Named(name) => {
            obj.add_field(
                "kind",
                schema
                    .type_by_name(name)
                    .map(|meta| Value::scalar(meta.type_kind().to_string()))
                    .unwrap_or(Value::Null),
            );
            obj.add_field("name", Value::scalar(name.as_str()));
            obj.add_field("ofType", Value::Null);
        }
    }
    Value::Object(obj)
}

fn directive_to_value(directive: &crate::schema::model::DirectiveType) -> Value {
    let mut obj = Object::with_capacity(2);
    obj.add_field("name", Value::scalar(directive.name.as_str()));
    obj.add_field(
        "locations",
        Value::list(
            directive
                .locations
                .iter()
                .map(|l| Value::scalar(l.to_string()))
                .collect(),
        ),
    );
    Value::Object(obj)
}

fn named_type_ref(meta: &MetaType) -> Value {
    let mut obj = Object::with_capacity(2);
    obj.add_field("kind", Value::scalar(meta.type_kind().to_string()));
    obj.add_field("name", Value::scalar(meta.name()));
    Value::Object(obj)
}
