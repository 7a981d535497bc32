//! The executable schema: registered types, directives, and middleware.

use std::fmt;

use fnv::FnvHashMap;

use crate::{
    executor::{Arguments, Middleware, Next},
    introspection,
    schema::meta::{self, Argument, MetaType, ObjectMeta, Type},
    value::Value,
};

/// Shortcut for a directive inclusion predicate.
///
/// Receives the directive's materialised arguments and decides whether the
/// annotated node stays in the response.
pub type IncludeProcFn = fn(&Arguments) -> bool;

/// Metadata for an executable schema.
///
/// Holds the registered types, the root type names, the directive registry,
/// and the middleware chain wrapped around every field resolution.
pub struct SchemaType {
    types: FnvHashMap<String, MetaType>,
    query_type_name: String,
    mutation_type_name: Option<String>,
    directives: FnvHashMap<String, DirectiveType>,
    middleware: Vec<Middleware>,
}

/// A directive the executor understands.
pub struct DirectiveType {
    /// The directive's name, without the `@`.
    pub name: String,
    /// Where in a query the directive may appear.
    pub locations: Vec<DirectiveLocation>,
    /// The directive's declared arguments.
    pub arguments: Vec<Argument>,
    /// Whether a node annotated with the directive stays in the response.
    pub include_proc: IncludeProcFn,
}

/// Locations a directive may be attached to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DirectiveLocation {
    /// On a query operation.
    Query,
    /// On a mutation operation.
    Mutation,
    /// On a field selection.
    Field,
    /// On a fragment definition.
    FragmentDefinition,
    /// On a fragment spread.
    FragmentSpread,
    /// On an inline fragment.
    InlineFragment,
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Field => "field",
            Self::FragmentDefinition => "fragment definition",
            Self::FragmentSpread => "fragment spread",
            Self::InlineFragment => "inline fragment",
        })
    }
}

fn skip_proc(args: &Arguments) -> bool {
    !args
        .get("if")
        .and_then(Value::as_boolean_value)
        .unwrap_or(false)
}

fn include_proc(args: &Arguments) -> bool {
    args.get("if")
        .and_then(Value::as_boolean_value)
        .unwrap_or(false)
}

fn defer_proc(_: &Arguments) -> bool {
    // Deferral is a strategy concern; the directive never excludes a node.
    true
}

impl DirectiveType {
    /// Builds a new [`DirectiveType`].
    pub fn new(
        name: &str,
        locations: &[DirectiveLocation],
        arguments: Vec<Argument>,
        include_proc: IncludeProcFn,
    ) -> Self {
        Self {
            name: name.into(),
            locations: locations.to_vec(),
            arguments,
            include_proc,
        }
    }

    fn new_skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            vec![Argument::new("if", Type::named("Boolean").non_null())],
            skip_proc,
        )
    }

    fn new_include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            vec![Argument::new("if", Type::named("Boolean").non_null())],
            include_proc,
        )
    }

    fn new_defer() -> Self {
        Self::new("defer", &[DirectiveLocation::Field], vec![], defer_proc)
    }
}

impl SchemaType {
    /// Builds a schema around the given query root type.
    ///
    /// Registers the built-in scalars, the introspection types (the root
    /// gains synthetic `__schema` and `__type` fields), and the `skip`,
    /// `include`, and `defer` directives.
    pub fn new(query: ObjectMeta) -> Self {
        let mut schema = Self {
            types: FnvHashMap::default(),
            query_type_name: query.name.to_string(),
            mutation_type_name: None,
            directives: FnvHashMap::default(),
            middleware: Vec::new(),
        };

        for scalar in meta::builtin_scalars() {
            schema.add_type(scalar);
        }
        for meta in introspection::meta_types() {
            schema.add_type(meta);
        }

        let query = query
            .field(introspection::schema_field())
            .field(introspection::type_field());
        schema.add_type(MetaType::Object(query));

        schema.add_directive(DirectiveType::new_skip());
        schema.add_directive(DirectiveType::new_include());
        schema.add_directive(DirectiveType::new_defer());

        schema
    }

    /// Registers a type. Re-registering a name replaces the earlier entry.
    pub fn add_type(&mut self, meta: MetaType) {
        self.types.insert(meta.name().to_string(), meta);
    }

    /// Registers the mutation root type.
    pub fn set_mutation(&mut self, mutation: ObjectMeta) {
        self.mutation_type_name = Some(mutation.name.to_string());
        self.add_type(MetaType::Object(mutation));
    }

    /// Registers a directive.
    pub fn add_directive(&mut self, directive: DirectiveType) {
        self.directives.insert(directive.name.clone(), directive);
    }

    /// Appends a middleware step wrapping every field resolution.
    ///
    /// Steps run in registration order; each one either calls
    /// [`Next::run`] or short-circuits.
    pub fn add_middleware<F>(&mut self, middleware: F)
    where
        F: for<'a, 'c> Fn(&crate::executor::FieldArguments<'a, 'c>, &Next<'a, 'c>) -> crate::executor::ExecutionResult
            + Send
            + Sync
            + 'static,
    {
        self.middleware.push(std::sync::Arc::new(middleware));
    }

    pub(crate) fn middleware(&self) -> &[Middleware] {
        &self.middleware
    }

    /// Looks up a registered type by name.
    pub fn type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// The name of the query root type.
    pub fn query_type_name(&self) -> &str {
        &self.query_type_name
    }

    /// The name of the mutation root type, if one is registered.
    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type_name.as_deref()
    }

    /// The query root type.
    pub fn concrete_query_type(&self) -> &MetaType {
        self.types
            .get(&self.query_type_name)
            .expect("query type does not exist in schema")
    }

    /// The mutation root type, if one is registered.
    pub fn concrete_mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type_name.as_ref().map(|name| {
            self.types
                .get(name)
                .expect("mutation type does not exist in schema")
        })
    }

    /// Iterates over all registered types, in no particular order.
    pub fn type_list(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    /// Looks up a registered directive by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// Iterates over all registered directives, in no particular order.
    pub fn directive_list(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }

    /// Indicates whether `object_name` names a possible concrete type of the
    /// given abstract type.
    pub fn is_possible_type(&self, abstract_type: &MetaType, object_name: &str) -> bool {
        match abstract_type {
            MetaType::Union(u) => u.includes(object_name),
            MetaType::Interface(i) => self
                .type_by_name(object_name)
                .is_some_and(|t| match t {
                    MetaType::Object(o) => {
                        o.interface_names.iter().any(|n| *n == i.name)
                    }
                    _ => false,
                }),
            _ => false,
        }
    }
}
