//! Shared execution state, errors, and argument materialisation.

mod deferred;
mod flatten;
mod resolve;
mod serial;
mod typecast;

use std::collections::HashMap;
use std::fmt;

use derive_more::with_trait::From;
use fnv::FnvHashMap;
use graphql_parser::{Pos, query as q};
use indexmap::IndexMap;

use crate::{
    ast::{self, Operation},
    schema::{meta, model::SchemaType},
    value::{Object, Value},
};

pub use self::{
    deferred::{Collector, Patch, PatchSet, execute_validated_query_deferred},
    resolve::{FieldArguments, Middleware, Next},
    serial::execute_validated_query,
};

pub(crate) use self::resolve::ResolveFailure;

/// The map of variable values used for substitution during query execution.
pub type Variables = HashMap<String, Value>;

/// One step of a response path: an object key or a list index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    /// An object response key.
    Key(String),
    /// A zero-based list index.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.into())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Error type for errors that occur during field resolution.
///
/// Field errors are represented by a human-readable message and an optional
/// [`Value`] with additional information. They can be converted from any type
/// implementing [`fmt::Display`], which makes error chaining with the `?`
/// operator a breeze:
///
/// ```rust
/// # use graphql_defer::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::Null,
        }
    }
}

impl FieldError {
    /// Constructs a new [`FieldError`] with additional data.
    ///
    /// If `extensions` is [`Value::Null`], no extra data is attached.
    #[must_use]
    pub fn new<T: fmt::Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    #[must_use]
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// Error raised by a field resolver or a middleware step.
#[derive(Clone, Debug, From, PartialEq)]
pub enum ResolverError {
    /// A user-visible field error: recorded under `"errors"` while the field
    /// resolves to null. Does not propagate further.
    Execution(FieldError),
    /// Aborts the whole query.
    #[from(ignore)]
    Fatal(FieldError),
}

impl ResolverError {
    /// Constructs a user-visible field error.
    pub fn execution<T: fmt::Display>(e: T) -> Self {
        Self::Execution(e.into())
    }

    /// Constructs a query-aborting error.
    pub fn fatal<T: fmt::Display>(e: T) -> Self {
        Self::Fatal(e.into())
    }
}

/// The result of resolving an unspecified field.
pub type ExecutionResult = Result<Value, ResolverError>;

/// Error that occurred during query execution, attached to the query position
/// and response path of the field that failed to resolve.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    location: Pos,
    path: Vec<PathSegment>,
    error: FieldError,
}

impl ExecutionError {
    /// Constructs a new [`ExecutionError`].
    pub fn new(location: Pos, path: Vec<PathSegment>, error: FieldError) -> Self {
        Self {
            location,
            path,
            error,
        }
    }

    /// The underlying field error.
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The source position in the query of the field that failed to resolve.
    pub fn location(&self) -> &Pos {
        &self.location
    }

    /// The response path leading to the field that produced this error.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Renders this error as a response [`Value`] in the standard errors
    /// shape.
    pub fn as_value(&self) -> Value {
        let mut location = Object::with_capacity(2);
        location.add_field("line", Value::scalar(self.location.line as i32));
        location.add_field("column", Value::scalar(self.location.column as i32));

        let mut obj = Object::with_capacity(3);
        obj.add_field("message", Value::scalar(self.error.message()));
        obj.add_field("locations", Value::list(vec![Value::Object(location)]));
        if !self.path.is_empty() {
            obj.add_field(
                "path",
                Value::list(
                    self.path
                        .iter()
                        .map(|seg| match seg {
                            PathSegment::Key(k) => Value::scalar(k.as_str()),
                            PathSegment::Index(i) => Value::scalar(*i as i32),
                        })
                        .collect(),
                ),
            );
        }
        Value::Object(obj)
    }
}

/// Field argument container: the materialised argument values of one field
/// or directive use.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    args: IndexMap<String, Value>,
}

impl Arguments {
    /// Materialises argument values from their AST literals.
    ///
    /// Variable references are substituted from `variables`; declared
    /// arguments that are missing or null fall back to their default value,
    /// or null.
    pub(crate) fn new(
        ast_args: &[(String, ast::InputLiteral<'_>)],
        defs: &[meta::Argument],
        variables: &Variables,
    ) -> Self {
        let mut args: IndexMap<String, Value> = ast_args
            .iter()
            .map(|(name, literal)| (name.clone(), literal_to_value(literal, variables)))
            .collect();
        for def in defs {
            if args.get(def.name.as_str()).is_none_or(Value::is_null) {
                let fallback = def.default_value.clone().unwrap_or(Value::Null);
                args.insert(def.name.to_string(), fallback);
            }
        }
        Self { args }
    }

    /// Returns the value of the argument with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Iterates over all argument name-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.args.iter()
    }
}

/// Materialises one AST literal into a response-shaped [`Value`],
/// substituting variable references.
pub(crate) fn literal_to_value(literal: &ast::InputLiteral<'_>, variables: &Variables) -> Value {
    match literal {
        q::Value::Variable(name) => variables.get(name).cloned().unwrap_or(Value::Null),
        q::Value::Int(n) => n
            .as_i64()
            .map(|i| Value::scalar(i as i32))
            .unwrap_or(Value::Null),
        q::Value::Float(f) => Value::scalar(*f),
        q::Value::String(s) => Value::scalar(s.as_str()),
        q::Value::Boolean(b) => Value::scalar(*b),
        q::Value::Null => Value::Null,
        q::Value::Enum(name) => Value::scalar(name.as_str()),
        q::Value::List(items) => Value::list(
            items
                .iter()
                .map(|item| literal_to_value(item, variables))
                .collect(),
        ),
        q::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), literal_to_value(v, variables)))
                .collect(),
        ),
    }
}

/// Per-call information handed to field resolvers and middleware.
pub struct ResolveInfo<'a, 'c> {
    /// The executing schema.
    pub schema: &'a SchemaType,
    /// The AST node of the field being resolved.
    pub ast_node: &'a ast::Field<'a>,
    /// The query's variable values.
    pub variables: &'c Variables,
    /// The response path of the field being resolved.
    pub path: &'c [PathSegment],
}

/// Immutable per-query context: schema lookups, the fragment table, merged
/// variable values, and the root value.
pub(crate) struct ExecutionContext<'a> {
    pub schema: &'a SchemaType,
    pub fragments: FnvHashMap<&'a str, &'a ast::FragmentDefinition<'a>>,
    pub variables: Variables,
    pub root_value: &'a Value,
    /// Whether `@defer` parks frames or is resolved in place.
    pub defer_enabled: bool,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        schema: &'a SchemaType,
        document: &'a ast::Document<'a>,
        operation: &Operation<'a>,
        variables: &Variables,
        root_value: &'a Value,
        defer_enabled: bool,
    ) -> Self {
        let fragments = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                q::Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
                q::Definition::Operation(_) => None,
            })
            .collect();

        let mut variables = variables.clone();
        for def in operation.variable_definitions {
            if let Some(default) = &def.default_value {
                if !variables.contains_key(def.name.as_str()) {
                    let value = literal_to_value(default, &Variables::new());
                    variables.insert(def.name.clone(), value);
                }
            }
        }

        Self {
            schema,
            fragments,
            variables,
            root_value,
            defer_enabled,
        }
    }

    pub(crate) fn fragment(&self, name: &str) -> Option<&'a ast::FragmentDefinition<'a>> {
        self.fragments.get(name).copied()
    }
}

/// A single sequential pass of the executor.
///
/// Owns the errors produced on the pass and the frames parked by `@defer`
/// for a later pass. Not an OS thread: the whole traversal runs on the
/// caller's stack.
#[derive(Default)]
pub(crate) struct ExecutionPass<'a> {
    pub errors: Vec<ExecutionError>,
    pub deferred: Vec<DeferredFrame<'a>>,
}

impl ExecutionPass<'_> {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

/// Snapshot of one deferred traversal step, kept verbatim until its pass.
pub(crate) struct DeferredFrame<'a> {
    /// The merged field group sharing the parked response key.
    pub fields: Vec<&'a ast::Field<'a>>,
    /// The object type the field is selected on.
    pub parent_type: &'a meta::MetaType,
    /// The value the field will be resolved against.
    pub parent_value: Value,
    /// The response path of the parked field, response key included.
    pub path: Vec<PathSegment>,
}
