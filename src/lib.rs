//! GraphQL query execution engine with incremental `@defer` delivery.
//!
//! The engine traverses a validated operation AST against a typed schema and
//! a root value, producing a JSON-shaped result tree. Fields annotated with
//! `@defer` can be excluded from the initial response and later emitted as
//! JSON patches (path + value pairs) to a streaming [`Collector`], so large
//! or slow portions of a response arrive incrementally.
//!
//! Query parsing is delegated to [`graphql_parser`]; validation is assumed to
//! have happened upstream. Schemas are built dynamically:
//!
//! ```rust
//! use graphql_defer::{Field, ObjectMeta, SchemaType, Type, Value, Variables};
//!
//! let schema = SchemaType::new(
//!     ObjectMeta::new("Query").field(
//!         Field::new("answer", Type::named("Int").non_null())
//!             .resolver(|_, _, _| Ok(Value::scalar(42))),
//!     ),
//! );
//!
//! let (data, errors) =
//!     graphql_defer::execute_sync("{ answer }", None, &schema, &Variables::new(), &Value::Null)
//!         .unwrap();
//! assert!(errors.is_empty());
//! assert_eq!(data.to_string(), r#"{"answer": 42}"#);
//! ```

pub mod ast;
pub mod executor;
pub mod integrations;
mod introspection;
pub mod schema;
pub mod value;

#[cfg(test)]
mod executor_tests;

use derive_more::with_trait::Display;
use graphql_parser::query::ParseError;

pub use graphql_parser;
pub use graphql_parser::Pos;

pub use crate::{
    ast::{Document, Operation, OperationType, get_operation, response_key},
    executor::{
        Arguments, Collector, ExecutionError, ExecutionResult, FieldArguments, FieldError,
        Middleware, Next, Patch, PatchSet, PathSegment, ResolveInfo, ResolverError, Variables,
        execute_validated_query, execute_validated_query_deferred,
    },
    schema::{
        meta::{
            Argument, CoerceResultFn, EnumMeta, EnumValue, Field, InterfaceMeta, MetaType,
            ObjectMeta, ResolverFn, ScalarMeta, Type, TypeKind, TypeResolverFn, UnionMeta,
        },
        model::{DirectiveLocation, DirectiveType, IncludeProcFn, SchemaType},
    },
    value::{Object, ScalarValue, Value},
};

/// An error that prevented query execution.
#[derive(Debug, Display)]
pub enum GraphQLError {
    /// The query document failed to parse.
    #[display("{_0}")]
    ParseError(ParseError),
    /// The document contains no operation matching the requested name.
    #[display("Unknown operation name")]
    UnknownOperationName,
    /// The document contains several operations but none was named.
    #[display("Multiple operations provided")]
    MultipleOperationsProvided,
    /// Subscriptions cannot be executed by this engine.
    #[display("Operation is a subscription")]
    IsSubscription,
    /// The deferred strategy only executes queries.
    #[display("Operation is not a query")]
    NotQuery,
    /// The query referenced a type the schema does not define.
    #[display("Unknown type {_0:?}")]
    UnknownType(String),
    /// The query spread a fragment the document does not define.
    #[display("Unknown fragment {_0:?}")]
    UnknownFragment(String),
    /// The query selected a field its type does not define.
    #[display("Field {field_name:?} not found on type {type_name:?}")]
    UndefinedField {
        /// The type the lookup ran against.
        type_name: String,
        /// The missing field.
        field_name: String,
    },
    /// An abstract type failed to resolve to a concrete object type.
    #[display("Could not resolve the concrete type of abstract type {_0:?}")]
    UnresolvedType(String),
    /// A resolver or middleware raised a fatal error.
    #[display("Query aborted: {}", _0.message())]
    Aborted(FieldError),
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for GraphQLError {
    fn from(e: ParseError) -> Self {
        Self::ParseError(e)
    }
}

/// Parses and executes a query synchronously against the provided schema,
/// returning the complete response tree and the errors collected along the
/// way.
pub fn execute_sync(
    source: &str,
    operation_name: Option<&str>,
    schema: &SchemaType,
    variables: &Variables,
    root_value: &Value,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
    let document = graphql_parser::parse_query::<String>(source)?;
    execute_validated_query(&document, operation_name, schema, variables, root_value)
}

/// Parses and executes a query with `@defer` honored, streaming patches to
/// `collector`.
///
/// Returns the initial response tree (deferred fields left out) and its
/// errors; the collector receives the initial response as a patch at the
/// empty path, followed by one patch per resolved deferred field and per
/// later error.
pub fn execute_streamed(
    source: &str,
    operation_name: Option<&str>,
    schema: &SchemaType,
    variables: &Variables,
    root_value: &Value,
    collector: &mut dyn Collector,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
    let document = graphql_parser::parse_query::<String>(source)?;
    execute_validated_query_deferred(
        &document,
        operation_name,
        schema,
        variables,
        root_value,
        Some(collector),
    )
}
