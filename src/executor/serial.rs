//! The serial strategy: one pass producing a complete response tree.

use tracing::debug;

use crate::{
    GraphQLError,
    ast::{self, OperationType},
    executor::{ExecutionContext, ExecutionError, ExecutionPass, Variables, resolve},
    schema::model::SchemaType,
    value::Value,
};

/// Executes an operation of a parsed document to a complete response tree.
///
/// Errors raised by resolvers accumulate in the returned list. Any `@defer`
/// directives encountered are ignored and their fields resolved in place.
#[tracing::instrument(name = "execute", level = "debug", skip_all)]
pub fn execute_validated_query<'a>(
    document: &'a ast::Document<'a>,
    operation_name: Option<&str>,
    schema: &'a SchemaType,
    variables: &Variables,
    root_value: &'a Value,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
    let operation = ast::get_operation(document, operation_name)?;
    let root_type = match operation.operation_type {
        OperationType::Query => schema.concrete_query_type(),
        OperationType::Mutation => schema
            .concrete_mutation_type()
            .expect("no mutation type defined in schema"),
        OperationType::Subscription => return Err(GraphQLError::IsSubscription),
    };

    let ctx = ExecutionContext::new(schema, document, &operation, variables, root_value, false);
    let mut pass = ExecutionPass::new();
    let value = resolve::resolve_root(&ctx, &mut pass, root_type, operation.selection_set)?;

    debug!(errors = pass.errors.len(), "operation resolved");
    Ok((value, pass.errors))
}
