//! Aliases and helpers over the query AST produced by the external parser.
//!
//! Parsing and validation are collaborators, not part of this crate: the
//! executor consumes [`graphql_parser`]'s query AST as-is.

use graphql_parser::{Pos, query as q};

use crate::GraphQLError;

/// A parsed executable document.
pub type Document<'a> = q::Document<'a, String>;
/// An ordered group of selections nested under a field or operation.
pub type SelectionSet<'a> = q::SelectionSet<'a, String>;
/// A single member of a [`SelectionSet`].
pub type Selection<'a> = q::Selection<'a, String>;
/// A field selection node.
pub type Field<'a> = q::Field<'a, String>;
/// A named fragment definition.
pub type FragmentDefinition<'a> = q::FragmentDefinition<'a, String>;
/// A directive attached to a selection node.
pub type Directive<'a> = q::Directive<'a, String>;
/// A literal (or variable reference) appearing in the query source.
pub type InputLiteral<'a> = q::Value<'a, String>;
/// A variable declared by an operation.
pub type VariableDefinition<'a> = q::VariableDefinition<'a, String>;

/// The kind of an executable operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    /// A read-only operation.
    Query,
    /// A write followed by a fetch.
    Mutation,
    /// An event stream; not executable by this engine.
    Subscription,
}

/// A borrowed view of one executable operation in a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct Operation<'a> {
    /// What kind of operation this is.
    pub operation_type: OperationType,
    /// The operation name, if one was given.
    pub name: Option<&'a str>,
    /// Variables declared by the operation.
    pub variable_definitions: &'a [VariableDefinition<'a>],
    /// The top-level selections.
    pub selection_set: &'a SelectionSet<'a>,
    /// Where the operation starts in the source.
    pub position: Pos,
}

fn operation_view<'a>(op: &'a q::OperationDefinition<'a, String>) -> Operation<'a> {
    match op {
        q::OperationDefinition::SelectionSet(set) => Operation {
            operation_type: OperationType::Query,
            name: None,
            variable_definitions: &[],
            selection_set: set,
            position: set.span.0,
        },
        q::OperationDefinition::Query(query) => Operation {
            operation_type: OperationType::Query,
            name: query.name.as_deref(),
            variable_definitions: &query.variable_definitions,
            selection_set: &query.selection_set,
            position: query.position,
        },
        q::OperationDefinition::Mutation(mutation) => Operation {
            operation_type: OperationType::Mutation,
            name: mutation.name.as_deref(),
            variable_definitions: &mutation.variable_definitions,
            selection_set: &mutation.selection_set,
            position: mutation.position,
        },
        q::OperationDefinition::Subscription(subscription) => Operation {
            operation_type: OperationType::Subscription,
            name: subscription.name.as_deref(),
            variable_definitions: &subscription.variable_definitions,
            selection_set: &subscription.selection_set,
            position: subscription.position,
        },
    }
}

/// Finds the operation to execute in a document.
///
/// Without an `operation_name` the document must contain exactly one
/// operation.
pub fn get_operation<'a>(
    document: &'a Document<'a>,
    operation_name: Option<&str>,
) -> Result<Operation<'a>, GraphQLError> {
    let mut operation = None;
    for def in &document.definitions {
        if let q::Definition::Operation(op) = def {
            if operation_name.is_none() && operation.is_some() {
                return Err(GraphQLError::MultipleOperationsProvided);
            }
            let view = operation_view(op);
            if operation_name.is_none() || view.name == operation_name {
                operation = Some(view);
            }
        }
    }
    operation.ok_or(GraphQLError::UnknownOperationName)
}

/// The name a field contributes to the response object: its alias if present,
/// else its name.
pub fn response_key<'a>(field: &'a Field<'a>) -> &'a str {
    field.alias.as_deref().unwrap_or(&field.name)
}

pub(crate) fn type_condition_name<'a>(condition: &'a q::TypeCondition<'a, String>) -> &'a str {
    let q::TypeCondition::On(name) = condition;
    name
}
