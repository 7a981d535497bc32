//! Field resolution through the middleware chain, and type-directed value
//! completion with non-null bubbling.

use std::sync::Arc;

use tracing::trace;

use crate::{
    GraphQLError,
    ast,
    executor::{
        Arguments, DeferredFrame, ExecutionContext, ExecutionError, ExecutionPass,
        ExecutionResult, FieldError, PathSegment, ResolveInfo, ResolverError, flatten,
    },
    schema::meta,
    value::{Object, Value},
};

/// A middleware step wrapping every field resolution.
///
/// Receives the field being resolved and the rest of the chain; it either
/// calls [`Next::run`] or short-circuits with its own result.
pub type Middleware =
    Arc<dyn for<'a, 'c> Fn(&FieldArguments<'a, 'c>, &Next<'a, 'c>) -> ExecutionResult + Send + Sync>;

/// Everything a middleware step can see about the field being resolved.
pub struct FieldArguments<'a, 'c> {
    /// The object type the field is selected on.
    pub parent_type: &'a meta::MetaType,
    /// The value the field is resolved against.
    pub parent_value: &'c Value,
    /// The schema definition of the field.
    pub field: &'a meta::Field,
    /// The materialised argument values.
    pub arguments: &'c Arguments,
    /// Per-call resolution information.
    pub info: &'c ResolveInfo<'a, 'c>,
}

/// The remainder of the middleware chain, terminating in the field's
/// resolver.
pub struct Next<'a, 'c> {
    chain: &'a [Middleware],
    _marker: std::marker::PhantomData<&'c ()>,
}

impl<'a, 'c> Next<'a, 'c> {
    /// Runs the rest of the chain.
    pub fn run(&self, args: &FieldArguments<'a, 'c>) -> ExecutionResult {
        match self.chain.split_first() {
            Some((step, rest)) => step(args, &Next { chain: rest, _marker: std::marker::PhantomData }),
            None => match &args.field.resolver {
                Some(resolve) => resolve(args.parent_value, args.arguments, args.info),
                None => Ok(default_resolve(args.parent_value, &args.field.name)),
            },
        }
    }
}

/// Property lookup on the parent object value, the fallback for fields
/// declared without a resolver.
fn default_resolve(parent: &Value, name: &str) -> Value {
    parent
        .as_object_value()
        .and_then(|obj| obj.get_field_value(name))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Non-local exits of the resolution core.
pub(crate) enum ResolveFailure {
    /// A null escaped from a non-null position; caught at the nearest
    /// nullable enclosing one. Carries the error still to be recorded, or
    /// `None` when a descendant error already covers this bubble.
    Bubble(Option<ExecutionError>),
    /// Aborts the whole query.
    Fatal(GraphQLError),
}

pub(crate) type ResolveResult<T> = Result<T, ResolveFailure>;

/// What a field resolver produced.
pub(crate) enum FieldOutcome {
    /// A value, possibly null.
    Value(Value),
    /// The resolver raised; the error is already recorded on the pass.
    Errored,
}

/// Resolves an operation's top-level selection set, converting an escaped
/// non-null bubble into a null `"data"` value.
pub(crate) fn resolve_root<'a>(
    ctx: &ExecutionContext<'a>,
    pass: &mut ExecutionPass<'a>,
    root_type: &'a meta::MetaType,
    selection_set: &'a ast::SelectionSet<'a>,
) -> Result<Value, GraphQLError> {
    let mut path = Vec::new();
    match resolve_selection_set(ctx, pass, root_type, ctx.root_value, &[selection_set], &mut path) {
        Ok(value) => Ok(value),
        Err(ResolveFailure::Bubble(error)) => {
            if let Some(error) = error {
                pass.errors.push(error);
            }
            Ok(Value::Null)
        }
        Err(ResolveFailure::Fatal(error)) => Err(error),
    }
}

/// Resolves flattened selections against `object_value`, producing the
/// response object.
///
/// `object_type` must be a concrete object type. Fields carrying `@defer`
/// are parked on the pass when deferral is enabled; their keys are left out
/// of the produced object.
pub(crate) fn resolve_selection_set<'a>(
    ctx: &ExecutionContext<'a>,
    pass: &mut ExecutionPass<'a>,
    object_type: &'a meta::MetaType,
    object_value: &Value,
    selection_sets: &[&'a ast::SelectionSet<'a>],
    path: &mut Vec<PathSegment>,
) -> ResolveResult<Value> {
    let grouped = flatten::collect_fields(ctx, object_type, object_value, selection_sets)?;
    let mut object = Object::with_capacity(grouped.len());

    for (response_key, fields) in &grouped {
        let node = fields[0];

        if node.name == "__typename" {
            object.add_field(*response_key, Value::scalar(object_type.name()));
            continue;
        }

        let field_meta = object_type.field_by_name(&node.name).ok_or_else(|| {
            ResolveFailure::Fatal(GraphQLError::UndefinedField {
                type_name: object_type.name().into(),
                field_name: node.name.clone(),
            })
        })?;

        if ctx.defer_enabled && flatten::is_deferred(&node.directives) {
            let mut frame_path = path.clone();
            frame_path.push(PathSegment::Key((*response_key).into()));
            trace!(field = *response_key, "parked deferred field");
            pass.deferred.push(DeferredFrame {
                fields: fields.clone(),
                parent_type: object_type,
                parent_value: object_value.clone(),
                path: frame_path,
            });
            continue;
        }

        path.push(PathSegment::Key((*response_key).into()));
        let completed = resolve_field(ctx, pass, object_type, object_value, field_meta, node, path)
            .and_then(|outcome| {
                complete_value(ctx, pass, fields, &field_meta.field_type, outcome, path)
            });
        path.pop();

        match completed {
            Ok(value) => {
                object.add_field(*response_key, value);
            }
            Err(ResolveFailure::Bubble(error)) => {
                if field_meta.field_type.is_non_null() {
                    return Err(ResolveFailure::Bubble(error));
                }
                if let Some(error) = error {
                    pass.errors.push(error);
                }
                object.add_field(*response_key, Value::Null);
            }
            Err(fatal) => return Err(fatal),
        }
    }

    Ok(Value::Object(object))
}

/// Invokes the middleware chain terminating in the field's resolver.
///
/// A [`ResolverError::Execution`] is captured here: recorded on the pass
/// and turned into an errored outcome. Fatal errors abort.
pub(crate) fn resolve_field<'a>(
    ctx: &ExecutionContext<'a>,
    pass: &mut ExecutionPass<'a>,
    parent_type: &'a meta::MetaType,
    parent_value: &Value,
    field_meta: &'a meta::Field,
    node: &'a ast::Field<'a>,
    path: &[PathSegment],
) -> ResolveResult<FieldOutcome> {
    let arguments = Arguments::new(&node.arguments, &field_meta.arguments, &ctx.variables);
    let info = ResolveInfo {
        schema: ctx.schema,
        ast_node: node,
        variables: &ctx.variables,
        path,
    };
    let args = FieldArguments {
        parent_type,
        parent_value,
        field: field_meta,
        arguments: &arguments,
        info: &info,
    };

    match (Next { chain: ctx.schema.middleware(), _marker: std::marker::PhantomData }).run(&args) {
        Ok(value) => Ok(FieldOutcome::Value(value)),
        Err(ResolverError::Execution(error)) => {
            pass.errors
                .push(ExecutionError::new(node.position, path.to_vec(), error));
            Ok(FieldOutcome::Errored)
        }
        Err(ResolverError::Fatal(error)) => {
            Err(ResolveFailure::Fatal(GraphQLError::Aborted(error)))
        }
    }
}

/// Maps a resolved value to the response shape dictated by `ty`.
///
/// Nulls (and errored outcomes) meeting a non-null wrapper escape as a
/// bubble; the nearest nullable enclosing position catches it.
pub(crate) fn complete_value<'a>(
    ctx: &ExecutionContext<'a>,
    pass: &mut ExecutionPass<'a>,
    fields: &[&'a ast::Field<'a>],
    ty: &'a meta::Type,
    outcome: FieldOutcome,
    path: &mut Vec<PathSegment>,
) -> ResolveResult<Value> {
    let node = fields[0];
    let value = match outcome {
        FieldOutcome::Errored => {
            return match ty {
                meta::Type::NonNull(_) => Err(ResolveFailure::Bubble(None)),
                _ => Ok(Value::Null),
            };
        }
        FieldOutcome::Value(Value::Null) => {
            return match ty {
                meta::Type::NonNull(_) => {
                    Err(ResolveFailure::Bubble(Some(invalid_null(node, path))))
                }
                _ => Ok(Value::Null),
            };
        }
        FieldOutcome::Value(value) => value,
    };

    match ty {
        meta::Type::NonNull(inner) => {
            complete_value(ctx, pass, fields, inner, FieldOutcome::Value(value), path)
        }

        meta::Type::List(inner) => {
            let Value::List(items) = value else {
                let error = ExecutionError::new(
                    node.position,
                    path.clone(),
                    FieldError::from(format!("expected a list value for field {}", node.name)),
                );
                return Err(ResolveFailure::Bubble(Some(error)));
            };
            let mut out = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                path.push(PathSegment::Index(idx));
                let completed =
                    complete_value(ctx, pass, fields, inner, FieldOutcome::Value(item), path);
                path.pop();
                match completed {
                    Ok(value) => out.push(value),
                    Err(ResolveFailure::Bubble(error)) => {
                        if inner.is_non_null() {
                            return Err(ResolveFailure::Bubble(error));
                        }
                        if let Some(error) = error {
                            pass.errors.push(error);
                        }
                        out.push(Value::Null);
                    }
                    Err(fatal) => return Err(fatal),
                }
            }
            Ok(Value::List(out))
        }

        meta::Type::Named(name) => {
            let named = ctx
                .schema
                .type_by_name(name)
                .ok_or_else(|| ResolveFailure::Fatal(GraphQLError::UnknownType(name.to_string())))?;
            match named {
                meta::MetaType::Scalar(scalar) => (scalar.coerce)(&value).map_err(|error| {
                    ResolveFailure::Bubble(Some(ExecutionError::new(
                        node.position,
                        path.clone(),
                        error,
                    )))
                }),

                meta::MetaType::Enum(enum_meta) => {
                    enum_meta.coerce_result(&value).map_err(|error| {
                        ResolveFailure::Bubble(Some(ExecutionError::new(
                            node.position,
                            path.clone(),
                            error,
                        )))
                    })
                }

                meta::MetaType::Object(_) => {
                    let sets = fields.iter().map(|f| &f.selection_set).collect::<Vec<_>>();
                    resolve_selection_set(ctx, pass, named, &value, &sets, path)
                }

                meta::MetaType::Interface(_) | meta::MetaType::Union(_) => {
                    let concrete = named
                        .resolve_concrete(&value, ctx.schema)
                        .filter(|t| matches!(**t, meta::MetaType::Object(_)))
                        .ok_or_else(|| {
                            ResolveFailure::Fatal(GraphQLError::UnresolvedType(
                                named.name().into(),
                            ))
                        })?;
                    let sets = fields.iter().map(|f| &f.selection_set).collect::<Vec<_>>();
                    resolve_selection_set(ctx, pass, concrete, &value, &sets, path)
                }
            }
        }
    }
}

fn invalid_null(node: &ast::Field<'_>, path: &[PathSegment]) -> ExecutionError {
    ExecutionError::new(
        node.position,
        path.to_vec(),
        FieldError::from(format!(
            "Cannot return null for non-nullable field {}",
            node.name,
        )),
    )
}
