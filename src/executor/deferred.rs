//! The deferred strategy: an initial response tree plus JSON patches
//! streamed to a collector as `@defer`red fields resolve.

use std::collections::VecDeque;

use itertools::Itertools as _;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    GraphQLError,
    ast::{self, OperationType},
    executor::{
        DeferredFrame, ExecutionContext, ExecutionError, ExecutionPass, PathSegment, Variables,
        resolve::{self, ResolveFailure},
    },
    schema::model::SchemaType,
    value::{Object, Value},
};

/// Receives incremental response updates as `(path, value)` pairs.
///
/// The first patch carries the whole initial response at the empty path;
/// every later patch addresses a position under `"data"` or `"errors"`. No
/// patch is ever retracted.
pub trait Collector {
    /// Applies one patch to the response being assembled downstream.
    fn patch(&mut self, path: Vec<PathSegment>, value: Value);
}

/// A single incremental response update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Patch {
    /// Where in the response tree the value belongs.
    pub path: Vec<PathSegment>,
    /// The subtree at that position.
    pub value: Value,
}

/// A [`Collector`] buffering patches in memory.
#[derive(Debug, Default)]
pub struct PatchSet {
    patches: Vec<Patch>,
}

impl PatchSet {
    /// Creates an empty [`PatchSet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The patches collected so far, in arrival order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Consumes the set, returning the collected patches.
    pub fn into_patches(self) -> Vec<Patch> {
        self.patches
    }

    /// Reapplies all patches in arrival order, producing the full response
    /// value they describe.
    pub fn reassemble(&self) -> Value {
        let mut root = Value::Null;
        for patch in &self.patches {
            apply_patch(&mut root, &patch.path, patch.value.clone());
        }
        root
    }
}

impl Collector for PatchSet {
    fn patch(&mut self, path: Vec<PathSegment>, value: Value) {
        self.patches.push(Patch { path, value });
    }
}

/// Executes a query with `@defer` honored.
///
/// The initial tree (deferred fields left out) and its errors are returned;
/// patches stream to `collector` as parked fields resolve, phase by phase.
/// Without a collector the strategy still parks and drains defers, folding
/// every patch back into the returned tree, which makes the result equal to
/// the serial strategy's.
///
/// A fatal error aborts the query; no patch is emitted after (or, when the
/// initial phase aborts, at all).
#[tracing::instrument(name = "execute_deferred", level = "debug", skip_all)]
pub fn execute_validated_query_deferred<'a>(
    document: &'a ast::Document<'a>,
    operation_name: Option<&str>,
    schema: &'a SchemaType,
    variables: &Variables,
    root_value: &'a Value,
    mut collector: Option<&mut dyn Collector>,
) -> Result<(Value, Vec<ExecutionError>), GraphQLError> {
    let operation = ast::get_operation(document, operation_name)?;
    if operation.operation_type != OperationType::Query {
        return Err(GraphQLError::NotQuery);
    }

    let ctx = ExecutionContext::new(schema, document, &operation, variables, root_value, true);
    let mut pass = ExecutionPass::new();
    let mut tree = resolve::resolve_root(
        &ctx,
        &mut pass,
        schema.concrete_query_type(),
        operation.selection_set,
    )?;
    let ExecutionPass {
        errors: mut initial_errors,
        deferred,
    } = pass;

    debug!(
        deferred = deferred.len(),
        errors = initial_errors.len(),
        "initial phase resolved"
    );

    if let Some(collector) = collector.as_mut() {
        let mut initial = Object::with_capacity(2);
        initial.add_field("data", tree.clone());
        if !initial_errors.is_empty() {
            initial.add_field(
                "errors",
                Value::list(initial_errors.iter().map(ExecutionError::as_value).collect()),
            );
        }
        collector.patch(Vec::new(), Value::Object(initial));
    }

    let mut error_idx = initial_errors.len();
    let mut queue: VecDeque<DeferredFrame<'a>> = deferred.into();

    while let Some(frame) = queue.pop_front() {
        let mut frame_pass = ExecutionPass::new();
        let value = resolve_deferred_frame(&ctx, &mut frame_pass, &frame)?;
        trace!(
            path = %frame.path.iter().format("."),
            spawned = frame_pass.deferred.len(),
            "drained deferred frame"
        );

        if !value.is_null() {
            match collector.as_mut() {
                Some(collector) => {
                    let mut path = Vec::with_capacity(frame.path.len() + 1);
                    path.push(PathSegment::from("data"));
                    path.extend(frame.path.iter().cloned());
                    collector.patch(path, value);
                }
                None => apply_patch(&mut tree, &frame.path, value),
            }
        }

        for error in frame_pass.errors {
            if let Some(collector) = collector.as_mut() {
                collector.patch(
                    vec![PathSegment::from("errors"), PathSegment::from(error_idx)],
                    error.as_value(),
                );
            } else {
                initial_errors.push(error);
            }
            error_idx += 1;
        }

        queue.extend(frame_pass.deferred);
    }

    Ok((tree, initial_errors))
}

/// Resolves one parked frame on a fresh pass, converting an escaped non-null
/// bubble into a null result with its error recorded on that pass.
fn resolve_deferred_frame<'a>(
    ctx: &ExecutionContext<'a>,
    pass: &mut ExecutionPass<'a>,
    frame: &DeferredFrame<'a>,
) -> Result<Value, GraphQLError> {
    let node = frame.fields[0];
    let field_meta = frame
        .parent_type
        .field_by_name(&node.name)
        .unwrap_or_else(|| panic!("parked field {} vanished from its type", node.name));

    let mut path = frame.path.clone();
    let completed = resolve::resolve_field(
        ctx,
        pass,
        frame.parent_type,
        &frame.parent_value,
        field_meta,
        node,
        &path,
    )
    .and_then(|outcome| {
        resolve::complete_value(ctx, pass, &frame.fields, &field_meta.field_type, outcome, &mut path)
    });

    match completed {
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

/// Merges a patch into a response tree, creating intermediate containers as
/// needed.
fn apply_patch(target: &mut Value, path: &[PathSegment], value: Value) {
    let Some((segment, rest)) = path.split_first() else {
        match (&mut *target, value) {
            (Value::Object(dst), Value::Object(src)) => {
                for (k, v) in src {
                    dst.add_field(k, v);
                }
            }
            (slot, value) => *slot = value,
        }
        return;
    };

    match segment {
        PathSegment::Key(key) => {
            if !matches!(target, Value::Object(_)) {
                *target = Value::Object(Object::with_capacity(1));
            }
            let Value::Object(obj) = target else {
                unreachable!()
            };
            if !obj.contains_field(key) {
                obj.add_field(key.clone(), Value::Null);
            }
            let slot = obj
                .get_mut_field_value(key)
                .expect("key inserted right above");
            apply_patch(slot, rest, value);
        }
        PathSegment::Index(idx) => {
            if !matches!(target, Value::List(_)) {
                *target = Value::List(Vec::new());
            }
            let Value::List(list) = target else {
                unreachable!()
            };
            if list.len() <= *idx {
                list.resize(idx + 1, Value::Null);
            }
            apply_patch(&mut list[*idx], rest, value);
        }
    }
}
