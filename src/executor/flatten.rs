//! Selection flattening: fragment expansion, directive filtering, and
//! response-key grouping.

use graphql_parser::query::{Selection, TypeCondition};
use indexmap::IndexMap;

use crate::{
    GraphQLError,
    ast,
    executor::{Arguments, ExecutionContext, ResolveFailure, typecast},
    schema::meta::MetaType,
    value::Value,
};

/// The ordered result of flattening: one group of field nodes per response
/// key, in first-seen order. The first node of a group decides resolution;
/// the concatenated selection sets of all nodes decide the sub-selection.
pub(crate) type GroupedFields<'a> = IndexMap<&'a str, Vec<&'a ast::Field<'a>>>;

/// Reduces selection sets to an ordered response-key → field-group mapping,
/// expanding fragments whose type condition applies to `object_value` and
/// dropping selections excluded by a directive.
pub(crate) fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &'a MetaType,
    object_value: &Value,
    selection_sets: &[&'a ast::SelectionSet<'a>],
) -> Result<GroupedFields<'a>, ResolveFailure> {
    let mut grouped = GroupedFields::default();
    for set in selection_sets {
        collect_into(ctx, object_type, object_value, set, &mut grouped)?;
    }
    Ok(grouped)
}

fn collect_into<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &'a MetaType,
    object_value: &Value,
    set: &'a ast::SelectionSet<'a>,
    grouped: &mut GroupedFields<'a>,
) -> Result<(), ResolveFailure> {
    for selection in &set.items {
        match selection {
            Selection::Field(field) => {
                if is_skipped(ctx, &field.directives) {
                    continue;
                }
                grouped
                    .entry(ast::response_key(field))
                    .or_default()
                    .push(field);
            }
            Selection::InlineFragment(fragment) => {
                if is_skipped(ctx, &fragment.directives) {
                    continue;
                }
                if fragment_applies(
                    ctx,
                    object_type,
                    object_value,
                    fragment.type_condition.as_ref(),
                )? {
                    collect_into(ctx, object_type, object_value, &fragment.selection_set, grouped)?;
                }
            }
            Selection::FragmentSpread(spread) => {
                if is_skipped(ctx, &spread.directives) {
                    continue;
                }
                let fragment = ctx.fragment(&spread.fragment_name).ok_or_else(|| {
                    ResolveFailure::Fatal(GraphQLError::UnknownFragment(
                        spread.fragment_name.clone(),
                    ))
                })?;
                if fragment_applies(ctx, object_type, object_value, Some(&fragment.type_condition))?
                {
                    collect_into(ctx, object_type, object_value, &fragment.selection_set, grouped)?;
                }
            }
        }
    }
    Ok(())
}

fn fragment_applies<'a>(
    ctx: &ExecutionContext<'a>,
    object_type: &'a MetaType,
    object_value: &Value,
    condition: Option<&'a TypeCondition<'a, String>>,
) -> Result<bool, ResolveFailure> {
    let Some(condition) = condition else {
        return Ok(true);
    };
    let name = ast::type_condition_name(condition);
    let inner = ctx
        .schema
        .type_by_name(name)
        .ok_or_else(|| ResolveFailure::Fatal(GraphQLError::UnknownType(name.into())))?;
    Ok(typecast::resolve(ctx.schema, object_value, inner, object_type).is_some())
}

/// Returns true iff a directive on the node excludes it from the response.
///
/// Unknown directive names are ignored. The first registered directive whose
/// inclusion predicate rejects the node wins.
pub(crate) fn is_skipped(ctx: &ExecutionContext<'_>, directives: &[ast::Directive<'_>]) -> bool {
    directives.iter().any(|directive| {
        ctx.schema
            .directive_by_name(&directive.name)
            .is_some_and(|registered| {
                let args = Arguments::new(&directive.arguments, &registered.arguments, &ctx.variables);
                !(registered.include_proc)(&args)
            })
    })
}

/// Pure AST check for a `@defer` directive; no argument evaluation.
pub(crate) fn is_deferred(directives: &[ast::Directive<'_>]) -> bool {
    directives.iter().any(|directive| directive.name == "defer")
}
