//! Runtime applicability of fragment type conditions.

use crate::{schema::meta::MetaType, schema::model::SchemaType, value::Value};

/// Resolves the concrete type to use when applying a fragment whose type
/// condition is `inner` at a position of type `outer` holding `value`.
///
/// Returns `None` when the fragment does not apply to the value. First match
/// wins:
///
/// 1. `outer` is a union: whatever the union resolves the value to.
/// 2. `inner` is a union containing `outer`: `outer` itself.
/// 3. `inner` is an interface: whatever the interface resolves the value to.
/// 4. `inner` and `outer` are the same type: `outer`.
pub(crate) fn resolve<'s>(
    schema: &'s SchemaType,
    value: &Value,
    inner: &'s MetaType,
    outer: &'s MetaType,
) -> Option<&'s MetaType> {
    if let MetaType::Union(_) = outer {
        return outer.resolve_concrete(value, schema);
    }
    match inner {
        MetaType::Union(u) if u.includes(outer.name()) => Some(outer),
        MetaType::Interface(_) => inner.resolve_concrete(value, schema),
        _ if inner.name() == outer.name() => Some(outer),
        _ => None,
    }
}
