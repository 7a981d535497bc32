//! Types used to describe a GraphQL schema.

use std::fmt;
use std::sync::Arc;

use arcstr::ArcStr;
use derive_more::with_trait::Display;

use crate::{
    executor::{Arguments, ExecutionResult, FieldError, ResolveInfo},
    schema::model::SchemaType,
    value::{ScalarValue, Value},
};

/// GraphQL type kind: the meta type of a type.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum TypeKind {
    /// Leaf values: strings, numbers, booleans, and custom scalars.
    #[display("SCALAR")]
    Scalar,
    /// Types with fields, the bulk of any schema.
    #[display("OBJECT")]
    Object,
    /// Overlapping fields shared between multiple object types.
    #[display("INTERFACE")]
    Interface,
    /// One of a fixed set of object types, resolved at runtime.
    #[display("UNION")]
    Union,
    /// Leaf values drawn from a fixed set of names.
    #[display("ENUM")]
    Enum,
    /// A list wrapping another type.
    #[display("LIST")]
    List,
    /// A wrapper forbidding `null`.
    #[display("NON_NULL")]
    NonNull,
}

/// A type literal: a named type, possibly wrapped in list and non-null
/// modifiers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    /// A reference to a named type in the schema.
    Named(ArcStr),
    /// A list of the inner type.
    List(Box<Type>),
    /// The inner type, with `null` forbidden.
    NonNull(Box<Type>),
}

impl Type {
    /// Creates a nullable named [`Type`] literal.
    pub fn named(name: impl Into<ArcStr>) -> Self {
        Self::Named(name.into())
    }

    /// Wraps this [`Type`] in a list.
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Wraps this [`Type`] as non-null.
    pub fn non_null(self) -> Self {
        Self::NonNull(Box::new(self))
    }

    /// Indicates whether the outermost wrapper forbids `null`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns the name at the core of this literal, unwrapping all
    /// modifiers.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.innermost_name(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// Shortcut for a field resolver function.
///
/// Receives the parent value, the materialised arguments, and per-call
/// resolution info.
pub type ResolverFn =
    Arc<dyn Fn(&Value, &Arguments, &ResolveInfo<'_, '_>) -> ExecutionResult + Send + Sync>;

/// Shortcut for a result-coercion function on a scalar type.
pub type CoerceResultFn = fn(&Value) -> Result<Value, FieldError>;

/// Shortcut for the runtime type-resolution function of an abstract type.
///
/// Returns the name of the concrete object type the value belongs to.
pub type TypeResolverFn = Arc<dyn Fn(&Value, &SchemaType) -> Option<String> + Send + Sync>;

/// Scalar type metadata.
#[derive(Clone, Debug)]
pub struct ScalarMeta {
    /// The name of the scalar.
    pub name: ArcStr,
    /// The optional description of the scalar.
    pub description: Option<ArcStr>,
    pub(crate) coerce: CoerceResultFn,
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] with the given result-coercion function.
    pub fn new(name: impl Into<ArcStr>, coerce: CoerceResultFn) -> Self {
        Self {
            name: name.into(),
            description: None,
            coerce,
        }
    }

    /// Sets the description of this scalar.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Metadata for a single value in an enum.
#[derive(Clone, Debug)]
pub struct EnumValue {
    /// The string representation of the value in responses.
    pub name: ArcStr,
    /// The optional description of this enum value.
    pub description: Option<ArcStr>,
}

/// Enum type metadata.
#[derive(Clone, Debug)]
pub struct EnumMeta {
    /// The name of the enum.
    pub name: ArcStr,
    /// The optional description of the enum.
    pub description: Option<ArcStr>,
    /// The declared values.
    pub values: Vec<EnumValue>,
}

impl EnumMeta {
    /// Builds a new [`EnumMeta`] with no values.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: Vec::new(),
        }
    }

    /// Adds a value to this enum.
    #[must_use]
    pub fn value(mut self, name: impl Into<ArcStr>) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            description: None,
        });
        self
    }

    /// Sets the description of this enum.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn coerce_result(&self, value: &Value) -> Result<Value, FieldError> {
        match value {
            Value::Scalar(ScalarValue::String(s))
                if self.values.iter().any(|v| v.name.as_str() == s.as_str()) =>
            {
                Ok(value.clone())
            }
            other => Err(format!("cannot coerce {other} to a value of enum {}", self.name).into()),
        }
    }
}

/// Metadata for an argument to a field or directive.
#[derive(Clone, Debug)]
pub struct Argument {
    /// The name of the argument.
    pub name: ArcStr,
    /// The optional description of the argument.
    pub description: Option<ArcStr>,
    /// The declared type of the argument.
    pub arg_type: Type,
    /// The value used when the query provides none.
    pub default_value: Option<Value>,
}

impl Argument {
    /// Builds a new [`Argument`] of the given type.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the default value of this argument.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the description of this argument.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Metadata for a field.
#[derive(Clone, derive_more::Debug)]
pub struct Field {
    /// The name of the field.
    pub name: ArcStr,
    /// The optional description of the field.
    pub description: Option<ArcStr>,
    /// The declared arguments of the field.
    pub arguments: Vec<Argument>,
    /// The declared result type of the field.
    pub field_type: Type,
    /// How the field computes its value; absent fields fall back to property
    /// lookup on the parent object value.
    #[debug(skip)]
    pub resolver: Option<ResolverFn>,
}

impl Field {
    /// Builds a new [`Field`] of the given type, with no resolver.
    pub fn new(name: impl Into<ArcStr>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            field_type,
            resolver: None,
        }
    }

    /// Adds an argument to this field.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets the description of this field.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the resolver of this field.
    #[must_use]
    pub fn resolver<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Arguments, &ResolveInfo<'_, '_>) -> ExecutionResult + Send + Sync + 'static,
    {
        self.resolver = Some(Arc::new(f));
        self
    }
}

/// Object type metadata.
#[derive(Clone, Debug)]
pub struct ObjectMeta {
    /// The name of the object type.
    pub name: ArcStr,
    /// The optional description of the object type.
    pub description: Option<ArcStr>,
    /// The declared fields.
    pub fields: Vec<Field>,
    /// Names of the interfaces this object implements.
    pub interface_names: Vec<ArcStr>,
}

impl ObjectMeta {
    /// Builds a new [`ObjectMeta`] with no fields.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            interface_names: Vec::new(),
        }
    }

    /// Adds a field to this object type.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares that this object implements the named interface.
    #[must_use]
    pub fn interface(mut self, name: impl Into<ArcStr>) -> Self {
        self.interface_names.push(name.into());
        self
    }

    /// Sets the description of this object type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Interface type metadata.
#[derive(Clone, derive_more::Debug)]
pub struct InterfaceMeta {
    /// The name of the interface.
    pub name: ArcStr,
    /// The optional description of the interface.
    pub description: Option<ArcStr>,
    /// The fields shared by all implementors.
    pub fields: Vec<Field>,
    #[debug(skip)]
    pub(crate) resolve_type: Option<TypeResolverFn>,
}

impl InterfaceMeta {
    /// Builds a new [`InterfaceMeta`] with no fields.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            resolve_type: None,
        }
    }

    /// Adds a field to this interface.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the runtime type-resolution function of this interface.
    ///
    /// Without one, the `"__typename"` property of the value decides.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &SchemaType) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Sets the description of this interface.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Union type metadata.
#[derive(Clone, derive_more::Debug)]
pub struct UnionMeta {
    /// The name of the union.
    pub name: ArcStr,
    /// Names of the object types this union covers.
    pub of_type_names: Vec<ArcStr>,
    /// The optional description of the union.
    pub description: Option<ArcStr>,
    #[debug(skip)]
    pub(crate) resolve_type: Option<TypeResolverFn>,
}

impl UnionMeta {
    /// Builds a new [`UnionMeta`] over the named object types.
    pub fn new<N: Into<ArcStr>>(name: impl Into<ArcStr>, of_types: impl IntoIterator<Item = N>) -> Self {
        Self {
            name: name.into(),
            of_type_names: of_types.into_iter().map(Into::into).collect(),
            description: None,
            resolve_type: None,
        }
    }

    /// Sets the runtime type-resolution function of this union.
    ///
    /// Without one, the `"__typename"` property of the value decides.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &SchemaType) -> Option<String> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Indicates whether the named object type is one of this union's
    /// members.
    pub fn includes(&self, type_name: &str) -> bool {
        self.of_type_names.iter().any(|n| n.as_str() == type_name)
    }
}

/// Generic type metadata.
///
/// Every registered type is named; list and non-null wrappers appear only in
/// [`Type`] literals.
#[derive(Clone, Debug)]
pub enum MetaType {
    /// A scalar type.
    Scalar(ScalarMeta),
    /// An enum type.
    Enum(EnumMeta),
    /// An object type.
    Object(ObjectMeta),
    /// An interface type.
    Interface(InterfaceMeta),
    /// A union type.
    Union(UnionMeta),
}

impl MetaType {
    /// The name of the type.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. }) => name,
        }
    }

    /// The description of the type, if any.
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            Self::Scalar(ScalarMeta { description, .. })
            | Self::Enum(EnumMeta { description, .. })
            | Self::Object(ObjectMeta { description, .. })
            | Self::Interface(InterfaceMeta { description, .. })
            | Self::Union(UnionMeta { description, .. }) => description.as_ref(),
        }
    }

    /// The [`TypeKind`] of the type.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Enum(_) => TypeKind::Enum,
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
        }
    }

    /// Indicates whether the type requires runtime type resolution.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Accesses a field's metadata given its name.
    ///
    /// Only objects and interfaces have fields; `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            Self::Object(ObjectMeta { fields, .. })
            | Self::Interface(InterfaceMeta { fields, .. }) => {
                fields.iter().find(|f| f.name.as_str() == name)
            }
            _ => None,
        }
    }

    /// Resolves the concrete object type a runtime value of this abstract
    /// type belongs to.
    ///
    /// Uses the registered type-resolution function, falling back to the
    /// value's `"__typename"` property. `None` for non-abstract types and
    /// unresolvable values.
    pub fn resolve_concrete<'s>(&self, value: &Value, schema: &'s SchemaType) -> Option<&'s MetaType> {
        let resolver = match self {
            Self::Interface(InterfaceMeta { resolve_type, .. })
            | Self::Union(UnionMeta { resolve_type, .. }) => resolve_type.as_ref(),
            _ => return None,
        };
        let name = match resolver {
            Some(f) => f(value, schema),
            None => typename_property(value),
        }?;
        schema.type_by_name(&name)
    }
}

fn typename_property(value: &Value) -> Option<String> {
    value
        .as_object_value()?
        .get_field_value("__typename")?
        .as_string_value()
        .map(str::to_owned)
}

// Result coercion for the built-in scalars. Resolvers are trusted to return
// the right shape; anything else is a field error.

fn coerce_int(value: &Value) -> Result<Value, FieldError> {
    match value {
        Value::Scalar(ScalarValue::Int(_)) => Ok(value.clone()),
        other => Err(format!("cannot coerce {other} to Int").into()),
    }
}

fn coerce_float(value: &Value) -> Result<Value, FieldError> {
    match value {
        Value::Scalar(ScalarValue::Float(_)) => Ok(value.clone()),
        Value::Scalar(ScalarValue::Int(i)) => Ok(Value::scalar(f64::from(*i))),
        other => Err(format!("cannot coerce {other} to Float").into()),
    }
}

fn coerce_string(value: &Value) -> Result<Value, FieldError> {
    match value {
        Value::Scalar(ScalarValue::String(_)) => Ok(value.clone()),
        other => Err(format!("cannot coerce {other} to String").into()),
    }
}

fn coerce_boolean(value: &Value) -> Result<Value, FieldError> {
    match value {
        Value::Scalar(ScalarValue::Boolean(_)) => Ok(value.clone()),
        other => Err(format!("cannot coerce {other} to Boolean").into()),
    }
}

fn coerce_id(value: &Value) -> Result<Value, FieldError> {
    match value {
        Value::Scalar(ScalarValue::String(_)) => Ok(value.clone()),
        Value::Scalar(ScalarValue::Int(i)) => Ok(Value::scalar(i.to_string())),
        other => Err(format!("cannot coerce {other} to ID").into()),
    }
}

pub(crate) fn builtin_scalars() -> Vec<MetaType> {
    vec![
        MetaType::Scalar(ScalarMeta::new("Int", coerce_int)),
        MetaType::Scalar(ScalarMeta::new("Float", coerce_float)),
        MetaType::Scalar(ScalarMeta::new("String", coerce_string)),
        MetaType::Scalar(ScalarMeta::new("Boolean", coerce_boolean)),
        MetaType::Scalar(ScalarMeta::new("ID", coerce_id)),
    ]
}
