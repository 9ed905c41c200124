//! The loosely shaped resolver and subscription maps callers hand to this crate.
//!
//! Function values are reference counted: cloning a map, attaching it, or extracting it back out
//! of a schema shares the same functions, and two functions compare equal only if they are the
//! same allocation.

use std::fmt;
use std::sync::Arc;

use futures::stream::BoxStream;
use indexmap::IndexMap;
use serde_json_bytes::ByteString;
use serde_json_bytes::Value;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Field arguments, already coerced by the execution engine.
pub type JsonMap = serde_json_bytes::Map<ByteString, Value>;

/// Keys starting with this prefix in a type's resolver map are type-level properties.
pub const META_FIELD_PREFIX: &str = "__";
pub const IS_TYPE_OF: &str = "__isTypeOf";
pub const RESOLVE_TYPE: &str = "__resolveType";

/// What a resolve or subscribe function is called with.
#[derive(Debug, Clone, Copy)]
pub struct ResolverContext<'a> {
    pub type_name: &'a str,
    pub field_name: &'a str,
    pub parent: &'a Value,
    pub arguments: &'a JsonMap,
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        type_name: &'a str,
        field_name: &'a str,
        parent: &'a Value,
        arguments: &'a JsonMap,
    ) -> Self {
        Self {
            type_name,
            field_name,
            parent,
            arguments,
        }
    }
}

macro_rules! shared_fn {
    ($(#[$doc:meta])* $name:ident($($args:ty),*) -> $output:ty) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn Fn($($args),*) -> $output + Send + Sync>);

        impl $name {
            pub fn new(function: impl Fn($($args),*) -> $output + Send + Sync + 'static) -> Self {
                Self(Arc::new(function))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:p})"), Arc::as_ptr(&self.0))
            }
        }
    };
}

shared_fn! {
    /// Resolves a field value. Also used for `__isTypeOf` (returns a boolean) and
    /// `__resolveType` (returns the name of the concrete object type).
    ResolveFn(&ResolverContext<'_>) -> Result<Value, BoxError>
}

shared_fn! {
    /// Produces the event stream of a subscription field.
    SubscribeFn(&ResolverContext<'_>) -> Result<BoxStream<'static, Value>, BoxError>
}

shared_fn! {
    /// One of the serialize / parse conversions of a custom scalar.
    ScalarFn(&Value) -> Result<Value, BoxError>
}

impl ResolveFn {
    pub fn call(&self, context: &ResolverContext<'_>) -> Result<Value, BoxError> {
        (self.0)(context)
    }
}

impl SubscribeFn {
    pub fn call(
        &self,
        context: &ResolverContext<'_>,
    ) -> Result<BoxStream<'static, Value>, BoxError> {
        (self.0)(context)
    }
}

impl ScalarFn {
    pub fn call(&self, value: &Value) -> Result<Value, BoxError> {
        (self.0)(value)
    }
}

/// A value in a resolver or subscription map.
///
/// Maps can be assembled from untyped sources, so a leaf is not guaranteed to be callable.
/// Attaching a [`Leaf::Value`] where a function is expected fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf<F> {
    Function(F),
    Value(Value),
}

impl<F> Leaf<F> {
    pub fn as_function(&self) -> Option<&F> {
        match self {
            Leaf::Function(function) => Some(function),
            Leaf::Value(_) => None,
        }
    }
}

impl<F> From<F> for Leaf<F> {
    fn from(function: F) -> Self {
        Leaf::Function(function)
    }
}

/// Serialize and parse behavior of a custom scalar. Unset properties keep whatever the schema
/// already has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarBehavior {
    pub description: Option<String>,
    pub serialize: Option<ScalarFn>,
    pub parse_value: Option<ScalarFn>,
    pub parse_literal: Option<ScalarFn>,
}

impl ScalarBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_serialize(
        mut self,
        function: impl Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.serialize = Some(ScalarFn::new(function));
        self
    }

    pub fn with_parse_value(
        mut self,
        function: impl Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.parse_value = Some(ScalarFn::new(function));
        self
    }

    pub fn with_parse_literal(
        mut self,
        function: impl Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.parse_literal = Some(ScalarFn::new(function));
        self
    }

    /// Names of the properties that are set.
    pub fn properties(&self) -> impl Iterator<Item = &'static str> {
        [
            ("description", self.description.is_some()),
            ("serialize", self.serialize.is_some()),
            ("parseValue", self.parse_value.is_some()),
            ("parseLiteral", self.parse_literal.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
    }

    pub fn is_empty(&self) -> bool {
        self.properties().next().is_none()
    }

    /// Copies every set property onto `target`.
    pub(crate) fn copy_onto(&self, target: &mut ScalarBehavior) {
        if let Some(description) = &self.description {
            target.description = Some(description.clone());
        }
        if let Some(serialize) = &self.serialize {
            target.serialize = Some(serialize.clone());
        }
        if let Some(parse_value) = &self.parse_value {
            target.parse_value = Some(parse_value.clone());
        }
        if let Some(parse_literal) = &self.parse_literal {
            target.parse_literal = Some(parse_literal.clone());
        }
    }
}

/// The resolvers of a single type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeResolvers {
    /// Behavior for a custom scalar.
    Scalar(ScalarBehavior),
    /// Field resolvers keyed by field name, plus `__isTypeOf` / `__resolveType`.
    Fields(IndexMap<String, Leaf<ResolveFn>>),
}

impl TypeResolvers {
    pub fn is_empty(&self) -> bool {
        match self {
            TypeResolvers::Scalar(behavior) => behavior.is_empty(),
            TypeResolvers::Fields(fields) => fields.is_empty(),
        }
    }

    /// Returns the field map, replacing a scalar behavior if there was one.
    fn fields_mut(&mut self) -> &mut IndexMap<String, Leaf<ResolveFn>> {
        match self {
            TypeResolvers::Fields(fields) => fields,
            TypeResolvers::Scalar(_) => {
                *self = TypeResolvers::Fields(IndexMap::new());
                self.fields_mut()
            }
        }
    }
}

impl From<ScalarBehavior> for TypeResolvers {
    fn from(behavior: ScalarBehavior) -> Self {
        TypeResolvers::Scalar(behavior)
    }
}

impl From<IndexMap<String, Leaf<ResolveFn>>> for TypeResolvers {
    fn from(fields: IndexMap<String, Leaf<ResolveFn>>) -> Self {
        TypeResolvers::Fields(fields)
    }
}

/// Resolvers keyed by type name.
///
/// ```
/// use apollo_schema_compose::Resolvers;
/// use serde_json_bytes::json;
///
/// let resolvers = Resolvers::new()
///     .field("Query", "simpleInt", |_| Ok(json!(0)))
///     .field("Query", "simpleString", |_| Ok(json!("Hello")));
/// assert_eq!(resolvers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolvers(pub(crate) IndexMap<String, TypeResolvers>);

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        function: impl Fn(&ResolverContext<'_>) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.insert_field(type_name, field_name, ResolveFn::new(function));
        self
    }

    /// Adds a non-callable leaf, as an untyped source could.
    pub fn value(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.fields_mut(type_name)
            .insert(field_name.into(), Leaf::Value(value.into()));
        self
    }

    pub fn is_type_of(
        self,
        type_name: impl Into<String>,
        function: impl Fn(&ResolverContext<'_>) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.field(type_name, IS_TYPE_OF, function)
    }

    pub fn resolve_type(
        self,
        type_name: impl Into<String>,
        function: impl Fn(&ResolverContext<'_>) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.field(type_name, RESOLVE_TYPE, function)
    }

    pub fn scalar(mut self, type_name: impl Into<String>, behavior: ScalarBehavior) -> Self {
        self.0.insert(type_name.into(), TypeResolvers::Scalar(behavior));
        self
    }

    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        resolvers: impl Into<TypeResolvers>,
    ) -> Option<TypeResolvers> {
        self.0.insert(type_name.into(), resolvers.into())
    }

    pub fn insert_field(
        &mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        function: ResolveFn,
    ) -> Option<Leaf<ResolveFn>> {
        self.fields_mut(type_name)
            .insert(field_name.into(), Leaf::Function(function))
    }

    fn fields_mut(&mut self, type_name: impl Into<String>) -> &mut IndexMap<String, Leaf<ResolveFn>> {
        self.0
            .entry(type_name.into())
            .or_insert_with(|| TypeResolvers::Fields(IndexMap::new()))
            .fields_mut()
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeResolvers> {
        self.0.get(type_name)
    }

    /// The function bound to `type_name.field_name`, if it is callable.
    pub fn get_field(&self, type_name: &str, field_name: &str) -> Option<&ResolveFn> {
        match self.0.get(type_name)? {
            TypeResolvers::Fields(fields) => fields.get(field_name)?.as_function(),
            TypeResolvers::Scalar(_) => None,
        }
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TypeResolvers> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, TypeResolvers)> for Resolvers {
    fn from_iter<T: IntoIterator<Item = (String, TypeResolvers)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Resolvers {
    type Item = (String, TypeResolvers);
    type IntoIter = indexmap::map::IntoIter<String, TypeResolvers>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Resolvers {
    type Item = (&'a String, &'a TypeResolvers);
    type IntoIter = indexmap::map::Iter<'a, String, TypeResolvers>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Subscribe functions keyed by field name of the subscription root type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subscriptions(pub(crate) IndexMap<String, Leaf<SubscribeFn>>);

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        field_name: impl Into<String>,
        function: impl Fn(&ResolverContext<'_>) -> Result<BoxStream<'static, Value>, BoxError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.insert(field_name, SubscribeFn::new(function));
        self
    }

    /// Adds a non-callable leaf, as an untyped source could.
    pub fn value(mut self, field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field_name.into(), Leaf::Value(value.into()));
        self
    }

    pub fn insert(
        &mut self,
        field_name: impl Into<String>,
        function: SubscribeFn,
    ) -> Option<Leaf<SubscribeFn>> {
        self.0.insert(field_name.into(), Leaf::Function(function))
    }

    pub fn get(&self, field_name: &str) -> Option<&SubscribeFn> {
        self.0.get(field_name)?.as_function()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Leaf<SubscribeFn>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Leaf<SubscribeFn>)> for Subscriptions {
    fn from_iter<T: IntoIterator<Item = (String, Leaf<SubscribeFn>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Subscriptions {
    type Item = (String, Leaf<SubscribeFn>);
    type IntoIter = indexmap::map::IntoIter<String, Leaf<SubscribeFn>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Subscriptions {
    type Item = (&'a String, &'a Leaf<SubscribeFn>);
    type IntoIter = indexmap::map::Iter<'a, String, Leaf<SubscribeFn>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
