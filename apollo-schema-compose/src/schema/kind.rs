use apollo_compiler::schema::ExtendedType;

use crate::resolvers::IS_TYPE_OF;
use crate::resolvers::RESOLVE_TYPE;

/// Name under which resolvers for the introspection root may be given without the schema
/// declaring it.
pub const INTROSPECTION_ROOT: &str = "__schema";

pub const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// The category of a named schema type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Scalar,
    Enum,
    InputObject,
}

impl TypeKind {
    /// Object and interface types own a field map that resolvers bind to.
    pub fn has_fields(self) -> bool {
        match self {
            TypeKind::Object | TypeKind::Interface => true,
            TypeKind::Union | TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => false,
        }
    }

    /// Whether `field_name` is a meta field this kind of type accepts.
    pub fn accepts_meta_field(self, field_name: &str) -> bool {
        match self {
            TypeKind::Object => field_name == IS_TYPE_OF,
            TypeKind::Interface | TypeKind::Union => field_name == RESOLVE_TYPE,
            TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => false,
        }
    }
}

impl From<&ExtendedType> for TypeKind {
    fn from(ty: &ExtendedType) -> Self {
        match ty {
            ExtendedType::Scalar(_) => TypeKind::Scalar,
            ExtendedType::Object(_) => TypeKind::Object,
            ExtendedType::Interface(_) => TypeKind::Interface,
            ExtendedType::Union(_) => TypeKind::Union,
            ExtendedType::Enum(_) => TypeKind::Enum,
            ExtendedType::InputObject(_) => TypeKind::InputObject,
        }
    }
}

/// Introspection types and fields (`__Schema`, `__typename`, ...) are reserved.
pub fn is_introspection_name(name: &str) -> bool {
    name.starts_with("__")
}

pub fn is_built_in_scalar(name: &str) -> bool {
    BUILT_IN_SCALARS.contains(&name)
}
