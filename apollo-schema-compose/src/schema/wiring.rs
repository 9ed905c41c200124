use apollo_compiler::Name;
use apollo_compiler::schema::ExtendedType;
use indexmap::IndexMap;

use crate::resolvers::ResolveFn;
use crate::resolvers::ScalarBehavior;
use crate::resolvers::SubscribeFn;
use crate::schema::kind::TypeKind;

/// Functions bound to one field of an object or interface type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldWiring {
    pub(crate) resolve: Option<ResolveFn>,
    pub(crate) subscribe: Option<SubscribeFn>,
}

impl FieldWiring {
    pub fn resolve(&self) -> Option<&ResolveFn> {
        self.resolve.as_ref()
    }

    pub fn subscribe(&self) -> Option<&SubscribeFn> {
        self.subscribe.as_ref()
    }
}

/// Functions bound to one named type, shaped after its category.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeWiring {
    Object {
        is_type_of: Option<ResolveFn>,
        fields: IndexMap<Name, FieldWiring>,
    },
    Interface {
        resolve_type: Option<ResolveFn>,
        fields: IndexMap<Name, FieldWiring>,
    },
    Union {
        resolve_type: Option<ResolveFn>,
    },
    Scalar(ScalarBehavior),
    Enum,
    InputObject,
}

fn unwired_fields<'a>(names: impl Iterator<Item = &'a Name>) -> IndexMap<Name, FieldWiring> {
    names
        .map(|name| (name.clone(), FieldWiring::default()))
        .collect()
}

impl TypeWiring {
    /// Wiring with nothing bound yet.
    pub(crate) fn unwired(ty: &ExtendedType) -> Self {
        match ty {
            ExtendedType::Object(object) => TypeWiring::Object {
                is_type_of: None,
                fields: unwired_fields(object.fields.keys()),
            },
            ExtendedType::Interface(interface) => TypeWiring::Interface {
                resolve_type: None,
                fields: unwired_fields(interface.fields.keys()),
            },
            ExtendedType::Union(_) => TypeWiring::Union { resolve_type: None },
            ExtendedType::Scalar(_) => TypeWiring::Scalar(ScalarBehavior::default()),
            ExtendedType::Enum(_) => TypeWiring::Enum,
            ExtendedType::InputObject(_) => TypeWiring::InputObject,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeWiring::Object { .. } => TypeKind::Object,
            TypeWiring::Interface { .. } => TypeKind::Interface,
            TypeWiring::Union { .. } => TypeKind::Union,
            TypeWiring::Scalar(_) => TypeKind::Scalar,
            TypeWiring::Enum => TypeKind::Enum,
            TypeWiring::InputObject => TypeKind::InputObject,
        }
    }

    /// The field map of object and interface types.
    pub fn fields(&self) -> Option<&IndexMap<Name, FieldWiring>> {
        match self {
            TypeWiring::Object { fields, .. } | TypeWiring::Interface { fields, .. } => {
                Some(fields)
            }
            TypeWiring::Union { .. }
            | TypeWiring::Scalar(_)
            | TypeWiring::Enum
            | TypeWiring::InputObject => None,
        }
    }

    pub(crate) fn fields_mut(&mut self) -> Option<&mut IndexMap<Name, FieldWiring>> {
        match self {
            TypeWiring::Object { fields, .. } | TypeWiring::Interface { fields, .. } => {
                Some(fields)
            }
            TypeWiring::Union { .. }
            | TypeWiring::Scalar(_)
            | TypeWiring::Enum
            | TypeWiring::InputObject => None,
        }
    }

    pub fn field(&self, field_name: &str) -> Option<&FieldWiring> {
        self.fields()?.get(field_name)
    }

    pub fn is_type_of(&self) -> Option<&ResolveFn> {
        match self {
            TypeWiring::Object { is_type_of, .. } => is_type_of.as_ref(),
            _ => None,
        }
    }

    pub fn resolve_type(&self) -> Option<&ResolveFn> {
        match self {
            TypeWiring::Interface { resolve_type, .. } | TypeWiring::Union { resolve_type } => {
                resolve_type.as_ref()
            }
            _ => None,
        }
    }

    pub fn scalar(&self) -> Option<&ScalarBehavior> {
        match self {
            TypeWiring::Scalar(behavior) => Some(behavior),
            _ => None,
        }
    }
}
