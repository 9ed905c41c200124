//! Reads the wiring of an [`ExecutableSchema`] back into resolver and subscription maps.
//!
//! Attaching the extracted maps to a fresh copy of the same schema reproduces the same wiring.

use indexmap::IndexMap;

use crate::resolvers::IS_TYPE_OF;
use crate::resolvers::Leaf;
use crate::resolvers::RESOLVE_TYPE;
use crate::resolvers::ResolveFn;
use crate::resolvers::Resolvers;
use crate::resolvers::Subscriptions;
use crate::resolvers::TypeResolvers;
use crate::schema::ExecutableSchema;
use crate::schema::kind::is_built_in_scalar;
use crate::schema::kind::is_introspection_name;
use crate::schema::wiring::FieldWiring;
use crate::schema::wiring::TypeWiring;

pub fn extract_resolvers(schema: &ExecutableSchema) -> Resolvers {
    schema
        .types()
        .filter(|(type_name, _)| {
            !is_introspection_name(type_name) && !is_built_in_scalar(type_name)
        })
        .filter_map(|(type_name, wiring)| {
            let resolvers = type_resolvers(wiring)?;
            Some((type_name.to_string(), resolvers))
        })
        .collect()
}

/// `None` when nothing is bound to the type.
fn type_resolvers(wiring: &TypeWiring) -> Option<TypeResolvers> {
    let resolvers = match wiring {
        TypeWiring::Object { is_type_of, fields } => {
            let mut resolvers = meta_field(IS_TYPE_OF, is_type_of);
            resolvers.extend(field_resolvers(fields));
            TypeResolvers::Fields(resolvers)
        }
        TypeWiring::Interface {
            resolve_type,
            fields,
        } => {
            let mut resolvers = meta_field(RESOLVE_TYPE, resolve_type);
            resolvers.extend(field_resolvers(fields));
            TypeResolvers::Fields(resolvers)
        }
        TypeWiring::Union { resolve_type } => {
            TypeResolvers::Fields(meta_field(RESOLVE_TYPE, resolve_type))
        }
        TypeWiring::Scalar(behavior) => TypeResolvers::Scalar(behavior.clone()),
        TypeWiring::Enum | TypeWiring::InputObject => return None,
    };
    (!resolvers.is_empty()).then_some(resolvers)
}

fn meta_field(name: &str, function: &Option<ResolveFn>) -> IndexMap<String, Leaf<ResolveFn>> {
    function
        .iter()
        .map(|function| (name.to_owned(), Leaf::Function(function.clone())))
        .collect()
}

fn field_resolvers<'a>(
    fields: &'a IndexMap<apollo_compiler::Name, FieldWiring>,
) -> impl Iterator<Item = (String, Leaf<ResolveFn>)> + 'a {
    fields.iter().filter_map(|(field_name, field)| {
        let resolve = field.resolve()?;
        Some((field_name.to_string(), Leaf::Function(resolve.clone())))
    })
}

pub fn extract_subscriptions(schema: &ExecutableSchema) -> Subscriptions {
    let Some(fields) = schema
        .subscription_type()
        .and_then(|type_name| schema.wiring(type_name))
        .and_then(TypeWiring::fields)
    else {
        return Subscriptions::default();
    };
    fields
        .iter()
        .filter_map(|(field_name, field)| {
            let subscribe = field.subscribe()?;
            Some((field_name.to_string(), Leaf::Function(subscribe.clone())))
        })
        .collect()
}
