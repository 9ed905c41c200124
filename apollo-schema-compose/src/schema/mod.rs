use std::path::Path;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast::OperationType;
use apollo_compiler::validation::Valid;
use indexmap::IndexMap;

use crate::error::CompositionError;
use crate::schema::kind::TypeKind;
use crate::schema::kind::is_introspection_name;
use crate::schema::wiring::FieldWiring;
use crate::schema::wiring::TypeWiring;

pub mod kind;
pub mod wiring;

/// A validated schema together with the functions bound to its types and fields.
///
/// The type graph itself is never modified after construction; binding resolvers only touches
/// the wiring tables.
#[derive(Debug, Clone)]
pub struct ExecutableSchema {
    schema: Valid<Schema>,
    wiring: IndexMap<Name, TypeWiring>,
}

impl ExecutableSchema {
    pub fn new(schema: Valid<Schema>) -> Self {
        let wiring = schema
            .types
            .iter()
            .filter(|(type_name, _)| !is_introspection_name(type_name))
            .map(|(type_name, ty)| (type_name.clone(), TypeWiring::unwired(ty)))
            .collect();
        Self { schema, wiring }
    }

    pub fn parse(sdl: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, CompositionError> {
        let schema = Schema::parse_and_validate(sdl, path).map_err(|err| {
            CompositionError::InvalidSchema {
                diagnostics: err.errors.to_string(),
            }
        })?;
        Ok(Self::new(schema))
    }

    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    pub fn type_kind(&self, type_name: &str) -> Option<TypeKind> {
        self.wiring.get(type_name).map(TypeWiring::kind)
    }

    /// Field names of an object or interface type, in declaration order.
    pub fn field_names(&self, type_name: &str) -> Option<impl Iterator<Item = &Name>> {
        Some(self.wiring.get(type_name)?.fields()?.keys())
    }

    /// Named types other than introspection types, in schema order.
    pub fn types(&self) -> impl Iterator<Item = (&Name, &TypeWiring)> {
        self.wiring.iter()
    }

    pub fn wiring(&self, type_name: &str) -> Option<&TypeWiring> {
        self.wiring.get(type_name)
    }

    pub(crate) fn wiring_entry(&self, type_name: &str) -> Option<(&Name, &TypeWiring)> {
        self.wiring.get_key_value(type_name)
    }

    pub(crate) fn wiring_mut(&mut self, type_name: &str) -> Option<&mut TypeWiring> {
        self.wiring.get_mut(type_name)
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldWiring> {
        self.wiring.get(type_name)?.field(field_name)
    }

    pub fn subscription_type(&self) -> Option<&Name> {
        self.schema.root_operation(OperationType::Subscription)
    }

    /// Prints the type graph back to SDL.
    pub fn to_sdl(&self) -> String {
        self.schema.to_string()
    }
}
