//! Concatenation of SDL fragments into a single schema document.
//!
//! Fragments may each declare the same object type, e.g. a `Query` type per feature module. The
//! first declaration of a name is kept as is and every later one is rewritten into an
//! `extend type` so the combined document builds.

use std::collections::HashSet;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use tracing::trace;

use crate::error::CompositionError;

/// Diagnostics path of the fragment at `index`.
pub(crate) fn fragment_path(source_name: &str, index: usize, count: usize) -> String {
    if count == 1 {
        source_name.to_owned()
    } else {
        format!("{source_name}[{index}]")
    }
}

fn to_extension(definition: &ast::ObjectTypeDefinition) -> ast::Definition {
    ast::Definition::ObjectTypeExtension(Node::new(ast::ObjectTypeExtension {
        name: definition.name.clone(),
        implements_interfaces: definition.implements_interfaces.clone(),
        directives: definition.directives.clone(),
        fields: definition.fields.clone(),
    }))
}

fn is_extension(definition: &ast::Definition) -> bool {
    match definition {
        ast::Definition::SchemaExtension(_)
        | ast::Definition::ScalarTypeExtension(_)
        | ast::Definition::ObjectTypeExtension(_)
        | ast::Definition::InterfaceTypeExtension(_)
        | ast::Definition::UnionTypeExtension(_)
        | ast::Definition::EnumTypeExtension(_)
        | ast::Definition::InputObjectTypeExtension(_) => true,
        _ => false,
    }
}

/// Splits the fragments into base declarations and extensions, turning repeated object type
/// declarations into extensions.
fn split_fragments<S: AsRef<str>>(
    type_defs: &[S],
    source_name: &str,
) -> Result<(ast::Document, ast::Document), CompositionError> {
    let mut seen: HashSet<Name> = HashSet::new();
    let mut base = ast::Document::new();
    let mut extensions = ast::Document::new();

    for (index, type_def) in type_defs.iter().enumerate() {
        let path = fragment_path(source_name, index, type_defs.len());
        let document = ast::Document::parse(type_def.as_ref(), &path).map_err(|err| {
            CompositionError::InvalidTypeDefs {
                source_name: path.clone(),
                diagnostics: err.errors.to_string(),
            }
        })?;

        for definition in document.definitions {
            if let ast::Definition::ObjectTypeDefinition(object) = &definition
                && !seen.insert(object.name.clone())
            {
                trace!(
                    type_name = %object.name,
                    fragment = index,
                    "converting duplicate object type into an extension"
                );
                extensions.definitions.push(to_extension(object));
                continue;
            }
            if is_extension(&definition) {
                extensions.definitions.push(definition);
            } else {
                base.definitions.push(definition);
            }
        }
    }
    Ok((base, extensions))
}

/// Builds a schema from the fragments: base declarations first, then every extension in fragment
/// order.
pub(crate) fn build_concatenated<S: AsRef<str>>(
    type_defs: &[S],
    source_name: &str,
) -> Result<Schema, CompositionError> {
    let (base, extensions) = split_fragments(type_defs, source_name)?;
    Schema::builder()
        .add_ast(&base)
        .add_ast(&extensions)
        .build()
        .map_err(|err| CompositionError::InvalidTypeDefs {
            source_name: source_name.to_owned(),
            diagnostics: err.errors.to_string(),
        })
}

/// Concatenates SDL fragments into one SDL document.
///
/// ```
/// use apollo_schema_compose::concatenate_type_defs;
///
/// let sdl = concatenate_type_defs(&["type Query { a: Int }", "type Query { b: String }"]).unwrap();
/// assert!(sdl.contains("b: String"));
/// ```
pub fn concatenate_type_defs<S: AsRef<str>>(type_defs: &[S]) -> Result<String, CompositionError> {
    concatenate_type_defs_with(type_defs, crate::compose::DEFAULT_SOURCE_NAME)
}

pub fn concatenate_type_defs_with<S: AsRef<str>>(
    type_defs: &[S],
    source_name: &str,
) -> Result<String, CompositionError> {
    Ok(build_concatenated(type_defs, source_name)?.to_string())
}
