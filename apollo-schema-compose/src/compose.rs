use apollo_compiler::Schema;
use apollo_compiler::validation::Valid;
use serde::Deserialize;
use tracing::debug;
#[cfg(feature = "snapshot_tracing")]
use tracing::trace;

use crate::attach::attach_resolvers;
use crate::attach::attach_subscriptions;
use crate::error::CompositionError;
use crate::extract::extract_resolvers;
use crate::extract::extract_subscriptions;
use crate::merge::DeepMerge;
use crate::resolvers::Resolvers;
use crate::resolvers::Subscriptions;
use crate::schema::ExecutableSchema;
use crate::type_defs::concatenate_type_defs_with;
use crate::utils::logging::snapshot;

pub(crate) const DEFAULT_SOURCE_NAME: &str = "typeDefs.graphql";

/// Options for [`compose_schema_with`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ComposeConfig {
    /// Validate the composed schema before binding resolvers. Disabling this only makes sense
    /// for SDL that is known to be valid.
    pub validate: bool,
    /// Path reported in diagnostics. Fragments are suffixed with their index.
    pub source_name: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            validate: true,
            source_name: DEFAULT_SOURCE_NAME.to_owned(),
        }
    }
}

/// Partial schema definitions to compose into one [`ExecutableSchema`].
///
/// Each field is a sequence: SDL fragments are concatenated, resolver and subscription maps are
/// deep merged with later maps taking precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    pub type_defs: Vec<String>,
    pub resolvers: Vec<Resolvers>,
    pub subscriptions: Vec<Subscriptions>,
}

impl SchemaDefinition {
    pub fn new(type_defs: impl Into<String>) -> Self {
        Self {
            type_defs: vec![type_defs.into()],
            ..Default::default()
        }
    }

    pub fn type_defs(mut self, type_defs: impl Into<String>) -> Self {
        self.type_defs.push(type_defs.into());
        self
    }

    pub fn resolvers(mut self, resolvers: Resolvers) -> Self {
        self.resolvers.push(resolvers);
        self
    }

    pub fn subscriptions(mut self, subscriptions: Subscriptions) -> Self {
        self.subscriptions.push(subscriptions);
        self
    }
}

impl From<&str> for SchemaDefinition {
    fn from(type_defs: &str) -> Self {
        Self::new(type_defs)
    }
}

impl From<String> for SchemaDefinition {
    fn from(type_defs: String) -> Self {
        Self::new(type_defs)
    }
}

/// What [`decompose_schema`] reads out of an [`ExecutableSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedSchema {
    pub type_defs: String,
    pub resolvers: Resolvers,
    pub subscriptions: Subscriptions,
}

impl From<DecomposedSchema> for SchemaDefinition {
    fn from(decomposed: DecomposedSchema) -> Self {
        SchemaDefinition {
            type_defs: vec![decomposed.type_defs],
            resolvers: vec![decomposed.resolvers],
            subscriptions: vec![decomposed.subscriptions],
        }
    }
}

pub fn compose_schema(definition: SchemaDefinition) -> Result<ExecutableSchema, CompositionError> {
    compose_schema_with(definition, &ComposeConfig::default())
}

pub fn compose_schema_with(
    definition: SchemaDefinition,
    config: &ComposeConfig,
) -> Result<ExecutableSchema, CompositionError> {
    let SchemaDefinition {
        type_defs,
        resolvers,
        subscriptions,
    } = definition;

    let sdl = concatenate_type_defs_with(&type_defs, &config.source_name)?;
    snapshot!("ConcatenatedTypeDefs", sdl.as_str(), "concatenated type definitions");

    let schema = if config.validate {
        Schema::parse_and_validate(sdl, &config.source_name)
    } else {
        Schema::parse(sdl, &config.source_name).map(Valid::assume_valid)
    }
    .map_err(|err| CompositionError::InvalidSchema {
        diagnostics: err.errors.to_string(),
    })?;
    let mut schema = ExecutableSchema::new(schema);

    let resolvers = Resolvers::merge_all(resolvers);
    debug!(
        fragments = type_defs.len(),
        types = resolvers.len(),
        "composing schema"
    );
    attach_resolvers(&mut schema, &resolvers)?;

    let subscriptions = Subscriptions::merge_all(subscriptions);
    if !subscriptions.is_empty() {
        attach_subscriptions(&mut schema, &subscriptions)?;
    }
    Ok(schema)
}

pub fn decompose_schema(schema: &ExecutableSchema) -> DecomposedSchema {
    DecomposedSchema {
        type_defs: schema.to_sdl(),
        resolvers: extract_resolvers(schema),
        subscriptions: extract_subscriptions(schema),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn config_defaults() {
        let config: ComposeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ComposeConfig::default());
        assert!(config.validate);
        assert_eq!(config.source_name, "typeDefs.graphql");
    }

    #[test]
    fn config_rejects_unknown_fields() {
        assert!(serde_json::from_str::<ComposeConfig>(r#"{"validated": false}"#).is_err());
        let config: ComposeConfig =
            serde_json::from_str(r#"{"validate": false, "source_name": "api.graphql"}"#).unwrap();
        assert!(!config.validate);
        assert_eq!(config.source_name, "api.graphql");
    }

    #[test]
    fn skipping_validation_keeps_invalid_references() {
        let definition = SchemaDefinition::from("type Query { a: Missing }");
        assert!(matches!(
            compose_schema(definition.clone()),
            Err(CompositionError::InvalidSchema { .. })
        ));
        let config = ComposeConfig {
            validate: false,
            ..Default::default()
        };
        let schema = compose_schema_with(definition, &config).unwrap();
        assert!(schema.field("Query", "a").is_some());
    }

    #[test]
    fn decomposed_schema_converts_back_into_a_definition() {
        let resolvers = Resolvers::new().field("Query", "a", |_| Ok(json!(1)));
        let schema = compose_schema(
            SchemaDefinition::new("type Query { a: Int }").resolvers(resolvers.clone()),
        )
        .unwrap();

        let definition = SchemaDefinition::from(decompose_schema(&schema));
        assert_eq!(definition.type_defs.len(), 1);
        assert_eq!(definition.resolvers, [resolvers]);
        assert_eq!(definition.subscriptions, [Subscriptions::new()]);
    }
}
