use apollo_compiler::Name;

/// Errors raised while binding resolvers or subscriptions to a schema.
///
/// A failing call leaves the schema untouched: every binding is validated before any of them is
/// committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WiringError {
    #[error("\"{type_name}\" defined in resolvers, but not in schema")]
    UnknownType { type_name: String },
    #[error("\"{type_name}\" was defined in resolvers, but it's not an object")]
    NotAnObjectType { type_name: Name },
    #[error("\"{type_name}.{field_name}\" defined in resolvers, but not in schema")]
    UnknownField { type_name: Name, field_name: String },
    #[error("\"{field_name}\" defined in subscription channels, but not in schema")]
    UnknownSubscriptionField { field_name: String },
    /// `coordinate` is `Type.field` for resolvers and the bare field name for subscriptions.
    #[error("\"{coordinate}\" is not a function")]
    NotAFunction { coordinate: String },
    #[error("\"{type_name}\" requires a ScalarType object")]
    RequiresScalarObject { type_name: Name },
    #[error("\"{type_name}\" was given a ScalarType object, but it's not a scalar")]
    UnexpectedScalarObject { type_name: Name },
    #[error("\"{type_name}.{field_name}\" invalid fieldName")]
    InvalidMetaField { type_name: Name, field_name: String },
    #[error("No Subscription Type for schema")]
    NoSubscriptionType,
    #[error("Subscription type {type_name} is invalid")]
    InvalidSubscriptionType { type_name: Name },
}

impl WiringError {
    /// A stable, machine readable identifier, e.g. `UNKNOWN_TYPE`.
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// Errors raised while composing a schema from partial definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("Invalid type definitions in {source_name}:\n{diagnostics}")]
    InvalidTypeDefs {
        source_name: String,
        diagnostics: String,
    },
    #[error("Invalid schema:\n{diagnostics}")]
    InvalidSchema { diagnostics: String },
    #[error(transparent)]
    Wiring(#[from] WiringError),
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;

    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        let error = WiringError::UnknownType {
            type_name: "SomeType".to_owned(),
        };
        assert_eq!(error.code(), "UNKNOWN_TYPE");
        assert_eq!(
            WiringError::NoSubscriptionType.code(),
            "NO_SUBSCRIPTION_TYPE"
        );
        let error = WiringError::NotAnObjectType {
            type_name: name!("A"),
        };
        assert_eq!(error.code(), "NOT_AN_OBJECT_TYPE");
    }

    #[test]
    fn composition_error_is_transparent_over_wiring_errors() {
        let error: CompositionError = WiringError::InvalidMetaField {
            type_name: name!("A"),
            field_name: "__resolveType".to_owned(),
        }
        .into();
        insta::assert_snapshot!(error.to_string(), @r#""A.__resolveType" invalid fieldName"#);
    }
}
