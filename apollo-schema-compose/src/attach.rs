//! Binding resolver and subscription maps onto an [`ExecutableSchema`].
//!
//! Both entry points work in two phases: every key of the input map is validated against the
//! schema and turned into a [`Binding`], then the bindings are committed. An invalid key aborts
//! the call before anything is committed.

use apollo_compiler::Name;
use itertools::Itertools;
use tracing::debug;
use tracing::trace;

use crate::error::WiringError;
use crate::resolvers::IS_TYPE_OF;
use crate::resolvers::Leaf;
use crate::resolvers::META_FIELD_PREFIX;
use crate::resolvers::ResolveFn;
use crate::resolvers::Resolvers;
use crate::resolvers::ScalarBehavior;
use crate::resolvers::SubscribeFn;
use crate::resolvers::Subscriptions;
use crate::resolvers::TypeResolvers;
use crate::schema::ExecutableSchema;
use crate::schema::kind::INTROSPECTION_ROOT;
use crate::schema::kind::TypeKind;
use crate::schema::wiring::TypeWiring;

/// A validated change to the wiring of a schema.
#[derive(Debug)]
enum Binding {
    Scalar {
        type_name: Name,
        behavior: ScalarBehavior,
    },
    IsTypeOf {
        type_name: Name,
        function: ResolveFn,
    },
    ResolveType {
        type_name: Name,
        function: ResolveFn,
    },
    Resolve {
        type_name: Name,
        field_name: Name,
        function: ResolveFn,
    },
    Subscribe {
        type_name: Name,
        field_name: Name,
        function: SubscribeFn,
    },
}

impl Binding {
    fn commit(self, schema: &mut ExecutableSchema) {
        match self {
            Binding::Scalar {
                type_name,
                behavior,
            } => {
                if let Some(TypeWiring::Scalar(scalar)) = schema.wiring_mut(&type_name) {
                    let properties = behavior.properties().join(", ");
                    trace!(%type_name, %properties, "binding scalar behavior");
                    behavior.copy_onto(scalar);
                }
            }
            Binding::IsTypeOf {
                type_name,
                function,
            } => {
                if let Some(TypeWiring::Object { is_type_of, .. }) = schema.wiring_mut(&type_name)
                {
                    trace!(%type_name, "binding __isTypeOf");
                    *is_type_of = Some(function);
                }
            }
            Binding::ResolveType {
                type_name,
                function,
            } => {
                if let Some(
                    TypeWiring::Interface { resolve_type, .. } | TypeWiring::Union { resolve_type },
                ) = schema.wiring_mut(&type_name)
                {
                    trace!(%type_name, "binding __resolveType");
                    *resolve_type = Some(function);
                }
            }
            Binding::Resolve {
                type_name,
                field_name,
                function,
            } => {
                if let Some(field) = schema
                    .wiring_mut(&type_name)
                    .and_then(TypeWiring::fields_mut)
                    .and_then(|fields| fields.get_mut(&field_name))
                {
                    trace!(%type_name, %field_name, "binding resolve function");
                    field.resolve = Some(function);
                }
            }
            Binding::Subscribe {
                type_name,
                field_name,
                function,
            } => {
                if let Some(field) = schema
                    .wiring_mut(&type_name)
                    .and_then(TypeWiring::fields_mut)
                    .and_then(|fields| fields.get_mut(&field_name))
                {
                    trace!(%type_name, %field_name, "binding subscribe function");
                    field.subscribe = Some(function);
                }
            }
        }
    }
}

fn commit(schema: &mut ExecutableSchema, bindings: Vec<Binding>) {
    debug!(bindings = bindings.len(), "committing schema wiring");
    for binding in bindings {
        binding.commit(schema);
    }
}

/// Binds every resolver in `resolvers` to the matching type or field of `schema`.
///
/// On error the schema is left as it was.
pub fn attach_resolvers(
    schema: &mut ExecutableSchema,
    resolvers: &Resolvers,
) -> Result<(), WiringError> {
    let bindings = stage_resolvers(schema, resolvers)?;
    commit(schema, bindings);
    Ok(())
}

/// Binds every subscribe function in `subscriptions` to the matching field of the subscription
/// root type.
///
/// On error the schema is left as it was.
pub fn attach_subscriptions(
    schema: &mut ExecutableSchema,
    subscriptions: &Subscriptions,
) -> Result<(), WiringError> {
    let bindings = stage_subscriptions(schema, subscriptions)?;
    commit(schema, bindings);
    Ok(())
}

fn stage_resolvers(
    schema: &ExecutableSchema,
    resolvers: &Resolvers,
) -> Result<Vec<Binding>, WiringError> {
    let mut bindings = Vec::new();
    for (type_name, type_resolvers) in resolvers {
        let Some((type_name, wiring)) = schema.wiring_entry(type_name) else {
            if type_name == INTROSPECTION_ROOT {
                debug!("ignoring resolvers given for the introspection root");
                continue;
            }
            return Err(WiringError::UnknownType {
                type_name: type_name.clone(),
            });
        };
        let kind = wiring.kind();
        match type_resolvers {
            TypeResolvers::Scalar(behavior) => {
                if kind != TypeKind::Scalar {
                    return Err(WiringError::UnexpectedScalarObject {
                        type_name: type_name.clone(),
                    });
                }
                bindings.push(Binding::Scalar {
                    type_name: type_name.clone(),
                    behavior: behavior.clone(),
                });
            }
            TypeResolvers::Fields(fields) => {
                for (field_name, leaf) in fields {
                    bindings.push(stage_field(type_name, wiring, field_name, leaf)?);
                }
            }
        }
    }
    Ok(bindings)
}

fn stage_field(
    type_name: &Name,
    wiring: &TypeWiring,
    field_name: &str,
    leaf: &Leaf<ResolveFn>,
) -> Result<Binding, WiringError> {
    let kind = wiring.kind();
    if kind == TypeKind::Scalar {
        return Err(WiringError::RequiresScalarObject {
            type_name: type_name.clone(),
        });
    }
    if field_name.starts_with(META_FIELD_PREFIX) {
        return stage_meta_field(type_name, kind, field_name, leaf);
    }
    let function = leaf
        .as_function()
        .ok_or_else(|| WiringError::NotAFunction {
            coordinate: format!("{type_name}.{field_name}"),
        })?;
    let fields = wiring.fields().ok_or_else(|| WiringError::NotAnObjectType {
        type_name: type_name.clone(),
    })?;
    let (field_name, _) =
        fields
            .get_key_value(field_name)
            .ok_or_else(|| WiringError::UnknownField {
                type_name: type_name.clone(),
                field_name: field_name.to_owned(),
            })?;
    Ok(Binding::Resolve {
        type_name: type_name.clone(),
        field_name: field_name.clone(),
        function: function.clone(),
    })
}

/// `__isTypeOf` on object types and `__resolveType` on abstract types. The type category is
/// checked before the value.
fn stage_meta_field(
    type_name: &Name,
    kind: TypeKind,
    field_name: &str,
    leaf: &Leaf<ResolveFn>,
) -> Result<Binding, WiringError> {
    if !kind.accepts_meta_field(field_name) {
        return Err(WiringError::InvalidMetaField {
            type_name: type_name.clone(),
            field_name: field_name.to_owned(),
        });
    }
    let function = leaf
        .as_function()
        .ok_or_else(|| WiringError::NotAFunction {
            coordinate: format!("{type_name}.{field_name}"),
        })?
        .clone();
    let type_name = type_name.clone();
    Ok(if field_name == IS_TYPE_OF {
        Binding::IsTypeOf {
            type_name,
            function,
        }
    } else {
        Binding::ResolveType {
            type_name,
            function,
        }
    })
}

fn stage_subscriptions(
    schema: &ExecutableSchema,
    subscriptions: &Subscriptions,
) -> Result<Vec<Binding>, WiringError> {
    let type_name = schema
        .subscription_type()
        .ok_or(WiringError::NoSubscriptionType)?;
    let fields = schema
        .wiring(type_name)
        .and_then(TypeWiring::fields)
        .ok_or_else(|| WiringError::InvalidSubscriptionType {
            type_name: type_name.clone(),
        })?;

    subscriptions
        .iter()
        .map(|(field_name, leaf)| -> Result<Binding, WiringError> {
            let function = leaf
                .as_function()
                .ok_or_else(|| WiringError::NotAFunction {
                    coordinate: field_name.clone(),
                })?;
            let (field_name, _) = fields.get_key_value(field_name.as_str()).ok_or_else(|| {
                WiringError::UnknownSubscriptionField {
                    field_name: field_name.clone(),
                }
            })?;
            Ok(Binding::Subscribe {
                type_name: type_name.clone(),
                field_name: field_name.clone(),
                function: function.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use futures::StreamExt;
    use futures::stream;
    use insta::assert_snapshot;
    use rstest::rstest;
    use serde_json_bytes::Value;
    use serde_json_bytes::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::resolvers::JsonMap;
    use crate::resolvers::ResolverContext;

    fn parse(sdl: &str) -> ExecutableSchema {
        ExecutableSchema::parse(sdl, "schema.graphql").unwrap()
    }

    const BASIC: &str = r#"
        type Query {
          simpleInt: Int
          simpleString: String
        }
    "#;

    const UNION: &str = r#"
        union AorB = A | B
        type A {
          name: String
        }

        type B {
          age: Int
        }

        type Query {
          simpleDate: AorB
        }
    "#;

    const ENUM: &str = r#"
        enum A {
          AA
          BB
        }

        type Query {
          simpleString: A
        }
    "#;

    const SCALAR: &str = r#"
        scalar DateTime

        type Query {
          simpleDate: DateTime
        }
    "#;

    const SUBSCRIPTION: &str = r#"
        type Subscription {
          simpleInt: Int
        }

        type Query {
          simpleInt: Int
        }
    "#;

    fn call(schema: &ExecutableSchema, type_name: &str, field_name: &str) -> Value {
        let arguments = JsonMap::new();
        let context = ResolverContext::new(type_name, field_name, &Value::Null, &arguments);
        schema
            .field(type_name, field_name)
            .and_then(|field| field.resolve())
            .expect("resolver is bound")
            .call(&context)
            .unwrap()
    }

    #[test]
    fn binds_field_resolvers() {
        let mut schema = parse(BASIC);
        let int_visited = Arc::new(AtomicBool::new(false));
        let string_visited = Arc::new(AtomicBool::new(false));
        let resolvers = Resolvers::new()
            .field("Query", "simpleInt", {
                let visited = int_visited.clone();
                move |_| {
                    visited.store(true, Ordering::SeqCst);
                    Ok(json!(0))
                }
            })
            .field("Query", "simpleString", {
                let visited = string_visited.clone();
                move |_| {
                    visited.store(true, Ordering::SeqCst);
                    Ok(json!("Hello"))
                }
            });

        attach_resolvers(&mut schema, &resolvers).unwrap();

        assert_eq!(call(&schema, "Query", "simpleInt"), json!(0));
        assert!(int_visited.load(Ordering::SeqCst));
        assert!(!string_visited.load(Ordering::SeqCst));
    }

    #[rstest]
    #[case::unknown_type(
        BASIC,
        Resolvers::new()
            .field("Query", "simpleInt", |_| Ok(json!(0)))
            .field("SomeType", "intVisit", |_| Ok(json!(0))),
        "UNKNOWN_TYPE",
        r#""SomeType" defined in resolvers, but not in schema"#,
    )]
    #[case::not_a_function(
        BASIC,
        Resolvers::new()
            .value("Query", "simpleInt", 0)
            .field("Query", "simpleString", |_| Ok(json!("Hello"))),
        "NOT_A_FUNCTION",
        r#""Query.simpleInt" is not a function"#,
    )]
    #[case::enum_fields(
        ENUM,
        Resolvers::new()
            .field("A", "AA", |_| Ok(json!(0)))
            .field("Query", "simpleString", |_| Ok(json!("Hello"))),
        "NOT_AN_OBJECT_TYPE",
        r#""A" was defined in resolvers, but it's not an object"#,
    )]
    #[case::unknown_field(
        r#"type Query { simpleString: String }"#,
        Resolvers::new()
            .field("Query", "simpleInt", |_| Ok(json!(0)))
            .field("Query", "simpleString", |_| Ok(json!("Hello"))),
        "UNKNOWN_FIELD",
        r#""Query.simpleInt" defined in resolvers, but not in schema"#,
    )]
    #[case::scalar_without_behavior(
        SCALAR,
        Resolvers::new()
            .field("DateTime", "__serialize", |_| Ok(Value::Null))
            .field("Query", "simpleDate", |_| Ok(Value::Null)),
        "REQUIRES_SCALAR_OBJECT",
        r#""DateTime" requires a ScalarType object"#,
    )]
    #[case::scalar_behavior_on_object(
        BASIC,
        Resolvers::new().scalar("Query", ScalarBehavior::new()),
        "UNEXPECTED_SCALAR_OBJECT",
        r#""Query" was given a ScalarType object, but it's not a scalar"#,
    )]
    #[case::resolve_type_on_object(
        UNION,
        Resolvers::new()
            .resolve_type("A", |_| Ok(json!("A")))
            .field("Query", "simpleDate", |_| Ok(Value::Null)),
        "INVALID_META_FIELD",
        r#""A.__resolveType" invalid fieldName"#,
    )]
    #[case::is_type_of_on_union(
        UNION,
        Resolvers::new()
            .is_type_of("AorB", |_| Ok(json!(true)))
            .field("Query", "simpleDate", |_| Ok(Value::Null)),
        "INVALID_META_FIELD",
        r#""AorB.__isTypeOf" invalid fieldName"#,
    )]
    #[case::user_defined_meta_field(
        r#"enum A { VALUE } type Query { simpleDate: A }"#,
        Resolvers::new()
            .field("A", "__something", |_| Ok(json!(true)))
            .field("Query", "simpleDate", |_| Ok(Value::Null)),
        "INVALID_META_FIELD",
        r#""A.__something" invalid fieldName"#,
    )]
    #[case::non_callable_meta_field(
        UNION,
        Resolvers::new().value("AorB", "__resolveType", "A"),
        "NOT_A_FUNCTION",
        r#""AorB.__resolveType" is not a function"#,
    )]
    fn rejects_invalid_resolvers(
        #[case] sdl: &str,
        #[case] resolvers: Resolvers,
        #[case] code: &str,
        #[case] message: &str,
    ) {
        let mut schema = parse(sdl);
        let err = attach_resolvers(&mut schema, &resolvers).unwrap_err();
        assert_eq!(err.code(), code);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn failed_attachment_leaves_schema_untouched() {
        let mut schema = parse(BASIC);
        let resolvers = Resolvers::new()
            .field("Query", "simpleInt", |_| Ok(json!(0)))
            .field("Query", "missing", |_| Ok(json!(0)));

        attach_resolvers(&mut schema, &resolvers).unwrap_err();

        assert!(schema.field("Query", "simpleInt").unwrap().resolve().is_none());
    }

    #[test]
    fn copies_scalar_behavior() {
        let mut schema = parse(SCALAR);
        let behavior = ScalarBehavior::new()
            .with_serialize(|value| Ok(value.clone()))
            .with_parse_value(|value| Ok(value.clone()));
        let resolvers = Resolvers::new()
            .scalar("DateTime", behavior.clone())
            .field("Query", "simpleDate", |_| Ok(json!("2024-01-01T00:00:00Z")));

        attach_resolvers(&mut schema, &resolvers).unwrap();

        let scalar = schema.wiring("DateTime").and_then(TypeWiring::scalar).unwrap();
        assert_eq!(scalar, &behavior);

        // a later, partial behavior only overrides what it sets
        let serialize = ScalarBehavior::new().with_serialize(|_| Ok(Value::Null));
        attach_resolvers(
            &mut schema,
            &Resolvers::new().scalar("DateTime", serialize.clone()),
        )
        .unwrap();
        let scalar = schema.wiring("DateTime").and_then(TypeWiring::scalar).unwrap();
        assert_eq!(scalar.serialize, serialize.serialize);
        assert_eq!(scalar.parse_value, behavior.parse_value);
    }

    #[test]
    fn empty_field_map_is_accepted_for_scalars() {
        let mut schema = parse(SCALAR);
        let mut resolvers = Resolvers::new();
        resolvers.insert("DateTime", TypeResolvers::Fields(Default::default()));
        attach_resolvers(&mut schema, &resolvers).unwrap();
    }

    #[test]
    fn binds_meta_fields() {
        let mut schema = parse(
            r#"
            interface AorB {
              name: String
            }

            type A implements AorB {
              name: String
            }

            type Query {
              simpleDate: AorB
            }
            "#,
        );
        let resolvers = Resolvers::new()
            .resolve_type("AorB", |_| Ok(json!("A")))
            .is_type_of("A", |_| Ok(json!(true)));

        attach_resolvers(&mut schema, &resolvers).unwrap();

        assert_eq!(
            schema.wiring("AorB").unwrap().resolve_type(),
            resolvers.get_field("AorB", "__resolveType")
        );
        assert_eq!(
            schema.wiring("A").unwrap().is_type_of(),
            resolvers.get_field("A", "__isTypeOf")
        );
    }

    #[traced_test]
    #[test]
    fn introspection_root_is_always_accepted() {
        let mut schema = parse(BASIC);
        let resolvers = Resolvers::new().field(INTROSPECTION_ROOT, "types", |_| Ok(json!([])));
        attach_resolvers(&mut schema, &resolvers).unwrap();
        assert!(logs_contain("ignoring resolvers given for the introspection root"));
    }

    #[test]
    fn binds_subscriptions() {
        let mut schema = parse(SUBSCRIPTION);
        let subscriptions =
            Subscriptions::new().field("simpleInt", |_| Ok(stream::iter([json!(0)]).boxed()));

        attach_subscriptions(&mut schema, &subscriptions).unwrap();

        let arguments = JsonMap::new();
        let context = ResolverContext::new("Subscription", "simpleInt", &Value::Null, &arguments);
        let mut events = schema
            .field("Subscription", "simpleInt")
            .and_then(|field| field.subscribe())
            .unwrap()
            .call(&context)
            .unwrap();
        assert_eq!(futures::executor::block_on(events.next()), Some(json!(0)));
    }

    #[test]
    fn subscriptions_require_a_subscription_root() {
        let mut schema = parse("type Query { simpleInt: Int }");
        let subscriptions =
            Subscriptions::new().field("simpleInt", |_| Ok(stream::empty().boxed()));
        let err = attach_subscriptions(&mut schema, &subscriptions).unwrap_err();
        assert_snapshot!(err.to_string(), @"No Subscription Type for schema");
    }

    #[test]
    fn subscriptions_reject_non_functions() {
        let mut schema = parse(SUBSCRIPTION);
        let subscriptions = Subscriptions::new().value("simpleInt", 0);
        let err = attach_subscriptions(&mut schema, &subscriptions).unwrap_err();
        assert_snapshot!(err.to_string(), @r#""simpleInt" is not a function"#);
    }

    #[test]
    fn subscriptions_reject_unknown_fields() {
        let mut schema = parse(SUBSCRIPTION);
        let subscriptions = Subscriptions::new()
            .field("simpleInt", |_| Ok(stream::empty().boxed()))
            .field("simpleString", |_| Ok(stream::empty().boxed()));
        let err = attach_subscriptions(&mut schema, &subscriptions).unwrap_err();
        assert_snapshot!(
            err.to_string(),
            @r#""simpleString" defined in subscription channels, but not in schema"#
        );
        assert!(
            schema
                .field("Subscription", "simpleInt")
                .unwrap()
                .subscribe()
                .is_none()
        );
    }
}
