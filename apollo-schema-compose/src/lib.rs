//! Attaches resolvers and subscriptions to GraphQL schemas, reads them back out, and composes
//! schemas from partial definitions.
//!
//! ## Usage
//!
//! ```
//! use apollo_schema_compose::Resolvers;
//! use apollo_schema_compose::SchemaDefinition;
//! use apollo_schema_compose::compose_schema;
//! use apollo_schema_compose::decompose_schema;
//! use serde_json_bytes::json;
//!
//! let schema = compose_schema(
//!     SchemaDefinition::new("type Query { hello: String }")
//!         .type_defs("type Query { answer: Int }")
//!         .resolvers(Resolvers::new().field("Query", "hello", |_| Ok(json!("world"))))
//!         .resolvers(Resolvers::new().field("Query", "answer", |_| Ok(json!(42)))),
//! )
//! .unwrap();
//!
//! let decomposed = decompose_schema(&schema);
//! assert_eq!(decomposed.resolvers.len(), 1);
//! assert!(decomposed.resolvers.get_field("Query", "answer").is_some());
//! ```
//!
//! Resolver maps are keyed by type name and then by field name. Keys starting with `__` are meta
//! fields: `__isTypeOf` on object types and `__resolveType` on interfaces and unions. Custom
//! scalars take a [`ScalarBehavior`] instead of a field map.

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

mod attach;
mod compose;
pub mod error;
mod extract;
pub mod merge;
pub mod resolvers;
pub mod schema;
mod type_defs;
pub(crate) mod utils;

pub use crate::attach::attach_resolvers;
pub use crate::attach::attach_subscriptions;
pub use crate::compose::ComposeConfig;
pub use crate::compose::DecomposedSchema;
pub use crate::compose::SchemaDefinition;
pub use crate::compose::compose_schema;
pub use crate::compose::compose_schema_with;
pub use crate::compose::decompose_schema;
pub use crate::error::CompositionError;
pub use crate::error::WiringError;
pub use crate::extract::extract_resolvers;
pub use crate::extract::extract_subscriptions;
pub use crate::merge::DeepMerge;
pub use crate::resolvers::BoxError;
pub use crate::resolvers::JsonMap;
pub use crate::resolvers::Leaf;
pub use crate::resolvers::ResolveFn;
pub use crate::resolvers::ResolverContext;
pub use crate::resolvers::Resolvers;
pub use crate::resolvers::ScalarBehavior;
pub use crate::resolvers::ScalarFn;
pub use crate::resolvers::SubscribeFn;
pub use crate::resolvers::Subscriptions;
pub use crate::resolvers::TypeResolvers;
pub use crate::schema::ExecutableSchema;
pub use crate::schema::kind::TypeKind;
pub use crate::type_defs::concatenate_type_defs;
pub use crate::type_defs::concatenate_type_defs_with;
