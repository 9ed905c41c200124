//! Recursive merging of resolver and subscription maps.
//!
//! Maps merge key by key at every level; anywhere two values cannot be merged further the later
//! one wins.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::resolvers::Leaf;
use crate::resolvers::Resolvers;
use crate::resolvers::ScalarBehavior;
use crate::resolvers::Subscriptions;
use crate::resolvers::TypeResolvers;

pub trait DeepMerge {
    /// Merges `other` into `self`, `other` taking precedence.
    fn deep_merge(&mut self, other: Self);

    /// Merges a sequence, later items taking precedence over earlier ones.
    fn merge_all<I>(items: I) -> Self
    where
        Self: Default + Sized,
        I: IntoIterator<Item = Self>,
    {
        items.into_iter().fold(Self::default(), |mut merged, item| {
            merged.deep_merge(item);
            merged
        })
    }
}

impl<V: DeepMerge> DeepMerge for IndexMap<String, V> {
    fn deep_merge(&mut self, other: Self) {
        for (key, value) in other {
            match self.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().deep_merge(value),
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
    }
}

impl<F> DeepMerge for Leaf<F> {
    fn deep_merge(&mut self, other: Self) {
        *self = other;
    }
}

fn merge_option<T>(current: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *current = incoming;
    }
}

impl DeepMerge for ScalarBehavior {
    fn deep_merge(&mut self, other: Self) {
        merge_option(&mut self.description, other.description);
        merge_option(&mut self.serialize, other.serialize);
        merge_option(&mut self.parse_value, other.parse_value);
        merge_option(&mut self.parse_literal, other.parse_literal);
    }
}

impl DeepMerge for TypeResolvers {
    fn deep_merge(&mut self, other: Self) {
        match other {
            TypeResolvers::Fields(incoming) => match self {
                TypeResolvers::Fields(current) => current.deep_merge(incoming),
                TypeResolvers::Scalar(_) => *self = TypeResolvers::Fields(incoming),
            },
            TypeResolvers::Scalar(incoming) => match self {
                TypeResolvers::Scalar(current) => current.deep_merge(incoming),
                TypeResolvers::Fields(_) => *self = TypeResolvers::Scalar(incoming),
            },
        }
    }
}

impl DeepMerge for Resolvers {
    fn deep_merge(&mut self, other: Self) {
        self.0.deep_merge(other.0);
    }
}

impl DeepMerge for Subscriptions {
    fn deep_merge(&mut self, other: Self) {
        self.0.deep_merge(other.0);
    }
}
