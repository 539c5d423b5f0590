//! In-memory type dictionary shared read-only by the hash generators.

use indexmap::IndexMap;

use crate::model::MessageDescriptor;

/// A fully-qualified type name (`package/msg/Name`) matches this shape.
pub fn is_valid_fqn(name: &str) -> bool {
    let parts: Vec<&str> = name.split('/').collect();
    parts.len() == 3 && !parts[0].is_empty() && parts[1] == "msg" && !parts[2].is_empty()
}

/// Map from fully-qualified type name to its message descriptor.
///
/// Backed by [`IndexMap`] rather than a `HashMap`/`BTreeMap`: insertion
/// order must be preserved for deterministic output, and a `BTreeMap` would
/// silently re-sort keys alphabetically instead.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    types: IndexMap<String, MessageDescriptor>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: MessageDescriptor) {
        self.types.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&MessageDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MessageDescriptor)> {
        self.types.iter()
    }

    /// Merge another parse's dictionary in, preserving relative insertion
    /// order of both. Later entries for an existing key overwrite earlier
    /// ones, same as [`IndexMap::extend`].
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, MessageDescriptor)>) {
        self.types.extend(other);
    }
}
