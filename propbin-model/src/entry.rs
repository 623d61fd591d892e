use serde::{Deserialize, Serialize};

use crate::{Field, FieldSet, Key, ModelResult, Value};
use propbin_hash::Hash;

/// A uniquely identified, typed record inside a container.
///
/// The entry owns its whole field tree; `clone()` is a deep copy with no
/// sharing, which is what cloning and cross-container merges rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub identity: Key,
    pub type_key: Key,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(identity: impl Into<Key>, type_key: impl Into<Key>) -> Self {
        Self {
            identity: identity.into(),
            type_key: type_key.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, builder style.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Canonical identity hash used for dedup and lookup.
    #[must_use]
    pub fn id(&self) -> Hash {
        self.identity.to_hash()
    }

    /// Canonical type hash.
    #[must_use]
    pub fn type_hash(&self) -> Hash {
        self.type_key.to_hash()
    }

    pub fn check(&self) -> ModelResult<()> {
        self.fields.iter().try_for_each(|f| f.value.check())
    }

    /// Calls `visit` on every value in the entry's tree, depth first.
    pub fn walk_values(&self, mut visit: impl FnMut(&Value)) {
        for field in &self.fields {
            field.value.walk(&mut visit);
        }
    }

    /// Every link key held anywhere in the tree, in traversal order.
    #[must_use]
    pub fn links(&self) -> Vec<Key> {
        let mut out = Vec::new();
        self.walk_values(|v| {
            if let Value::Link(key) = v {
                out.push(key.clone());
            }
        });
        out
    }
}

impl FieldSet for Entry {
    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}
