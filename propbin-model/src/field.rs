//! Named fields, owned sub-entries, and lookup by name hash.

use propbin_hash::Hash;
use serde::{Deserialize, Serialize};

use crate::{Key, ModelResult, Value};

/// A named value inside an entry or struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Hash,
    pub value: Value,
}

impl Field {
    pub fn new(name: Hash, value: Value) -> Self {
        Self { name, value }
    }

    /// Field whose name is the lowercase hash of `name`.
    pub fn named(name: &str, value: Value) -> Self {
        Self::new(Hash::of_lower(name), value)
    }
}

/// An owned sub-entry: the payload of an embed or non-null pointer field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub type_key: Key,
    pub fields: Vec<Field>,
}

impl Struct {
    pub fn new(type_key: impl Into<Key>, fields: Vec<Field>) -> Self {
        Self {
            type_key: type_key.into(),
            fields,
        }
    }

    /// Struct whose type is the lowercase hash of `type_name`.
    pub fn of_type(type_name: &str, fields: Vec<Field>) -> Self {
        Self::new(Key::hashed(type_name), fields)
    }

    pub fn check(&self) -> ModelResult<()> {
        self.fields.iter().try_for_each(|f| f.value.check())
    }
}

/// Lookup over an ordered field sequence.
///
/// Name hashes are unique within one level only by convention, so every
/// lookup returns the first match. A missing field is `None`, never a
/// default: callers decide what absence means.
pub trait FieldSet {
    fn fields(&self) -> &[Field];
    fn fields_mut(&mut self) -> &mut Vec<Field>;

    fn field(&self, name: Hash) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: Hash) -> Option<&mut Field> {
        self.fields_mut().iter_mut().find(|f| f.name == name)
    }

    fn value(&self, name: Hash) -> Option<&Value> {
        self.field(name).map(|f| &f.value)
    }

    /// String payload of the first field named `name`, if it is a string.
    fn string(&self, name: Hash) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Sets the first field named `name`, appending it when absent.
    fn set(&mut self, name: Hash, value: Value) {
        match self.field_mut(name) {
            Some(field) => field.value = value,
            None => self.fields_mut().push(Field::new(name, value)),
        }
    }
}

impl FieldSet for Struct {
    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }
}
