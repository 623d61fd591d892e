//! Field payloads.

use serde::{Deserialize, Serialize};

use crate::{Key, ModelError, ModelResult, Struct};

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Flag,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    Vec2,
    Vec3,
    Vec4,
    Mtx44,
    Color,
    String,
    Hash,
    Path,
    List,
    List2,
    Map,
    Embed,
    Pointer,
    Link,
    Optional,
    IdSet,
    Bitflags,
}

impl Kind {
    /// Scalar kinds are the only ones allowed as map keys.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        !matches!(
            self,
            Self::List
                | Self::List2
                | Self::Map
                | Self::Embed
                | Self::Pointer
                | Self::Optional
                | Self::IdSet
        )
    }
}

/// A field payload. The variant is the field's kind.
///
/// Container kinds declare the kind of their elements; elements are bare
/// values with no name hash of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Value {
    Flag(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mtx44([f32; 16]),
    Color([u8; 4]),
    String(String),
    /// Hash-string: a hashed name that is not an entry reference.
    Hash(Key),
    /// Path of another container file.
    Path(String),
    List { item_kind: Kind, items: Vec<Value> },
    /// Same shape as `List`; the binary layout differs.
    List2 { item_kind: Kind, items: Vec<Value> },
    Map {
        key_kind: Kind,
        value_kind: Kind,
        entries: Vec<(Value, Value)>,
    },
    /// Owned sub-entry, always present.
    Embed(Struct),
    /// Owned sub-entry; `None` is a null pointer.
    Pointer(Option<Struct>),
    /// Weak reference to another entry's identity.
    Link(Key),
    Optional {
        item_kind: Kind,
        item: Option<Box<Value>>,
    },
    /// Unordered set of ids.
    IdSet { item_kind: Kind, items: Vec<Value> },
    Bitflags(u8),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Flag(_) => Kind::Flag,
            Self::I8(_) => Kind::I8,
            Self::U8(_) => Kind::U8,
            Self::I16(_) => Kind::I16,
            Self::U16(_) => Kind::U16,
            Self::I32(_) => Kind::I32,
            Self::U32(_) => Kind::U32,
            Self::I64(_) => Kind::I64,
            Self::U64(_) => Kind::U64,
            Self::F32(_) => Kind::F32,
            Self::Vec2(_) => Kind::Vec2,
            Self::Vec3(_) => Kind::Vec3,
            Self::Vec4(_) => Kind::Vec4,
            Self::Mtx44(_) => Kind::Mtx44,
            Self::Color(_) => Kind::Color,
            Self::String(_) => Kind::String,
            Self::Hash(_) => Kind::Hash,
            Self::Path(_) => Kind::Path,
            Self::List { .. } => Kind::List,
            Self::List2 { .. } => Kind::List2,
            Self::Map { .. } => Kind::Map,
            Self::Embed(_) => Kind::Embed,
            Self::Pointer(_) => Kind::Pointer,
            Self::Link(_) => Kind::Link,
            Self::Optional { .. } => Kind::Optional,
            Self::IdSet { .. } => Kind::IdSet,
            Self::Bitflags(_) => Kind::Bitflags,
        }
    }

    /// Shorthand for a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Shorthand for a list of elements of one kind.
    #[must_use]
    pub fn list(item_kind: Kind, items: Vec<Value>) -> Self {
        Self::List { item_kind, items }
    }

    /// Shorthand for a non-null pointer.
    #[must_use]
    pub fn pointer(inner: Struct) -> Self {
        Self::Pointer(Some(inner))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Self::Embed(s) | Self::Pointer(Some(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_struct_mut(&mut self) -> Option<&mut Struct> {
        match self {
            Self::Embed(s) | Self::Pointer(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list, list2, or id set.
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::List { items, .. } | Self::List2 { items, .. } | Self::IdSet { items, .. } => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Mutable elements of a list, list2, or id set.
    #[must_use]
    pub fn items_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List { items, .. } | Self::List2 { items, .. } | Self::IdSet { items, .. } => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Verifies that the value is structurally consistent with its kind,
    /// recursing into nested values.
    pub fn check(&self) -> ModelResult<()> {
        match self {
            Self::List { item_kind, items }
            | Self::List2 { item_kind, items }
            | Self::IdSet { item_kind, items } => {
                for (i, item) in items.iter().enumerate() {
                    expect_kind(*item_kind, item, || format!("element {i}"))?;
                    item.check()?;
                }
                Ok(())
            }
            Self::Map {
                key_kind,
                value_kind,
                entries,
            } => {
                if !key_kind.is_scalar() {
                    return Err(ModelError::SchemaMismatch(format!(
                        "map key kind {key_kind:?} is not scalar"
                    )));
                }
                for (i, (k, v)) in entries.iter().enumerate() {
                    expect_kind(*key_kind, k, || format!("map key {i}"))?;
                    expect_kind(*value_kind, v, || format!("map value {i}"))?;
                    v.check()?;
                }
                Ok(())
            }
            Self::Optional { item_kind, item } => match item {
                Some(inner) => {
                    expect_kind(*item_kind, inner, || "optional item".to_string())?;
                    inner.check()
                }
                None => Ok(()),
            },
            Self::Embed(s) | Self::Pointer(Some(s)) => s.check(),
            _ => Ok(()),
        }
    }

    /// Calls `visit` on this value and every value nested below it, depth first.
    pub fn walk(&self, visit: &mut dyn FnMut(&Value)) {
        visit(self);
        match self {
            Self::List { items, .. } | Self::List2 { items, .. } | Self::IdSet { items, .. } => {
                for item in items {
                    item.walk(visit);
                }
            }
            Self::Map { entries, .. } => {
                for (k, v) in entries {
                    k.walk(visit);
                    v.walk(visit);
                }
            }
            Self::Embed(s) | Self::Pointer(Some(s)) => {
                for field in &s.fields {
                    field.value.walk(visit);
                }
            }
            Self::Optional { item: Some(inner), .. } => inner.walk(visit),
            _ => {}
        }
    }
}

fn expect_kind(expected: Kind, value: &Value, what: impl FnOnce() -> String) -> ModelResult<()> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(ModelError::SchemaMismatch(format!(
            "{} is {:?}, declared {:?}",
            what(),
            value.kind(),
            expected
        )))
    }
}
