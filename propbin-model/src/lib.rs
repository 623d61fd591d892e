//! Typed field-tree model for propbin containers.
//!
//! Defines the types every transformation operates on:
//! - [`Container`]: ordered entries plus weak links to other containers
//! - [`Entry`]: a uniquely identified, typed record
//! - [`Field`] / [`Value`]: named, variably typed values, possibly nested
//! - [`Struct`]: an owned sub-entry held by an embed or pointer field
//! - [`Key`]: a hash or raw name used for identities, types, and links
//! - [`ContainerCodec`]: the byte-level collaborator that reads and writes containers
//!
//! Ownership is strictly tree shaped: a container owns its entries, an entry
//! owns its whole field tree. Links are the only cross-entry relation and are
//! plain keys, never structural pointers, so cloning any node is a deep copy.

mod codec;
mod container;
mod entry;
mod error;
mod field;
mod key;
mod value;

pub use codec::{ContainerCodec, JsonCodec, read_container, write_container};
pub use container::{Container, DEFAULT_VERSION, PROP_SIGNATURE, Patch};
pub use entry::Entry;
pub use error::{ModelError, ModelResult};
pub use field::{Field, FieldSet, Struct};
pub use key::Key;
pub use value::{Kind, Value};

pub use propbin_hash::Hash;
