//! Identity hashing for propbin containers.
//!
//! Everything addressable inside a container is keyed by a hash of a name:
//! - [`Hash`]: 32-bit FNV-1a of an entry path, type name, or field name
//! - [`PathHash`]: 64-bit xxh64 of a container path, used for hashed filenames
//! - [`NameResolver`]: optional reverse dictionary for human-readable logging
//!
//! Hashes are one-way. The resolver is advisory: nothing that transforms a
//! container may depend on a name being resolvable.

mod error;
mod hash;
mod resolver;

pub use error::{HashError, HashResult};
pub use hash::{Hash, PathHash, normalize_path};
pub use resolver::{DEFAULT_DICTIONARIES, NameResolver};
