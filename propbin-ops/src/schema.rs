//! Well-known type and field names, and type predicates.

use propbin_hash::{Hash, NameResolver};
use propbin_model::Entry;

/// Type of a VFX system record.
pub const VFX_SYSTEM: &str = "VfxSystemDefinitionData";
/// Type of the per-skin properties record cloned into variants.
pub const SKIN_PROPERTIES: &str = "SkinCharacterDataProperties";
/// Type of the record mapping logical names to live resource paths.
pub const RESOURCE_RESOLVER: &str = "ResourceResolver";

/// Type hashes recognized as resource resolvers without a name lookup.
pub const KNOWN_RESOLVER_TYPES: [Hash; 4] = [
    Hash::of_lower(RESOURCE_RESOLVER),
    Hash::from_raw(0x9956_6601),
    Hash::from_raw(0xf247_66db),
    Hash::from_raw(0x5f9a_6e19),
];

/// Field names, hashed lowercase.
pub mod fields {
    use propbin_hash::Hash;

    pub const PARTICLE_NAME: Hash = Hash::of_lower("particleName");
    pub const PARTICLE_PATH: Hash = Hash::of_lower("particlePath");
    pub const COMPLEX_EMITTERS: Hash = Hash::of_lower("complexEmitterDefinitionData");
    pub const EMITTER_NAME: Hash = Hash::of_lower("emitterName");
    pub const IS_SINGLE_PARTICLE: Hash = Hash::of_lower("isSingleParticle");
    pub const CHILD_PARTICLE_SET: Hash = Hash::of_lower("childParticleSetDefinition");
    pub const CHILDREN_IDENTIFIERS: Hash = Hash::of_lower("childrenIdentifiers");
    pub const EFFECT: Hash = Hash::of_lower("effect");
    pub const BIND_WEIGHT: Hash = Hash::of_lower("bindWeight");
    pub const IS_LOCAL_ORIENTATION: Hash = Hash::of_lower("particleIsLocalOrientation");
    pub const RATE: Hash = Hash::of_lower("rate");
    pub const CONSTANT_VALUE: Hash = Hash::of_lower("constantValue");
    pub const RESOURCE_RESOLVER: Hash = Hash::of_lower("mResourceResolver");
}

/// Struct type names used when synthesizing VFX records.
pub mod structs {
    pub const EMITTER: &str = "VfxEmitterDefinitionData";
    pub const CHILD_PARTICLE_SET: &str = "VfxChildParticleSetDefinitionData";
    pub const CHILD_IDENTIFIER: &str = "VfxChildIdentifier";
    pub const VALUE_FLOAT: &str = "ValueFloat";
}

/// Decides whether an entry's type is a given schema.
///
/// An entry matches when its type hashes to the target, or when its type
/// name (raw, or resolved through the dictionary) contains the keyword,
/// ignoring case. The second rule catches variants such as
/// `VfxResourceResolver` when `ResourceResolver` is the keyword.
#[derive(Debug, Clone)]
pub struct TypeMatcher {
    targets: Vec<Hash>,
    keyword: String,
}

impl TypeMatcher {
    /// Matches `type_name` by hash, and any type whose name contains it.
    #[must_use]
    pub fn new(type_name: &str) -> Self {
        Self {
            targets: vec![Hash::of_lower(type_name)],
            keyword: type_name.to_lowercase(),
        }
    }

    /// Also accepts each of `hashes` as an exact type.
    #[must_use]
    pub fn with_types(mut self, hashes: &[Hash]) -> Self {
        for h in hashes {
            if !self.targets.contains(h) {
                self.targets.push(*h);
            }
        }
        self
    }

    /// Whether the type hash alone identifies the schema.
    #[must_use]
    pub fn matches_hash(&self, type_hash: Hash) -> bool {
        self.targets.contains(&type_hash)
    }

    #[must_use]
    pub fn matches(&self, entry: &Entry, resolver: &NameResolver) -> bool {
        if self.matches_hash(entry.type_hash()) {
            return true;
        }
        entry
            .type_key
            .resolve(resolver)
            .is_some_and(|name| name.to_lowercase().contains(&self.keyword))
    }
}
