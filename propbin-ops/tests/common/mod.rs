#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use propbin_hash::NameResolver;
use propbin_model::{
    Container, Entry, Field, JsonCodec, Key, Kind, Struct, Value, read_container, write_container,
};
use propbin_ops::schema::{RESOURCE_RESOLVER, SKIN_PROPERTIES, VFX_SYSTEM, fields, structs};
use propbin_ops::{OpsContext, ToolConfig};
use tempfile::TempDir;

pub const CODEC: JsonCodec = JsonCodec { pretty: false };

/// A temporary mod folder plus the collaborators engines need.
pub struct Fixture {
    pub dir: TempDir,
    pub resolver: NameResolver,
    pub config: ToolConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            resolver: NameResolver::empty(),
            config: ToolConfig::default(),
        }
    }

    pub fn ctx(&self) -> OpsContext<'_> {
        OpsContext::new(&CODEC, &self.resolver, &self.config)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, container: &Container) -> PathBuf {
        let path = self.path(rel);
        write_container(&CODEC, container, &path).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> Container {
        read_container(&CODEC, &self.path(rel)).unwrap()
    }
}

pub fn emitter(name: &str) -> Value {
    Value::pointer(Struct::of_type(
        structs::EMITTER,
        vec![
            Field::new(fields::EMITTER_NAME, Value::string(name)),
            Field::named("birthColor", Value::Color([255, 0, 0, 255])),
        ],
    ))
}

/// VFX system named by its particle path, with the given emitters.
pub fn vfx(path: &str, emitters: &[&str]) -> Entry {
    let short = path.rsplit('/').next().unwrap_or(path);
    Entry::new(Key::hashed(path), Key::hashed(VFX_SYSTEM))
        .with_field(Field::new(
            fields::COMPLEX_EMITTERS,
            Value::list(Kind::Pointer, emitters.iter().map(|e| emitter(e)).collect()),
        ))
        .with_field(Field::new(fields::PARTICLE_NAME, Value::string(short)))
        .with_field(Field::new(fields::PARTICLE_PATH, Value::string(path)))
}

pub fn material(name: &str) -> Entry {
    Entry::new(Key::hashed(name), Key::hashed("StaticMaterialDef"))
        .with_field(Field::named("name", Value::string(name)))
}

pub fn properties(family: &str, index: u32, resolver_link: &str) -> Entry {
    Entry::new(
        Key::hashed(&format!("characters/{family}/skins/skin{index}")),
        Key::hashed(SKIN_PROPERTIES),
    )
    .with_field(Field::new(
        fields::RESOURCE_RESOLVER,
        Value::Link(Key::name(resolver_link)),
    ))
    .with_field(Field::named("skinScale", Value::F32(1.1)))
}

/// Resolver entry whose map points at `live` paths.
pub fn resource_resolver(identity: &str, live: &[&str]) -> Entry {
    Entry::new(Key::hashed(identity), Key::hashed(RESOURCE_RESOLVER)).with_field(Field::named(
        "resourceMap",
        Value::Map {
            key_kind: Kind::Hash,
            value_kind: Kind::Link,
            entries: live
                .iter()
                .map(|p| (Value::Hash(Key::hashed(p)), Value::Link(Key::name(*p))))
                .collect(),
        },
    ))
}

pub fn ids(container: &Container) -> Vec<u32> {
    container.entries.iter().map(|e| e.id().raw()).collect()
}

pub fn file_len(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}
