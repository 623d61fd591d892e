use pretty_assertions::assert_eq;
use propbin_hash::{Hash, NameResolver};
use propbin_model::{Entry, Field, FieldSet, Key, Kind, ModelError, Struct, Value};

fn emitter(name: &str) -> Value {
    Value::pointer(Struct::of_type(
        "VfxEmitterDefinitionData",
        vec![Field::named("emitterName", Value::string(name))],
    ))
}

fn system() -> Entry {
    Entry::new(Key::hashed("Characters/Ahri/Skins/Skin0/Particles/Orb"), Key::hashed("VfxSystemDefinitionData"))
        .with_field(Field::named("particleName", Value::string("Ahri_Base_Orb")))
        .with_field(Field::named(
            "complexEmitterDefinitionData",
            Value::list(Kind::Pointer, vec![emitter("Glow"), emitter("Sparks")]),
        ))
}

// ── Construction & identity ──────────────────────────────────────

#[test]
fn identity_hash_of_name_key_matches_hashed_key() {
    let by_name = Entry::new(Key::name("Characters/Ahri/Skins/Skin0"), Key::hashed("T"));
    let by_hash = Entry::new(Key::hashed("characters/ahri/skins/skin0"), Key::hashed("T"));
    assert_eq!(by_name.id(), by_hash.id());
    assert_ne!(by_name.identity, by_hash.identity);
}

#[test]
fn type_hash_is_lowercase_hash_of_type_name() {
    assert_eq!(system().type_hash(), Hash::of("vfxsystemdefinitiondata"));
}

// ── Lookup ───────────────────────────────────────────────────────

#[test]
fn field_lookup_returns_first_match() {
    let e = Entry::new(Key::hashed("e"), Key::hashed("t"))
        .with_field(Field::named("dup", Value::U32(1)))
        .with_field(Field::named("dup", Value::U32(2)));
    assert_eq!(e.value(Hash::of_lower("dup")), Some(&Value::U32(1)));
}

#[test]
fn missing_field_is_none_not_default() {
    let e = system();
    assert!(e.field(Hash::of_lower("addedLater")).is_none());
    assert_eq!(e.string(Hash::of_lower("addedLater")), None);
}

#[test]
fn string_lookup_ignores_non_string_fields() {
    let e = Entry::new(Key::hashed("e"), Key::hashed("t")).with_field(Field::named("count", Value::U8(3)));
    assert_eq!(e.string(Hash::of_lower("count")), None);
}

#[test]
fn set_replaces_or_appends() {
    let mut e = system();
    e.set(Hash::of_lower("particleName"), Value::string("Renamed"));
    e.set(Hash::of_lower("newField"), Value::Flag(true));
    assert_eq!(e.string(Hash::of_lower("particleName")), Some("Renamed"));
    assert_eq!(e.value(Hash::of_lower("newField")), Some(&Value::Flag(true)));
    assert_eq!(e.fields.len(), 3);
}

#[test]
fn nested_struct_lookup() {
    let e = system();
    let list = e.value(Hash::of_lower("complexEmitterDefinitionData")).unwrap();
    let first = list.items().unwrap()[0].as_struct().unwrap();
    assert_eq!(first.string(Hash::of_lower("emitterName")), Some("Glow"));
}

// ── Deep copy ────────────────────────────────────────────────────

#[test]
fn clone_is_a_deep_copy() {
    let original = system();
    let mut copy = original.clone();

    let list = copy.field_mut(Hash::of_lower("complexEmitterDefinitionData")).unwrap();
    let first = list.value.items_mut().unwrap()[0].as_struct_mut().unwrap();
    first.set(Hash::of_lower("emitterName"), Value::string("Changed"));

    let orig_first = original
        .value(Hash::of_lower("complexEmitterDefinitionData"))
        .and_then(|v| v.items())
        .and_then(|items| items[0].as_struct())
        .unwrap();
    assert_eq!(orig_first.string(Hash::of_lower("emitterName")), Some("Glow"));
    assert_ne!(copy, original);
}

// ── Links & traversal ────────────────────────────────────────────

#[test]
fn links_collects_nested_links_in_order() {
    let e = Entry::new(Key::hashed("e"), Key::hashed("t"))
        .with_field(Field::named("top", Value::Link(Key::name("A"))))
        .with_field(Field::named(
            "nested",
            Value::Embed(Struct::of_type(
                "Holder",
                vec![Field::named(
                    "inner",
                    Value::list(Kind::Link, vec![Value::Link(Key::hashed("B"))]),
                )],
            )),
        ))
        .with_field(Field::named("null", Value::Pointer(None)));
    assert_eq!(e.links(), vec![Key::name("A"), Key::hashed("B")]);
}

#[test]
fn key_resolve_prefers_raw_name() {
    let resolver = NameResolver::empty();
    assert_eq!(Key::name("Raw/Path").resolve(&resolver), Some("Raw/Path"));
    assert_eq!(Key::hashed("unknown").resolve(&resolver), None);
}

#[test]
fn key_display_uses_resolver_or_hex() {
    let mut resolver = NameResolver::empty();
    let h = resolver.insert("Known/Name");
    assert_eq!(Key::Hash(h).display(&resolver), "known/name");
    assert_eq!(Key::Hash(Hash::from_raw(1)).display(&resolver), "00000001");
}

// ── Structural checks ────────────────────────────────────────────

#[test]
fn check_accepts_well_formed_tree() {
    assert!(system().check().is_ok());
}

#[test]
fn check_rejects_list_element_of_wrong_kind() {
    let e = Entry::new(Key::hashed("e"), Key::hashed("t"))
        .with_field(Field::named("l", Value::list(Kind::U32, vec![Value::U32(1), Value::string("x")])));
    let err = e.check().unwrap_err();
    assert!(matches!(err, ModelError::SchemaMismatch(_)));
    assert!(err.to_string().contains("element 1"));
}

#[test]
fn check_rejects_non_scalar_map_key() {
    let v = Value::Map {
        key_kind: Kind::List,
        value_kind: Kind::String,
        entries: vec![],
    };
    assert!(v.check().is_err());
}

#[test]
fn check_recurses_into_pointers() {
    let bad = Value::pointer(Struct::of_type(
        "Inner",
        vec![Field::named("l", Value::list(Kind::F32, vec![Value::U8(1)]))],
    ));
    assert!(bad.check().is_err());
}

#[test]
fn check_validates_optional_item_kind() {
    let ok = Value::Optional {
        item_kind: Kind::Link,
        item: Some(Box::new(Value::Link(Key::name("x")))),
    };
    let bad = Value::Optional {
        item_kind: Kind::Link,
        item: Some(Box::new(Value::U8(0))),
    };
    assert!(ok.check().is_ok());
    assert!(bad.check().is_err());
}

#[test]
fn scalar_kinds() {
    assert!(Kind::U32.is_scalar());
    assert!(Kind::Hash.is_scalar());
    assert!(!Kind::Embed.is_scalar());
    assert!(!Kind::Map.is_scalar());
}
