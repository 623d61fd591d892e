use propbin_hash::Hash;
use propbin_model::{Container, DEFAULT_VERSION, Entry, Key, PROP_SIGNATURE};

fn entry(name: &str, ty: &str) -> Entry {
    Entry::new(Key::hashed(name), Key::hashed(ty))
}

#[test]
fn new_container_is_regular_prop_v3() {
    let c = Container::new();
    assert_eq!(c.signature, PROP_SIGNATURE);
    assert_eq!(c.version, DEFAULT_VERSION);
    assert!(!c.is_patch);
    assert!(c.is_empty());
    assert!(c.links.is_empty());
}

#[test]
fn identity_set_uses_canonical_hashes() {
    let c = Container::with_entries(vec![
        Entry::new(Key::name("A/B"), Key::hashed("t")),
        entry("c/d", "t"),
    ]);
    let ids = c.identity_set();
    assert!(ids.contains(&Hash::of("a/b")));
    assert!(ids.contains(&Hash::of("c/d")));
}

#[test]
fn duplicates_are_reported_not_fatal() {
    let c = Container::with_entries(vec![entry("a", "t"), entry("b", "t"), entry("a", "u"), entry("a", "v")]);
    assert_eq!(c.duplicate_identities(), vec![Hash::of("a")]);
    // Lookup returns the first occurrence
    assert_eq!(c.find(Hash::of("a")).unwrap().type_hash(), Hash::of("t"));
}

#[test]
fn find_mut_edits_in_place() {
    let mut c = Container::with_entries(vec![entry("a", "t")]);
    c.find_mut(Hash::of("a")).unwrap().type_key = Key::hashed("changed");
    assert_eq!(c.entries[0].type_hash(), Hash::of("changed"));
    assert!(c.find(Hash::of("missing")).is_none());
}

#[test]
fn last_of_type_picks_last() {
    let c = Container::with_entries(vec![entry("a", "t"), entry("b", "u"), entry("c", "t")]);
    assert_eq!(c.last_of_type(Hash::of("t")), Some(2));
    assert_eq!(c.last_of_type(Hash::of("nope")), None);
}

#[test]
fn add_link_skips_equivalent_links() {
    let mut c = Container::new();
    assert!(c.add_link("DATA/Characters/Ahri/Ahri_vfx.bin"));
    assert!(!c.add_link("data\\characters\\ahri\\ahri_vfx.bin"));
    assert!(c.add_link("data/other.bin"));
    assert_eq!(c.links.len(), 2);
    assert!(c.has_link("data/OTHER.bin"));
}

#[test]
fn take_entries_preserves_order_of_both_halves() {
    let mut c = Container::with_entries(vec![entry("a", "x"), entry("b", "y"), entry("c", "x"), entry("d", "y")]);
    let taken = c.take_entries(|e| e.type_hash() == Hash::of("x"));
    let taken_ids: Vec<_> = taken.iter().map(Entry::id).collect();
    let kept_ids: Vec<_> = c.entries.iter().map(Entry::id).collect();
    assert_eq!(taken_ids, vec![Hash::of("a"), Hash::of("c")]);
    assert_eq!(kept_ids, vec![Hash::of("b"), Hash::of("d")]);
}
