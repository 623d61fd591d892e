mod common;

use common::{Fixture, ids, material, resource_resolver, vfx};
use pretty_assertions::assert_eq;
use propbin_hash::{Hash, NameResolver};
use propbin_model::{Container, Entry, Key};
use propbin_ops::prune::{find_resolver, live_set};
use propbin_ops::{PrunePolicy, PruneReport, Pruner, prune};

fn named(path: &str) -> Entry {
    let mut e = vfx(path, &["e"]);
    e.identity = Key::name(path);
    e
}

fn resolver_for(paths: &[&str]) -> NameResolver {
    let mut r = NameResolver::empty();
    for p in paths {
        r.insert(p);
    }
    r
}

#[test]
fn unreferenced_systems_are_removed() {
    let mut c = Container::with_entries(vec![
        resource_resolver("res", &["Characters/A/Used", "characters\\a\\alsoused"]),
        vfx("characters/a/used", &["e"]),
        named("Characters/A/AlsoUsed"),
        vfx("characters/a/stale", &["e"]),
        material("m"),
    ]);
    let names = resolver_for(&["characters/a/used", "characters/a/stale"]);

    let report = prune(&mut c, &names, PrunePolicy::default());
    assert_eq!(
        report,
        PruneReport {
            resolver_found: true,
            map_found: true,
            live: 2,
            candidates: 3,
            kept: 2,
            removed: 1,
            unresolved: 0,
        }
    );
    assert!(c.find(Hash::of_lower("characters/a/stale")).is_none());
    assert_eq!(c.len(), 4);
}

#[test]
fn unresolved_identities_follow_policy() {
    let build = || {
        Container::with_entries(vec![
            resource_resolver("res", &["x/live"]),
            vfx("x/unknown", &["e"]),
        ])
    };

    let mut c = build();
    let report = prune(&mut c, &NameResolver::empty(), PrunePolicy::default());
    assert_eq!((report.unresolved, report.removed), (1, 1));

    let mut c = build();
    let keep = PrunePolicy {
        remove_unresolved: false,
    };
    let report = prune(&mut c, &NameResolver::empty(), keep);
    assert_eq!((report.unresolved, report.removed, report.kept), (1, 0, 1));
}

#[test]
fn missing_resolver_or_map_is_a_no_op() {
    let mut c = Container::with_entries(vec![vfx("x/a", &["e"])]);
    let report = prune(&mut c, &NameResolver::empty(), PrunePolicy::default());
    assert!(!report.resolver_found);
    assert_eq!(c.len(), 1);

    let mut c = Container::with_entries(vec![
        Entry::new(Key::hashed("res"), Key::hashed("ResourceResolver")),
        vfx("x/a", &["e"]),
    ]);
    let report = prune(&mut c, &NameResolver::empty(), PrunePolicy::default());
    assert!(report.resolver_found);
    assert!(!report.map_found);
    assert_eq!(c.len(), 2);
}

#[test]
fn known_resolver_type_hash_wins_over_name_scan() {
    let by_name = Entry::new(Key::hashed("first"), Key::name("VfxResourceResolver"));
    let by_hash = resource_resolver("second", &["p"]);
    let mut known = by_hash.clone();
    known.type_key = Key::Hash(Hash::from_raw(0xf247_66db));

    let c = Container::with_entries(vec![by_name, known]);
    let found = find_resolver(&c, &NameResolver::empty()).unwrap();
    assert_eq!(found.id(), Hash::of_lower("second"));
    assert_eq!(live_set(found).unwrap().len(), 1);
}

#[test]
fn prune_is_idempotent() {
    let mut c = Container::with_entries(vec![
        resource_resolver("res", &["p/keep"]),
        vfx("p/keep", &["e"]),
        vfx("p/drop", &["e"]),
    ]);
    let names = resolver_for(&["p/keep", "p/drop"]);

    assert_eq!(prune(&mut c, &names, PrunePolicy::default()).removed, 1);
    let after_first = ids(&c);
    assert_eq!(prune(&mut c, &names, PrunePolicy::default()).removed, 0);
    assert_eq!(ids(&c), after_first);
}

#[test]
fn pruner_keeps_unresolved_without_dictionary() {
    let fx = Fixture::new();
    let path = fx.write(
        "skin0.bin",
        &Container::with_entries(vec![
            resource_resolver("res", &["p/keep"]),
            named("p/keep"),
            named("p/drop"),
            vfx("p/hashed", &["e"]),
        ]),
    );

    let report = Pruner::new(fx.ctx()).run(&path).unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.unresolved, 1);
    assert_eq!(fx.read("skin0.bin").len(), 3);
}
