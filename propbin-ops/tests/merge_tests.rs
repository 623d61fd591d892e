mod common;

use common::{Fixture, ids, material, vfx};
use pretty_assertions::assert_eq;
use propbin_hash::PathHash;
use propbin_model::Container;
use propbin_ops::{ConflictPolicy, IdentityIndex, Merger, OpsError, merge_entries};

#[test]
fn primary_wins_and_order_is_kept() {
    let mut primary = Container::with_entries(vec![material("a"), material("b")]);
    let secondary = Container::with_entries(vec![material("c"), material("a"), material("d")]);
    let mut seen = IdentityIndex::seeded(ConflictPolicy::KeepFirst, &primary.entries);

    let merged = merge_entries(&mut primary, secondary, &mut seen).unwrap();
    assert_eq!(merged, 2);
    assert_eq!(
        ids(&primary),
        ids(&Container::with_entries(
            ["a", "b", "c", "d"].map(material).to_vec()
        ))
    );
    assert!(primary.duplicate_identities().is_empty());
}

#[test]
fn merger_folds_links_and_deletes_contributors() {
    let fx = Fixture::new();
    let mut primary = Container::with_entries(vec![material("m")]);
    primary.links = vec![
        "data/characters/ahri/ahri.bin".into(),
        "data/skin0_vfx.bin".into(),
        "data/shared.bin".into(),
        "data/missing.bin".into(),
        "assets/characters/ahri/ahri.tex".into(),
    ];
    let primary_path = fx.write("data/characters/ahri/skins/skin0.bin", &primary);
    fx.write("data/skin0_vfx.bin", &Container::with_entries(vec![vfx("p/a", &["e"])]));
    fx.write("data/shared.bin", &Container::with_entries(vec![material("m")]));
    fx.write("ahri.bin", &Container::with_entries(vec![material("base")]));

    let report = Merger::new(fx.ctx()).run(&primary_path).unwrap();

    assert_eq!(report.merged_entries, 1);
    assert_eq!(report.merged_files, vec![fx.path("data/skin0_vfx.bin")]);
    assert_eq!(report.links_removed, 1);
    assert_eq!(report.unresolved_links, vec!["data/missing.bin"]);

    let merged = fx.read("data/characters/ahri/skins/skin0.bin");
    assert_eq!(merged.len(), 2);
    assert_eq!(
        merged.links,
        vec![
            "data/characters/ahri/ahri.bin",
            "data/shared.bin",
            "data/missing.bin",
            "assets/characters/ahri/ahri.tex",
        ]
    );

    assert!(!fx.path("data/skin0_vfx.bin").exists());
    assert!(fx.path("data/shared.bin").exists());
    assert!(fx.path("ahri.bin").exists());
}

#[test]
fn hashed_files_are_found_by_side_file_and_by_computed_hash() {
    let fx = Fixture::new();
    let mut primary = Container::with_entries(vec![material("m")]);
    primary.links = vec!["data/a.bin".into(), "data/b.bin".into()];
    let primary_path = fx.write("skin0.bin", &primary);

    fx.write("0123456789abcdef.bin", &Container::with_entries(vec![material("from_a")]));
    std::fs::write(
        fx.path("hashed_files.json"),
        r#"{"0123456789ABCDEF.bin": "DATA/A.bin"}"#,
    )
    .unwrap();
    let computed = format!("{}.bin", PathHash::of("data/b.bin").to_hex());
    fx.write(&computed, &Container::with_entries(vec![material("from_b")]));

    let report = Merger::new(fx.ctx()).run(&primary_path).unwrap();
    assert_eq!(report.merged_entries, 2);
    assert!(fx.read("skin0.bin").links.is_empty());
    assert!(!fx.path("0123456789abcdef.bin").exists());
    assert!(!fx.path(&computed).exists());
}

#[test]
fn nothing_new_writes_nothing() {
    let fx = Fixture::new();
    let mut primary = Container::with_entries(vec![material("m")]);
    primary.links = vec!["data/dup.bin".into()];
    let primary_path = fx.write("skin0.bin", &primary);
    fx.write("data/dup.bin", &Container::with_entries(vec![material("m")]));
    let before = std::fs::read(&primary_path).unwrap();

    let report = Merger::new(fx.ctx()).run(&primary_path).unwrap();
    assert!(report.merged_files.is_empty());
    assert_eq!(std::fs::read(&primary_path).unwrap(), before);
    assert!(fx.path("data/dup.bin").exists());
}

#[test]
fn self_link_is_never_merged() {
    let fx = Fixture::new();
    let mut primary = Container::with_entries(vec![material("m")]);
    primary.links = vec!["skin0.bin".into()];
    let primary_path = fx.write("skin0.bin", &primary);

    let report = Merger::new(fx.ctx()).run(&primary_path).unwrap();
    assert_eq!(report.merged_entries, 0);
    assert!(primary_path.exists());
}

#[test]
fn conflict_aborts_without_touching_any_file() {
    let mut fx = Fixture::new();
    fx.config.conflict_policy = ConflictPolicy::Reject;
    let mut primary = Container::with_entries(vec![material("a")]);
    primary.links = vec!["data/first.bin".into(), "data/second.bin".into()];
    let primary_path = fx.write("skin0.bin", &primary);
    fx.write("data/first.bin", &Container::with_entries(vec![material("b")]));
    fx.write("data/second.bin", &Container::with_entries(vec![vfx("a", &["e"])]));
    let before = std::fs::read(&primary_path).unwrap();

    let err = Merger::new(fx.ctx()).run(&primary_path).unwrap_err();

    assert!(matches!(err, OpsError::IdentityConflict { .. }));
    assert_eq!(std::fs::read(&primary_path).unwrap(), before);
    assert!(fx.path("data/first.bin").exists());
    assert!(fx.path("data/second.bin").exists());
}

#[test]
fn unreadable_secondary_is_skipped() {
    let fx = Fixture::new();
    let mut primary = Container::with_entries(vec![material("m")]);
    primary.links = vec!["data/broken.bin".into(), "data/good.bin".into()];
    let primary_path = fx.write("skin0.bin", &primary);
    std::fs::create_dir_all(fx.path("data")).unwrap();
    std::fs::write(fx.path("data/broken.bin"), b"garbage").unwrap();
    fx.write("data/good.bin", &Container::with_entries(vec![material("g")]));

    let report = Merger::new(fx.ctx()).run(&primary_path).unwrap();

    assert_eq!(report.merged_files, vec![fx.path("data/good.bin")]);
    assert_eq!(report.merged_entries, 1);
    assert_eq!(fx.read("skin0.bin").links, vec!["data/broken.bin"]);
    assert_eq!(std::fs::read(fx.path("data/broken.bin")).unwrap(), b"garbage");
    assert!(!fx.path("data/good.bin").exists());
}
