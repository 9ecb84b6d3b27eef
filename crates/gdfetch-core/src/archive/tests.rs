use super::*;
use crate::test_util::{list_tree, write_zip};
use std::fs;

fn artifact(path: PathBuf, ext: &str) -> DownloadedArtifact {
    DownloadedArtifact {
        local_path: path,
        declared_extension: ext.to_string(),
    }
}

#[test]
fn every_extension_has_exactly_one_route() {
    let cases = [
        (".apk", Classification::RejectRetry),
        (".APK", Classification::RejectRetry),
        (".zip", Classification::ExtractAndFlatten),
        ("zip", Classification::ExtractAndFlatten),
        (".Zip", Classification::ExtractAndFlatten),
        (".exe", Classification::AcceptAsIs),
        (".EXE", Classification::AcceptAsIs),
        (".dmg", Classification::RejectTerminal),
        (".tar", Classification::RejectTerminal),
        ("", Classification::RejectTerminal),
        (".", Classification::RejectTerminal),
    ];
    for (ext, expected) in cases {
        assert_eq!(classify_extension(ext, "exe"), expected, "{ext:?}");
    }
}

#[test]
fn executable_extension_is_configurable() {
    assert_eq!(classify_extension(".bin", "bin"), Classification::AcceptAsIs);
    assert_eq!(classify_extension(".exe", "bin"), Classification::RejectTerminal);
    assert_eq!(classify_extension("", ""), Classification::RejectTerminal);
}

#[test]
fn directory_wins_over_extension() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("GD2.1.zip");
    fs::create_dir(&sub).unwrap();
    assert_eq!(
        classify(&artifact(sub, ".zip"), "exe"),
        Classification::ScanDirectory
    );
}

#[test]
fn apk_is_deleted_and_signals_retry() {
    let dir = tempfile::tempdir().unwrap();
    let apk = dir.path().join("GD2.2.apk");
    fs::write(&apk, b"PK apk").unwrap();
    let out = normalize(artifact(apk.clone(), ".apk"), &dir.path().join("GD2.2"), "exe").unwrap();
    assert_eq!(out, Normalized::Retry);
    assert!(!apk.exists());
}

#[test]
fn unknown_format_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let f = dir.path().join("GD2.2.dmg");
    fs::write(&f, b"x").unwrap();
    let out = normalize(artifact(f.clone(), ".dmg"), &dir.path().join("GD2.2"), "exe").unwrap();
    assert_eq!(
        out,
        Normalized::Unrecognized {
            extension: ".dmg".to_string()
        }
    );
    assert!(!f.exists());
    assert!(!dir.path().join("GD2.2").exists());
}

#[test]
fn exe_is_kept_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let f = dir.path().join("GD2.2.exe");
    fs::write(&f, b"MZ").unwrap();
    let out = normalize(artifact(f.clone(), ".exe"), &dir.path().join("GD2.2"), "exe").unwrap();
    assert_eq!(out, Normalized::Executable(f.clone()));
    assert!(f.exists());
}

#[test]
fn zip_is_extracted_flattened_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("GD1.9.zip");
    write_zip(
        &zip_path,
        &[("sub/GD.exe", b"MZ"), ("sub/data.dll", b"dll"), ("readme.txt", b"hi")],
    );
    let extract_dir = dir.path().join("GD1.9");

    let out = normalize(artifact(zip_path.clone(), ".zip"), &extract_dir, "exe").unwrap();
    match out {
        Normalized::Extracted { tree, report } => {
            assert_eq!(tree.root_directory, extract_dir);
            assert_eq!(report.moved, 2);
            assert_eq!(report.removed_dirs, 1);
        }
        other => panic!("expected Extracted, got {other:?}"),
    }
    assert!(!zip_path.exists());
    assert_eq!(list_tree(&extract_dir), vec!["GD.exe", "data.dll", "readme.txt"]);
}

#[test]
fn extraction_replaces_previous_attempt_directory() {
    let dir = tempfile::tempdir().unwrap();
    let extract_dir = dir.path().join("GD1.9");
    fs::create_dir_all(extract_dir.join("old")).unwrap();
    fs::write(extract_dir.join("old/stale.exe"), b"old").unwrap();

    let zip_path = dir.path().join("GD1.9.zip");
    write_zip(&zip_path, &[("GD.exe", b"MZ")]);
    extract_zip(&zip_path, &extract_dir).unwrap();

    assert_eq!(list_tree(&extract_dir), vec!["GD.exe"]);
}

#[test]
fn corrupt_zip_is_an_error_and_still_removed() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("GD1.0.zip");
    fs::write(&zip_path, b"definitely not a zip").unwrap();
    let err = extract_zip(&zip_path, &dir.path().join("GD1.0")).unwrap_err();
    assert!(matches!(err, PipelineError::Archive { .. }), "{err}");
    assert!(!zip_path.exists());
}

#[test]
fn flatten_moves_nested_files_and_prunes_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    fs::create_dir_all(root.join("empty/deeper")).unwrap();
    fs::write(root.join("top.txt"), b"top").unwrap();
    fs::write(root.join("a/one.txt"), b"1").unwrap();
    fs::write(root.join("a/b/c/two.txt"), b"2").unwrap();

    let report = flatten(root).unwrap();
    assert_eq!(report.moved, 2);
    assert_eq!(report.removed_dirs, 5);
    assert_eq!(list_tree(root), vec!["one.txt", "top.txt", "two.txt"]);
}

#[test]
fn flatten_collision_overwrites_with_later_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("same.txt"), b"root").unwrap();
    fs::write(root.join("a/same.txt"), b"from a").unwrap();
    fs::write(root.join("b/same.txt"), b"from b").unwrap();

    flatten(root).unwrap();
    assert_eq!(list_tree(root), vec!["same.txt"]);
    assert_eq!(fs::read(root.join("same.txt")).unwrap(), b"from b");
}

#[test]
fn flatten_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("x/y")).unwrap();
    fs::write(root.join("x/y/f.bin"), b"f").unwrap();
    fs::write(root.join("g.bin"), b"g").unwrap();

    flatten(root).unwrap();
    let before = list_tree(root);
    let second = flatten(root).unwrap();
    assert_eq!(second, FlattenReport::default());
    assert_eq!(list_tree(root), before);
}

#[test]
fn flatten_resolves_name_clash_with_emptied_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(root.join("data/keep.txt"), b"k").unwrap();
    // Targets `root/data`, which is a directory until keep.txt leaves it.
    fs::write(root.join("nested/data"), b"d").unwrap();

    let report = flatten(root).unwrap();
    assert_eq!(report.moved, 2);
    assert_eq!(report.removed_dirs, 2);
    assert_eq!(list_tree(root), vec!["data", "keep.txt"]);
    assert_eq!(fs::read(root.join("data")).unwrap(), b"d");

    assert_eq!(flatten(root).unwrap(), FlattenReport::default());
}

#[test]
fn flatten_never_removes_non_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("lib/inner")).unwrap();
    fs::write(root.join("lib/inner/x.dll"), b"x").unwrap();
    // Root-level directory named like a nested file; it only empties during the first pass.
    fs::create_dir_all(root.join("x.dll/keep")).unwrap();
    fs::write(root.join("x.dll/keep/k"), b"k").unwrap();

    flatten(root).unwrap();
    // `k` was hoisted, emptying x.dll/keep and x.dll; then x.dll/ is gone,
    // so lib/inner/x.dll can take its name.
    assert_eq!(list_tree(root), vec!["k", "x.dll"]);
    assert_eq!(fs::read(root.join("x.dll")).unwrap(), b"x");
}

#[test]
fn flatten_hoists_file_named_like_its_parent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/data"), b"payload").unwrap();

    let report = flatten(root).unwrap();
    assert_eq!(report, FlattenReport { moved: 1, removed_dirs: 1 });
    assert_eq!(list_tree(root), vec!["data"]);
    assert_eq!(fs::read(root.join("data")).unwrap(), b"payload");
    assert_eq!(flatten(root).unwrap(), FlattenReport::default());
}

#[test]
fn flatten_breaks_mutual_directory_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    // Each file is named after the other's directory.
    fs::write(root.join("a/b"), b"from a").unwrap();
    fs::write(root.join("b/a"), b"from b").unwrap();

    let report = flatten(root).unwrap();
    assert_eq!(report, FlattenReport { moved: 2, removed_dirs: 2 });
    assert_eq!(list_tree(root), vec!["a", "b"]);
    assert_eq!(fs::read(root.join("b")).unwrap(), b"from a");
    assert_eq!(fs::read(root.join("a")).unwrap(), b"from b");
}

#[test]
fn flatten_hoists_file_blocked_by_its_own_ancestor() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("x/x")).unwrap();
    fs::write(root.join("x/x/x"), b"deep").unwrap();
    fs::write(root.join("x/y"), b"y").unwrap();

    flatten(root).unwrap();
    assert_eq!(list_tree(root), vec!["x", "y"]);
    assert_eq!(fs::read(root.join("x")).unwrap(), b"deep");
}

#[test]
fn zip_entries_escaping_the_destination_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("GD1.9.zip");
    write_zip(
        &zip_path,
        &[("../evil.exe", b"bad"), ("ok/GD.exe", b"MZ")],
    );
    let extract_dir = dir.path().join("GD1.9");

    let out = normalize(artifact(zip_path.clone(), ".zip"), &extract_dir, "exe").unwrap();
    assert!(matches!(out, Normalized::Extracted { .. }));
    assert!(!dir.path().join("evil.exe").exists());
    assert_eq!(list_tree(dir.path()), vec!["GD1.9", "GD1.9/GD.exe"]);
    assert_eq!(fs::read(extract_dir.join("GD.exe")).unwrap(), b"MZ");
}
