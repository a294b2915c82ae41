use std::fs;

use mirror_core::Manifest;

use super::CliError;
use super::generate::{GenerateArgs, execute};
use super::test_utils::{config, write_catalog};

fn args(dir: &std::path::Path, dry_run: bool) -> GenerateArgs {
    GenerateArgs {
        catalog: write_catalog(dir),
        config: config(),
        output: dir.join("out"),
        manifest: dir.join("out").join("mirror-manifest.json"),
        dry_run,
    }
}

#[test]
fn writes_sources_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();

    execute(args(dir.path(), false), &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "generated 4 types into 4 files\n"
    );
    let server = fs::read_to_string(dir.path().join("out/mirror/example/Server.java")).unwrap();
    assert!(server.contains("public interface Server {"));

    let manifest = fs::read_to_string(dir.path().join("out/mirror-manifest.json")).unwrap();
    let manifest = Manifest::from_json(&manifest).unwrap();
    assert_eq!(
        manifest.implementation_of("org.example.Server"),
        Some("mirror.example.ServerImpl")
    );
    assert_eq!(
        manifest.mirror_of("org.example.ServerImpl"),
        Some("mirror.example.ServerImpl0")
    );
}

#[test]
fn dry_run_lists_files_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let mut out = Vec::new();

    execute(args(dir.path(), true), &mut out).unwrap();

    let listed = String::from_utf8(out).unwrap();
    let root = dir.path().join("out");
    let mut expected: Vec<String> = [
        "mirror/example/Server.java",
        "mirror/example/ServerImpl.java",
        "mirror/example/ServerImpl0.java",
        "mirror/example/world/World.java",
        "mirror-manifest.json",
    ]
    .iter()
    .map(|p| root.join(p).display().to_string())
    .collect();
    let mut lines: Vec<String> = listed.lines().map(str::to_string).collect();
    expected.sort();
    lines.sort();
    assert_eq!(lines, expected);
    assert!(!root.exists());
}

#[test]
fn missing_catalog_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path(), false);
    args.catalog = dir.path().join("missing.json");

    let err = execute(args, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().starts_with("failed to read '"));
}

#[test]
fn generation_errors_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let mut args = args(dir.path(), false);
    args.config = mirror_codegen::Config::new("mirror");

    let err = execute(args, &mut Vec::new()).unwrap_err();

    assert_eq!(err.to_string(), "no package prefix configured");
}
