use std::fs;

use mirror_core::Catalog;

use super::CliError;
use super::pack::{PackArgs, run};
use super::test_utils::{API, write_catalog};

#[test]
fn packed_catalog_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("api.bin");

    run(PackArgs {
        catalog: write_catalog(dir.path()),
        output: output.clone(),
    })
    .unwrap();

    let packed = Catalog::load(&fs::read(&output).unwrap()).unwrap();
    let original = Catalog::from_json(API).unwrap();
    assert_eq!(packed.len(), original.len());
    assert_eq!(
        packed.get("org.example.world.World$Environment"),
        original.get("org.example.world.World$Environment")
    );
}

#[test]
fn invalid_catalog_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("broken.json");
    fs::write(&catalog, "{ not json").unwrap();

    let err = run(PackArgs {
        catalog: catalog.clone(),
        output: dir.path().join("out.bin"),
    })
    .unwrap_err();

    assert!(matches!(err, CliError::Catalog { .. }));
    assert!(err.to_string().contains("broken.json"));
}
