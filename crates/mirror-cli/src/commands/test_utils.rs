use std::fs;
use std::path::{Path, PathBuf};

use indoc::indoc;
use mirror_codegen::Config;

pub const API: &str = indoc! {r#"
    {"types": [
        { "name": "org.example.Server", "kind": "interface",
          "methods": [{ "name": "getWorld", "abstract": true,
                        "returns": { "kind": "class", "name": "org.example.world.World" } }] },
        { "name": "org.example.world.World", "kind": "class" },
        { "name": "org.example.world.World$Environment", "kind": "enum",
          "enclosing": "org.example.world.World", "enum_constants": ["NORMAL", "NETHER"] },
        { "name": "org.example.ServerImpl", "kind": "class" }
    ]}
"#};

pub fn write_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("api.json");
    fs::write(&path, API).unwrap();
    path
}

pub fn config() -> Config {
    Config::new("mirror").package("org.example")
}
