use mirror_core::Catalog;

use crate::Config;
use crate::naming::NameMapping;
use crate::scan::scan;

pub fn catalog(json: &str) -> Catalog {
    Catalog::from_json(json).unwrap()
}

pub fn config() -> Config {
    Config::new("mirror")
        .package("org.example")
        .bridge_class("mirror.Bridge")
}

pub fn mapping(catalog: &Catalog, config: &Config) -> NameMapping {
    NameMapping::build(&scan(catalog, config), config)
}
