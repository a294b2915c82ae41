use crate::Config;

#[test]
fn default_target_uses_last_prefix_segment() {
    let config = Config::new("mirror").package("org.bukkit");
    assert_eq!(
        config.target_package("org.bukkit.entity").as_deref(),
        Some("mirror.bukkit.entity")
    );
    assert_eq!(config.target_package("org.bukkit").as_deref(), Some("mirror.bukkit"));
    assert_eq!(config.target_package("org.spigot"), None);
}

#[test]
fn longest_prefix_wins() {
    let config = Config::new("m")
        .package("org.bukkit")
        .package_to("org.bukkit.craftbukkit", "m.craft");

    assert_eq!(
        config.target_package("org.bukkit.craftbukkit.entity").as_deref(),
        Some("m.craft.entity")
    );
    assert_eq!(
        config.target_package("org.bukkit.block").as_deref(),
        Some("m.bukkit.block")
    );
}

#[test]
fn prefix_match_respects_segments() {
    let config = Config::new("m").package("org.bukkit");
    assert_eq!(config.target_package("org.bukkitx"), None);
}

#[test]
fn bridge_defaults_under_root() {
    assert_eq!(Config::new("m").bridge(), "m.runtime.MirrorHandler");
    assert_eq!(Config::new("m").bridge_class("x.Bridge").bridge(), "x.Bridge");
}
