//! Helpers for JVM binary type names (`org.example.Outer$Inner`).

/// Universal root of every class hierarchy.
pub const OBJECT: &str = "java.lang.Object";

/// Package part of a binary name.
///
/// # Examples
/// ```
/// use mirror_core::names::package_of;
/// assert_eq!(package_of("org.bukkit.Server"), "org.bukkit");
/// assert_eq!(package_of("org.bukkit.Outer$Inner"), "org.bukkit");
/// assert_eq!(package_of("Unpackaged"), "");
/// ```
pub fn package_of(binary: &str) -> &str {
    let outer = outermost(binary);
    match outer.rfind('.') {
        Some(idx) => &binary[..idx],
        None => "",
    }
}

/// Simple name of a binary name: the part after the last `$` or `.`.
///
/// # Examples
/// ```
/// use mirror_core::names::simple_name;
/// assert_eq!(simple_name("org.bukkit.Server"), "Server");
/// assert_eq!(simple_name("org.bukkit.Outer$Inner"), "Inner");
/// ```
pub fn simple_name(binary: &str) -> &str {
    match binary.rfind(['$', '.']) {
        Some(idx) => &binary[idx + 1..],
        None => binary,
    }
}

/// Binary name of the top-level type a (possibly nested) name lives in.
pub fn outermost(binary: &str) -> &str {
    match binary.find('$') {
        Some(idx) => &binary[..idx],
        None => binary,
    }
}

/// Source-level name: nested separators `$` become `.`.
pub fn canonical(binary: &str) -> String {
    binary.replace('$', ".")
}

/// Whether `package` equals `prefix` or is one of its subpackages.
pub fn is_under(package: &str, prefix: &str) -> bool {
    match package.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

/// Last dotted segment of a package name.
pub fn last_segment(package: &str) -> &str {
    match package.rfind('.') {
        Some(idx) => &package[idx + 1..],
        None => package,
    }
}

/// Joins a package and a relative name, skipping the dot for the default package.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
