//! Configuration for mirror generation.

use mirror_core::names::{OBJECT, is_under, last_segment, qualify};

/// A mirrored package prefix and the package its types move to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageRoot {
    pub prefix: String,
    pub target: String,
}

/// Configuration for mirror generation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root package of all generated code
    pub(crate) root_package: String,
    /// Mirrored package prefixes, in registration order
    pub(crate) packages: Vec<PackageRoot>,
    /// Appended to every mirror simple name
    pub(crate) mirror_suffix: String,
    /// Appended to an interface's mirror name to name its implementation
    pub(crate) impl_suffix: String,
    /// Fully qualified class generated code forwards to
    pub(crate) bridge_class: Option<String>,
    /// Ancestor walks stop before this type
    pub(crate) universal_root: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_package: "mirror".to_string(),
            packages: Vec::new(),
            mirror_suffix: String::new(),
            impl_suffix: "Impl".to_string(),
            bridge_class: None,
            universal_root: OBJECT.to_string(),
        }
    }
}

impl Config {
    /// Create a new Config generating under `root_package`.
    pub fn new(root_package: impl Into<String>) -> Self {
        Self {
            root_package: root_package.into(),
            ..Self::default()
        }
    }

    /// Mirror a package prefix into `root + "." + <last segment of prefix>`.
    pub fn package(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let target = qualify(&self.root_package, last_segment(&prefix));
        self.package_to(prefix, target)
    }

    /// Mirror a package prefix into an explicit target package.
    pub fn package_to(mut self, prefix: impl Into<String>, target: impl Into<String>) -> Self {
        self.packages.push(PackageRoot {
            prefix: prefix.into(),
            target: target.into(),
        });
        self
    }

    /// Set the suffix appended to mirror simple names.
    pub fn mirror_suffix(mut self, value: impl Into<String>) -> Self {
        self.mirror_suffix = value.into();
        self
    }

    /// Set the suffix appended to interface implementation names.
    pub fn impl_suffix(mut self, value: impl Into<String>) -> Self {
        self.impl_suffix = value.into();
        self
    }

    /// Set the class whose static entry points generated code calls.
    pub fn bridge_class(mut self, value: impl Into<String>) -> Self {
        self.bridge_class = Some(value.into());
        self
    }

    /// Set the type ancestor walks stop at.
    pub fn universal_root(mut self, value: impl Into<String>) -> Self {
        self.universal_root = value.into();
        self
    }

    pub fn root_package(&self) -> &str {
        &self.root_package
    }

    pub fn packages(&self) -> &[PackageRoot] {
        &self.packages
    }

    pub fn bridge(&self) -> String {
        match &self.bridge_class {
            Some(class) => class.clone(),
            None => qualify(&self.root_package, "runtime.MirrorHandler"),
        }
    }

    /// Longest registered prefix covering `package`.
    pub fn root_for(&self, package: &str) -> Option<&PackageRoot> {
        self.packages
            .iter()
            .filter(|root| is_under(package, &root.prefix))
            .max_by_key(|root| root.prefix.len())
    }

    /// Mirror package for an original package, if it is mirrored at all.
    pub fn target_package(&self, package: &str) -> Option<String> {
        let root = self.root_for(package)?;
        let rest = &package[root.prefix.len()..];
        Some(format!("{}{}", root.target, rest))
    }
}
