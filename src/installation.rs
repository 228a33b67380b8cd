//! Module for the devenv tool installations an administrator
//! has configured.
use crate::{
    macros::{replace_macro, EnvVars},
    node::Node,
    versions::VsProductLineVersion,
    vs_installation::VsInstallation,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A named reference to the location of a devenv executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevEnvInstallation {
    name: String,
    home: String,
}

impl DevEnvInstallation {
    /// Components of the devenv.com path below the root of a VS installation.
    const DEVENV_COM: [&'static str; 3] = ["Common7", "IDE", "devenv.com"];

    pub fn new(name: impl Into<String>, home: impl Into<String>) -> Self {
        DevEnvInstallation {
            name: name.into(),
            home: home.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The configured path of the executable, it may contain macros.
    pub fn home(&self) -> &str {
        self.home.as_str()
    }

    /// Returns a copy of the installation with the home that applies
    /// on `node`.
    pub fn for_node(&self, node: &dyn Node) -> std::io::Result<Self> {
        let home = node.tool_home(self)?;
        if let Some(home) = home.as_deref() {
            log::debug!(
                "Node {} overrides the home of {} with {}",
                node.node_name(),
                self.name,
                home
            );
        }
        Ok(DevEnvInstallation {
            name: self.name.clone(),
            home: home.unwrap_or_else(|| self.home.clone()),
        })
    }

    /// Returns a copy of the installation with the macros of the home
    /// expanded using `env`.
    pub fn for_environment(&self, env: &EnvVars) -> Self {
        DevEnvInstallation {
            name: self.name.clone(),
            home: replace_macro(&self.home, env),
        }
    }

    /// Detects a Visual Studio installation of the given product line (e.g. "2019")
    /// and registers its devenv.com under `name`. When no product line is given
    /// the newest installation is used.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use devenv::DevEnvInstallation;
    ///
    /// let vs2022 = DevEnvInstallation::detect("VS2022", Some("2022"))
    ///     .expect("A 2022 VS installation should exist");
    /// ```
    pub fn detect(name: &str, product_line_version: Option<&str>) -> std::io::Result<Self> {
        let product_line = product_line_version
            .map(VsProductLineVersion::try_from)
            .transpose()?;
        let max = product_line
            .as_ref()
            .map(|plv| plv.installation_version_max());
        let min = product_line
            .as_ref()
            .map(|plv| plv.installation_version_min());
        let vs_installation = VsInstallation::find_in_range(max, min)?;
        let home = Self::devenv_com(vs_installation.path());
        log::info!("Detected devenv for {} at {}", name, home.display());
        Ok(DevEnvInstallation::new(
            name,
            home.to_string_lossy().into_owned(),
        ))
    }

    // Native separators only, cmd.exe reads a `/` as the start of a switch.
    fn devenv_com(installation_root: &Path) -> PathBuf {
        Self::DEVENV_COM
            .iter()
            .fold(installation_root.to_path_buf(), |path, component| {
                path.join(component)
            })
    }
}
