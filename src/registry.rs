//! Module for the set of devenv installations known to the build host.
use crate::{
    config::{RegistryFile, CURRENT_VERSION},
    DevEnvInstallation,
};
use std::{
    io::{Error, ErrorKind},
    path::Path,
};

/// The installations configured by an administrator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallationRegistry {
    installations: Vec<DevEnvInstallation>,
}

impl InstallationRegistry {
    pub fn new(installations: Vec<DevEnvInstallation>) -> Self {
        InstallationRegistry { installations }
    }

    pub fn installations(&self) -> &[DevEnvInstallation] {
        self.installations.as_slice()
    }

    /// Replaces every installation of the registry.
    pub fn set_installations(&mut self, installations: Vec<DevEnvInstallation>) {
        self.installations = installations;
    }

    /// Returns the first installation called exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&DevEnvInstallation> {
        self.installations.iter().find(|i| i.name() == name)
    }

    /// Loads the registry from a json file, upgrading files written
    /// in older formats.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::new(
                e.kind(),
                format!("Could not read [{}] ({e})", path.display()),
            )
        })?;
        let file = RegistryFile::parse(&contents)?;
        log::debug!(
            "Loaded {} installation(s) from {}",
            file.installations.len(),
            path.display()
        );
        Ok(InstallationRegistry::new(file.installations))
    }

    /// Saves the registry as json in the current format.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let file = RegistryFile {
            version: CURRENT_VERSION,
            installations: self.installations.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        std::fs::write(path, contents)
    }
}

impl FromIterator<DevEnvInstallation> for InstallationRegistry {
    fn from_iter<I: IntoIterator<Item = DevEnvInstallation>>(iter: I) -> Self {
        InstallationRegistry::new(iter.into_iter().collect())
    }
}
