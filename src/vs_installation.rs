//! Module for locating the root of a full VS installation
//! from the instances reported by vswhere.
use crate::{versions::VsInstallationVersion, vs_where::VsWhere};
use serde::Deserialize;
use serde_json::Value;
use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

/// The root directory of a VS installation.
#[derive(Debug)]
pub struct VsInstallation {
    path: PathBuf,
}

/// One entry of the `vswhere -format json` output. Fields that are
/// not needed are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VsWhereInstance {
    installation_path: PathBuf,
    installation_version: String,
}

impl VsInstallation {
    const ENV_KEY: &'static str = "VS_INSTALLATION_PATH";

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Finds the VS installation with the highest installation version in
    /// the range between max (exclusive) and min (inclusive).
    ///
    /// If `VS_INSTALLATION_PATH` is set, the instance at that path is
    /// selected instead, provided it is in the range.
    pub fn find_in_range(
        max: Option<VsInstallationVersion>,
        min: Option<VsInstallationVersion>,
    ) -> std::io::Result<Self> {
        let output = VsWhere::find_vswhere()?.run(None)?;
        let instances = Self::parse_instances(&output)?;
        let pinned = std::env::var_os(Self::ENV_KEY).map(PathBuf::from);
        Self::select(&instances, max.as_ref(), min.as_ref(), pinned.as_deref())
            .map(|path| VsInstallation { path })
    }

    // Parses the json array printed by vswhere. Instances that lack the
    // needed fields are skipped.
    fn parse_instances(output: &str) -> std::io::Result<Vec<VsWhereInstance>> {
        let instances: Vec<Value> = serde_json::from_str(output).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Failed to parse vswhere output as a list of instances ({e})"),
            )
        })?;
        Ok(instances
            .into_iter()
            .filter_map(|instance| {
                serde_json::from_value(instance)
                    .map_err(|e| log::warn!("Skipping malformed vswhere instance: {e}"))
                    .ok()
            })
            .collect())
    }

    // Selects the instance that matches the version range and, if given,
    // the pinned installation path.
    fn select(
        instances: &[VsWhereInstance],
        max: Option<&VsInstallationVersion>,
        min: Option<&VsInstallationVersion>,
        pinned: Option<&Path>,
    ) -> std::io::Result<PathBuf> {
        let candidates = instances.iter().filter_map(|instance| {
            match VsInstallationVersion::parse(&instance.installation_version) {
                Ok(version) if version.is_in_range(max, min) => Some((version, instance)),
                Ok(_) => {
                    log::trace!(
                        "Skipping {} ({}), not in the requested range",
                        instance.installation_path.display(),
                        instance.installation_version
                    );
                    None
                }
                Err(e) => {
                    log::warn!("Skipping instance with unparsable version: {e}");
                    None
                }
            }
        });

        let selected = match pinned {
            Some(pinned) => candidates
                .filter(|(_, instance)| pinned.starts_with(&instance.installation_path))
                .map(|(_, instance)| instance)
                .next(),
            None => candidates
                .max_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, instance)| instance),
        };

        selected
            .map(|instance| instance.installation_path.clone())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    "No instance found that matched requirements.",
                )
            })
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    const VSWHERE_OUTPUT: &str = r#"[
        {
            "instanceId": "VisualStudio.14.0",
            "installationPath": "C:\\Program Files (x86)\\Microsoft Visual Studio 14.0\\",
            "installationVersion": "14.0"
        },
        {
            "instanceId": "019109ba",
            "installationName": "VisualStudio/17.12.0+35506.116",
            "installationPath": "C:\\Program Files\\Microsoft Visual Studio\\2022\\Community",
            "installationVersion": "17.12.35506.116",
            "productPath": "C:\\Program Files\\Microsoft Visual Studio\\2022\\Community\\Common7\\IDE\\devenv.exe"
        },
        {
            "installationPath": "C:\\Program Files\\Microsoft Visual Studio\\2022\\Enterprise",
            "installationVersion": "17.08.35506.116"
        }
    ]"#;

    fn version(s: &str) -> VsInstallationVersion<'_> {
        VsInstallationVersion::parse(s)
            .unwrap_or_else(|_| panic!("It should be possible to parse {s} as a version."))
    }

    #[test]
    fn test_parse_instances() {
        let instances = VsInstallation::parse_instances(VSWHERE_OUTPUT)
            .expect("The vswhere output should be parsable.");
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].installation_version, "14.0");
    }

    #[test]
    fn test_parse_instances_skips_malformed_instances() {
        let output = r#"[
            { "installationVersion": "17.12.35506.116" },
            { "installationPath": "C:\\VS\\2019", "installationVersion": 16 },
            { "installationPath": "C:\\VS\\2022", "installationVersion": "17.12.35506.116" }
        ]"#;
        let instances = VsInstallation::parse_instances(output)
            .expect("Malformed instances should not fail the parsing.");
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].installation_path, PathBuf::from("C:\\VS\\2022"));
    }

    #[test]
    fn test_parse_instances_rejects_non_array() {
        let err = VsInstallation::parse_instances("{}")
            .expect_err("An object is not a list of instances.");
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_select_latest_in_range() {
        let instances = VsInstallation::parse_instances(VSWHERE_OUTPUT)
            .expect("The vswhere output should be parsable.");
        let (max, min) = (version("18.0"), version("17.7"));
        let actual = VsInstallation::select(&instances, Some(&max), Some(&min), None)
            .expect("Two instances are in range.");
        assert_eq!(
            actual,
            PathBuf::from("C:\\Program Files\\Microsoft Visual Studio\\2022\\Community")
        );
    }

    #[test]
    fn test_select_pinned_installation() {
        let instances = VsInstallation::parse_instances(VSWHERE_OUTPUT)
            .expect("The vswhere output should be parsable.");
        let (max, min) = (version("18.0"), version("17.0"));
        let pinned = PathBuf::from("C:\\Program Files\\Microsoft Visual Studio\\2022\\Enterprise");
        let actual = VsInstallation::select(&instances, Some(&max), Some(&min), Some(&pinned))
            .expect("The pinned instance is in range.");
        assert_eq!(actual, pinned);
    }

    #[test]
    fn test_select_nothing_in_range() {
        let instances = VsInstallation::parse_instances(VSWHERE_OUTPUT)
            .expect("The vswhere output should be parsable.");
        let (max, min) = (version("17.0"), version("16.0"));
        let err = VsInstallation::select(&instances, Some(&max), Some(&min), None)
            .expect_err("No instance is a 2019 installation.");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
