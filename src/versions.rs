//! Module containing code that handles Visual Studio versions.
use lenient_semver::Version;
use std::io::{Error, ErrorKind};

/// The installation version reported by vswhere, e.g. `17.12.35506.116`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct VsInstallationVersion<'a>(Version<'a>);

impl<'a> VsInstallationVersion<'a> {
    /// Parses the VsInstallationVersion from a string.
    pub fn parse(value: &'a str) -> std::io::Result<VsInstallationVersion<'a>> {
        Version::parse(value)
            .map(VsInstallationVersion)
            .map_err(|e| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to parse [{value}] as a VsInstallationVersion: {e}"),
                )
            })
    }

    /// Checks if the version is in the range between max (exclusive)
    /// and min (inclusive). A missing bound is not checked.
    pub(crate) fn is_in_range(
        &self,
        max: Option<&VsInstallationVersion>,
        min: Option<&VsInstallationVersion>,
    ) -> bool {
        max.map_or(true, |max| max.0 > self.0) && min.map_or(true, |min| self.0 >= min.0)
    }
}

/// The VS product lines that ship a devenv.com.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VsProductLineVersion {
    Vs2026,
    Vs2022,
    Vs2019,
    Vs2017,
    Vs2015,
}

impl VsProductLineVersion {
    // Inclusive min and exclusive max installation version of the product line.
    fn bounds(&self) -> (&'static str, &'static str) {
        match self {
            Self::Vs2026 => ("18.0.0.0", "19.0.0.0"),
            Self::Vs2022 => ("17.0.0.0", "18.0.0.0"),
            Self::Vs2019 => ("16.0.0.0", "17.0.0.0"),
            Self::Vs2017 => ("15.0.0.0", "16.0.0.0"),
            Self::Vs2015 => ("14.0.0.0", "15.0.0.0"),
        }
    }

    /// The non inclusive max installation version for the product line.
    pub fn installation_version_max(&self) -> VsInstallationVersion<'static> {
        // Constant values that are always safe to parse.
        VsInstallationVersion::parse(self.bounds().1).unwrap()
    }

    /// The inclusive min installation version for the product line.
    pub fn installation_version_min(&self) -> VsInstallationVersion<'static> {
        VsInstallationVersion::parse(self.bounds().0).unwrap()
    }
}

impl TryFrom<&str> for VsProductLineVersion {
    type Error = Error;

    fn try_from(s: &str) -> std::io::Result<Self> {
        match s {
            "2015" => Ok(Self::Vs2015),
            "2017" => Ok(Self::Vs2017),
            "2019" => Ok(Self::Vs2019),
            "2022" => Ok(Self::Vs2022),
            "2026" => Ok(Self::Vs2026),
            _ => Err(Error::new(
                ErrorKind::InvalidData,
                format!("Product line version {s} did not match any known values."),
            )),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Unit tests of the private functions and methods
// ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod test {
    use super::*;

    fn version(s: &str) -> VsInstallationVersion<'_> {
        VsInstallationVersion::parse(s)
            .unwrap_or_else(|_| panic!("It should be possible to parse {s} as a version."))
    }

    #[test]
    fn test_is_in_range() {
        let max = version("4.3.2.1");
        let min = version("1.2.3.4");

        assert!(version("0.0.0.0").is_in_range(None, None));
        assert!(!version("0.0.0.0").is_in_range(None, Some(&min)));
        assert!(version("1.2.3.300").is_in_range(None, Some(&min)));
        assert!(!version("4.3.2.11").is_in_range(Some(&max), None));
        assert!(version("4.0.2.11").is_in_range(Some(&max), Some(&min)));
        // The max is exclusive.
        assert!(!version("4.3.2.1").is_in_range(Some(&max), None));
    }

    #[test]
    fn test_product_line_range() {
        let vs2019 = VsProductLineVersion::try_from("2019").expect("2019 is a known product line.");
        let max = vs2019.installation_version_max();
        let min = vs2019.installation_version_min();

        assert!(version("16.11.34930.48").is_in_range(Some(&max), Some(&min)));
        assert!(!version("17.0.31903.59").is_in_range(Some(&max), Some(&min)));
        assert!(!version("15.9.28307.1000").is_in_range(Some(&max), Some(&min)));
    }

    #[test]
    fn test_parse_invalid_version() {
        let err = VsInstallationVersion::parse("not a version")
            .expect_err("The string should not parse as a version.");
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
