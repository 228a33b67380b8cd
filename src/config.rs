//! Module for the on disk format of the installation registry
//! and the upgrade of older formats.
use crate::DevEnvInstallation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Error, ErrorKind};

/// The current version of the registry file.
pub(crate) const CURRENT_VERSION: u64 = 2;

/// The registry file as written by the current version.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RegistryFile {
    pub(crate) version: u64,
    pub(crate) installations: Vec<DevEnvInstallation>,
}

impl RegistryFile {
    /// Parses a registry file of any known version.
    pub(crate) fn parse(contents: &str) -> std::io::Result<Self> {
        let value: Value = serde_json::from_str(contents).map_err(invalid_data)?;
        serde_json::from_value(upgrade(value)?).map_err(invalid_data)
    }
}

fn invalid_data(e: serde_json::Error) -> Error {
    Error::new(
        ErrorKind::InvalidData,
        format!("Failed to parse the installation registry ({e})"),
    )
}

/// Brings a registry document of any known version up to
/// [`CURRENT_VERSION`].
///
/// Version 1 documents are either a bare list of installations or an
/// object without a `version` key. Their installations may carry the
/// path of the executable in the `pathToDevEnv` field, which takes
/// precedence over `home`.
pub(crate) fn upgrade(value: Value) -> std::io::Result<Value> {
    let mut document = match value {
        Value::Array(installations) => {
            let mut document = Map::new();
            document.insert("installations".to_string(), Value::Array(installations));
            document
        }
        Value::Object(document) => document,
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "The installation registry must be a json object.",
            ))
        }
    };

    let version = match document.get("version") {
        None => 1,
        Some(v) => v.as_u64().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                format!("The registry version [{v}] is not a number."),
            )
        })?,
    };
    match version {
        1 => {
            log::info!("Upgrading installation registry from version 1");
            if let Some(Value::Array(installations)) = document.get_mut("installations") {
                installations
                    .iter_mut()
                    .filter_map(Value::as_object_mut)
                    .for_each(upgrade_installation_v1);
            }
        }
        CURRENT_VERSION => {}
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("Unsupported installation registry version {version}."),
            ))
        }
    }

    document.insert("version".to_string(), Value::from(CURRENT_VERSION));
    document
        .entry("installations")
        .or_insert_with(|| Value::Array(Vec::new()));
    Ok(Value::Object(document))
}

fn upgrade_installation_v1(installation: &mut Map<String, Value>) {
    match installation.remove("pathToDevEnv") {
        Some(path @ Value::String(_)) => {
            installation.insert("home".to_string(), path);
        }
        _ => {
            installation
                .entry("home")
                .or_insert_with(|| Value::String(String::new()));
        }
    }
}
