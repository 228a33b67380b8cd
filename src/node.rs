//! Module for the node a build step executes on and its
//! tool location overrides.
use crate::DevEnvInstallation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The machine a build step runs on.
pub trait Node {
    fn node_name(&self) -> &str;

    /// Returns the home the node overrides for the installation,
    /// or `None` when the installation home should be used as is.
    fn tool_home(&self, installation: &DevEnvInstallation) -> std::io::Result<Option<String>>;
}

/// A node configured with a fixed set of tool location overrides,
/// keyed by installation name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNode {
    name: String,
    #[serde(default, rename = "toolLocations")]
    tool_locations: BTreeMap<String, String>,
}

impl LocalNode {
    pub fn new(name: impl Into<String>) -> Self {
        LocalNode {
            name: name.into(),
            tool_locations: BTreeMap::new(),
        }
    }

    /// Overrides the home of the installation called `installation_name`
    /// on this node.
    pub fn with_tool_location(
        mut self,
        installation_name: impl Into<String>,
        home: impl Into<String>,
    ) -> Self {
        self.tool_locations
            .insert(installation_name.into(), home.into());
        self
    }
}

impl Node for LocalNode {
    fn node_name(&self) -> &str {
        self.name.as_str()
    }

    fn tool_home(&self, installation: &DevEnvInstallation) -> std::io::Result<Option<String>> {
        Ok(self.tool_locations.get(installation.name()).cloned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_local_node_from_json() {
        let node: LocalNode = serde_json::from_value(serde_json::json!({
            "name": "windows-agent",
            "toolLocations": { "VS2019": "D:\\VS\\devenv.com" },
        }))
        .expect("The node json should be valid.");
        assert_eq!(
            node,
            LocalNode::new("windows-agent").with_tool_location("VS2019", "D:\\VS\\devenv.com")
        );
    }
}
