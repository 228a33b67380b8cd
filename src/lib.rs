//! # The devenv crate
//! This crate provides a build step that cleans and rebuilds
//! Visual Studio solutions and projects with `devenv.com`.
//!
//! The step looks up a configured [`DevEnvInstallation`] by name in an
//! [`InstallationRegistry`], resolves its home for the node and the
//! environment of the build, and runs the `/clean` and `/rebuild`
//! commands through a [`Launcher`]. When no installation matches, the
//! bare `devenv.com` found on the search path is used.
//!
//! # Environment Variables
//! - The `VS_WHERE_PATH` environment variable can be used in order to
//!   overwrite the default path where the crate tries to locate
//!   the `vswhere.exe` binary when detecting installations.
//!
//! - The `VS_INSTALLATION_PATH` environment variable can be used in order
//!   to pin the Visual Studio installation that detection selects.
//!   Note! The installation must still be of the requested product line.
pub mod arguments;
pub mod builder;
mod config;
pub mod installation;
pub mod launcher;
pub mod macros;
pub mod node;
pub mod registry;
mod versions;
pub mod vs_installation;
pub mod vs_where;

pub use arguments::ArgumentList;
pub use builder::{
    Action, Build, BuildResult, DevEnvBuilder, Executable, Targets, DEFAULT_EXECUTABLE,
};
pub use installation::DevEnvInstallation;
pub use launcher::{Launcher, LocalLauncher};
pub use macros::EnvVars;
pub use node::{LocalNode, Node};
pub use registry::InstallationRegistry;
pub use versions::{VsInstallationVersion, VsProductLineVersion};
pub use vs_installation::VsInstallation;
pub use vs_where::VsWhere;
