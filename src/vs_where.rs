//! Module for running the `vswhere.exe` binary that ships with
//! the Visual Studio installer.
use std::{
    io::{Error, ErrorKind},
    path::PathBuf,
    process::{Command, Output},
};

/// Type for finding and interacting with the
/// vswhere executable.
#[derive(Debug)]
pub struct VsWhere {
    path: PathBuf,
}

impl VsWhere {
    const DEFAULT_PATH: &'static str =
        "C:\\Program Files (x86)\\Microsoft Visual Studio\\Installer\\vswhere.exe";
    const ENV_KEY: &'static str = "VS_WHERE_PATH";
    const DEFAULT_ARGS: [&'static str; 6] = [
        "-legacy",
        "-prerelease",
        "-format",
        "json",
        "-products",
        "*",
    ];

    /// Locates vswhere, either at `VS_WHERE_PATH` or at the
    /// installer's default location.
    pub fn find_vswhere() -> std::io::Result<Self> {
        let path = std::env::var_os(Self::ENV_KEY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PATH));
        if path.is_file() {
            Ok(VsWhere { path })
        } else {
            Err(Error::new(
                ErrorKind::NotFound,
                format!("The path [{}] does not exist.", path.display()),
            ))
        }
    }

    /// Runs vswhere with `args`, or with arguments listing every
    /// product as json when none are given, and returns its stdout.
    pub fn run(&self, args: Option<&[&str]>) -> std::io::Result<String> {
        let args = args.unwrap_or(Self::DEFAULT_ARGS.as_slice());
        let Output { status, stdout, .. } = Command::new(&self.path).args(args).output()?;
        if !status.success() {
            return Err(Error::new(
                ErrorKind::Other,
                format!("vswhere exited with {status}"),
            ));
        }
        String::from_utf8(stdout).map_err(|e| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Command output could not be parsed as UTF-8 ({e})."),
            )
        })
    }
}
