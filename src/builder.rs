//! Module for the build step that cleans and rebuilds a solution
//! or project with devenv.
use crate::{
    launcher::Launcher,
    macros::{replace_macro_layered, EnvVars},
    node::Node,
    ArgumentList, InstallationRegistry,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// The executable used when no installation is configured, it is
/// expected to be found on the search path.
pub const DEFAULT_EXECUTABLE: &str = "devenv.com";

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\r\n]+").expect("line break pattern is valid"));

/// The outcome of a build as recorded by its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildResult {
    Success,
    Failure,
}

/// The state of the build a step executes in.
pub struct Build {
    env: EnvVars,
    build_variables: EnvVars,
    module_root: PathBuf,
    workspace: PathBuf,
    node: Box<dyn Node>,
    result: Option<BuildResult>,
}

impl Build {
    /// Creates a build that runs in `workspace` on `node`. The module root
    /// is the workspace until [`Build::with_module_root`] says otherwise.
    pub fn new(workspace: impl Into<PathBuf>, node: impl Node + 'static) -> Self {
        let workspace = workspace.into();
        Build {
            env: EnvVars::new(),
            build_variables: EnvVars::new(),
            module_root: workspace.clone(),
            workspace,
            node: Box::new(node),
            result: None,
        }
    }

    pub fn with_module_root(mut self, module_root: impl Into<PathBuf>) -> Self {
        self.module_root = module_root.into();
        self
    }

    pub fn with_env(mut self, env: EnvVars) -> Self {
        self.env = env;
        self
    }

    pub fn with_build_variables(mut self, build_variables: EnvVars) -> Self {
        self.build_variables = build_variables;
        self
    }

    /// The environment variables of the build, also passed on to
    /// the processes it launches.
    pub fn env(&self) -> &EnvVars {
        &self.env
    }

    pub fn build_variables(&self) -> &EnvVars {
        &self.build_variables
    }

    pub fn module_root(&self) -> &Path {
        self.module_root.as_path()
    }

    pub fn workspace(&self) -> &Path {
        self.workspace.as_path()
    }

    pub fn node(&self) -> &dyn Node {
        self.node.as_ref()
    }

    pub fn result(&self) -> Option<BuildResult> {
        self.result
    }

    pub fn set_result(&mut self, result: BuildResult) {
        self.result = Some(result);
    }
}

/// The devenv executable a step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// [`DEFAULT_EXECUTABLE`], looked up on the search path.
    Default,
    /// The resolved home of a configured installation.
    Installed(String),
}

impl Executable {
    pub fn path(&self) -> &str {
        match self {
            Executable::Default => DEFAULT_EXECUTABLE,
            Executable::Installed(path) => path.as_str(),
        }
    }
}

/// The devenv commands a step can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Clean,
    Rebuild,
}

impl Action {
    pub fn flag(&self) -> &'static str {
        match self {
            Action::Clean => "/clean",
            Action::Rebuild => "/rebuild",
        }
    }
}

/// The solution and project fields of a step after normalization.
/// `None` means the field was blank.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Targets {
    pub solution_file: Option<String>,
    pub solution_config_name: Option<String>,
    pub project_file: Option<String>,
    pub project_config_name: Option<String>,
}

impl Targets {
    /// Builds the command line of `action`.
    ///
    /// The action flag is only passed to an installed executable, the
    /// default executable gets the targets alone.
    pub fn command(&self, executable: &Executable, action: Action) -> ArgumentList {
        let mut args = ArgumentList::new();
        args.add(executable.path());
        if let Executable::Installed(_) = executable {
            args.add(action.flag());
        }
        if let Some(config) = present(&self.solution_config_name) {
            args.add(config);
        }
        if let Some(solution) = present(&self.solution_file) {
            args.add(solution);
        }
        if let Some(project) = present(&self.project_file) {
            args.add_pair("/Project", project);
        }
        if let Some(config) = present(&self.project_config_name) {
            args.add_pair("/ProjectConfig", config);
        }
        args
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Normalizes a user supplied field.
///
/// Blank values are `None`. Runs of tabs and line breaks become a single
/// space, then macros are expanded from `env` first and `build_variables`
/// second.
pub fn normalize(value: &str, env: &EnvVars, build_variables: &EnvVars) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    let single_line = LINE_BREAKS.replace_all(value, " ");
    Some(replace_macro_layered(&single_line, &[env, build_variables]))
}

/// Build step that cleans and rebuilds a Visual Studio solution or
/// project with devenv.
///
/// # Examples
///
/// ```no_run
/// use devenv::{Build, DevEnvBuilder, InstallationRegistry, LocalLauncher, LocalNode};
///
/// let registry = InstallationRegistry::load("installations.json".as_ref())
///     .expect("The registry should be readable");
/// let step = DevEnvBuilder::new("VS2022")
///     .with_solution("App.sln", "Release")
///     .with_clean(true)
///     .with_rebuild(true);
/// let mut build = Build::new("C:\\ws", LocalNode::new("built-in"));
/// let success = step.perform(&registry, &mut build, &LocalLauncher::new(), &mut std::io::stdout());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevEnvBuilder {
    dev_env_name: String,
    solution_file: String,
    solution_config_name: String,
    project_file: String,
    project_config_name: String,
    perform_clean: bool,
    perform_rebuild: bool,
    legacy_rebuild_gate: bool,
}

impl DevEnvBuilder {
    /// Creates a step using the installation called `dev_env_name`.
    pub fn new(dev_env_name: impl Into<String>) -> Self {
        DevEnvBuilder {
            dev_env_name: dev_env_name.into(),
            ..Default::default()
        }
    }

    pub fn with_solution(
        mut self,
        solution_file: impl Into<String>,
        solution_config_name: impl Into<String>,
    ) -> Self {
        self.solution_file = solution_file.into();
        self.solution_config_name = solution_config_name.into();
        self
    }

    pub fn with_project(
        mut self,
        project_file: impl Into<String>,
        project_config_name: impl Into<String>,
    ) -> Self {
        self.project_file = project_file.into();
        self.project_config_name = project_config_name.into();
        self
    }

    pub fn with_clean(mut self, perform_clean: bool) -> Self {
        self.perform_clean = perform_clean;
        self
    }

    pub fn with_rebuild(mut self, perform_rebuild: bool) -> Self {
        self.perform_rebuild = perform_rebuild;
        self
    }

    /// Runs the rebuild command when clean is enabled instead of when
    /// rebuild is enabled, as older releases of the step did.
    pub fn with_legacy_rebuild_gate(mut self, legacy_rebuild_gate: bool) -> Self {
        self.legacy_rebuild_gate = legacy_rebuild_gate;
        self
    }

    pub fn dev_env_name(&self) -> &str {
        self.dev_env_name.as_str()
    }

    pub fn solution_file(&self) -> &str {
        self.solution_file.as_str()
    }

    pub fn solution_config_name(&self) -> &str {
        self.solution_config_name.as_str()
    }

    pub fn project_file(&self) -> &str {
        self.project_file.as_str()
    }

    pub fn project_config_name(&self) -> &str {
        self.project_config_name.as_str()
    }

    pub fn is_perform_clean(&self) -> bool {
        self.perform_clean
    }

    pub fn is_perform_rebuild(&self) -> bool {
        self.perform_rebuild
    }

    fn is_rebuild_enabled(&self) -> bool {
        if self.legacy_rebuild_gate {
            self.perform_clean
        } else {
            self.perform_rebuild
        }
    }

    /// Normalizes the solution and project fields of the step.
    pub fn targets(&self, env: &EnvVars, build_variables: &EnvVars) -> Targets {
        Targets {
            solution_file: normalize(&self.solution_file, env, build_variables),
            solution_config_name: normalize(&self.solution_config_name, env, build_variables),
            project_file: normalize(&self.project_file, env, build_variables),
            project_config_name: normalize(&self.project_config_name, env, build_variables),
        }
    }

    /// Runs the enabled commands of the step in `build`, writing the
    /// progress and the output of devenv to `listener`.
    ///
    /// Returns `false` as soon as a command fails. If a command cannot be
    /// launched the build is also marked as failed.
    pub fn perform(
        &self,
        registry: &InstallationRegistry,
        build: &mut Build,
        launcher: &dyn Launcher,
        listener: &mut dyn Write,
    ) -> bool {
        match self.execute(registry, build, launcher, listener) {
            Ok(success) => success,
            Err(e) => {
                log::error!("devenv step failed: {e}");
                // The listener may be what failed, nothing more can be reported then.
                let _ = writeln!(listener, "ERROR: {e}");
                build.set_result(BuildResult::Failure);
                false
            }
        }
    }

    fn execute(
        &self,
        registry: &InstallationRegistry,
        build: &Build,
        launcher: &dyn Launcher,
        listener: &mut dyn Write,
    ) -> std::io::Result<bool> {
        let Some(executable) = self.resolve_executable(registry, build, launcher, listener)?
        else {
            return Ok(false);
        };

        let targets = self.targets(build.env(), build.build_variables());
        let mut clean = targets.command(&executable, Action::Clean);
        let mut rebuild = targets.command(&executable, Action::Rebuild);
        let pwd = Self::working_directory(&targets, build, launcher)?;

        if !launcher.is_unix() {
            clean = clean.to_windows_command(true);
            rebuild = rebuild.to_windows_command(false);
        }

        let steps = [
            (self.perform_clean, &clean),
            (self.is_rebuild_enabled(), &rebuild),
        ];
        for (_, args) in steps.iter().filter(|(enabled, _)| *enabled) {
            writeln!(
                listener,
                "Executing the command {} from {}",
                args,
                pwd.display()
            )?;
            let code = launcher.launch(args, build.env(), &pwd, listener)?;
            if code != 0 {
                log::info!("devenv exited with code {code}");
                return Ok(false);
            }
        }
        Ok(true)
    }

    // Returns `None` when the configured executable is missing, the
    // reason has then been reported to the listener.
    fn resolve_executable(
        &self,
        registry: &InstallationRegistry,
        build: &Build,
        launcher: &dyn Launcher,
        listener: &mut dyn Write,
    ) -> std::io::Result<Option<Executable>> {
        let Some(installation) = registry.find_by_name(&self.dev_env_name) else {
            log::debug!(
                "No installation called [{}], using {}",
                self.dev_env_name,
                DEFAULT_EXECUTABLE
            );
            writeln!(listener, "Path To devenv: {DEFAULT_EXECUTABLE}")?;
            return Ok(Some(Executable::Default));
        };

        let installation = installation
            .for_node(build.node())?
            .for_environment(build.env());
        let home = installation.home();
        match launcher.exists(Path::new(home)) {
            Ok(true) => {}
            Ok(false) => {
                Self::fatal_error(listener, &format!("{home} doesn't exist"))?;
                return Ok(None);
            }
            Err(e) => {
                log::debug!("Existence check of {home} failed: {e}");
                Self::fatal_error(
                    listener,
                    &format!("Failed checking for existence of {home}"),
                )?;
                return Ok(None);
            }
        }

        writeln!(listener, "Path To devenv: {home}")?;
        Ok(Some(Executable::Installed(home.to_string())))
    }

    // The module root, unless the solution file cannot be found there.
    fn working_directory(
        targets: &Targets,
        build: &Build,
        launcher: &dyn Launcher,
    ) -> std::io::Result<PathBuf> {
        if let Some(solution) = targets.solution_file.as_deref() {
            if !launcher.exists(&build.module_root().join(solution))? {
                return Ok(build.workspace().to_path_buf());
            }
        }
        Ok(build.module_root().to_path_buf())
    }

    fn fatal_error(listener: &mut dyn Write, message: &str) -> std::io::Result<()> {
        log::error!("{message}");
        writeln!(listener, "FATAL: {message}")
    }
}
