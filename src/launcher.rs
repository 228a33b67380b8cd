//! Module for launching processes on the machine that
//! executes the build step.
use crate::{macros::EnvVars, ArgumentList};
use std::{
    io::{Error, ErrorKind, Read, Write},
    path::Path,
    process::{Child, Command, Stdio},
    sync::mpsc::{channel, Sender},
    thread::{self, JoinHandle},
};

/// The services a build step needs from its execution environment.
pub trait Launcher {
    /// Whether the target uses unix command line conventions.
    fn is_unix(&self) -> bool;

    /// Checks if `path` exists on the target.
    fn exists(&self, path: &Path) -> std::io::Result<bool>;

    /// Runs the command described by `args` in `pwd` and waits for it
    /// to finish. The output of the process is written to `output`.
    ///
    /// Returns the exit code of the process.
    fn launch(
        &self,
        args: &ArgumentList,
        env: &EnvVars,
        pwd: &Path,
        output: &mut dyn Write,
    ) -> std::io::Result<i32>;
}

/// Launches processes on the current machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalLauncher;

impl LocalLauncher {
    pub fn new() -> Self {
        LocalLauncher
    }

    fn command(args: &ArgumentList) -> std::io::Result<Command> {
        let (program, rest) = args.args().split_first().ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput, "Cannot launch an empty command.")
        })?;
        let mut command = Command::new(program);
        #[cfg(windows)]
        {
            // The arguments are already quoted for cmd.exe.
            use std::os::windows::process::CommandExt;
            rest.iter().for_each(|arg| {
                command.raw_arg(arg);
            });
        }
        #[cfg(not(windows))]
        command.args(rest);
        Ok(command)
    }
}

impl Launcher for LocalLauncher {
    fn is_unix(&self) -> bool {
        cfg!(unix)
    }

    fn exists(&self, path: &Path) -> std::io::Result<bool> {
        path.try_exists()
    }

    fn launch(
        &self,
        args: &ArgumentList,
        env: &EnvVars,
        pwd: &Path,
        output: &mut dyn Write,
    ) -> std::io::Result<i32> {
        log::debug!("Launching [{}] in {}", args, pwd.display());
        let mut child = Self::command(args)?
            .current_dir(pwd)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Err(e) = Self::forward_output(&mut child, output) {
            // Nobody is listening any more.
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
        let status = child.wait()?;
        Ok(status.code().unwrap_or_else(|| {
            log::warn!("[{}] was terminated by a signal", args);
            -1
        }))
    }
}

impl LocalLauncher {
    const CHUNK_SIZE: usize = 8192;

    // Copies stdout and stderr of the child to `output` as they are
    // produced, until both pipes are closed.
    fn forward_output(child: &mut Child, output: &mut dyn Write) -> std::io::Result<()> {
        let (sender, receiver) = channel::<Vec<u8>>();
        let mut readers: Vec<JoinHandle<std::io::Result<()>>> = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(Self::spawn_reader(stdout, sender.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(Self::spawn_reader(stderr, sender.clone()));
        }
        drop(sender);

        for chunk in receiver {
            output.write_all(&chunk)?;
            output.flush()?;
        }
        readers.into_iter().try_for_each(|reader| {
            reader
                .join()
                .map_err(|_| Error::new(ErrorKind::Other, "Output reader thread panicked."))?
        })
    }

    fn spawn_reader(
        mut pipe: impl Read + Send + 'static,
        sender: Sender<Vec<u8>>,
    ) -> JoinHandle<std::io::Result<()>> {
        thread::spawn(move || {
            let mut buffer = [0u8; Self::CHUNK_SIZE];
            loop {
                let read = match pipe.read(&mut buffer) {
                    Ok(0) => return Ok(()),
                    Ok(read) => read,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                // The receiving side stops when the output fails.
                if sender.send(buffer[..read].to_vec()).is_err() {
                    return Ok(());
                }
            }
        })
    }
}
