use anyhow::{anyhow, Result};

use std::path::Path;
use std::{fs, time::Duration};
use subprocess::{ExitStatus, Popen, PopenConfig, Redirection};
use tempfile::NamedTempFile;

/// Result of one toolchain invocation on a generated program.
pub struct RunResult {
    /// The generated C source.
    #[allow(dead_code)]
    pub input: String,
    /// Captured stdout.
    pub output: String,
    /// `true` if the toolchain accepted the program.
    pub compilation: bool,
    /// `true` if the run finished inside the timeout.
    pub termination: bool,
}

/// Run a toolchain script on a generated program for a bounded number of
/// seconds.
///
/// # Arguments
/// - `script`: path to a script that compiles and runs the C file it is
///   handed as its single argument
/// - `program`: the raw C source, not a file
/// - `timeout`: seconds before the script is killed; defaults to 5
///
/// # Notes
/// stderr is ignored; stdout is what gets diffed.
pub fn run(script: &Path, program: &str, timeout: Option<u64>) -> Result<RunResult> {
    // The script wants a file, so the program goes through a tempfile.
    let file = NamedTempFile::new()?;
    fs::write(&file, program)?;

    let mut p = Popen::create(
        &[script.as_os_str(), file.path().as_os_str()],
        PopenConfig {
            stdout: Redirection::Pipe,
            ..Default::default()
        },
    )?;

    let mut communicator = p.communicate_start(None);
    communicator = communicator.limit_time(Duration::from_secs(timeout.unwrap_or(5)));
    let read = communicator.read_string();

    let output = match read {
        Ok((out, _)) => out,
        Err(err) => err
            .capture
            .0
            .map(|raw| String::from_utf8_lossy(&raw).into_owned()),
    }
    .ok_or_else(|| anyhow!("no stdout captured from {}", script.display()))?;

    let (termination, compilation) = if let Some(exit_status) = p.poll() {
        match exit_status {
            ExitStatus::Exited(code) => (true, code == 0),
            _ => (true, true),
        }
    } else {
        p.terminate()?;
        (false, true)
    };

    Ok(RunResult {
        input: program.into(),
        output,
        termination,
        compilation,
    })
}
