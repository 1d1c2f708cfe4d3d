use std::{
    io,
    path::Path,
    process::{Command, ExitStatus},
};

/// The shell script handed to the configured shell interpreter.
///
/// `$1` is the scratch directory; the remaining positional arguments
/// are dependency output paths, relative to the scratch directory, in
/// declaration order. The script closes standard input and redirects
/// both standard streams to `snowflake-log` before executing the
/// build script, exactly as the rule build-script contract requires.
const SCRIPT: &str = "\
set -e\n\
cd \"$1\"\n\
shift\n\
exec 0<&-\n\
exec >snowflake-log 2>&1\n\
exec ./snowflake-build \"$@\"\n\
";

/// Invokes a rule's build script in an isolated shell.
///
/// This is deliberately a thin wrapper around [`Command`]: the
/// isolation this engine provides is directory isolation only (each
/// build gets its own scratch directory) — no namespaces, no cgroups,
/// no seccomp. A build script that wants stronger sandboxing must
/// arrange it itself.
pub struct Runner<'a>
{
    /// Absolute path to a shell interpreter supporting `-c` and `--`.
    pub shell: &'a Path,
}

/// What happened when the runner invoked a build script.
#[derive(Debug)]
pub enum RunOutcome
{
    /// The shell, and in turn the build script, exited successfully.
    Success,

    /// The shell or the build script exited with a nonzero status (or
    /// was killed by a signal).
    Failed
    {
        /// The exit status of the shell process.
        status: ExitStatus,
    },
}

impl Runner<'_>
{
    /// Run the build script materialized at `scratch_dir`, passing it
    /// `dependency_paths` as positional arguments.
    ///
    /// `dependency_paths` must already be relative to `scratch_dir` —
    /// constructing them is the evaluator's responsibility, since it
    /// alone knows the stash's fanout layout (see the manual chapter
    /// on the dependency-path prefix).
    pub fn run(&self, scratch_dir: &Path, dependency_paths: &[impl AsRef<Path>])
        -> io::Result<RunOutcome>
    {
        let status = Command::new(self.shell)
            .arg("-c")
            .arg(SCRIPT)
            .arg("--")
            .arg(scratch_dir)
            .args(dependency_paths.iter().map(AsRef::as_ref))
            .status()?;

        Ok(match status.success() {
            true  => RunOutcome::Success,
            false => RunOutcome::Failed{status},
        })
    }
}

/// Read the build log written by a build script's invocation.
///
/// On a [`RunOutcome::Failed`], this is what the evaluator echoes into
/// the user-visible error stream.
pub fn read_log(scratch_dir: &Path) -> io::Result<String>
{
    std::fs::read_to_string(scratch_dir.join("snowflake-log"))
}
