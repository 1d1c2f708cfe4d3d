//! Reading the engine's environment-supplied configuration.

use std::{env, path::PathBuf};

/// External tools the engine shells out to.
///
/// Neither has a built-in default: the manual's External Interfaces
/// chapter treats both as part of the engine's contract with its
/// environment, so a missing one is a startup error rather than a
/// silent fallback.
pub struct Config
{
    /// Path to a POSIX shell interpreter, used to invoke build scripts.
    pub shell: PathBuf,

    /// Path to a recursive copy utility, used to materialize
    /// `OnDiskCopy` and `OnDiskLink` sources into scratch directories.
    ///
    /// Invoked as `<copy> --no-target-directory --recursive [--link]
    /// <source> <dest>`.
    pub copy: PathBuf,
}

/// Returned when a required environment variable is missing.
#[derive(Debug, thiserror::Error)]
#[error("environment variable {0} must be set to the path of {1}")]
pub struct MissingEnvVar(&'static str, &'static str);

impl Config
{
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, MissingEnvVar>
    {
        let var = |name, purpose| {
            env::var_os(name)
                .map(PathBuf::from)
                .ok_or(MissingEnvVar(name, purpose))
        };

        Ok(Self{
            shell: var("SNOWFLAKE_SHELL", "a POSIX shell interpreter")?,
            copy:  var("SNOWFLAKE_COPY", "a recursive copy utility")?,
        })
    }
}
